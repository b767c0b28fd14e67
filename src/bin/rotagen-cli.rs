#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{Datelike, Utc};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rotagen::{
    calendar,
    export::{self, render_table},
    holidays::{self, resolve_excluded_dates, FileHolidays, HolidaySource, StaticHolidays},
    io,
    model::{date_key, Roster},
    scheduler::{AssignOptions, ConflictKind, Scheduler},
    ExcludedDates,
};
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération de rota mensuelle (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug)]
struct PeopleArgs {
    /// CSV `name,weekdays,ranges`
    #[arg(long, conflicts_with = "roster", required_unless_present = "roster")]
    people: Option<PathBuf>,
    /// Roster JSON (`employees` + `availability`)
    #[arg(long)]
    roster: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct MonthArgs {
    /// Année (défaut : année courante)
    #[arg(long)]
    year: Option<i32>,
    /// Mois 1..=12 (défaut : mois courant)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
}

#[derive(Args, Debug)]
struct HolidayArgs {
    /// Ignore les jours fériés
    #[arg(long)]
    no_holidays: bool,
    /// Flux au format GOV.UK lu depuis un fichier
    #[arg(long, conflicts_with = "no_holidays")]
    holidays_file: Option<PathBuf>,
    /// URL du flux de jours fériés
    #[arg(long, env = "ROTAGEN_HOLIDAYS_URL", default_value = holidays::DEFAULT_HOLIDAYS_URL)]
    holidays_url: String,
    /// Région du flux (england-and-wales, scotland, northern-ireland)
    #[arg(long, default_value = holidays::DEFAULT_REGION)]
    region: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer la rota d'un mois
    Generate {
        #[command(flatten)]
        people: PeopleArgs,
        #[command(flatten)]
        month: MonthArgs,
        #[command(flatten)]
        holidays: HolidayArgs,
        /// Graine du générateur aléatoire (résultat reproductible)
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 3)]
        max_per_employee: u32,
        /// Laisse le jour vide plutôt que d'enchaîner deux jours
        #[arg(long)]
        strict_adjacency: bool,
        /// Fichier CSV de sortie
        #[arg(long, conflicts_with = "out_dir")]
        out: Option<PathBuf>,
        /// Répertoire de sortie (nom de fichier proposé `rota_<Mois>_<Année>.csv`)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Lister les jours ouvrés d'un mois
    Days {
        #[command(flatten)]
        month: MonthArgs,
        #[command(flatten)]
        holidays: HolidayArgs,
    },

    /// Vérifier une rota exportée
    Check {
        #[command(flatten)]
        people: PeopleArgs,
        /// CSV `Date,Assigned Person`
        #[arg(long)]
        csv: PathBuf,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Generate {
            people,
            month,
            holidays,
            seed,
            max_per_employee,
            strict_adjacency,
            out,
            out_dir,
        } => {
            let roster = load_roster(&people)?;
            if roster.employees.is_empty() {
                bail!("no employees in roster");
            }
            let (year, month_index) = resolve_month(&month);
            let excluded = load_holidays(&holidays);

            let scheduler = Scheduler::new(AssignOptions {
                max_per_employee,
                allow_adjacent_fallback: !strict_adjacency,
            });
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let rota = scheduler.generate(&roster, year, month_index, &excluded.dates, &mut rng)?;

            print!("{}", render_table(&rota));
            let unassigned = rota.unassigned_count();
            if unassigned > 0 {
                eprintln!("{unassigned} day(s) left unassigned");
            }

            let target = out.or_else(|| out_dir.map(|dir| dir.join(rota.suggested_filename())));
            if let Some(path) = target {
                export::export_csv_to_path(&path, &rota)?;
                println!("Exported {}", path.display());
            }
            0
        }
        Commands::Days { month, holidays } => {
            let (year, month_index) = resolve_month(&month);
            let excluded = load_holidays(&holidays);
            for day in calendar::working_days(year, month_index, &excluded.dates)? {
                println!("{}", date_key(day));
            }
            0
        }
        Commands::Check {
            people,
            csv,
            report,
        } => {
            let roster = load_roster(&people)?;
            let days = io::import_rota_csv(&csv)?;
            let conflicts = Scheduler::detect_conflicts(&days, &roster.availability);
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(&path)
                        .with_context(|| format!("writing {}", path.display()))?;
                    w.write_record(["person", "date", "previous", "kind"])?;
                    for c in &conflicts {
                        let previous = c.previous.map(date_key).unwrap_or_default();
                        w.write_record([
                            c.person.as_str(),
                            date_key(c.date).as_str(),
                            previous.as_str(),
                            match c.kind {
                                ConflictKind::Unavailable => "unavailable",
                                ConflictKind::ConsecutiveDays => "consecutive",
                            },
                        ])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
    };

    std::process::exit(code);
}

fn load_roster(args: &PeopleArgs) -> Result<Roster> {
    match (&args.people, &args.roster) {
        (Some(path), _) => io::import_people_csv(path),
        (None, Some(path)) => io::load_roster_json(path),
        (None, None) => bail!("either --people or --roster is required"),
    }
}

fn resolve_month(args: &MonthArgs) -> (i32, u32) {
    let today = Utc::now().date_naive();
    let year = args.year.unwrap_or_else(|| today.year());
    let month_index = args.month.map_or_else(|| today.month0(), |m| m - 1);
    (year, month_index)
}

fn load_holidays(args: &HolidayArgs) -> ExcludedDates {
    let source: Box<dyn HolidaySource> = if args.no_holidays {
        Box::new(StaticHolidays::default())
    } else if let Some(path) = &args.holidays_file {
        Box::new(FileHolidays::new(path, args.region.clone()))
    } else {
        http_source(args)
    };
    let excluded = resolve_excluded_dates(source.as_ref());
    if let Some(warning) = &excluded.warning {
        eprintln!("Warning: {warning}");
    }
    excluded
}

#[cfg(feature = "fetch")]
fn http_source(args: &HolidayArgs) -> Box<dyn HolidaySource> {
    Box::new(holidays::HttpHolidays::new(
        args.holidays_url.clone(),
        args.region.clone(),
    ))
}

#[cfg(not(feature = "fetch"))]
fn http_source(args: &HolidayArgs) -> Box<dyn HolidaySource> {
    eprintln!(
        "Warning: built without `fetch`, ignoring {}",
        args.holidays_url
    );
    Box::new(StaticHolidays::default())
}
