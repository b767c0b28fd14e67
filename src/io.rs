use crate::draft::DraftUnavailability;
use crate::export::UNASSIGNED;
use crate::model::{
    parse_date_key, weekday_label, Employee, Roster, RotaDay, UnavailabilityRule,
};
use anyhow::{bail, Context};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Import de personnes depuis CSV: header `name[,weekdays][,ranges]`
///
/// - `weekdays` : `Mon;Fri` ou `1;5`
/// - `ranges` : `2024-04-01..2024-04-03;2024-04-10` (bornes incluses, `/` accepté)
pub fn import_people_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Roster> {
    let path = path.as_ref();
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;
    read_people(rdr)
}

pub fn read_people_csv<R: std::io::Read>(input: R) -> anyhow::Result<Roster> {
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    read_people(rdr)
}

fn read_people<R: std::io::Read>(mut rdr: csv::Reader<R>) -> anyhow::Result<Roster> {
    let mut roster = Roster::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let employee = roster.add_employee(name)?;

        let mut draft = DraftUnavailability::new();
        if let Some(days) = rec.get(1) {
            for token in split_list(days) {
                let day = parse_weekday(token)
                    .with_context(|| format!("invalid weekday for {employee}"))?;
                if !draft.rule().weekdays.contains(&day) {
                    draft.toggle_weekday(day)?;
                }
            }
        }
        if let Some(ranges) = rec.get(2) {
            for token in split_list(ranges) {
                let (start, end) = parse_range(token)
                    .with_context(|| format!("invalid range for {employee}"))?;
                draft
                    .add_range(Some(start), Some(end))
                    .with_context(|| format!("invalid range for {employee}"))?;
            }
        }
        roster.commit_draft(&employee, draft)?;
    }
    Ok(roster)
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(';').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_weekday(raw: &str) -> anyhow::Result<u8> {
    if let Ok(n) = raw.parse::<u8>() {
        if weekday_label(n).is_some() {
            return Ok(n);
        }
        bail!("expected 1..5, got {n}");
    }
    let prefix: String = raw.chars().take(3).collect();
    (1..=5)
        .find(|d| weekday_label(*d).is_some_and(|l| l.eq_ignore_ascii_case(&prefix)))
        .with_context(|| format!("unknown weekday: {raw}"))
}

fn parse_range(raw: &str) -> anyhow::Result<(chrono::NaiveDate, chrono::NaiveDate)> {
    let (start, end) = match raw.split_once("..").or_else(|| raw.split_once('/')) {
        Some((s, e)) => (s, e),
        None => (raw, raw),
    };
    let start = parse_date_key(start).with_context(|| format!("invalid date: {start}"))?;
    let end = parse_date_key(end).with_context(|| format!("invalid date: {end}"))?;
    Ok((start, end))
}

/// Forme brute du roster JSON, revalidée entrée par entrée.
#[derive(Deserialize)]
struct RawRoster {
    employees: Vec<String>,
    #[serde(default)]
    availability: BTreeMap<String, UnavailabilityRule>,
}

/// Chargement d'un roster JSON (`employees` + `availability`)
pub fn load_roster_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Roster> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    read_roster_json(&data).with_context(|| format!("parsing {}", path.display()))
}

pub fn read_roster_json(data: &[u8]) -> anyhow::Result<Roster> {
    let raw: RawRoster = serde_json::from_slice(data)?;
    let mut roster = Roster::new();
    for name in &raw.employees {
        roster.add_employee(name)?;
    }
    for (name, rule) in raw.availability {
        let employee = Employee::new(&name);
        if !roster.contains(&employee) {
            bail!("availability rule for unknown employee {employee}");
        }
        let mut draft = DraftUnavailability::new();
        for day in rule.weekdays {
            draft.toggle_weekday(day)?;
        }
        for range in rule.ranges {
            draft.add_range(Some(range.start), Some(range.end))?;
        }
        roster.commit_draft(&employee, draft)?;
    }
    Ok(roster)
}

/// Relecture d'une rota exportée: header `Date,Assigned Person` (`DD/MM/YYYY`, `-` = vide)
pub fn import_rota_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<RotaDay>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let date = rec.get(0).context("missing date")?.trim();
        let person = rec.get(1).context("missing assigned person")?.trim();
        let date = chrono::NaiveDate::parse_from_str(date, "%d/%m/%Y")
            .with_context(|| format!("invalid date: {date}"))?;
        let assigned = (person != UNASSIGNED && !person.is_empty()).then(|| Employee::new(person));
        out.push(RotaDay { date, assigned });
    }
    Ok(out)
}
