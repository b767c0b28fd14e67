use crate::calendar::month_name;
use crate::model::Rota;
use anyhow::Context;
use csv::{Terminator, WriterBuilder};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Marqueur d'un jour sans personne.
pub const UNASSIGNED: &str = "-";

/// Ligne d'affichage / d'export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotaRow {
    /// `DD/MM/YYYY`
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Assigned Person")]
    pub person: String,
}

impl Rota {
    pub fn rows(&self) -> Vec<RotaRow> {
        self.days
            .iter()
            .map(|day| RotaRow {
                date: day.date.format("%d/%m/%Y").to_string(),
                person: day
                    .assigned
                    .as_ref()
                    .map_or_else(|| UNASSIGNED.to_string(), |p| p.as_str().to_string()),
            })
            .collect()
    }

    /// Nom de fichier proposé, ex. `rota_April_2024.csv`.
    pub fn suggested_filename(&self) -> String {
        let month = month_name(self.month_index).unwrap_or("Unknown");
        format!("rota_{month}_{}.csv", self.year)
    }
}

/// CSV deux colonnes : `Date,Assigned Person`.
pub fn write_csv<W: Write>(rota: &Rota, out: W) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    // en-tête écrit même pour une rota vide
    w.write_record(["Date", "Assigned Person"])?;
    for row in rota.rows() {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

pub fn to_csv_string(rota: &Rota) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    write_csv(rota, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Écrit le CSV de manière atomique (fichier temporaire + rename).
pub fn export_csv_to_path<P: AsRef<Path>>(path: P, rota: &Rota) -> anyhow::Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    write_csv(rota, &mut tmp)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Tableau texte aligné pour le terminal.
pub fn render_table(rota: &Rota) -> String {
    let rows = rota.rows();
    let width = rows
        .iter()
        .map(|r| r.date.len())
        .max()
        .unwrap_or(0)
        .max("Date".len());
    let mut out = format!("{:<width$} | Assigned Person\n", "Date");
    for row in rows {
        out.push_str(&format!("{:<width$} | {}\n", row.date, row.person));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Employee, RotaDay};
    use chrono::NaiveDate;

    fn sample() -> Rota {
        let d = |day| NaiveDate::from_ymd_opt(2024, 4, day).unwrap();
        Rota {
            year: 2024,
            month_index: 3,
            days: vec![
                RotaDay { date: d(1), assigned: Some(Employee::new("Alice")) },
                RotaDay { date: d(2), assigned: None },
                RotaDay { date: d(3), assigned: Some(Employee::new("Bob")) },
            ],
        }
    }

    #[test]
    fn csv_output() {
        let csv = to_csv_string(&sample()).unwrap();
        insta::assert_snapshot!(csv, @r###"
        Date,Assigned Person
        01/04/2024,Alice
        02/04/2024,-
        03/04/2024,Bob
        "###);
    }

    #[test]
    fn empty_rota_still_has_header() {
        let rota = Rota {
            year: 2024,
            month_index: 1,
            days: Vec::new(),
        };
        let csv = to_csv_string(&rota).unwrap();
        assert_eq!(csv, "Date,Assigned Person\n");
    }

    #[test]
    fn filename_embeds_month_and_year() {
        assert_eq!(sample().suggested_filename(), "rota_April_2024.csv");
    }

    #[test]
    fn table_output() {
        insta::assert_snapshot!(render_table(&sample()), @r###"
        Date       | Assigned Person
        01/04/2024 | Alice
        02/04/2024 | -
        03/04/2024 | Bob
        "###);
    }
}
