//! Jours exclus (fériés) : frontière externe du générateur.
//!
//! Le flux attendu a la forme du JSON GOV.UK :
//! `{ "<region>": { "events": [ { "date": "YYYY-MM-DD", "title": "..." } ] } }`.
//! Toute erreur est récupérée par [`resolve_excluded_dates`] en un ensemble vide.

use crate::model::parse_date_key;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_HOLIDAYS_URL: &str = "https://www.gov.uk/bank-holidays.json";
pub const DEFAULT_REGION: &str = "england-and-wales";

#[derive(Error, Debug)]
pub enum HolidayError {
    #[error("holiday feed unreachable: {0}")]
    Fetch(String),
    #[error("holiday feed malformed: {0}")]
    Parse(String),
    #[error("reading holiday file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fournit l'ensemble des dates à exclure.
pub trait HolidaySource {
    fn fetch_excluded_dates(&self) -> Result<HashSet<NaiveDate>, HolidayError>;
}

#[derive(Debug, Deserialize)]
struct Division {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct Event {
    date: String,
}

/// Extrait les dates d'une région. Région absente : ensemble vide.
pub fn parse_feed(data: &[u8], region: &str) -> Result<HashSet<NaiveDate>, HolidayError> {
    let feed: HashMap<String, Division> =
        serde_json::from_slice(data).map_err(|e| HolidayError::Parse(e.to_string()))?;
    let Some(division) = feed.get(region) else {
        debug!(region, "region not present in holiday feed");
        return Ok(HashSet::new());
    };
    division
        .events
        .iter()
        .map(|e| {
            parse_date_key(&e.date)
                .map_err(|err| HolidayError::Parse(format!("invalid date {:?}: {err}", e.date)))
        })
        .collect()
}

/// Ensemble fixe (tests, `--no-holidays`).
#[derive(Debug, Clone, Default)]
pub struct StaticHolidays(pub HashSet<NaiveDate>);

impl HolidaySource for StaticHolidays {
    fn fetch_excluded_dates(&self) -> Result<HashSet<NaiveDate>, HolidayError> {
        Ok(self.0.clone())
    }
}

/// Flux au format GOV.UK lu depuis un fichier local.
#[derive(Debug, Clone)]
pub struct FileHolidays {
    path: PathBuf,
    region: String,
}

impl FileHolidays {
    pub fn new<P: AsRef<Path>, S: Into<String>>(path: P, region: S) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            region: region.into(),
        }
    }
}

impl HolidaySource for FileHolidays {
    fn fetch_excluded_dates(&self) -> Result<HashSet<NaiveDate>, HolidayError> {
        let data = fs::read(&self.path).map_err(|source| HolidayError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_feed(&data, &self.region)
    }
}

/// Flux HTTP (GOV.UK par défaut), client bloquant.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpHolidays {
    url: String,
    region: String,
    timeout: std::time::Duration,
}

#[cfg(feature = "fetch")]
impl HttpHolidays {
    pub fn new<U: Into<String>, S: Into<String>>(url: U, region: S) -> Self {
        Self {
            url: url.into(),
            region: region.into(),
            timeout: std::time::Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(feature = "fetch")]
impl Default for HttpHolidays {
    fn default() -> Self {
        Self::new(DEFAULT_HOLIDAYS_URL, DEFAULT_REGION)
    }
}

#[cfg(feature = "fetch")]
impl HolidaySource for HttpHolidays {
    fn fetch_excluded_dates(&self) -> Result<HashSet<NaiveDate>, HolidayError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("rotagen/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()
            .map_err(|e| HolidayError::Fetch(e.to_string()))?;

        let resp = client
            .get(&self.url)
            .send()
            .map_err(|e| HolidayError::Fetch(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(HolidayError::Fetch(format!(
                "{} returned status {}",
                self.url,
                resp.status()
            )));
        }
        let body = resp.bytes().map_err(|e| HolidayError::Fetch(e.to_string()))?;
        parse_feed(&body, &self.region)
    }
}

/// Dates exclues résolues, avec l'avertissement éventuel à afficher.
#[derive(Debug, Clone, Default)]
pub struct ExcludedDates {
    pub dates: HashSet<NaiveDate>,
    pub warning: Option<String>,
}

/// Interroge la source ; en cas d'échec, ensemble vide + avertissement non bloquant.
pub fn resolve_excluded_dates(source: &dyn HolidaySource) -> ExcludedDates {
    match source.fetch_excluded_dates() {
        Ok(dates) => {
            debug!(count = dates.len(), "holidays loaded");
            ExcludedDates {
                dates,
                warning: None,
            }
        }
        Err(err) => {
            warn!(error = %err, "failed to load bank holidays, continuing without");
            ExcludedDates {
                dates: HashSet::new(),
                warning: Some(format!("Failed to load bank holidays: {err}")),
            }
        }
    }
}
