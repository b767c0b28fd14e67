use crate::availability::AvailabilityIndex;
use crate::draft::DraftUnavailability;
use crate::scheduler::RotaError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Format canonique d'une date (`YYYY-MM-DD`), ordre lexical = ordre chronologique.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Clé canonique `YYYY-MM-DD` d'une date.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse une clé canonique `YYYY-MM-DD`.
pub fn parse_date_key(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_KEY_FORMAT)
}

/// Numéro de jour ouvré (lundi = 1 .. vendredi = 5), `None` le week-end.
pub fn weekday_number(date: NaiveDate) -> Option<u8> {
    match date.weekday().number_from_monday() {
        n @ 1..=5 => Some(n as u8),
        _ => None,
    }
}

/// Abréviation anglaise d'un jour ouvré (1..=5).
pub fn weekday_label(day: u8) -> Option<&'static str> {
    ["Mon", "Tue", "Wed", "Thu", "Fri"]
        .get(usize::from(day).checked_sub(1)?)
        .copied()
}

/// Identité d'une personne de la rota : son nom affiché.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Employee(String);

impl Employee {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Intervalle fermé de dates indisponibles `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = RotaError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Crée un intervalle en validant `start <= end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RotaError> {
        if start > end {
            return Err(RotaError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", date_key(self.start), date_key(self.end))
    }
}

/// Règle d'indisponibilité d'une personne.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailabilityRule {
    /// Jours de semaine bloqués (lundi = 1 .. vendredi = 5).
    #[serde(default)]
    pub weekdays: BTreeSet<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<DateRange>,
}

impl UnavailabilityRule {
    pub fn is_empty(&self) -> bool {
        self.weekdays.is_empty() && self.ranges.is_empty()
    }

    pub fn blocks(&self, date: NaiveDate) -> bool {
        if weekday_number(date).is_some_and(|d| self.weekdays.contains(&d)) {
            return true;
        }
        self.ranges.iter().any(|r| r.contains(date))
    }

    /// Résumé lisible, ex. `Mon, Fri 2024-04-01 to 2024-04-03`.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "No blocks".to_string();
        }
        let days: Vec<&str> = self.weekdays.iter().filter_map(|d| weekday_label(*d)).collect();
        let mut parts = vec![days.join(", ")];
        parts.extend(self.ranges.iter().map(DateRange::to_string));
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }
}

/// Liste des personnes et leurs indisponibilités, possédée par l'appelant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub availability: AvailabilityIndex,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute une personne (nom trimé, non vide, unique).
    pub fn add_employee<S: AsRef<str>>(&mut self, name: S) -> Result<Employee, RotaError> {
        let employee = Employee::new(name);
        if employee.as_str().is_empty() {
            return Err(RotaError::EmptyName);
        }
        if self.contains(&employee) {
            return Err(RotaError::DuplicateEmployee(employee.0));
        }
        self.employees.push(employee.clone());
        Ok(employee)
    }

    /// Retire une personne et oublie sa règle. Les rotas déjà produites restent intactes.
    pub fn remove_employee(&mut self, employee: &Employee) -> bool {
        let before = self.employees.len();
        self.employees.retain(|e| e != employee);
        self.availability.remove(employee);
        before != self.employees.len()
    }

    pub fn contains(&self, employee: &Employee) -> bool {
        self.employees.iter().any(|e| e == employee)
    }

    /// Ouvre une session d'édition sur la règle courante.
    pub fn start_edit(&self, employee: &Employee) -> Result<DraftUnavailability, RotaError> {
        if !self.contains(employee) {
            return Err(RotaError::UnknownEmployee(employee.0.clone()));
        }
        Ok(DraftUnavailability::from_rule(
            self.availability.rule(employee).cloned().unwrap_or_default(),
        ))
    }

    /// Remplace en bloc la règle de `employee` par le brouillon.
    pub fn commit_draft(
        &mut self,
        employee: &Employee,
        draft: DraftUnavailability,
    ) -> Result<(), RotaError> {
        if !self.contains(employee) {
            return Err(RotaError::UnknownEmployee(employee.0.clone()));
        }
        let rule = draft.into_rule();
        self.availability
            .set_unavailability(employee, rule.weekdays, rule.ranges);
        Ok(())
    }
}

/// Une journée ouvrée et la personne affectée (ou personne).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotaDay {
    pub date: NaiveDate,
    pub assigned: Option<Employee>,
}

/// Affectation date → personne, une entrée par jour ouvré, ordre chronologique.
pub type Assignment = Vec<RotaDay>;

/// Résultat d'une génération : instantané immuable du mois.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rota {
    pub year: i32,
    /// Mois, index base 0 (janvier = 0).
    pub month_index: u32,
    pub days: Assignment,
}

impl Rota {
    pub fn unassigned_count(&self) -> usize {
        self.days.iter().filter(|d| d.assigned.is_none()).count()
    }

    /// Nombre de jours par personne (personnes sans jour absentes).
    pub fn counts(&self) -> BTreeMap<&Employee, usize> {
        let mut out = BTreeMap::new();
        for person in self.days.iter().filter_map(|d| d.assigned.as_ref()) {
            *out.entry(person).or_insert(0) += 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_key_is_canonical() {
        assert_eq!(date_key(d(2024, 4, 1)), "2024-04-01");
        assert_eq!(parse_date_key(" 2024-04-01 ").unwrap(), d(2024, 4, 1));
        assert!(date_key(d(2024, 4, 9)) < date_key(d(2024, 4, 10)));
    }

    #[test]
    fn weekday_numbers_skip_weekend() {
        assert_eq!(weekday_number(d(2024, 4, 1)), Some(1));
        assert_eq!(weekday_number(d(2024, 4, 5)), Some(5));
        assert_eq!(weekday_number(d(2024, 4, 6)), None);
        assert_eq!(weekday_label(3), Some("Wed"));
        assert_eq!(weekday_label(0), None);
        assert_eq!(weekday_label(6), None);
    }

    #[test]
    fn range_rejects_reversed_bounds() {
        assert!(matches!(
            DateRange::new(d(2024, 4, 2), d(2024, 4, 1)),
            Err(RotaError::InvalidRange)
        ));
        let r = DateRange::new(d(2024, 4, 1), d(2024, 4, 1)).unwrap();
        assert!(r.contains(d(2024, 4, 1)));
        assert!(!r.contains(d(2024, 4, 2)));
    }

    #[test]
    fn roster_add_and_remove() {
        let mut roster = Roster::new();
        let alice = roster.add_employee("  Alice ").unwrap();
        assert_eq!(alice.as_str(), "Alice");
        assert!(matches!(roster.add_employee("Alice"), Err(RotaError::DuplicateEmployee(_))));
        assert!(matches!(roster.add_employee("   "), Err(RotaError::EmptyName)));

        roster
            .availability
            .set_unavailability(&alice, [1u8].into_iter().collect(), Vec::new());
        assert!(roster.remove_employee(&alice));
        assert!(roster.availability.rule(&alice).is_none());
        assert!(!roster.remove_employee(&alice));
    }

    #[test]
    fn describe_rule() {
        let mut rule = UnavailabilityRule::default();
        assert_eq!(rule.describe(), "No blocks");
        rule.weekdays.extend([1, 5]);
        rule.ranges
            .push(DateRange::new(d(2024, 4, 1), d(2024, 4, 3)).unwrap());
        assert_eq!(rule.describe(), "Mon, Fri 2024-04-01 to 2024-04-03");
    }

    #[test]
    fn rota_counts() {
        let alice = Employee::new("Alice");
        let rota = Rota {
            year: 2024,
            month_index: 3,
            days: vec![
                RotaDay { date: d(2024, 4, 1), assigned: Some(alice.clone()) },
                RotaDay { date: d(2024, 4, 2), assigned: None },
                RotaDay { date: d(2024, 4, 3), assigned: Some(alice.clone()) },
            ],
        };
        assert_eq!(rota.unassigned_count(), 1);
        assert_eq!(rota.counts().get(&alice), Some(&2));
    }

    #[test]
    fn edit_session_round_trip() {
        let mut roster = Roster::new();
        let bob = roster.add_employee("Bob").unwrap();
        let mut draft = roster.start_edit(&bob).unwrap();
        draft.toggle_weekday(4).unwrap();
        roster.commit_draft(&bob, draft).unwrap();
        assert!(!roster.availability.is_available(&bob, d(2024, 4, 4)));

        let ghost = Employee::new("Ghost");
        assert!(matches!(
            roster.commit_draft(&ghost, DraftUnavailability::new()),
            Err(RotaError::UnknownEmployee(_))
        ));
    }
}
