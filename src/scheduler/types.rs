use crate::model::{DateRange, Employee};
use chrono::NaiveDate;
use thiserror::Error;

/// Options d'assignation
#[derive(Debug, Clone, Copy)]
pub struct AssignOptions {
    /// Plafond indicatif par personne, appliqué à la première passe seulement.
    pub max_per_employee: u32,
    /// Dernier recours de la seconde passe : accepter une personne de garde la veille
    /// plutôt que laisser le jour vide.
    pub allow_adjacent_fallback: bool,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            max_per_employee: 3,
            allow_adjacent_fallback: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// personne affectée un jour où elle est indisponible
    Unavailable,
    /// même personne deux jours calendaires consécutifs
    ConsecutiveDays,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub person: Employee,
    pub date: NaiveDate,
    /// jour précédent concerné (pour `ConsecutiveDays`)
    pub previous: Option<NaiveDate>,
    pub kind: ConflictKind,
}

#[derive(Error, Debug)]
pub enum RotaError {
    #[error("invalid date range: start and end are required and start must not be after end")]
    InvalidRange,
    #[error("range already selected: {0}")]
    DuplicateRange(DateRange),
    #[error("invalid weekday {0}: expected 1 (Mon) to 5 (Fri)")]
    InvalidWeekday(u8),
    #[error("invalid month index {0}: expected 0 to 11")]
    InvalidMonth(u32),
    #[error("employee name cannot be empty")]
    EmptyName,
    #[error("duplicate employee: {0}")]
    DuplicateEmployee(String),
    #[error("unknown employee: {0}")]
    UnknownEmployee(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
