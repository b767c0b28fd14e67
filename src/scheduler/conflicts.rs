use super::{util, Conflict, ConflictKind};
use crate::availability::AvailabilityIndex;
use crate::model::{Employee, RotaDay};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Vérifie une affectation : disponibilité et veille calendaire.
pub(super) fn detect_conflicts(days: &[RotaDay], availability: &AvailabilityIndex) -> Vec<Conflict> {
    let assigned: HashMap<NaiveDate, Employee> = days
        .iter()
        .filter_map(|day| day.assigned.clone().map(|p| (day.date, p)))
        .collect();

    let mut out = Vec::new();
    for day in days {
        let Some(person) = day.assigned.as_ref() else {
            continue;
        };

        if !availability.is_available(person, day.date) {
            out.push(Conflict {
                person: person.clone(),
                date: day.date,
                previous: None,
                kind: ConflictKind::Unavailable,
            });
        }

        if util::assigned_on_previous_day(&assigned, day.date) == Some(person) {
            out.push(Conflict {
                person: person.clone(),
                date: day.date,
                previous: util::previous_day(day.date),
                kind: ConflictKind::ConsecutiveDays,
            });
        }
    }

    out
}
