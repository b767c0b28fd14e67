mod assignment;
mod conflicts;
mod types;
mod util;

pub use types::{AssignOptions, Conflict, ConflictKind, RotaError};

use crate::availability::AvailabilityIndex;
use crate::calendar;
use crate::model::{Assignment, Employee, Roster, Rota, RotaDay};
use chrono::NaiveDate;
use rand::Rng;
use std::collections::HashSet;
use tracing::info;

/// Scheduler : génère la rota d'un mois à partir d'un instantané du roster
#[derive(Debug, Default, Clone, Copy)]
pub struct Scheduler {
    opts: AssignOptions,
}

impl Scheduler {
    pub fn new(opts: AssignOptions) -> Self {
        Self { opts }
    }

    /// Affecte une personne (ou personne) à chaque jour ouvré, dans l'ordre reçu.
    ///
    /// N'échoue jamais : un jour impossible à pourvoir reste `assigned: None`.
    pub fn assign<R: Rng + ?Sized>(
        &self,
        working_days: &[NaiveDate],
        employees: &[Employee],
        availability: &AvailabilityIndex,
        rng: &mut R,
    ) -> Assignment {
        assignment::assign(working_days, employees, availability, self.opts, rng)
    }

    /// Calendrier du mois + affectation, en un seul appel.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        roster: &Roster,
        year: i32,
        month_index: u32,
        excluded: &HashSet<NaiveDate>,
        rng: &mut R,
    ) -> Result<Rota, RotaError> {
        let working_days = calendar::working_days(year, month_index, excluded)?;
        let days = self.assign(&working_days, &roster.employees, &roster.availability, rng);
        let rota = Rota {
            year,
            month_index,
            days,
        };
        info!(
            year,
            month = month_index + 1,
            days = rota.days.len(),
            unassigned = rota.unassigned_count(),
            "rota generated"
        );
        Ok(rota)
    }

    pub fn detect_conflicts(days: &[RotaDay], availability: &AvailabilityIndex) -> Vec<Conflict> {
        conflicts::detect_conflicts(days, availability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DateRange;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn detect_consecutive_and_unavailable() {
        let alice = Employee::new("Alice");
        let bob = Employee::new("Bob");
        let mut idx = AvailabilityIndex::new();
        idx.set_unavailability(&bob, BTreeSet::new(), vec![DateRange::new(d(2024, 4, 5), d(2024, 4, 5)).unwrap()]);

        let days = vec![
            RotaDay { date: d(2024, 4, 1), assigned: Some(alice.clone()) },
            RotaDay { date: d(2024, 4, 2), assigned: Some(alice.clone()) },
            RotaDay { date: d(2024, 4, 4), assigned: None },
            RotaDay { date: d(2024, 4, 5), assigned: Some(bob.clone()) },
            // vendredi -> lundi : pas consécutifs
            RotaDay { date: d(2024, 4, 8), assigned: Some(bob.clone()) },
        ];

        let conflicts = Scheduler::detect_conflicts(&days, &idx);
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].kind, ConflictKind::ConsecutiveDays);
        assert_eq!(conflicts[0].person, alice);
        assert_eq!(conflicts[0].previous, Some(d(2024, 4, 1)));
        assert_eq!(conflicts[1].kind, ConflictKind::Unavailable);
        assert_eq!(conflicts[1].person, bob);
    }

    #[test]
    fn generate_rejects_bad_month() {
        let mut rng = StdRng::seed_from_u64(0);
        let res = Scheduler::default().generate(&Roster::new(), 2024, 12, &HashSet::new(), &mut rng);
        assert!(matches!(res, Err(RotaError::InvalidMonth(12))));
    }
}
