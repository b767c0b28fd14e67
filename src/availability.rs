use crate::model::{DateRange, Employee, UnavailabilityRule};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Index des indisponibilités, une règle par personne.
///
/// Une personne sans règle est considérée disponible tous les jours.
/// Les intervalles reçus sont supposés déjà validés (`start <= end`),
/// voir [`crate::draft::DraftUnavailability`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityIndex {
    rules: BTreeMap<Employee, UnavailabilityRule>,
}

impl AvailabilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remplace la règle de la personne (pas de fusion avec l'existante).
    pub fn set_unavailability(
        &mut self,
        employee: &Employee,
        weekdays: BTreeSet<u8>,
        ranges: Vec<DateRange>,
    ) {
        self.rules
            .insert(employee.clone(), UnavailabilityRule { weekdays, ranges });
    }

    pub fn is_available(&self, employee: &Employee, date: NaiveDate) -> bool {
        self.rules
            .get(employee)
            .map_or(true, |rule| !rule.blocks(date))
    }

    pub fn rule(&self, employee: &Employee) -> Option<&UnavailabilityRule> {
        self.rules.get(employee)
    }

    pub fn remove(&mut self, employee: &Employee) -> Option<UnavailabilityRule> {
        self.rules.remove(employee)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Employee, &UnavailabilityRule)> {
        self.rules.iter()
    }
}
