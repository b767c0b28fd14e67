use chrono::NaiveDate;
use std::collections::HashMap;

use crate::model::Employee;

/// Jour calendaire précédent (pas le jour ouvré précédent).
pub(super) fn previous_day(date: NaiveDate) -> Option<NaiveDate> {
    date.pred_opt()
}

/// Personne affectée la veille calendaire de `date`, s'il y en a une.
pub(super) fn assigned_on_previous_day<'a>(
    assigned: &'a HashMap<NaiveDate, Employee>,
    date: NaiveDate,
) -> Option<&'a Employee> {
    previous_day(date).and_then(|p| assigned.get(&p))
}
