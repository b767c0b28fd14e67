use crate::model::weekday_number;
use crate::scheduler::RotaError;
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Nom anglais d'un mois (index base 0).
pub fn month_name(month_index: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month_index as usize).copied()
}

/// Premier jour du mois `month_index` (base 0).
pub fn first_of_month(year: i32, month_index: u32) -> Result<NaiveDate, RotaError> {
    if month_index > 11 {
        return Err(RotaError::InvalidMonth(month_index));
    }
    NaiveDate::from_ymd_opt(year, month_index + 1, 1).ok_or(RotaError::InvalidMonth(month_index))
}

/// Jours ouvrés du mois (lundi–vendredi, hors dates exclues), ordre croissant.
///
/// Un résultat vide est valide (tous les jours exclus, par exemple).
pub fn working_days(
    year: i32,
    month_index: u32,
    excluded: &HashSet<NaiveDate>,
) -> Result<Vec<NaiveDate>, RotaError> {
    let first = first_of_month(year, month_index)?;
    let days = first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .filter(|d| weekday_number(*d).is_some() && !excluded.contains(d))
        .collect();
    Ok(days)
}
