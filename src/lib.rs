#![forbid(unsafe_code)]
//! Rotagen — génération de rota mensuelle locale (sans BD).
//!
//! - Une personne par jour ouvré (lundi–vendredi, hors fériés).
//! - Indisponibilités par jour de semaine et par intervalle de dates.
//! - Deux passes : placement par personne (ordre mélangé) puis comblement jour par jour.
//! - Jamais deux jours calendaires d'affilée pour la même personne (sauf dernier recours).
//! - Export CSV `Date,Assigned Person` ; jours fériés via un flux externe optionnel.

pub mod availability;
pub mod calendar;
pub mod draft;
pub mod export;
pub mod holidays;
pub mod io;
pub mod model;
pub mod scheduler;

pub use availability::AvailabilityIndex;
pub use calendar::{month_name, working_days};
pub use draft::DraftUnavailability;
pub use export::{export_csv_to_path, render_table, write_csv, RotaRow};
pub use holidays::{resolve_excluded_dates, ExcludedDates, HolidayError, HolidaySource};
pub use model::{
    date_key, Assignment, DateRange, Employee, Roster, Rota, RotaDay, UnavailabilityRule,
};
pub use scheduler::{AssignOptions, Conflict, ConflictKind, RotaError, Scheduler};
