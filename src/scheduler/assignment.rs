use super::{util, AssignOptions};
use crate::availability::AvailabilityIndex;
use crate::model::{Assignment, Employee, RotaDay};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// État d'une génération : vit le temps d'un appel, jamais partagé.
struct RunContext<'a> {
    availability: &'a AvailabilityIndex,
    opts: AssignOptions,
    assigned: HashMap<NaiveDate, Employee>,
    counts: HashMap<Employee, u32>,
}

impl<'a> RunContext<'a> {
    fn new(availability: &'a AvailabilityIndex, opts: AssignOptions) -> Self {
        Self {
            availability,
            opts,
            assigned: HashMap::new(),
            counts: HashMap::new(),
        }
    }

    fn count(&self, person: &Employee) -> u32 {
        self.counts.get(person).copied().unwrap_or(0)
    }

    /// Disponibilité + pas deux jours calendaires d'affilée (+ plafond si demandé).
    fn can_assign(
        &self,
        person: &Employee,
        date: NaiveDate,
        previous: Option<&Employee>,
        enforce_cap: bool,
    ) -> bool {
        if !self.availability.is_available(person, date) {
            return false;
        }
        if enforce_cap && self.count(person) >= self.opts.max_per_employee {
            return false;
        }
        previous != Some(person)
    }

    fn place(&mut self, date: NaiveDate, person: Employee) {
        *self.counts.entry(person.clone()).or_insert(0) += 1;
        self.assigned.insert(date, person);
    }
}

pub(super) fn assign<R: Rng + ?Sized>(
    working_days: &[NaiveDate],
    employees: &[Employee],
    availability: &AvailabilityIndex,
    opts: AssignOptions,
    rng: &mut R,
) -> Assignment {
    let mut order: Vec<&Employee> = employees.iter().collect();
    order.shuffle(rng);

    let mut ctx = RunContext::new(availability, opts);
    primary_pass(&mut ctx, &order, working_days);
    debug!(placed = ctx.assigned.len(), days = working_days.len(), "primary pass done");
    fallback_pass(&mut ctx, &order, employees, working_days, rng);
    debug!(placed = ctx.assigned.len(), days = working_days.len(), "fallback pass done");

    working_days
        .iter()
        .map(|date| RotaDay {
            date: *date,
            assigned: ctx.assigned.get(date).cloned(),
        })
        .collect()
}

/// Une seule tentative par personne, dans l'ordre mélangé : premier jour libre valide.
fn primary_pass(ctx: &mut RunContext<'_>, order: &[&Employee], working_days: &[NaiveDate]) {
    for person in order {
        let found = working_days.iter().copied().find(|date| {
            !ctx.assigned.contains_key(date)
                && ctx.can_assign(
                    person,
                    *date,
                    util::assigned_on_previous_day(&ctx.assigned, *date),
                    true,
                )
        });
        if let Some(date) = found {
            ctx.place(date, (*person).clone());
        }
    }
}

/// Comble les trous jour par jour, sans plafond, en tenant compte des affectations en cours.
fn fallback_pass<R: Rng + ?Sized>(
    ctx: &mut RunContext<'_>,
    order: &[&Employee],
    employees: &[Employee],
    working_days: &[NaiveDate],
    rng: &mut R,
) {
    for date in working_days.iter().copied() {
        if ctx.assigned.contains_key(&date) {
            continue;
        }
        let previous = util::assigned_on_previous_day(&ctx.assigned, date);
        let eligible: Vec<&Employee> = order
            .iter()
            .copied()
            .filter(|person| ctx.can_assign(person, date, previous, false))
            .collect();

        // à défaut, première personne disponible dans l'ordre de la liste (règle de veille ignorée)
        let pick = eligible
            .choose(rng)
            .copied()
            .or_else(|| {
                ctx.opts
                    .allow_adjacent_fallback
                    .then(|| employees.iter().find(|p| ctx.can_assign(p, date, None, false)))
                    .flatten()
            })
            .cloned();

        match pick {
            Some(person) => ctx.place(date, person),
            None => debug!(%date, "no available employee, day left unassigned"),
        }
    }
}
