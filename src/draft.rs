use crate::model::{DateRange, UnavailabilityRule};
use crate::scheduler::RotaError;
use chrono::NaiveDate;

/// Brouillon d'édition d'une règle d'indisponibilité.
///
/// Valeur passée à la session d'édition puis rendue à
/// [`crate::model::Roster::commit_draft`] ; rien n'est modifié avant le commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftUnavailability {
    rule: UnavailabilityRule,
}

impl DraftUnavailability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rule(rule: UnavailabilityRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> &UnavailabilityRule {
        &self.rule
    }

    /// Bascule un jour (1..=5). Retourne `true` si le jour est désormais bloqué.
    pub fn toggle_weekday(&mut self, day: u8) -> Result<bool, RotaError> {
        if !(1..=5).contains(&day) {
            return Err(RotaError::InvalidWeekday(day));
        }
        if self.rule.weekdays.remove(&day) {
            Ok(false)
        } else {
            self.rule.weekdays.insert(day);
            Ok(true)
        }
    }

    /// Ajoute un intervalle. Les deux bornes sont requises et `start <= end`.
    pub fn add_range(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DateRange, RotaError> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(RotaError::InvalidRange);
        };
        let range = DateRange::new(start, end)?;
        if self.rule.ranges.contains(&range) {
            return Err(RotaError::DuplicateRange(range));
        }
        self.rule.ranges.push(range);
        Ok(range)
    }

    pub fn delete_range(&mut self, idx: usize) -> Option<DateRange> {
        (idx < self.rule.ranges.len()).then(|| self.rule.ranges.remove(idx))
    }

    /// Vide jours et intervalles.
    pub fn clear(&mut self) {
        self.rule = UnavailabilityRule::default();
    }

    pub fn into_rule(self) -> UnavailabilityRule {
        self.rule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn toggle_weekday_twice_restores() {
        let mut draft = DraftUnavailability::new();
        assert!(draft.toggle_weekday(2).unwrap());
        assert!(draft.rule().weekdays.contains(&2));
        assert!(!draft.toggle_weekday(2).unwrap());
        assert!(draft.rule().weekdays.is_empty());
        assert!(matches!(draft.toggle_weekday(6), Err(RotaError::InvalidWeekday(6))));
        assert!(matches!(draft.toggle_weekday(0), Err(RotaError::InvalidWeekday(0))));
    }

    #[test]
    fn add_range_validation() {
        let mut draft = DraftUnavailability::new();
        assert!(matches!(
            draft.add_range(None, Some(d(2024, 4, 1))),
            Err(RotaError::InvalidRange)
        ));
        assert!(matches!(
            draft.add_range(Some(d(2024, 4, 1)), None),
            Err(RotaError::InvalidRange)
        ));
        assert!(matches!(
            draft.add_range(Some(d(2024, 4, 3)), Some(d(2024, 4, 1))),
            Err(RotaError::InvalidRange)
        ));

        draft
            .add_range(Some(d(2024, 4, 1)), Some(d(2024, 4, 3)))
            .unwrap();
        assert!(matches!(
            draft.add_range(Some(d(2024, 4, 1)), Some(d(2024, 4, 3))),
            Err(RotaError::DuplicateRange(_))
        ));
        // chevauchant mais différent : accepté
        draft
            .add_range(Some(d(2024, 4, 2)), Some(d(2024, 4, 3)))
            .unwrap();
        assert_eq!(draft.rule().ranges.len(), 2);
    }

    #[test]
    fn delete_and_clear() {
        let mut draft = DraftUnavailability::new();
        draft.toggle_weekday(1).unwrap();
        draft
            .add_range(Some(d(2024, 4, 1)), Some(d(2024, 4, 1)))
            .unwrap();
        assert!(draft.delete_range(3).is_none());
        assert_eq!(
            draft.delete_range(0).map(|r| r.start),
            Some(d(2024, 4, 1))
        );
        draft.clear();
        assert!(draft.into_rule().is_empty());
    }
}
