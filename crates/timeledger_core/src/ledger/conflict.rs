//! Same-day strict-overlap detection.
//!
//! # Invariants
//! - Only stored entries whose `start_time` falls on the candidate's start
//!   day are compared.
//! - Touching endpoints (`a.end == b.start`) never conflict.

use crate::clock::Millis;
use crate::ledger::LedgerError;
use crate::model::entry::{EntryId, TimeEntry};

/// First detected overlap between a candidate and a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub start: Millis,
    pub end: Millis,
    pub existing: EntryId,
}

impl From<Conflict> for LedgerError {
    fn from(value: Conflict) -> Self {
        Self::IntervalConflict {
            start: value.start,
            end: value.end,
            existing: value.existing,
        }
    }
}

/// Checks every candidate against `stored`, skipping `exclude`.
///
/// Returns the first conflict found; one conflicting sibling is enough to
/// fail the whole submission.
pub fn find_conflict(
    candidates: &[TimeEntry],
    stored: &[TimeEntry],
    exclude: Option<EntryId>,
) -> Option<Conflict> {
    candidates.iter().find_map(|candidate| {
        let day = candidate.start_date();
        stored
            .iter()
            .filter(|existing| Some(existing.id) != exclude)
            .filter(|existing| existing.start_date() == day)
            .find(|existing| existing.overlaps(candidate.start_time, candidate.end_time))
            .map(|existing| Conflict {
                start: candidate.start_time,
                end: candidate.end_time,
                existing: existing.id,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::find_conflict;
    use crate::clock::{wall_clock_ms, DAY_MS};
    use crate::model::entry::{Category, TimeEntry};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn entry(start_hour: u32, end_hour: u32) -> TimeEntry {
        let day = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let start = wall_clock_ms(day.and_hms_opt(start_hour, 0, 0).unwrap());
        let end = wall_clock_ms(day.and_hms_opt(end_hour, 0, 0).unwrap());
        TimeEntry {
            id: Uuid::new_v4(),
            title: "block".to_string(),
            category: Category::Investment,
            start_time: start,
            end_time: end,
            duration: i64::from(end_hour - start_hour) * 60,
            tags: Vec::new(),
            note: None,
        }
    }

    #[test]
    fn touching_endpoints_do_not_conflict() {
        let stored = vec![entry(10, 11)];
        assert!(find_conflict(&[entry(11, 12)], &stored, None).is_none());
        assert!(find_conflict(&[entry(9, 10)], &stored, None).is_none());
    }

    #[test]
    fn overlap_reports_existing_id() {
        let stored = vec![entry(10, 12)];
        let conflict = find_conflict(&[entry(11, 13)], &stored, None).unwrap();
        assert_eq!(conflict.existing, stored[0].id);
    }

    #[test]
    fn excluded_entry_is_ignored() {
        let stored = vec![entry(10, 12)];
        assert!(find_conflict(&[entry(10, 12)], &stored, Some(stored[0].id)).is_none());
    }

    #[test]
    fn entries_on_other_days_are_not_compared() {
        let mut previous_day = entry(22, 23);
        previous_day.start_time -= DAY_MS;
        // Runs until 01:00 of the candidate's day but is filed under the day before.
        previous_day.end_time = previous_day.end_time - DAY_MS + 2 * 3_600_000;
        assert!(find_conflict(&[entry(0, 1)], &[previous_day], None).is_none());
    }
}
