//! Candidate interval normalization.
//!
//! # Responsibility
//! - Correct implicit midnight wraparound (`end < start`).
//! - Split an interval crossing one midnight into two day-bounded siblings.
//!
//! # Invariants
//! - Output entries are fresh identities sharing title/category/tags/note.
//! - Each output entry starts and ends on the same calendar day.
//! - Output is not conflict-checked and not committed.

use crate::clock::{end_of_day, local_date, start_of_day, Millis, DAY_MS};
use crate::ledger::{LedgerError, LedgerResult};
use crate::model::entry::{
    check_instant, duration_minutes, normalize_note, normalize_tags, EntryCandidate,
    EntryValidationError, TimeEntry,
};
use uuid::Uuid;

/// Adds 24 hours to `end` when it lies before `start`.
///
/// Saturates at `Millis::MAX`; callers reject out-of-range results with
/// `check_instant`.
pub fn correct_wraparound(start: Millis, end: Millis) -> Millis {
    if end < start {
        end.saturating_add(DAY_MS)
    } else {
        end
    }
}

/// Turns one candidate into one or two day-bounded entries.
///
/// # Errors
/// - `Validation(EmptyTitle)` when the title is blank.
/// - `Validation(InstantOutOfRange)` when a bound, before or after
///   wraparound correction, has no calendar date.
/// - `Validation(EmptyInterval)` when start equals the corrected end.
/// - `UnsupportedSpan` when the corrected interval crosses two or more
///   midnights.
pub fn normalize_candidate(candidate: &EntryCandidate) -> LedgerResult<Vec<TimeEntry>> {
    let title = candidate.title.trim();
    if title.is_empty() {
        return Err(EntryValidationError::EmptyTitle.into());
    }

    let start = candidate.start_time;
    check_instant(start)?;
    check_instant(candidate.end_time)?;
    let end = correct_wraparound(start, candidate.end_time);
    check_instant(end)?;
    if end <= start {
        return Err(EntryValidationError::EmptyInterval { start, end }.into());
    }

    let start_day = local_date(start);
    let end_day = local_date(end);
    let template = TimeEntry {
        id: Uuid::nil(),
        title: title.to_string(),
        category: candidate.category,
        start_time: start,
        end_time: end,
        duration: 0,
        tags: normalize_tags(candidate.tags.as_slice()),
        note: normalize_note(candidate.note.as_deref()),
    };

    match (end_day - start_day).num_days() {
        0 => Ok(vec![piece(&template, start, end)]),
        1 => {
            let first_end = end_of_day(start_day);
            let second_start = start_of_day(end_day);
            let mut pieces = vec![piece(&template, start, first_end)];
            // Ending exactly at midnight leaves nothing for the next day.
            if end > second_start {
                pieces.push(piece(&template, second_start, end));
            }
            Ok(pieces)
        }
        _ => Err(LedgerError::UnsupportedSpan { start, end }),
    }
}

fn piece(template: &TimeEntry, start: Millis, end: Millis) -> TimeEntry {
    TimeEntry {
        id: Uuid::new_v4(),
        start_time: start,
        end_time: end,
        duration: duration_minutes(start, end),
        ..template.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{correct_wraparound, normalize_candidate};
    use crate::clock::{end_of_day, start_of_day, wall_clock_ms, DAY_MS, HOUR_MS};
    use crate::ledger::LedgerError;
    use crate::model::entry::{Category, EntryCandidate, EntryValidationError};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32, minute: u32) -> i64 {
        wall_clock_ms(
            NaiveDate::from_ymd_opt(2026, 5, day)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
        )
    }

    #[test]
    fn wraparound_only_applies_to_reversed_bounds() {
        assert_eq!(correct_wraparound(10, 5), 5 + DAY_MS);
        assert_eq!(correct_wraparound(10, 10), 10);
        assert_eq!(correct_wraparound(10, 20), 20);
    }

    #[test]
    fn wraparound_saturates_instead_of_overflowing() {
        assert_eq!(correct_wraparound(i64::MAX, i64::MAX - 1), i64::MAX);
    }

    #[test]
    fn out_of_range_bounds_are_rejected() {
        let huge = EntryCandidate::new("x", Category::Investment, i64::MAX, i64::MAX - 1);
        assert_eq!(
            normalize_candidate(&huge),
            Err(LedgerError::Validation(
                EntryValidationError::InstantOutOfRange(i64::MAX)
            ))
        );

        // In range on its own, but pushed past the last date by the wrap.
        let last = NaiveDateTime::MAX.and_utc().timestamp_millis() - HOUR_MS;
        let wrapped = EntryCandidate::new("x", Category::Investment, last, last - 1);
        assert_eq!(
            normalize_candidate(&wrapped),
            Err(LedgerError::Validation(
                EntryValidationError::InstantOutOfRange(last - 1 + DAY_MS)
            ))
        );
    }

    #[test]
    fn same_day_candidate_yields_one_entry() {
        let candidate = EntryCandidate::new("  read ", Category::Investment, at(4, 9, 0), at(4, 10, 15))
            .with_tags(&["book", "book"]);
        let entries = normalize_candidate(&candidate).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "read");
        assert_eq!(entries[0].duration, 75);
        assert_eq!(entries[0].tags, vec!["book".to_string()]);
    }

    #[test]
    fn wrapped_candidate_splits_at_midnight() {
        let candidate = EntryCandidate::new("sleep", Category::Maintenance, at(4, 23, 30), at(4, 1, 0));
        let entries = normalize_candidate(&candidate).unwrap();
        assert_eq!(entries.len(), 2);

        let day = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let next = NaiveDate::from_ymd_opt(2026, 5, 5).unwrap();
        assert_eq!(entries[0].start_time, at(4, 23, 30));
        assert_eq!(entries[0].end_time, end_of_day(day));
        assert_eq!(entries[0].duration, 30);
        assert_eq!(entries[1].start_time, start_of_day(next));
        assert_eq!(entries[1].end_time, at(5, 1, 0));
        assert_eq!(entries[1].duration, 60);
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[test]
    fn ending_at_midnight_does_not_emit_empty_sibling() {
        let candidate = EntryCandidate::new("late", Category::Depletion, at(4, 22, 0), at(5, 0, 0));
        let entries = normalize_candidate(&candidate).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].duration, 120);
    }

    #[test]
    fn spans_over_two_midnights_are_rejected() {
        let candidate = EntryCandidate::new("trip", Category::Investment, at(4, 20, 0), at(6, 1, 0));
        assert!(matches!(
            normalize_candidate(&candidate),
            Err(LedgerError::UnsupportedSpan { .. })
        ));
    }

    #[test]
    fn blank_title_and_empty_interval_are_rejected() {
        let blank = EntryCandidate::new("   ", Category::Investment, at(4, 9, 0), at(4, 10, 0));
        assert_eq!(
            normalize_candidate(&blank),
            Err(LedgerError::Validation(EntryValidationError::EmptyTitle))
        );

        let empty = EntryCandidate::new("x", Category::Investment, at(4, 9, 0), at(4, 9, 0));
        assert!(matches!(
            normalize_candidate(&empty),
            Err(LedgerError::Validation(EntryValidationError::EmptyInterval { .. }))
        ));
    }
}
