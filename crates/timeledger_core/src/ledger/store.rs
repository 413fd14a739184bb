//! Canonical entry collection.
//!
//! # Responsibility
//! - Own the time-sorted entries and expose all-or-nothing add/update/delete.
//! - Route every write through normalization and conflict detection.
//!
//! # Invariants
//! - `entries` is sorted ascending by `start_time` after every operation.
//! - Every stored `duration` matches its stored start/end.
//! - A failed write leaves length, contents and order untouched.
//!
//! # Known asymmetry
//! `add` splits intervals crossing midnight; `update` only corrects the
//! wraparound and keeps the edited entry whole, so an edit can produce an
//! entry that crosses midnight. The conflict check for such an entry still
//! only looks at its start day.

use crate::ledger::conflict::find_conflict;
use crate::ledger::normalize::{correct_wraparound, normalize_candidate};
use crate::ledger::{LedgerError, LedgerResult};
use crate::model::entry::{
    check_instant, duration_minutes, normalize_note, normalize_tags, EntryCandidate, EntryId,
    EntryPatch, EntryValidationError, TimeEntry,
};
use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryStore {
    entries: Vec<TimeEntry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted entries.
    ///
    /// Entries are validated, durations recomputed and the collection
    /// re-sorted. Overlaps already present are kept as-is.
    pub fn restore(mut entries: Vec<TimeEntry>) -> Result<Self, EntryValidationError> {
        for entry in &mut entries {
            entry.validate()?;
            let rounded = duration_minutes(entry.start_time, entry.end_time);
            // Sub-minute entries may carry the one-minute floor from an edit.
            entry.duration = if rounded == 0 {
                entry.duration.clamp(0, 1)
            } else {
                rounded
            };
        }
        entries.sort_by_key(|entry| entry.start_time);
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&TimeEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entries filed under `date`, in start order.
    pub fn on_date(&self, date: NaiveDate) -> Vec<&TimeEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.start_date() == date)
            .collect()
    }

    /// Normalizes, conflict-checks and inserts one submission.
    ///
    /// Returns the ids of the inserted entries in start order (one, or two
    /// when the candidate crossed midnight).
    pub fn add(&mut self, candidate: &EntryCandidate) -> LedgerResult<Vec<EntryId>> {
        let pieces = normalize_candidate(candidate)?;
        if let Some(conflict) = find_conflict(&pieces, &self.entries, None) {
            return Err(conflict.into());
        }

        let ids = pieces.iter().map(|entry| entry.id).collect();
        self.entries.extend(pieces);
        self.sort();
        Ok(ids)
    }

    /// Merges `patch` into entry `id` and re-validates it in place.
    ///
    /// Wraparound is corrected on the merged bounds, but the result is not
    /// split at midnight. Duration is floored to one minute.
    pub fn update(&mut self, id: EntryId, patch: &EntryPatch) -> LedgerResult<TimeEntry> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        let mut merged = self.entries[position].clone();
        if let Some(title) = &patch.title {
            merged.title = title.trim().to_string();
        }
        if let Some(category) = patch.category {
            merged.category = category;
        }
        if let Some(tags) = &patch.tags {
            merged.tags = normalize_tags(tags.as_slice());
        }
        if let Some(note) = &patch.note {
            merged.note = normalize_note(note.as_deref());
        }
        if merged.title.is_empty() {
            return Err(EntryValidationError::EmptyTitle.into());
        }

        let start = patch.start_time.unwrap_or(merged.start_time);
        let end = patch.end_time.unwrap_or(merged.end_time);
        check_instant(start)?;
        check_instant(end)?;
        let end = correct_wraparound(start, end);
        check_instant(end)?;
        if end <= start {
            return Err(EntryValidationError::EmptyInterval { start, end }.into());
        }
        merged.start_time = start;
        merged.end_time = end;
        merged.duration = duration_minutes(start, end).max(1);

        if let Some(conflict) =
            find_conflict(std::slice::from_ref(&merged), &self.entries, Some(id))
        {
            return Err(conflict.into());
        }

        self.entries[position] = merged.clone();
        self.sort();
        Ok(merged)
    }

    /// Removes entry `id`. Unknown ids are a no-op; returns whether an entry
    /// was removed.
    pub fn delete(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn into_entries(self) -> Vec<TimeEntry> {
        self.entries
    }

    fn sort(&mut self) {
        // Stable, so equal starts keep insertion order.
        self.entries.sort_by_key(|entry| entry.start_time);
    }
}
