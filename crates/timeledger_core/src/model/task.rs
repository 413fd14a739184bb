//! Running-task snapshot.
//!
//! # Responsibility
//! - Capture what the user is doing right now (title, category, start).
//! - Turn a finished task into an entry candidate.
//!
//! # Invariants
//! - At most one active task exists per ledger.

use crate::clock::{Millis, HOUR_MS, MINUTE_MS, SECOND_MS};
use crate::model::entry::{Category, EntryCandidate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTask {
    pub title: String,
    pub category: Category,
    pub start_time: Millis,
}

impl ActiveTask {
    /// Candidate covering `[start_time, end_time]` with no tags or note.
    pub fn to_candidate(&self, end_time: Millis) -> EntryCandidate {
        EntryCandidate::new(self.title.clone(), self.category, self.start_time, end_time)
    }

    /// Elapsed time as `HH:MM:SS`; hours are not capped at 24.
    pub fn elapsed_display(&self, now: Millis) -> String {
        let elapsed = (now - self.start_time).max(0);
        format!(
            "{:02}:{:02}:{:02}",
            elapsed / HOUR_MS,
            (elapsed % HOUR_MS) / MINUTE_MS,
            (elapsed % MINUTE_MS) / SECOND_MS
        )
    }
}
