//! Ledger consistency engine.
//!
//! # Responsibility
//! - Normalize candidate intervals into day-bounded entries.
//! - Reject candidates that strictly overlap stored entries of the same day.
//! - Own the canonical, start-sorted entry collection and the task timer.
//!
//! # Invariants
//! - Every write either fully commits or leaves state untouched.
//! - The collection is sorted ascending by `start_time` after every write.

use crate::clock::Millis;
use crate::model::entry::{EntryId, EntryValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod conflict;
pub mod normalize;
pub mod store;
pub mod timer;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Input-correctable failures of ledger writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    Validation(EntryValidationError),
    /// Candidate `[start, end)` strictly overlaps stored entry `existing`.
    IntervalConflict {
        start: Millis,
        end: Millis,
        existing: EntryId,
    },
    NotFound(EntryId),
    /// Interval crosses more than one midnight.
    UnsupportedSpan { start: Millis, end: Millis },
    /// `start_task` while another task is running.
    TaskAlreadyRunning,
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::IntervalConflict {
                start,
                end,
                existing,
            } => write!(
                f,
                "interval [{start}, {end}) conflicts with existing entry {existing}"
            ),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::UnsupportedSpan { start, end } => {
                write!(f, "interval [{start}, {end}) spans more than one midnight")
            }
            Self::TaskAlreadyRunning => write!(f, "a task is already running"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntryValidationError> for LedgerError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl LedgerError {
    /// Stable short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::IntervalConflict { .. } => "interval_conflict",
            Self::NotFound(_) => "not_found",
            Self::UnsupportedSpan { .. } => "unsupported_span",
            Self::TaskAlreadyRunning => "task_already_running",
        }
    }
}
