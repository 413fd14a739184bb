//! Time entry domain model.
//!
//! # Responsibility
//! - Define the canonical ledger record and its closed category set.
//! - Define candidate (not yet committed) and patch shapes used by writes.
//!
//! # Invariants
//! - `end_time > start_time` for every committed entry.
//! - `duration` equals the rounded minute length of `[start_time, end_time]`
//!   (floored to 1 after an update).
//! - `tags` keep first-seen order and contain no duplicates or blanks.

use crate::clock::{is_representable, local_date, Millis, MINUTE_MS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a committed entry.
pub type EntryId = Uuid;

/// Closed set of ledger categories.
///
/// External consumers must treat this set as fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Time spent on growth: work, study, deliberate practice.
    Investment,
    /// Time needed to keep going: sleep, meals, chores.
    Maintenance,
    /// Time lost: idle scrolling, waiting, distractions.
    Depletion,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Investment,
        Category::Maintenance,
        Category::Depletion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Investment => "investment",
            Self::Maintenance => "maintenance",
            Self::Depletion => "depletion",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "investment" => Some(Self::Investment),
            "maintenance" => Some(Self::Maintenance),
            "depletion" => Some(Self::Depletion),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Investment => 0,
            Self::Maintenance => 1,
            Self::Depletion => 2,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for entry, task and preset input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// Title is missing or whitespace only.
    EmptyTitle,
    /// Interval has no positive length after wraparound correction.
    EmptyInterval { start: Millis, end: Millis },
    /// Time-of-day text is not `HH:MM`.
    InvalidTimeOfDay(String),
    /// Instant has no calendar date.
    InstantOutOfRange(Millis),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyInterval { start, end } => {
                write!(f, "interval [{start}, {end}] has no positive length")
            }
            Self::InvalidTimeOfDay(value) => {
                write!(f, "invalid time of day `{value}`; expected HH:MM")
            }
            Self::InstantOutOfRange(ms) => {
                write!(f, "instant {ms} is outside the supported calendar range")
            }
        }
    }
}

impl Error for EntryValidationError {}

/// Committed, day-bounded ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: EntryId,
    pub title: String,
    pub category: Category,
    /// Inclusive start, wall-clock epoch milliseconds.
    pub start_time: Millis,
    /// Exclusive end, wall-clock epoch milliseconds.
    pub end_time: Millis,
    /// Rounded length in minutes.
    pub duration: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TimeEntry {
    /// Calendar day this entry is filed under.
    pub fn start_date(&self) -> NaiveDate {
        local_date(self.start_time)
    }

    /// Strict overlap with `[start, end)`; shared endpoints do not count.
    pub fn overlaps(&self, start: Millis, end: Millis) -> bool {
        start < self.end_time && end > self.start_time
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.title.trim().is_empty() {
            return Err(EntryValidationError::EmptyTitle);
        }
        check_instant(self.start_time)?;
        check_instant(self.end_time)?;
        if self.end_time <= self.start_time {
            return Err(EntryValidationError::EmptyInterval {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }
}

/// Rounded minute length of `[start, end]`, rounding halves up.
pub fn duration_minutes(start: Millis, end: Millis) -> i64 {
    end.saturating_sub(start).saturating_add(MINUTE_MS / 2).div_euclid(MINUTE_MS)
}

/// Rejects instants outside the calendar range.
pub fn check_instant(ms: Millis) -> Result<(), EntryValidationError> {
    if is_representable(ms) {
        Ok(())
    } else {
        Err(EntryValidationError::InstantOutOfRange(ms))
    }
}

/// Trims labels and drops blanks and repeats, keeping first-seen order.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.as_ref().trim();
        if trimmed.is_empty() || normalized.iter().any(|existing| existing == trimmed) {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}

pub(crate) fn normalize_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

/// Not-yet-committed interval submitted for insertion.
///
/// `end_time` earlier than `start_time` means "ends the next day at this
/// time of day".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryCandidate {
    pub title: String,
    pub category: Category,
    pub start_time: Millis,
    pub end_time: Millis,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl EntryCandidate {
    pub fn new(
        title: impl Into<String>,
        category: Category,
        start_time: Millis,
        end_time: Millis,
    ) -> Self {
        Self {
            title: title.into(),
            category,
            start_time,
            end_time,
            tags: Vec::new(),
            note: None,
        }
    }

    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = tags.iter().map(|tag| tag.as_ref().to_string()).collect();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Partial field set applied by `EntryStore::update`.
///
/// `None` keeps the stored value. `note: Some(None)` clears the note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub start_time: Option<Millis>,
    pub end_time: Option<Millis>,
    pub tags: Option<Vec<String>>,
    pub note: Option<Option<String>>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
