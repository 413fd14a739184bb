//! Entry export seam.
//!
//! # Responsibility
//! - Select entries by calendar range and render them as CSV or JSON.
//!
//! # Invariants
//! - Export is read-only; rows follow stored start order.

use crate::clock::{end_of_day, format_hhmm, start_of_day, to_naive};
use crate::model::entry::TimeEntry;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CSV_HEADER: [&str; 9] = [
    "id", "date", "start", "end", "duration_minutes", "category", "title", "tags", "note",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportRange {
    All,
    /// Entries starting on `start..=end`.
    Dates { start: NaiveDate, end: NaiveDate },
}

impl ExportRange {
    /// Entries of `entries` inside this range, in stored order.
    pub fn select<'a>(&self, entries: &'a [TimeEntry]) -> Vec<&'a TimeEntry> {
        match *self {
            Self::All => entries.iter().collect(),
            Self::Dates { start, end } => {
                let (first, last) = (start_of_day(start), end_of_day(end));
                entries
                    .iter()
                    .filter(|entry| entry.start_time >= first && entry.start_time <= last)
                    .collect()
            }
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "csv export failed: {err}"),
            Self::Json(err) => write!(f, "json export failed: {err}"),
            Self::Io(err) => write!(f, "export io failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Renders a selection of entries.
pub trait Exporter {
    fn export(&self, entries: &[&TimeEntry], format: ExportFormat) -> Result<Vec<u8>, ExportError>;
}

/// Built-in exporter: one CSV row per entry, or a pretty JSON array of the
/// stored entry shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerExporter;

impl LedgerExporter {
    fn to_csv(entries: &[&TimeEntry]) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for entry in entries {
            let start = to_naive(entry.start_time);
            writer.write_record([
                entry.id.to_string(),
                start.format("%Y-%m-%d").to_string(),
                format_hhmm(entry.start_time),
                format_hhmm(entry.end_time),
                entry.duration.to_string(),
                entry.category.as_str().to_string(),
                entry.title.clone(),
                entry.tags.join(";"),
                entry.note.clone().unwrap_or_default(),
            ])?;
        }
        writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))
    }
}

impl Exporter for LedgerExporter {
    fn export(&self, entries: &[&TimeEntry], format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        match format {
            ExportFormat::Csv => Self::to_csv(entries),
            ExportFormat::Json => Ok(serde_json::to_vec_pretty(entries)?),
        }
    }
}
