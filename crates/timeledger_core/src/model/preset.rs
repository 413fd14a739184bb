//! Reusable time-of-day templates.
//!
//! # Responsibility
//! - Hold preset title/category/tags plus an `HH:MM` start/end pair.
//! - Turn a preset into an entry candidate for a concrete date.
//!
//! # Invariants
//! - `start_time_str` and `end_time_str` always match `HH:MM` (24-hour).
//! - An end earlier than the start means the preset ends the next day.

use crate::clock::at_time;
use crate::model::entry::{normalize_tags, Category, EntryCandidate, EntryValidationError};
use chrono::{NaiveDate, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static TIME_OF_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("valid time-of-day regex"));

pub type PresetId = Uuid;

/// Parses an `HH:MM` string.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, EntryValidationError> {
    let trimmed = value.trim();
    let invalid = || EntryValidationError::InvalidTimeOfDay(trimmed.to_string());
    let captures = TIME_OF_DAY_RE.captures(trimmed).ok_or_else(invalid)?;
    let hour = captures[1].parse::<u32>().map_err(|_| invalid())?;
    let minute = captures[2].parse::<u32>().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePreset {
    pub id: PresetId,
    pub title: String,
    pub category: Category,
    pub start_time_str: String,
    pub end_time_str: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TimePreset {
    /// Creates a validated preset with a fresh id.
    pub fn new<S: AsRef<str>>(
        title: impl Into<String>,
        category: Category,
        start_time_str: &str,
        end_time_str: &str,
        tags: &[S],
    ) -> Result<Self, EntryValidationError> {
        let preset = Self {
            id: Uuid::new_v4(),
            title: title.into().trim().to_string(),
            category,
            start_time_str: start_time_str.trim().to_string(),
            end_time_str: end_time_str.trim().to_string(),
            tags: normalize_tags(tags),
        };
        preset.validate()?;
        Ok(preset)
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.title.trim().is_empty() {
            return Err(EntryValidationError::EmptyTitle);
        }
        parse_time_of_day(&self.start_time_str)?;
        parse_time_of_day(&self.end_time_str)?;
        Ok(())
    }

    pub fn start_hour(&self) -> Result<u32, EntryValidationError> {
        parse_time_of_day(&self.start_time_str).map(|time| time.hour())
    }

    /// Pre-fills a candidate on `date`.
    ///
    /// The candidate is not normalized; an overnight preset keeps
    /// `end < start` and is wrapped and split on submission.
    pub fn candidate_on(&self, date: NaiveDate) -> Result<EntryCandidate, EntryValidationError> {
        let start = parse_time_of_day(&self.start_time_str)?;
        let end = parse_time_of_day(&self.end_time_str)?;
        Ok(
            EntryCandidate::new(
                self.title.clone(),
                self.category,
                at_time(date, start),
                at_time(date, end),
            )
            .with_tags(self.tags.as_slice()),
        )
    }
}

/// Partial field set for preset edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetPatch {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub start_time_str: Option<String>,
    pub end_time_str: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PresetPatch {
    /// Returns the merged preset, validated, without touching `base`.
    pub fn apply_to(&self, base: &TimePreset) -> Result<TimePreset, EntryValidationError> {
        let mut merged = base.clone();
        if let Some(title) = &self.title {
            merged.title = title.trim().to_string();
        }
        if let Some(category) = self.category {
            merged.category = category;
        }
        if let Some(start) = &self.start_time_str {
            merged.start_time_str = start.trim().to_string();
        }
        if let Some(end) = &self.end_time_str {
            merged.end_time_str = end.trim().to_string();
        }
        if let Some(tags) = &self.tags {
            merged.tags = normalize_tags(tags.as_slice());
        }
        merged.validate()?;
        Ok(merged)
    }
}

/// Presets seeded into a fresh ledger.
pub fn default_presets() -> Vec<TimePreset> {
    let seeds: [(&str, &str, &str, &str); 2] = [
        ("Sleep", "23:00", "07:00", "sleep"),
        ("Lunch", "12:00", "13:00", "meal"),
    ];
    seeds
        .iter()
        .map(|(title, start, end, tag)| TimePreset {
            id: Uuid::new_v4(),
            title: (*title).to_string(),
            category: Category::Maintenance,
            start_time_str: (*start).to_string(),
            end_time_str: (*end).to_string(),
            tags: vec![(*tag).to_string()],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{default_presets, parse_time_of_day, PresetPatch, TimePreset};
    use crate::clock::{at_time, DAY_MS};
    use crate::model::entry::{Category, EntryValidationError};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn time_of_day_accepts_24h_values_only() {
        assert_eq!(
            parse_time_of_day("07:05").unwrap(),
            NaiveTime::from_hms_opt(7, 5, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day(" 23:59 ").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
        for bad in ["24:00", "7:00", "12:60", "noon", ""] {
            assert!(matches!(
                parse_time_of_day(bad),
                Err(EntryValidationError::InvalidTimeOfDay(_))
            ));
        }
    }

    #[test]
    fn overnight_preset_candidate_keeps_reversed_bounds() {
        let sleep = &default_presets()[0];
        let date = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let candidate = sleep.candidate_on(date).unwrap();
        assert!(candidate.end_time < candidate.start_time);
        assert_eq!(
            candidate.start_time,
            at_time(date, NaiveTime::from_hms_opt(23, 0, 0).unwrap())
        );
        assert_eq!(candidate.start_time - candidate.end_time, DAY_MS - 8 * 3_600_000);
        assert_eq!(candidate.tags, vec!["sleep".to_string()]);
    }

    #[test]
    fn patch_rejects_malformed_times_without_mutating() {
        let preset =
            TimePreset::new("Gym", Category::Investment, "18:00", "19:00", &["health"]).unwrap();
        let patch = PresetPatch {
            end_time_str: Some("19:75".to_string()),
            ..PresetPatch::default()
        };
        assert!(patch.apply_to(&preset).is_err());
        assert_eq!(preset.end_time_str, "19:00");
    }
}
