//! Single-day timeline projection.
//!
//! # Responsibility
//! - Interleave one day's entries with the gaps between them.
//! - Append today's live trailing gap with a matching preset suggestion.
//!
//! # Invariants
//! - Items are in chronological order.
//! - In-between gaps are measured between consecutive entries in start
//!   order and kept when their rounded length reaches the threshold.

use crate::clock::{local_date, Millis};
use crate::model::entry::{duration_minutes, TimeEntry};
use crate::model::preset::TimePreset;
use crate::report::gaps::{live_gap, Gap};
use chrono::{NaiveDate, Timelike};
use serde::Serialize;

/// Minimum rounded gap (minutes) shown between timeline entries.
pub const TIMELINE_GAP_THRESHOLD_MINUTES: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineItem {
    Entry(TimeEntry),
    Gap {
        start: Millis,
        end: Millis,
        minutes: i64,
    },
    /// Uncovered time from the last entry up to now.
    LiveGap {
        gap: Gap,
        suggestion: Option<TimePreset>,
    },
}

/// Options controlling gap thresholds and preset matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineOptions {
    pub gap_threshold_minutes: i64,
    pub suggestion_window_hours: u32,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            gap_threshold_minutes: TIMELINE_GAP_THRESHOLD_MINUTES,
            suggestion_window_hours: 1,
        }
    }
}

/// First preset whose start hour is within `window_hours` of the hour of
/// `gap_start`.
pub fn suggest_preset(
    presets: &[TimePreset],
    gap_start: Millis,
    window_hours: u32,
) -> Option<&TimePreset> {
    let gap_hour = crate::clock::to_naive(gap_start).hour();
    presets.iter().find(|preset| {
        preset
            .start_hour()
            .map(|hour| hour.abs_diff(gap_hour) <= window_hours)
            .unwrap_or(false)
    })
}

/// Builds the timeline for `day`.
///
/// `day_entries` are the entries filed under `day` in start order.
pub fn day_timeline(
    day: NaiveDate,
    day_entries: &[&TimeEntry],
    presets: &[TimePreset],
    now: Millis,
    task_running: bool,
    options: TimelineOptions,
) -> Vec<TimelineItem> {
    let mut items = Vec::with_capacity(day_entries.len() * 2 + 1);
    let mut previous: Option<&TimeEntry> = None;

    for entry in day_entries {
        if let Some(prev) = previous {
            let minutes = duration_minutes(prev.end_time, entry.start_time);
            if minutes >= options.gap_threshold_minutes {
                items.push(TimelineItem::Gap {
                    start: prev.end_time,
                    end: entry.start_time,
                    minutes,
                });
            }
        }
        items.push(TimelineItem::Entry((*entry).clone()));
        previous = Some(entry);
    }

    if local_date(now) == day {
        if let Some(gap) = live_gap(
            day_entries,
            now,
            task_running,
            options.gap_threshold_minutes,
        ) {
            let suggestion =
                suggest_preset(presets, gap.start, options.suggestion_window_hours).cloned();
            items.push(TimelineItem::LiveGap { gap, suggestion });
        }
    }

    items
}
