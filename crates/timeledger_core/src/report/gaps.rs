//! Uncovered time ("gaps") inside a reporting period.
//!
//! # Responsibility
//! - Walk each elapsed day of a period and emit uncovered sub-intervals
//!   longer than a threshold.
//! - Compute the live trailing gap for today while no task is running.
//!
//! # Invariants
//! - Gaps never cross midnight; each day is walked independently.
//! - Days after `now` are not walked and today's walk stops at `now`.
//! - `find_gaps` output is reverse-chronological (most recent first).

use crate::clock::{
    end_of_day, format_hhmm, format_month_day, local_date, start_of_day, Millis, HOUR_MS,
    MINUTE_MS,
};
use crate::model::entry::{duration_minutes, TimeEntry};
use crate::report::period::ReportingPeriod;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Minimum reportable gap for period reconciliation.
pub const RECONCILE_GAP_THRESHOLD_MINUTES: i64 = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gap {
    pub start: Millis,
    pub end: Millis,
    /// `MM/DD` of the gap's day.
    pub date_label: String,
    /// `HH:MM`.
    pub start_label: String,
    /// `HH:MM`.
    pub end_label: String,
    /// Length in hours, one decimal place.
    pub duration_hours: f64,
}

impl Gap {
    pub fn new(start: Millis, end: Millis) -> Self {
        let hours = (end - start) as f64 / HOUR_MS as f64;
        Self {
            start,
            end,
            date_label: format_month_day(start),
            start_label: format_hhmm(start),
            end_label: format_hhmm(end),
            duration_hours: (hours * 10.0).round() / 10.0,
        }
    }

    pub fn minutes(&self) -> f64 {
        (self.end - self.start) as f64 / MINUTE_MS as f64
    }

    pub fn date(&self) -> NaiveDate {
        local_date(self.start)
    }

    /// `"<hours>h"`, e.g. `"8.5h"`.
    pub fn duration_label(&self) -> String {
        format!("{:.1}h", self.duration_hours)
    }
}

/// Finds gaps longer than `threshold_minutes` in every elapsed day of
/// `period`. `entries` must already be filtered to the period.
pub fn find_gaps(
    entries: &[&TimeEntry],
    period: &ReportingPeriod,
    now: Millis,
    threshold_minutes: i64,
) -> Vec<Gap> {
    let threshold = threshold_minutes * MINUTE_MS;
    let mut gaps = Vec::new();
    let mut day = period.start_date();

    while start_of_day(day) <= period.end && start_of_day(day) <= now {
        let day_start = start_of_day(day);
        let day_end = end_of_day(day).min(now);

        let mut day_entries: Vec<&TimeEntry> = entries
            .iter()
            .copied()
            .filter(|entry| entry.start_time >= day_start && entry.start_time <= day_end)
            .collect();
        day_entries.sort_by_key(|entry| entry.start_time);

        let mut cursor = day_start;
        for entry in day_entries {
            if entry.start_time - cursor > threshold {
                gaps.push(Gap::new(cursor, entry.start_time));
            }
            cursor = cursor.max(entry.end_time);
        }
        if day_end - cursor > threshold {
            gaps.push(Gap::new(cursor, day_end));
        }

        day = day + Duration::days(1);
    }

    gaps.reverse();
    gaps
}

/// Trailing gap from the last entry of today (or midnight) up to `now`.
///
/// Returns `None` while a task is running or when the gap, rounded to whole
/// minutes, is shorter than `threshold_minutes`. This is the same rule the
/// day timeline applies to in-between gaps. `today_entries` are the entries
/// filed under the day of `now`, in start order.
pub fn live_gap(
    today_entries: &[&TimeEntry],
    now: Millis,
    task_running: bool,
    threshold_minutes: i64,
) -> Option<Gap> {
    if task_running {
        return None;
    }
    let last_end = today_entries
        .last()
        .map_or_else(|| start_of_day(local_date(now)), |entry| entry.end_time);
    (duration_minutes(last_end, now) >= threshold_minutes).then(|| Gap::new(last_end, now))
}
