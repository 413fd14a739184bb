//! Period totals and coverage.
//!
//! # Responsibility
//! - Sum logged minutes per category for entries inside a period.
//! - Derive elapsed (possible) minutes, the unreconciled remainder and the
//!   coverage percentage.
//!
//! # Invariants
//! - Possible minutes only count elapsed time: `min(period.end, now)`.
//! - `coverage_percent` is capped at 100 and is 100 when nothing elapsed.

use crate::clock::{Millis, MINUTE_MS};
use crate::model::entry::{Category, TimeEntry};
use crate::report::period::ReportingPeriod;
use serde::Serialize;

/// Per-category minutes plus the synthetic unreconciled bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    minutes: [i64; 3],
    pub unreconciled: f64,
}

impl CategoryTotals {
    pub fn get(&self, category: Category) -> i64 {
        self.minutes[category.index()]
    }

    fn add(&mut self, category: Category, minutes: i64) {
        self.minutes[category.index()] += minutes;
    }
}

/// One slice of the period breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartBucket {
    Category { category: Category, minutes: f64 },
    Unreconciled { minutes: f64 },
    /// Placeholder when there is nothing to break down.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub logged_minutes: i64,
    pub total_possible_minutes: f64,
    pub unreconciled_minutes: f64,
    pub category_totals: CategoryTotals,
    pub coverage_percent: u8,
}

impl PeriodSummary {
    /// Non-zero buckets in category order, unreconciled last; a single
    /// `Empty` bucket when all are zero.
    pub fn chart_buckets(&self) -> Vec<ChartBucket> {
        let mut buckets: Vec<ChartBucket> = Category::ALL
            .iter()
            .map(|category| (*category, self.category_totals.get(*category)))
            .filter(|(_, minutes)| *minutes > 0)
            .map(|(category, minutes)| ChartBucket::Category {
                category,
                minutes: minutes as f64,
            })
            .collect();
        if self.unreconciled_minutes > 0.0 {
            buckets.push(ChartBucket::Unreconciled {
                minutes: self.unreconciled_minutes,
            });
        }
        if buckets.is_empty() {
            buckets.push(ChartBucket::Empty);
        }
        buckets
    }

    pub fn unreconciled_hours(&self) -> f64 {
        self.unreconciled_minutes / 60.0
    }
}

/// Summarizes `entries`, which must already be filtered to `period`.
pub fn summarize(entries: &[&TimeEntry], period: &ReportingPeriod, now: Millis) -> PeriodSummary {
    let mut totals = CategoryTotals::default();
    let mut logged_minutes = 0;
    for entry in entries {
        logged_minutes += entry.duration;
        totals.add(entry.category, entry.duration);
    }

    let effective_end = period.end.min(now);
    let total_possible_minutes = ((effective_end - period.start) as f64 / MINUTE_MS as f64).max(0.0);
    let unreconciled_minutes = (total_possible_minutes - logged_minutes as f64).max(0.0);
    totals.unreconciled = unreconciled_minutes;

    let coverage_percent = if total_possible_minutes > 0.0 {
        (logged_minutes as f64 / total_possible_minutes * 100.0)
            .round()
            .clamp(0.0, 100.0) as u8
    } else {
        100
    };

    PeriodSummary {
        logged_minutes,
        total_possible_minutes,
        unreconciled_minutes,
        category_totals: totals,
        coverage_percent,
    }
}
