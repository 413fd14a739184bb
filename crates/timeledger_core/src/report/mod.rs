//! Read-only reconciliation views over the ledger.
//!
//! # Responsibility
//! - Resolve reporting periods and filter entries into them.
//! - Derive totals, gaps and day timelines as pure queries.
//!
//! # Invariants
//! - Nothing here mutates ledger state or caches derived results.
//! - An entry belongs to a period when its `start_time` lies in
//!   `[period.start, period.end]`.

use crate::clock::Millis;
use crate::model::entry::TimeEntry;
use serde::Serialize;

pub mod aggregate;
pub mod gaps;
pub mod period;
pub mod timeline;

use aggregate::{summarize, PeriodSummary};
use gaps::{find_gaps, Gap};
use period::ReportingPeriod;

/// Entries whose start lies inside `period`, in stored order.
pub fn entries_in_period<'a>(entries: &'a [TimeEntry], period: &ReportingPeriod) -> Vec<&'a TimeEntry> {
    entries
        .iter()
        .filter(|entry| period.contains(entry.start_time))
        .collect()
}

/// Everything the reconciliation view shows for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    pub period: ReportingPeriod,
    pub summary: PeriodSummary,
    /// Most recent first.
    pub gaps: Vec<Gap>,
}

/// Builds the full report for `period` from the whole entry collection.
pub fn build_report(
    entries: &[TimeEntry],
    period: ReportingPeriod,
    now: Millis,
    gap_threshold_minutes: i64,
) -> PeriodReport {
    let in_period = entries_in_period(entries, &period);
    let summary = summarize(&in_period, &period, now);
    let gaps = find_gaps(&in_period, &period, now, gap_threshold_minutes);
    PeriodReport {
        period,
        summary,
        gaps,
    }
}
