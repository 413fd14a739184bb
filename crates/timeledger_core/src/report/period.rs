//! Reporting period resolution.
//!
//! # Responsibility
//! - Turn a reference instant and a granularity into `[start, end]` plus a
//!   display label.
//!
//! # Invariants
//! - `start` is always `00:00:00.000` and `end` always `23:59:59.999`.
//! - Weeks start on weekday index 0 (Sunday), while the label carries the
//!   Monday-based ISO week number of the reference day. The two conventions
//!   disagree on Sundays; both are kept as observed.

use crate::clock::{end_of_day, local_date, start_of_day, Millis};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Week,
    Month,
    Year,
    Custom,
}

/// Caller-supplied calendar bounds for `Granularity::Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CustomRange {
    /// Range used when no custom bounds were chosen: the seven days before
    /// `reference` through `reference`.
    pub fn default_for(reference: NaiveDate) -> Self {
        Self {
            start: reference - Duration::days(7),
            end: reference,
        }
    }
}

/// Resolved `[start, end]` window. Derived per query, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportingPeriod {
    pub start: Millis,
    pub end: Millis,
    pub label: String,
}

impl ReportingPeriod {
    pub fn contains(&self, instant: Millis) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn start_date(&self) -> NaiveDate {
        local_date(self.start)
    }

    pub fn end_date(&self) -> NaiveDate {
        local_date(self.end)
    }
}

/// Resolves the period containing `reference`.
///
/// `custom` is only read for `Granularity::Custom`; when absent the default
/// seven-day lookback is used.
pub fn resolve_period(
    reference: Millis,
    granularity: Granularity,
    custom: Option<CustomRange>,
) -> ReportingPeriod {
    let day = local_date(reference);
    match granularity {
        Granularity::Week => {
            let first = day - Duration::days(i64::from(day.weekday().num_days_from_sunday()));
            let last = first + Duration::days(6);
            ReportingPeriod {
                start: start_of_day(first),
                end: end_of_day(last),
                label: format!("{} W{:02}", day.year(), day.iso_week().week()),
            }
        }
        Granularity::Month => {
            let first = day - Duration::days(i64::from(day.day0()));
            let last = first
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .unwrap_or(first);
            ReportingPeriod {
                start: start_of_day(first),
                end: end_of_day(last),
                label: format!("{}-{:02}", day.year(), day.month()),
            }
        }
        Granularity::Year => {
            let first = day - Duration::days(i64::from(day.ordinal0()));
            let last = NaiveDate::from_ymd_opt(day.year(), 12, 31).unwrap_or(first);
            ReportingPeriod {
                start: start_of_day(first),
                end: end_of_day(last),
                label: day.year().to_string(),
            }
        }
        Granularity::Custom => {
            let range = custom.unwrap_or_else(|| CustomRange::default_for(day));
            ReportingPeriod {
                start: start_of_day(range.start),
                end: end_of_day(range.end),
                label: format!(
                    "{} to {}",
                    range.start.format("%Y-%m-%d"),
                    range.end.format("%Y-%m-%d")
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_period, CustomRange, Granularity};
    use crate::clock::{end_of_day, start_of_day, wall_clock_ms};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon(day: NaiveDate) -> i64 {
        wall_clock_ms(day.and_hms_opt(12, 0, 0).unwrap())
    }

    #[test]
    fn week_starts_on_sunday_of_reference() {
        // 2026-03-11 is a Wednesday.
        let period = resolve_period(noon(date(2026, 3, 11)), Granularity::Week, None);
        assert_eq!(period.start, start_of_day(date(2026, 3, 8)));
        assert_eq!(period.end, end_of_day(date(2026, 3, 14)));
        assert_eq!(period.label, "2026 W11");
    }

    #[test]
    fn sunday_reference_keeps_iso_week_of_previous_monday() {
        // 2026-03-08 is a Sunday: the range starts that day, ISO still says W10.
        let period = resolve_period(noon(date(2026, 3, 8)), Granularity::Week, None);
        assert_eq!(period.start, start_of_day(date(2026, 3, 8)));
        assert_eq!(period.label, "2026 W10");
    }

    #[test]
    fn month_handles_leap_february() {
        let period = resolve_period(noon(date(2028, 2, 17)), Granularity::Month, None);
        assert_eq!(period.start, start_of_day(date(2028, 2, 1)));
        assert_eq!(period.end, end_of_day(date(2028, 2, 29)));
        assert_eq!(period.label, "2028-02");

        let december = resolve_period(noon(date(2026, 12, 5)), Granularity::Month, None);
        assert_eq!(december.end, end_of_day(date(2026, 12, 31)));
    }

    #[test]
    fn year_covers_whole_calendar_year() {
        let period = resolve_period(noon(date(2026, 7, 4)), Granularity::Year, None);
        assert_eq!(period.start, start_of_day(date(2026, 1, 1)));
        assert_eq!(period.end, end_of_day(date(2026, 12, 31)));
        assert_eq!(period.label, "2026");
    }

    #[test]
    fn custom_forces_end_of_day_and_defaults_to_last_week() {
        let range = CustomRange {
            start: date(2026, 1, 1),
            end: date(2026, 1, 24),
        };
        let period = resolve_period(noon(date(2026, 6, 1)), Granularity::Custom, Some(range));
        assert_eq!(period.start, start_of_day(date(2026, 1, 1)));
        assert_eq!(period.end, end_of_day(date(2026, 1, 24)));
        assert_eq!(period.label, "2026-01-01 to 2026-01-24");

        let fallback = resolve_period(noon(date(2026, 6, 10)), Granularity::Custom, None);
        assert_eq!(fallback.start, start_of_day(date(2026, 6, 3)));
        assert_eq!(fallback.end, end_of_day(date(2026, 6, 10)));
    }
}
