//! Wall-clock instants and the `Clock` seam.
//!
//! # Responsibility
//! - Represent instants as local wall-clock epoch milliseconds.
//! - Derive calendar days and day bounds without timezone conversion.
//! - Provide a replaceable source of "now" for services and tests.
//!
//! # Invariants
//! - An instant's calendar day is read from its wall-clock fields only.
//! - `end_of_day(d)` is always `23:59:59.999` of `d`.
//! - `start_of_day(d + 1) == end_of_day(d) + 1`.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Wall-clock epoch milliseconds.
///
/// The value is the local date/time reinterpreted as if it were UTC, so
/// every day is exactly `DAY_MS` long.
pub type Millis = i64;

pub const SECOND_MS: Millis = 1_000;
pub const MINUTE_MS: Millis = 60 * SECOND_MS;
pub const HOUR_MS: Millis = 60 * MINUTE_MS;
pub const DAY_MS: Millis = 24 * HOUR_MS;

/// Whether `ms` has a calendar date/time.
pub fn is_representable(ms: Millis) -> bool {
    DateTime::from_timestamp_millis(ms).is_some()
}

/// Converts a wall-clock instant into its naive date/time fields.
pub fn to_naive(ms: Millis) -> NaiveDateTime {
    DateTime::from_timestamp_millis(ms)
        .map(|value| value.naive_utc())
        .unwrap_or_default()
}

/// Converts naive local date/time fields into a wall-clock instant.
pub fn wall_clock_ms(value: NaiveDateTime) -> Millis {
    value.and_utc().timestamp_millis()
}

/// Calendar date an instant falls on.
pub fn local_date(ms: Millis) -> NaiveDate {
    to_naive(ms).date()
}

/// `00:00:00.000` of `date`.
pub fn start_of_day(date: NaiveDate) -> Millis {
    wall_clock_ms(date.and_time(NaiveTime::MIN))
}

/// `23:59:59.999` of `date`.
pub fn end_of_day(date: NaiveDate) -> Millis {
    start_of_day(date) + DAY_MS - 1
}

/// Instant for `date` at `time`.
pub fn at_time(date: NaiveDate, time: NaiveTime) -> Millis {
    wall_clock_ms(date.and_time(time))
}

/// `HH:MM` (24-hour) rendering of an instant.
pub fn format_hhmm(ms: Millis) -> String {
    to_naive(ms).format("%H:%M").to_string()
}

/// `MM/DD` rendering of an instant's date.
pub fn format_month_day(ms: Millis) -> String {
    to_naive(ms).format("%m/%d").to_string()
}

/// Source of the current wall-clock instant.
pub trait Clock {
    fn now_ms(&self) -> Millis;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}

/// Reads the operating system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        wall_clock_ms(Local::now().naive_local())
    }
}

/// Manually driven clock.
///
/// Interior mutability lets one instance be shared (via `Arc`) between a
/// service and the code advancing time.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    pub fn new(now: Millis) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    /// Builds a clock from naive local date/time fields.
    pub fn at(value: NaiveDateTime) -> Self {
        Self::new(wall_clock_ms(value))
    }

    pub fn set(&self, now: Millis) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, delta: Millis) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}
