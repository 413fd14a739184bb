use chrono::{Datelike, NaiveDate, Weekday};
use timeledger_core::clock::{end_of_day, start_of_day, wall_clock_ms, DAY_MS};
use timeledger_core::report::aggregate::summarize;
use timeledger_core::report::build_report;
use timeledger_core::report::gaps::RECONCILE_GAP_THRESHOLD_MINUTES;
use timeledger_core::{
    resolve_period, Category, ChartBucket, CustomRange, EntryCandidate, EntryStore, Granularity,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> i64 {
    wall_clock_ms(day.and_hms_opt(hour, minute, 0).unwrap())
}

#[test]
fn week_of_weekday_zero_starts_that_day() {
    let sunday = date(2026, 8, 16);
    assert_eq!(sunday.weekday(), Weekday::Sun);

    let period = resolve_period(at(sunday, 15, 0), Granularity::Week, None);
    assert_eq!(period.start, start_of_day(sunday));
    assert_eq!(period.end, end_of_day(date(2026, 8, 22)));
    assert_eq!(period.end - period.start, 7 * DAY_MS - 1);
}

#[test]
fn future_period_has_full_coverage_and_no_gaps() {
    let reference = at(date(2027, 1, 10), 12, 0);
    let period = resolve_period(reference, Granularity::Month, None);
    let now = at(date(2026, 12, 1), 9, 0);

    let report = build_report(&[], period, now, RECONCILE_GAP_THRESHOLD_MINUTES);
    assert_eq!(report.summary.total_possible_minutes, 0.0);
    assert_eq!(report.summary.coverage_percent, 100);
    for category in Category::ALL {
        assert_eq!(report.summary.category_totals.get(category), 0);
    }
    assert_eq!(report.summary.chart_buckets(), vec![ChartBucket::Empty]);
    assert!(report.gaps.is_empty());
}

#[test]
fn single_entry_day_has_two_gaps_most_recent_first() {
    let day = date(2026, 8, 12);
    let mut store = EntryStore::new();
    store
        .add(&EntryCandidate::new(
            "standup",
            Category::Maintenance,
            at(day, 9, 0),
            at(day, 9, 30),
        ))
        .unwrap();

    let period = resolve_period(
        at(day, 12, 0),
        Granularity::Custom,
        Some(CustomRange {
            start: day,
            end: day,
        }),
    );
    let now = at(date(2026, 8, 20), 8, 0);
    let report = build_report(store.entries(), period, now, 15);

    assert_eq!(report.gaps.len(), 2);
    let trailing = &report.gaps[0];
    let leading = &report.gaps[1];
    assert_eq!(trailing.start, at(day, 9, 30));
    assert_eq!(trailing.end, end_of_day(day));
    assert_eq!(trailing.minutes().round(), 870.0);
    assert_eq!(leading.start, start_of_day(day));
    assert_eq!(leading.end, at(day, 9, 0));
    assert_eq!(leading.minutes(), 540.0);

    assert_eq!(report.summary.logged_minutes, 30);
    assert_eq!(report.summary.coverage_percent, 2);
}

#[test]
fn report_only_counts_entries_starting_in_period() {
    let saturday = date(2026, 8, 22);
    let mut store = EntryStore::new();
    // Crosses into Sunday, which starts the next week.
    store
        .add(&EntryCandidate::new(
            "movie",
            Category::Depletion,
            at(saturday, 23, 0),
            at(saturday, 1, 0),
        ))
        .unwrap();
    store
        .add(&EntryCandidate::new(
            "study",
            Category::Investment,
            at(saturday, 10, 0),
            at(saturday, 12, 0),
        ))
        .unwrap();

    let now = at(date(2026, 9, 1), 0, 0);
    let period = resolve_period(at(saturday, 8, 0), Granularity::Week, None);
    let entries: Vec<_> = store
        .entries()
        .iter()
        .filter(|entry| period.contains(entry.start_time))
        .collect();
    let summary = summarize(&entries, &period, now);

    assert_eq!(summary.category_totals.get(Category::Investment), 120);
    assert_eq!(summary.category_totals.get(Category::Depletion), 60);
    assert_eq!(summary.logged_minutes, 180);
    assert_eq!(summary.total_possible_minutes, (7 * DAY_MS - 1) as f64 / 60_000.0);

    let next_week = resolve_period(at(date(2026, 8, 23), 8, 0), Granularity::Week, None);
    let report = build_report(store.entries(), next_week, now, 15);
    assert_eq!(report.summary.category_totals.get(Category::Depletion), 60);
}
