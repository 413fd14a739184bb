use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use timeledger_core::clock::{wall_clock_ms, SECOND_MS};
use timeledger_core::{
    spawn_ticker, Category, FixedClock, LedgerConfig, LedgerService, MemorySnapshotRepository,
};

#[test]
fn ticker_delivers_views_until_cancelled() {
    let clock = Arc::new(FixedClock::new(wall_clock_ms(
        chrono::NaiveDate::from_ymd_opt(2026, 7, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    )));
    let mut service = LedgerService::open(
        MemorySnapshotRepository::new(),
        clock.clone(),
        LedgerConfig::default(),
    )
    .unwrap();
    service.start_task("focus", Category::Investment).unwrap();
    let service = Arc::new(Mutex::new(service));

    let (view_tx, view_rx) = mpsc::channel();
    let ticking = Arc::clone(&service);
    let tick_clock = Arc::clone(&clock);
    let handle = spawn_ticker(Duration::from_millis(10), move || {
        tick_clock.advance(SECOND_MS);
        if let Ok(service) = ticking.lock() {
            let _ = view_tx.send(service.tick());
        }
    })
    .unwrap();

    let first = view_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let second = view_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    handle.cancel();

    assert!(second.now > first.now);
    assert!(first.timer_display.unwrap().starts_with("00:00:"));
    assert!(second.live_gap.is_none());

    let entries_before = service.lock().unwrap().state().entries().len();
    while view_rx.try_recv().is_ok() {}
    std::thread::sleep(Duration::from_millis(50));
    assert!(view_rx.try_recv().is_err());
    assert_eq!(service.lock().unwrap().state().entries().len(), entries_before);
}

#[test]
fn dropping_handle_stops_ticks() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let handle = spawn_ticker(Duration::from_millis(5), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();

    std::thread::sleep(Duration::from_millis(40));
    drop(handle);
    let stopped_at = count.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(40));
    assert_eq!(count.load(Ordering::SeqCst), stopped_at);
}
