//! Periodic refresh ticker.
//!
//! # Responsibility
//! - Run a callback on a background thread at a fixed interval.
//!
//! # Invariants
//! - After `cancel` (or drop) returns, the callback never runs again.
//! - The callback must only read ledger state; ticks never mutate it.

use log::{debug, error, info};
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const TICKER_THREAD_NAME: &str = "timeledger-ticker";

/// Owner of a running ticker thread.
#[derive(Debug)]
pub struct TickerHandle {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Stops the ticker and waits for its thread to exit.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender also wakes the loop.
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("event=ticker_stop module=service status=error reason=callback_panicked");
            } else {
                info!("event=ticker_stop module=service status=ok");
            }
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawns a thread calling `tick` every `interval` until the handle is
/// cancelled or dropped.
///
/// # Errors
/// - Returns the OS error when the thread cannot be spawned.
pub fn spawn_ticker<F>(interval: Duration, mut tick: F) -> io::Result<TickerHandle>
where
    F: FnMut() + Send + 'static,
{
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let thread = thread::Builder::new()
        .name(TICKER_THREAD_NAME.to_string())
        .spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => tick(),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        })?;

    debug!(
        "event=ticker_start module=service status=ok interval_ms={}",
        interval.as_millis()
    );
    Ok(TickerHandle {
        stop: Some(stop_tx),
        thread: Some(thread),
    })
}
