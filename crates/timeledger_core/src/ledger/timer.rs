//! Two-state task timer.
//!
//! # Responsibility
//! - Track the single running task between `start` and `stop`.
//! - Submit the finished task to the entry store as a candidate.
//!
//! # Invariants
//! - `Idle -> Running` only via `start`; `Running -> Idle` only via a
//!   successful `stop`.
//! - A stop whose candidate is rejected keeps the task running.

use crate::clock::Millis;
use crate::ledger::store::EntryStore;
use crate::ledger::{LedgerError, LedgerResult};
use crate::model::entry::{Category, EntryId, EntryValidationError};
use crate::model::task::ActiveTask;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskTimer {
    #[default]
    Idle,
    Running(ActiveTask),
}

impl TaskTimer {
    pub fn from_active(task: Option<ActiveTask>) -> Self {
        task.map_or(Self::Idle, Self::Running)
    }

    pub fn active(&self) -> Option<&ActiveTask> {
        match self {
            Self::Idle => None,
            Self::Running(task) => Some(task),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running(_))
    }

    /// Starts a task at `now`.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)` for a blank title.
    /// - `TaskAlreadyRunning` when not idle.
    pub fn start(
        &mut self,
        title: &str,
        category: Category,
        now: Millis,
    ) -> LedgerResult<ActiveTask> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EntryValidationError::EmptyTitle.into());
        }
        if self.is_running() {
            return Err(LedgerError::TaskAlreadyRunning);
        }

        let task = ActiveTask {
            title: title.to_string(),
            category,
            start_time: now,
        };
        *self = Self::Running(task.clone());
        Ok(task)
    }

    /// Stops the running task and records `[start, now]` in `store`.
    ///
    /// Returns `Ok(None)` when idle. On a rejected submission the error is
    /// returned and the task stays running so nothing is lost.
    pub fn stop(
        &mut self,
        store: &mut EntryStore,
        now: Millis,
    ) -> LedgerResult<Option<Vec<EntryId>>> {
        let Some(task) = self.active() else {
            return Ok(None);
        };

        let ids = store.add(&task.to_candidate(now))?;
        *self = Self::Idle;
        Ok(Some(ids))
    }

    /// Discards the running task without recording it.
    pub fn cancel(&mut self) -> Option<ActiveTask> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Running(task) => Some(task),
        }
    }

    /// `HH:MM:SS` since the task started, or `None` when idle.
    pub fn elapsed_display(&self, now: Millis) -> Option<String> {
        self.active().map(|task| task.elapsed_display(now))
    }
}

#[cfg(test)]
mod tests {
    use super::TaskTimer;
    use crate::clock::{wall_clock_ms, MINUTE_MS};
    use crate::ledger::store::EntryStore;
    use crate::ledger::LedgerError;
    use crate::model::entry::{Category, EntryCandidate};
    use chrono::NaiveDate;

    fn nine_am() -> i64 {
        wall_clock_ms(
            NaiveDate::from_ymd_opt(2026, 9, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn start_then_stop_records_entry() {
        let mut timer = TaskTimer::default();
        let mut store = EntryStore::new();
        timer.start("deep work", Category::Investment, nine_am()).unwrap();
        assert!(timer.is_running());

        let ids = timer
            .stop(&mut store, nine_am() + 45 * MINUTE_MS)
            .unwrap()
            .unwrap();
        assert_eq!(ids.len(), 1);
        assert!(!timer.is_running());
        let entry = store.get(ids[0]).unwrap();
        assert_eq!(entry.duration, 45);
        assert!(entry.tags.is_empty());
        assert_eq!(entry.note, None);
    }

    #[test]
    fn second_start_is_rejected() {
        let mut timer = TaskTimer::default();
        timer.start("a", Category::Investment, nine_am()).unwrap();
        assert_eq!(
            timer.start("b", Category::Depletion, nine_am()),
            Err(LedgerError::TaskAlreadyRunning)
        );
        assert_eq!(timer.active().unwrap().title, "a");
    }

    #[test]
    fn stop_when_idle_is_noop() {
        let mut timer = TaskTimer::default();
        let mut store = EntryStore::new();
        assert_eq!(timer.stop(&mut store, nine_am()), Ok(None));
        assert!(store.is_empty());
    }

    #[test]
    fn conflicting_stop_keeps_task_running() {
        let mut timer = TaskTimer::default();
        let mut store = EntryStore::new();
        store
            .add(&EntryCandidate::new(
                "meeting",
                Category::Maintenance,
                nine_am() + 10 * MINUTE_MS,
                nine_am() + 20 * MINUTE_MS,
            ))
            .unwrap();

        timer.start("focus", Category::Investment, nine_am()).unwrap();
        let result = timer.stop(&mut store, nine_am() + 30 * MINUTE_MS);
        assert!(matches!(result, Err(LedgerError::IntervalConflict { .. })));
        assert!(timer.is_running());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn cancel_discards_task() {
        let mut timer = TaskTimer::default();
        timer.start("x", Category::Depletion, nine_am()).unwrap();
        assert_eq!(timer.cancel().unwrap().title, "x");
        assert_eq!(timer, TaskTimer::Idle);
        assert_eq!(timer.elapsed_display(nine_am()), None);
    }
}
