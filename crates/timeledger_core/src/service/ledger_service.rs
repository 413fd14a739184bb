//! Ledger use-case service.
//!
//! # Responsibility
//! - Own the explicit ledger state and route every mutation through the
//!   ledger engine.
//! - Write the ledger document back after each committed mutation.
//! - Expose reports, timelines and tick views as read-only queries.
//!
//! # Invariants
//! - Mutations run on a copy of the state; the copy replaces the live state
//!   only after the repository accepted it.
//! - Rejected mutations and no-ops never write.
//! - Log lines carry ids, counts and error codes, never titles or notes.

use crate::clock::{local_date, start_of_day, Clock, Millis};
use crate::config::LedgerConfig;
use crate::ledger::store::EntryStore;
use crate::ledger::timer::TaskTimer;
use crate::ledger::{LedgerError, LedgerResult};
use crate::model::document::{LedgerDocument, UserProfile};
use crate::model::entry::{Category, EntryCandidate, EntryId, EntryPatch, TimeEntry};
use crate::model::preset::{default_presets, PresetId, PresetPatch, TimePreset};
use crate::model::task::ActiveTask;
use crate::report::gaps::{live_gap, Gap};
use crate::report::period::{resolve_period, CustomRange, Granularity, ReportingPeriod};
use crate::report::timeline::{day_timeline, TimelineItem, TimelineOptions};
use crate::report::{build_report, entries_in_period, PeriodReport};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::service::export::{ExportError, ExportFormat, ExportRange, Exporter};
use crate::service::insight::{Insight, InsightGenerator};
use crate::service::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use serde::Serialize;

/// Everything the ledger persists, held as one owned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    store: EntryStore,
    presets: Vec<TimePreset>,
    timer: TaskTimer,
    selected_date: Millis,
    user: UserProfile,
}

/// Read-only snapshot produced on every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickView {
    pub now: Millis,
    /// `HH:MM:SS` of the running task.
    pub timer_display: Option<String>,
    pub live_gap: Option<Gap>,
}

impl LedgerState {
    /// Empty ledger with the default presets, selecting the day of `now`.
    pub fn fresh(now: Millis) -> Self {
        Self {
            store: EntryStore::new(),
            presets: default_presets(),
            timer: TaskTimer::Idle,
            selected_date: start_of_day(local_date(now)),
            user: UserProfile::default(),
        }
    }

    pub fn from_document(document: LedgerDocument) -> LedgerResult<Self> {
        let store = EntryStore::restore(document.entries)?;
        for preset in &document.presets {
            preset.validate()?;
        }
        Ok(Self {
            store,
            presets: document.presets,
            timer: TaskTimer::from_active(document.active_task),
            selected_date: start_of_day(local_date(document.selected_date)),
            user: document.user,
        })
    }

    pub fn to_document(&self) -> LedgerDocument {
        LedgerDocument {
            entries: self.store.entries().to_vec(),
            presets: self.presets.clone(),
            active_task: self.timer.active().cloned(),
            selected_date: self.selected_date,
            user: self.user.clone(),
        }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn entries(&self) -> &[TimeEntry] {
        self.store.entries()
    }

    pub fn presets(&self) -> &[TimePreset] {
        &self.presets
    }

    pub fn active_task(&self) -> Option<&ActiveTask> {
        self.timer.active()
    }

    /// Start of the selected day.
    pub fn selected_date(&self) -> Millis {
        self.selected_date
    }

    pub fn selected_day(&self) -> NaiveDate {
        local_date(self.selected_date)
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    /// Period around the selected date.
    pub fn period(&self, granularity: Granularity, custom: Option<CustomRange>) -> ReportingPeriod {
        resolve_period(self.selected_date, granularity, custom)
    }

    pub fn report(
        &self,
        granularity: Granularity,
        custom: Option<CustomRange>,
        now: Millis,
        gap_threshold_minutes: i64,
    ) -> PeriodReport {
        build_report(
            self.store.entries(),
            self.period(granularity, custom),
            now,
            gap_threshold_minutes,
        )
    }

    pub fn day_timeline(
        &self,
        day: NaiveDate,
        now: Millis,
        options: TimelineOptions,
    ) -> Vec<TimelineItem> {
        let day_entries = self.store.on_date(day);
        day_timeline(
            day,
            &day_entries,
            &self.presets,
            now,
            self.timer.is_running(),
            options,
        )
    }

    pub fn tick_view(&self, now: Millis, gap_threshold_minutes: i64) -> TickView {
        let today = self.store.on_date(local_date(now));
        TickView {
            now,
            timer_display: self.timer.elapsed_display(now),
            live_gap: live_gap(
                &today,
                now,
                self.timer.is_running(),
                gap_threshold_minutes,
            ),
        }
    }

    fn preset_position(&self, id: PresetId) -> LedgerResult<usize> {
        self.presets
            .iter()
            .position(|preset| preset.id == id)
            .ok_or(LedgerError::NotFound(id))
    }
}

/// Facade over ledger state, its repository and a clock.
pub struct LedgerService<R: SnapshotRepository, C: Clock> {
    repo: R,
    clock: C,
    config: LedgerConfig,
    state: LedgerState,
}

impl<R: SnapshotRepository, C: Clock> LedgerService<R, C> {
    /// Loads the document stored under `config.storage_key`, or starts a
    /// fresh ledger when none exists.
    ///
    /// # Errors
    /// - `Config` when `config` fails validation.
    /// - `Repo` when the stored document cannot be read or is invalid.
    pub fn open(repo: R, clock: C, config: LedgerConfig) -> ServiceResult<Self> {
        config.validate()?;

        let loaded = repo.load(&config.storage_key).map_err(|err| {
            error!("event=ledger_open module=service status=error error_code=load_failed error={err}");
            ServiceError::from(err)
        })?;
        let restored = loaded.is_some();
        let state = match loaded {
            Some(document) => LedgerState::from_document(document).map_err(|err| {
                error!(
                    "event=ledger_open module=service status=error error_code={}",
                    err.code()
                );
                ServiceError::from(err)
            })?,
            None => LedgerState::fresh(clock.now_ms()),
        };

        info!(
            "event=ledger_open module=service status=ok restored={} entries={} presets={} task_running={}",
            restored,
            state.store.len(),
            state.presets.len(),
            state.timer.is_running()
        );
        Ok(Self {
            repo,
            clock,
            config,
            state,
        })
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn add_entry(&mut self, candidate: &EntryCandidate) -> ServiceResult<Vec<EntryId>> {
        self.commit("entry_add", |state, _| state.store.add(candidate))
    }

    /// An empty patch returns the stored entry without writing.
    pub fn update_entry(&mut self, id: EntryId, patch: &EntryPatch) -> ServiceResult<TimeEntry> {
        if patch.is_empty() {
            return self
                .state
                .store
                .get(id)
                .cloned()
                .ok_or_else(|| LedgerError::NotFound(id).into());
        }
        self.commit("entry_update", |state, _| state.store.update(id, patch))
    }

    /// Returns `false` without writing when `id` is unknown.
    pub fn delete_entry(&mut self, id: EntryId) -> ServiceResult<bool> {
        if self.state.store.get(id).is_none() {
            debug!("event=entry_delete module=service status=noop entry_id={id}");
            return Ok(false);
        }
        self.commit("entry_delete", |state, _| Ok(state.store.delete(id)))
    }

    /// Pre-fills preset `id` on `day` and submits it like any candidate.
    pub fn apply_preset(&mut self, id: PresetId, day: NaiveDate) -> ServiceResult<Vec<EntryId>> {
        self.commit("preset_apply", |state, _| {
            let position = state.preset_position(id)?;
            let candidate = state.presets[position].candidate_on(day)?;
            state.store.add(&candidate)
        })
    }

    pub fn start_task(&mut self, title: &str, category: Category) -> ServiceResult<ActiveTask> {
        self.commit("task_start", |state, now| {
            state.timer.start(title, category, now)
        })
    }

    /// Stops the running task and records it. `Ok(None)` when idle.
    ///
    /// A conflicting task is reported and stays running.
    pub fn stop_task(&mut self) -> ServiceResult<Option<Vec<EntryId>>> {
        if !self.state.timer.is_running() {
            return Ok(None);
        }
        self.commit("task_stop", |state, now| {
            state.timer.stop(&mut state.store, now)
        })
    }

    /// Discards the running task without recording it.
    pub fn cancel_task(&mut self) -> ServiceResult<Option<ActiveTask>> {
        if !self.state.timer.is_running() {
            return Ok(None);
        }
        self.commit("task_cancel", |state, _| Ok(state.timer.cancel()))
    }

    /// Selects the day containing `instant`.
    pub fn set_selected_date(&mut self, instant: Millis) -> ServiceResult<()> {
        self.commit("date_select", |state, _| {
            state.selected_date = start_of_day(local_date(instant));
            Ok(())
        })
    }

    pub fn add_preset(&mut self, preset: TimePreset) -> ServiceResult<PresetId> {
        self.commit("preset_add", |state, _| {
            preset.validate()?;
            let id = preset.id;
            state.presets.push(preset);
            Ok(id)
        })
    }

    pub fn update_preset(&mut self, id: PresetId, patch: &PresetPatch) -> ServiceResult<TimePreset> {
        self.commit("preset_update", |state, _| {
            let position = state.preset_position(id)?;
            let merged = patch.apply_to(&state.presets[position])?;
            state.presets[position] = merged.clone();
            Ok(merged)
        })
    }

    /// Returns `false` without writing when `id` is unknown.
    pub fn delete_preset(&mut self, id: PresetId) -> ServiceResult<bool> {
        if self.state.preset_position(id).is_err() {
            return Ok(false);
        }
        self.commit("preset_delete", |state, _| {
            state.presets.retain(|preset| preset.id != id);
            Ok(true)
        })
    }

    pub fn update_user(&mut self, user: UserProfile) -> ServiceResult<()> {
        self.commit("user_update", |state, _| {
            state.user = user;
            Ok(())
        })
    }

    /// Drops all entries and the running task; presets and user stay.
    pub fn clear_all(&mut self) -> ServiceResult<()> {
        self.commit("ledger_clear", |state, _| {
            state.store.clear();
            state.timer.cancel();
            Ok(())
        })
    }

    /// Clears entries and the running task, signs the user out and removes
    /// the stored document.
    pub fn logout(&mut self) -> ServiceResult<()> {
        self.repo.remove(&self.config.storage_key).map_err(|err| {
            error!("event=ledger_logout module=service status=error error_code=remove_failed error={err}");
            ServiceError::from(err)
        })?;
        self.state.store.clear();
        self.state.timer.cancel();
        self.state.user = UserProfile::signed_out();
        info!("event=ledger_logout module=service status=ok");
        Ok(())
    }

    /// Reconciliation report for the period around the selected date.
    pub fn report(&self, granularity: Granularity, custom: Option<CustomRange>) -> PeriodReport {
        self.state.report(
            granularity,
            custom,
            self.clock.now_ms(),
            self.config.reconcile_gap_threshold_minutes,
        )
    }

    pub fn day_timeline(&self, day: NaiveDate) -> Vec<TimelineItem> {
        self.state
            .day_timeline(day, self.clock.now_ms(), self.config.timeline_options())
    }

    /// Current timer display and live gap.
    ///
    /// The live gap follows the timeline rule, so a tick never disagrees
    /// with `day_timeline` for today.
    pub fn tick(&self) -> TickView {
        self.state.tick_view(
            self.clock.now_ms(),
            self.config.timeline_gap_threshold_minutes,
        )
    }

    /// Asks `generator` about the period around the selected date.
    ///
    /// Any failure yields `None`; ledger state is never touched.
    pub fn request_insight<G>(
        &self,
        generator: &G,
        granularity: Granularity,
        custom: Option<CustomRange>,
    ) -> Option<Insight>
    where
        G: InsightGenerator + ?Sized,
    {
        let period = self.state.period(granularity, custom);
        let snapshot: Vec<TimeEntry> = entries_in_period(self.state.entries(), &period)
            .into_iter()
            .cloned()
            .collect();

        match generator.generate(&snapshot, &period) {
            Ok(insight) => {
                info!(
                    "event=insight_request module=service status=ok entries={}",
                    snapshot.len()
                );
                Some(insight)
            }
            Err(err) => {
                warn!("event=insight_request module=service status=error error={err}");
                None
            }
        }
    }

    pub fn export<E>(
        &self,
        exporter: &E,
        range: ExportRange,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ExportError>
    where
        E: Exporter + ?Sized,
    {
        let selected = range.select(self.state.entries());
        let payload = exporter.export(&selected, format).map_err(|err| {
            warn!("event=ledger_export module=service status=error error={err}");
            err
        })?;
        info!(
            "event=ledger_export module=service status=ok entries={} bytes={}",
            selected.len(),
            payload.len()
        );
        Ok(payload)
    }

    fn commit<T>(
        &mut self,
        event: &'static str,
        apply: impl FnOnce(&mut LedgerState, Millis) -> LedgerResult<T>,
    ) -> ServiceResult<T> {
        let now = self.clock.now_ms();
        let mut next = self.state.clone();
        let value = apply(&mut next, now).map_err(|err| {
            warn!(
                "event={event} module=service status=rejected error_code={}",
                err.code()
            );
            ServiceError::from(err)
        })?;

        self.repo
            .save(&self.config.storage_key, &next.to_document())
            .map_err(|err| {
                error!("event={event} module=service status=error error_code=persist_failed error={err}");
                ServiceError::from(err)
            })?;

        self.state = next;
        info!(
            "event={event} module=service status=ok entries={}",
            self.state.store.len()
        );
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{LedgerService, LedgerState};
    use crate::report::timeline::TimelineItem;
    use crate::clock::{start_of_day, wall_clock_ms, FixedClock, MINUTE_MS};
    use crate::config::LedgerConfig;
    use crate::ledger::LedgerError;
    use crate::model::entry::{Category, EntryCandidate};
    use crate::repo::snapshot_repo::{MemorySnapshotRepository, SnapshotRepository};
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 14).unwrap()
    }

    fn at(hour: u32, minute: u32) -> i64 {
        wall_clock_ms(day().and_hms_opt(hour, minute, 0).unwrap())
    }

    fn service() -> LedgerService<MemorySnapshotRepository, FixedClock> {
        LedgerService::open(
            MemorySnapshotRepository::new(),
            FixedClock::new(at(18, 0)),
            LedgerConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn fresh_state_selects_today_with_default_presets() {
        let state = LedgerState::fresh(at(18, 0));
        assert_eq!(state.selected_date(), start_of_day(day()));
        assert_eq!(state.presets().len(), 2);
        assert!(state.entries().is_empty());
        assert!(state.active_task().is_none());
    }

    #[test]
    fn rejected_mutation_does_not_write() {
        let mut service = service();
        let key = service.config().storage_key.clone();
        service
            .add_entry(&EntryCandidate::new(
                "focus",
                Category::Investment,
                at(10, 0),
                at(11, 0),
            ))
            .unwrap();
        let written = service.repository().payload(&key).unwrap();

        let err = service
            .add_entry(&EntryCandidate::new(
                "overlap",
                Category::Depletion,
                at(10, 30),
                at(10, 45),
            ))
            .unwrap_err();
        assert!(matches!(
            err.ledger(),
            Some(LedgerError::IntervalConflict { .. })
        ));
        assert_eq!(service.repository().payload(&key).unwrap(), written);
        assert_eq!(service.state().entries().len(), 1);
    }

    #[test]
    fn tick_reports_timer_and_suppresses_live_gap_while_running() {
        let mut service = service();
        let idle = service.tick();
        assert!(idle.timer_display.is_none());
        assert!(idle.live_gap.is_some());

        service.start_task("reading", Category::Investment).unwrap();
        service.clock.advance(61 * MINUTE_MS + 5_000);
        let running = service.tick();
        assert_eq!(running.timer_display.as_deref(), Some("01:01:05"));
        assert!(running.live_gap.is_none());
    }

    #[test]
    fn tick_live_gap_matches_timeline_at_threshold() {
        let mut service = service();
        service
            .add_entry(&EntryCandidate::new(
                "focus",
                Category::Investment,
                at(17, 0),
                at(18, 0),
            ))
            .unwrap();

        let cases = [
            (5 * MINUTE_MS, true),
            (4 * MINUTE_MS + 40_000, true),
            (4 * MINUTE_MS + 29_000, false),
        ];
        for (offset, expected) in cases {
            service.clock.set(at(18, 0) + offset);
            let timeline_has_gap = service
                .day_timeline(day())
                .iter()
                .any(|item| matches!(item, TimelineItem::LiveGap { .. }));
            assert_eq!(service.tick().live_gap.is_some(), expected);
            assert_eq!(timeline_has_gap, expected);
        }
    }

    #[test]
    fn reopen_restores_persisted_document() {
        let repo = MemorySnapshotRepository::new();
        let config = LedgerConfig::default();
        let mut first =
            LedgerService::open(repo, FixedClock::new(at(18, 0)), config.clone()).unwrap();
        first.start_task("walk", Category::Maintenance).unwrap();
        let document = first.state().to_document();

        let repo = MemorySnapshotRepository::new();
        repo.save(&config.storage_key, &document).unwrap();
        let second = LedgerService::open(repo, FixedClock::new(at(19, 0)), config).unwrap();
        assert_eq!(second.state().active_task().unwrap().title, "walk");
        assert_eq!(second.state(), first.state());
    }
}
