//! Core ledger engine for TimeLedger.
//! This crate owns every ledger rule: interval normalization, conflict
//! detection, period reconciliation and snapshot persistence.

pub mod clock;
pub mod config;
pub mod db;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;

pub use clock::{Clock, FixedClock, Millis, SystemClock};
pub use config::{ConfigError, LedgerConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use ledger::store::EntryStore;
pub use ledger::timer::TaskTimer;
pub use ledger::{LedgerError, LedgerResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{LedgerDocument, UserProfile, LEDGER_STORAGE_KEY};
pub use model::entry::{
    Category, EntryCandidate, EntryId, EntryPatch, EntryValidationError, TimeEntry,
};
pub use model::preset::{default_presets, PresetId, PresetPatch, TimePreset};
pub use model::task::ActiveTask;
pub use report::aggregate::{CategoryTotals, ChartBucket, PeriodSummary};
pub use report::gaps::Gap;
pub use report::period::{resolve_period, CustomRange, Granularity, ReportingPeriod};
pub use report::timeline::{TimelineItem, TimelineOptions};
pub use report::PeriodReport;
pub use repo::snapshot_repo::{
    MemorySnapshotRepository, RepoError, RepoResult, SnapshotRepository,
    SqliteSnapshotRepository,
};
pub use service::export::{ExportError, ExportFormat, ExportRange, Exporter, LedgerExporter};
pub use service::insight::{parse_insight_json, Insight, InsightError, InsightGenerator};
pub use service::ledger_service::{LedgerService, LedgerState, TickView};
pub use service::ticker::{spawn_ticker, TickerHandle};
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
