//! Ledger runtime configuration.
//!
//! # Responsibility
//! - Carry the tunable thresholds used by reporting, the timeline and the
//!   ticker.
//!
//! # Invariants
//! - A config accepted by `validate` never yields an empty storage key or a
//!   zero threshold/interval.

use crate::model::document::LEDGER_STORAGE_KEY;
use crate::report::gaps::RECONCILE_GAP_THRESHOLD_MINUTES;
use crate::report::timeline::{TimelineOptions, TIMELINE_GAP_THRESHOLD_MINUTES};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub storage_key: String,
    pub reconcile_gap_threshold_minutes: i64,
    pub timeline_gap_threshold_minutes: i64,
    pub tick_interval_ms: u64,
    pub preset_suggestion_window_hours: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            storage_key: LEDGER_STORAGE_KEY.to_string(),
            reconcile_gap_threshold_minutes: RECONCILE_GAP_THRESHOLD_MINUTES,
            timeline_gap_threshold_minutes: TIMELINE_GAP_THRESHOLD_MINUTES,
            tick_interval_ms: 1_000,
            preset_suggestion_window_hours: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyStorageKey,
    /// Named field must be strictly positive.
    NonPositive(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStorageKey => write!(f, "storage_key cannot be empty"),
            Self::NonPositive(field) => write!(f, "{field} must be greater than zero"),
        }
    }
}

impl Error for ConfigError {}

impl LedgerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if self.reconcile_gap_threshold_minutes <= 0 {
            return Err(ConfigError::NonPositive("reconcile_gap_threshold_minutes"));
        }
        if self.timeline_gap_threshold_minutes <= 0 {
            return Err(ConfigError::NonPositive("timeline_gap_threshold_minutes"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::NonPositive("tick_interval_ms"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn timeline_options(&self) -> TimelineOptions {
        TimelineOptions {
            gap_threshold_minutes: self.timeline_gap_threshold_minutes,
            suggestion_window_hours: self.preset_suggestion_window_hours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, LedgerConfig};

    #[test]
    fn defaults_are_valid() {
        let config = LedgerConfig::default();
        assert_eq!(config.storage_key, "timeledger-v5-storage");
        assert_eq!(config.reconcile_gap_threshold_minutes, 15);
        assert_eq!(config.timeline_gap_threshold_minutes, 5);
        assert_eq!(config.tick_interval().as_millis(), 1_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_key_and_zero_values() {
        let blank = LedgerConfig {
            storage_key: "  ".to_string(),
            ..LedgerConfig::default()
        };
        assert_eq!(blank.validate(), Err(ConfigError::EmptyStorageKey));

        let no_tick = LedgerConfig {
            tick_interval_ms: 0,
            ..LedgerConfig::default()
        };
        assert_eq!(
            no_tick.validate(),
            Err(ConfigError::NonPositive("tick_interval_ms"))
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: LedgerConfig =
            serde_json::from_str(r#"{"reconcile_gap_threshold_minutes":30}"#)
                .expect("partial config should parse");
        assert_eq!(config.reconcile_gap_threshold_minutes, 30);
        assert_eq!(config.timeline_gap_threshold_minutes, 5);
    }
}
