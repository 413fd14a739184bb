//! Persisted ledger document.
//!
//! # Responsibility
//! - Define the single JSON payload written after every committed mutation.
//!
//! # Invariants
//! - Field names are camelCase on the wire.
//! - `user` is profile data only; no ledger rule reads it.

use crate::clock::Millis;
use crate::model::entry::TimeEntry;
use crate::model::preset::TimePreset;
use crate::model::task::ActiveTask;
use serde::{Deserialize, Serialize};

/// Storage key of the current document layout.
pub const LEDGER_STORAGE_KEY: &str = "timeledger-v5-storage";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

impl UserProfile {
    pub fn signed_out() -> Self {
        Self {
            id: String::new(),
            name: "Signed out".to_string(),
            avatar: String::new(),
        }
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            id: "local".to_string(),
            name: "User".to_string(),
            avatar: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDocument {
    #[serde(default)]
    pub entries: Vec<TimeEntry>,
    #[serde(default)]
    pub presets: Vec<TimePreset>,
    #[serde(default)]
    pub active_task: Option<ActiveTask>,
    pub selected_date: Millis,
    #[serde(default)]
    pub user: UserProfile,
}
