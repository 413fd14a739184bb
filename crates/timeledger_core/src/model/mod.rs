//! Ledger domain model.
//!
//! # Responsibility
//! - Define entries, presets, the running task and the persisted document.
//!
//! # Invariants
//! - Every entry is identified by a stable `EntryId`.
//! - The category set is closed.

pub mod document;
pub mod entry;
pub mod preset;
pub mod task;
