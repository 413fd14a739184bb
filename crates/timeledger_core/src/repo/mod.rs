//! Snapshot persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the load/save/remove boundary for the ledger document.
//! - Keep SQL and JSON details out of the service layer.
//!
//! # Invariants
//! - Read paths reject invalid persisted documents instead of masking them.

pub mod snapshot_repo;
