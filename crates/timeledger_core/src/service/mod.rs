//! Ledger use-case services.
//!
//! # Responsibility
//! - Orchestrate ledger writes, persistence and read-only views behind one
//!   facade.
//! - Host the collaborator seams (ticker, insight, export).
//!
//! # Invariants
//! - A mutation is persisted before it becomes visible in memory.

use crate::config::ConfigError;
use crate::ledger::LedgerError;
use crate::repo::snapshot_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod export;
pub mod insight;
pub mod ledger_service;
pub mod ticker;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Config(ConfigError),
    Ledger(LedgerError),
    Repo(RepoError),
}

impl ServiceError {
    /// The ledger rejection behind this error, if any.
    pub fn ledger(&self) -> Option<&LedgerError> {
        match self {
            Self::Ledger(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid ledger config: {err}"),
            Self::Ledger(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Ledger(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ServiceError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LedgerError> for ServiceError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
