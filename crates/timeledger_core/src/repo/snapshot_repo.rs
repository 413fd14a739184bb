//! Ledger document repository.
//!
//! # Responsibility
//! - Store one JSON ledger document per storage key.
//! - Validate documents on the way in and out.
//!
//! # Invariants
//! - `save` replaces the whole document for its key atomically.
//! - `load` never returns a document containing an invalid entry or preset.

use crate::db::DbError;
use crate::model::document::LedgerDocument;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "ledger document serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted ledger data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Persistence boundary for the ledger document.
pub trait SnapshotRepository {
    fn load(&self, key: &str) -> RepoResult<Option<LedgerDocument>>;
    fn save(&self, key: &str, document: &LedgerDocument) -> RepoResult<()>;
    /// Removes the document; missing keys are not an error.
    fn remove(&self, key: &str) -> RepoResult<()>;
}

/// SQLite-backed document repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `InvalidData` when the connection has not been migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let ready: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'ledger_documents'
            );",
            [],
            |row| row.get(0),
        )?;
        if !ready {
            return Err(RepoError::InvalidData(
                "ledger_documents table is missing; open the database with open_db".to_string(),
            ));
        }
        Ok(Self { conn })
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn load(&self, key: &str) -> RepoResult<Option<LedgerDocument>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM ledger_documents WHERE storage_key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        payload.map(|text| decode_document(&text)).transpose()
    }

    fn save(&self, key: &str, document: &LedgerDocument) -> RepoResult<()> {
        let payload = encode_document(document)?;
        self.conn.execute(
            "INSERT INTO ledger_documents (storage_key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(storage_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![key, payload],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM ledger_documents WHERE storage_key = ?1;",
            [key],
        )?;
        Ok(())
    }
}

/// Process-local repository keeping encoded documents in memory.
#[derive(Debug, Default)]
pub struct MemorySnapshotRepository {
    documents: Mutex<BTreeMap<String, String>>,
}

impl MemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON payload stored under `key`.
    pub fn payload(&self, key: &str) -> Option<String> {
        self.documents
            .lock()
            .ok()
            .and_then(|documents| documents.get(key).cloned())
    }

    fn with_documents<T>(
        &self,
        action: impl FnOnce(&mut BTreeMap<String, String>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| RepoError::InvalidData("memory snapshot store poisoned".to_string()))?;
        action(&mut documents)
    }
}

impl SnapshotRepository for MemorySnapshotRepository {
    fn load(&self, key: &str) -> RepoResult<Option<LedgerDocument>> {
        self.with_documents(|documents| {
            documents
                .get(key)
                .map(|text| decode_document(text))
                .transpose()
        })
    }

    fn save(&self, key: &str, document: &LedgerDocument) -> RepoResult<()> {
        let payload = encode_document(document)?;
        self.with_documents(|documents| {
            documents.insert(key.to_string(), payload);
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        self.with_documents(|documents| {
            documents.remove(key);
            Ok(())
        })
    }
}

fn encode_document(document: &LedgerDocument) -> RepoResult<String> {
    validate_document(document)?;
    Ok(serde_json::to_string(document)?)
}

fn decode_document(text: &str) -> RepoResult<LedgerDocument> {
    let document: LedgerDocument = serde_json::from_str(text)?;
    validate_document(&document)?;
    Ok(document)
}

fn validate_document(document: &LedgerDocument) -> RepoResult<()> {
    for entry in &document.entries {
        entry.validate().map_err(|err| {
            RepoError::InvalidData(format!("entry {} is invalid: {err}", entry.id))
        })?;
    }
    for preset in &document.presets {
        preset.validate().map_err(|err| {
            RepoError::InvalidData(format!("preset {} is invalid: {err}", preset.id))
        })?;
    }
    if let Some(task) = &document.active_task {
        if task.title.trim().is_empty() {
            return Err(RepoError::InvalidData(
                "active task has an empty title".to_string(),
            ));
        }
    }
    Ok(())
}
