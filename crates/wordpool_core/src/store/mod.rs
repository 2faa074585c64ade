//! Key-value persistence port and its adapters.
//!
//! # Responsibility
//! - Define the asynchronous `get`/`set` contract the repositories persist
//!   through.
//! - Ship an in-process adapter and a SQLite-backed adapter.
//!
//! # Invariants
//! - Values are opaque strings; encoding is the repositories' concern.
//! - `set` replaces the whole value stored under a key.

use crate::db::DbError;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteKvStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a key-value backend.
#[derive(Debug)]
pub enum StoreError {
    /// Backend-specific failure with a diagnostic message.
    Backend(String),
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "store backend failure: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Backend(_) => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Asynchronous string blob storage addressed by fixed keys.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}
