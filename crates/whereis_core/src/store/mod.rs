//! Key-value storage boundary for the catalog blob.
//!
//! # Responsibility
//! - Define the two-operation contract (`get`, `set`) the repository relies on.
//! - Host interchangeable backends selected by configuration.
//!
//! # Invariants
//! - `get` on a missing key returns `Ok(None)`, never an error.
//! - `set` either stores the whole value or fails; readers never observe a
//!   partially written value.
//!
//! This is the only layer that touches platform persistence.

use async_trait::async_trait;
use thiserror::Error;

mod file;
mod memory;
mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Backend failure while reading or writing a key.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] crate::db::DbError),
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    /// Backend refused the operation (lock poisoned, injected failure, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(crate::db::DbError::Sqlite(value))
    }
}

/// String-keyed persistent store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Short backend label used in log events.
    fn backend_name(&self) -> &'static str;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
