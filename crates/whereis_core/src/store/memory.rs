//! In-process key-value store.
//!
//! Used by tests and ephemeral sessions. Failure switches let callers
//! exercise the repository's storage-error paths without a real backend.

use super::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Inner {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

/// Map-backed store; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.inner.entries.write() {
            entries.insert(key.into(), value.into());
        }
        store
    }

    /// Makes subsequent `get` calls fail until switched off.
    pub fn fail_reads(&self, enabled: bool) {
        self.inner.fail_reads.store(enabled, Ordering::SeqCst);
    }

    /// Makes subsequent `set` calls fail until switched off.
    pub fn fail_writes(&self, enabled: bool) {
        self.inner.fail_writes.store(enabled, Ordering::SeqCst);
    }

    /// Returns the raw stored value, bypassing failure switches.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner
            .entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store read disabled".into()));
        }
        let entries = self
            .inner
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store write disabled".into()));
        }
        let mut entries = self
            .inner
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::store::{KeyValueStore, StoreError};

    #[tokio::test]
    async fn clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v").await.unwrap();
        assert_eq!(other.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn failure_switches_apply_until_reset() {
        let store = MemoryStore::with_entry("k", "v");
        store.fail_writes(true);
        let err = store.set("k", "w").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.raw("k").as_deref(), Some("v"));

        store.fail_writes(false);
        store.fail_reads(true);
        assert!(store.get("k").await.is_err());
        store.fail_reads(false);
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
