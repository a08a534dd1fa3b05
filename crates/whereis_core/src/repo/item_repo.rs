//! Item repository over a key-value store.
//!
//! # Responsibility
//! - Provide create/list/get/update/remove/search over the whole catalog.
//! - Persist the full catalog blob under one fixed key on every mutation.
//!
//! # Invariants
//! - Item ids are pairwise distinct and never reassigned.
//! - Persisted names and descriptions are trimmed and non-blank.
//! - Validation and not-found failures leave storage untouched.
//! - A failed write leaves the previously stored catalog authoritative.
//! - Mutating calls hold `write_lock` for their full read-modify-write cycle.
//! - Read paths degrade to an empty catalog on store or decode failure.

use crate::codec::{self, CodecError};
use crate::model::item::{Item, ItemDraft, ItemId, ItemPatch, ItemValidationError};
use crate::search::filter::{filter_by_name, NameQuery};
use crate::store::{KeyValueStore, StoreError};
use log::{debug, error, info, warn};
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Mutex;

/// Well-known store key holding the encoded catalog.
pub const DEFAULT_CATALOG_KEY: &str = "items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Required text field is blank; nothing was written.
    #[error(transparent)]
    Validation(#[from] ItemValidationError),
    /// No item with this id exists; callers should refresh their view.
    #[error("item not found: {0}")]
    NotFound(ItemId),
    /// Underlying persistence failed; the operation did not take effect.
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
    /// Catalog could not be encoded; nothing was written.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl RepoError {
    /// Stable short label for envelopes and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
            Self::Codec(_) => "codec",
        }
    }

    /// Returns whether the caller should present this as a hard failure.
    pub fn is_hard_failure(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Codec(_))
    }
}

/// Catalog repository backed by any `KeyValueStore`.
pub struct ItemRepository<S> {
    store: S,
    key: String,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> ItemRepository<S> {
    /// Creates a repository using `DEFAULT_CATALOG_KEY`.
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_CATALOG_KEY)
    }

    /// Creates a repository storing its catalog under `key`.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog_key(&self) -> &str {
        self.key.as_str()
    }

    /// Validates `draft`, assigns a fresh id and appends the item.
    ///
    /// # Errors
    /// - `RepoError::Validation` when name or description is blank.
    /// - `RepoError::Storage` when the catalog cannot be read or written.
    pub async fn create(&self, draft: ItemDraft) -> RepoResult<Item> {
        let started_at = Instant::now();
        let mut item = match Item::from_draft(ItemId::generate(), draft) {
            Ok(item) => item,
            Err(err) => {
                debug!("event=item_create module=repo status=rejected reason={err}");
                return Err(err.into());
            }
        };

        let _guard = self.write_lock.lock().await;
        let mut items = self.load_for_write("item_create").await?;
        while items.iter().any(|existing| existing.id == item.id) {
            item.id = ItemId::generate();
        }
        items.push(item.clone());
        self.persist("item_create", &items).await?;

        info!(
            "event=item_create module=repo status=ok item_id={} has_photo={} has_location={} catalog_len={} duration_ms={}",
            item.id,
            item.has_photo(),
            item.has_location(),
            items.len(),
            started_at.elapsed().as_millis()
        );
        Ok(item)
    }

    /// Reads the full catalog in persisted order.
    ///
    /// Never fails: an unreadable or corrupt catalog reads as empty.
    pub async fn list(&self) -> Vec<Item> {
        self.load_for_read("item_list").await
    }

    /// Re-reads the catalog for a view that just became active.
    pub async fn reload(&self) -> Vec<Item> {
        self.load_for_read("catalog_reload").await
    }

    /// Returns one item by id.
    pub async fn get(&self, id: &ItemId) -> RepoResult<Item> {
        self.load_for_read("item_get")
            .await
            .into_iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| RepoError::NotFound(id.clone()))
    }

    /// Applies `patch` to the item with `id`, keeping its id and position.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no item has `id`.
    /// - `RepoError::Validation` when a supplied name or description is blank.
    /// - `RepoError::Storage` when the catalog cannot be read or written.
    pub async fn update(&self, id: &ItemId, patch: ItemPatch) -> RepoResult<Item> {
        let started_at = Instant::now();
        let _guard = self.write_lock.lock().await;
        let mut items = self.load_for_write("item_update").await?;

        let Some(slot) = items.iter_mut().find(|item| &item.id == id) else {
            debug!("event=item_update module=repo status=not_found item_id={id}");
            return Err(RepoError::NotFound(id.clone()));
        };
        let updated = match slot.patched(patch) {
            Ok(updated) => updated,
            Err(err) => {
                debug!("event=item_update module=repo status=rejected item_id={id} reason={err}");
                return Err(err.into());
            }
        };
        *slot = updated.clone();
        self.persist("item_update", &items).await?;

        info!(
            "event=item_update module=repo status=ok item_id={} duration_ms={}",
            id,
            started_at.elapsed().as_millis()
        );
        Ok(updated)
    }

    /// Removes the item with `id`.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no item has `id`.
    /// - `RepoError::Storage` when the catalog cannot be read or written.
    pub async fn remove(&self, id: &ItemId) -> RepoResult<()> {
        let started_at = Instant::now();
        let _guard = self.write_lock.lock().await;
        let mut items = self.load_for_write("item_remove").await?;

        let Some(index) = items.iter().position(|item| &item.id == id) else {
            debug!("event=item_remove module=repo status=not_found item_id={id}");
            return Err(RepoError::NotFound(id.clone()));
        };
        items.remove(index);
        self.persist("item_remove", &items).await?;

        info!(
            "event=item_remove module=repo status=ok item_id={} catalog_len={} duration_ms={}",
            id,
            items.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Returns items whose name contains `query` (trimmed, case-insensitive),
    /// in catalog order. A blank query returns the whole catalog.
    pub async fn search(&self, query: &str) -> Vec<Item> {
        let query = NameQuery::new(query);
        let items = self.load_for_read("item_search").await;
        let hits = filter_by_name(&items, &query);
        debug!(
            "event=item_search module=repo status=ok query_len={} hits={} catalog_len={}",
            query.needle().chars().count(),
            hits.len(),
            items.len()
        );
        hits
    }

    async fn load_for_read(&self, event: &str) -> Vec<Item> {
        match self.store.get(&self.key).await {
            Ok(Some(blob)) => codec::decode(&blob),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(
                    "event={event} module=repo status=degraded backend={} error={err}",
                    self.store.backend_name()
                );
                Vec::new()
            }
        }
    }

    // Store errors propagate here: writing back an empty catalog after a
    // transient read failure would erase every item.
    async fn load_for_write(&self, event: &str) -> RepoResult<Vec<Item>> {
        match self.store.get(&self.key).await {
            Ok(Some(blob)) => Ok(codec::decode(&blob)),
            Ok(None) => Ok(Vec::new()),
            Err(err) => {
                error!(
                    "event={event} module=repo status=error stage=read backend={} error={err}",
                    self.store.backend_name()
                );
                Err(err.into())
            }
        }
    }

    async fn persist(&self, event: &str, items: &[Item]) -> RepoResult<()> {
        let blob = codec::encode(items).map_err(|err| {
            error!("event={event} module=repo status=error stage=encode error={err}");
            err
        })?;
        self.store.set(&self.key, &blob).await.map_err(|err| {
            error!(
                "event={event} module=repo status=error stage=write backend={} error={err}",
                self.store.backend_name()
            );
            RepoError::Storage(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemRepository, RepoError, DEFAULT_CATALOG_KEY};
    use crate::model::item::{ItemDraft, ItemId, ItemPatch, Location, PatchField};
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn create_trims_and_persists_under_catalog_key() {
        let store = MemoryStore::new();
        let repo = ItemRepository::new(store.clone());

        let item = repo.create(ItemDraft::new(" Lamp ", " Attic ")).await.unwrap();
        assert_eq!(item.name, "Lamp");
        assert_eq!(item.description, "Attic");

        let raw = store.raw(DEFAULT_CATALOG_KEY).expect("catalog should be stored");
        assert!(raw.contains(item.id.as_str()));
    }

    #[tokio::test]
    async fn custom_key_is_used() {
        let store = MemoryStore::new();
        let repo = ItemRepository::with_key(store.clone(), "things");
        repo.create(ItemDraft::new("a", "b")).await.unwrap();
        assert_eq!(repo.catalog_key(), "things");
        assert!(store.raw("things").is_some());
        assert!(store.raw(DEFAULT_CATALOG_KEY).is_none());
    }

    #[tokio::test]
    async fn non_finite_location_is_rejected_without_write() {
        let store = MemoryStore::new();
        let repo = ItemRepository::new(store.clone());
        let draft = ItemDraft::new("a", "b").with_location(Location::new(f64::INFINITY, 0.0));

        let err = repo.create(draft).await.unwrap_err();
        assert!(matches!(err, RepoError::Codec(_)));
        assert!(err.is_hard_failure());
        assert!(store.raw(DEFAULT_CATALOG_KEY).is_none());
    }

    #[tokio::test]
    async fn read_failure_blocks_mutation_but_not_listing() {
        let store = MemoryStore::new();
        let repo = ItemRepository::new(store.clone());
        let item = repo.create(ItemDraft::new("a", "b")).await.unwrap();

        store.fail_reads(true);
        assert!(repo.list().await.is_empty());
        let err = repo
            .update(
                &item.id,
                ItemPatch {
                    photo_uri: PatchField::Set("file:///x.jpg".to_string()),
                    ..ItemPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "storage");

        store.fail_reads(false);
        assert_eq!(repo.list().await.len(), 1);
    }

    #[tokio::test]
    async fn get_reports_not_found() {
        let repo = ItemRepository::new(MemoryStore::new());
        let err = repo.get(&ItemId::from("missing")).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(ref id) if id.as_str() == "missing"));
        assert!(!err.is_hard_failure());
    }
}
