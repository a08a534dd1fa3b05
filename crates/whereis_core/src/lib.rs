//! Core catalog logic for WhereIs.
//! This crate is the single source of truth for item invariants.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod store;

pub use codec::CodecError;
pub use config::{ConfigError, CoreConfig, StorageBackend};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{
    Item, ItemDraft, ItemId, ItemPatch, ItemValidationError, Location, PatchField,
};
pub use repo::item_repo::{ItemRepository, RepoError, RepoResult, DEFAULT_CATALOG_KEY};
pub use search::filter::{filter_by_name, NameQuery};
pub use search::view::CatalogView;
pub use store::{FileStore, KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
