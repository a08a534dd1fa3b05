//! Runtime configuration for the core crate.
//!
//! # Responsibility
//! - Choose the storage backend and its location.
//! - Resolve catalog key and logging settings from the environment.
//!
//! # Invariants
//! - Blank environment values behave as unset.
//! - The repository never depends on which backend was selected.

use crate::logging::default_log_level;
use crate::repo::item_repo::{ItemRepository, DEFAULT_CATALOG_KEY};
use crate::store::{FileStore, KeyValueStore, MemoryStore, SqliteStore, StoreResult};
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_STORE: &str = "WHEREIS_STORE";
pub const ENV_STORE_PATH: &str = "WHEREIS_STORE_PATH";
pub const ENV_CATALOG_KEY: &str = "WHEREIS_CATALOG_KEY";
pub const ENV_LOG_LEVEL: &str = "WHEREIS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "WHEREIS_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "whereis.sqlite3";
const DEFAULT_FILE_STORE_DIR: &str = "whereis-store";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unsupported store backend `{0}`; expected sqlite|file|memory")]
    UnknownBackend(String),
    #[error("catalog key cannot be blank")]
    BlankCatalogKey,
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// SQLite database file.
    Sqlite(PathBuf),
    /// Directory of owner-only value files with atomic replace.
    File(PathBuf),
    /// Process-local map; nothing survives exit.
    Memory,
}

impl StorageBackend {
    /// Parses a backend name plus optional location.
    ///
    /// A missing location falls back to a default under the temp dir.
    pub fn parse(name: &str, path: Option<PathBuf>) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "sqlite" => Ok(Self::Sqlite(
                path.unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            )),
            "file" | "private" => Ok(Self::File(
                path.unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_FILE_STORE_DIR)),
            )),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }

    /// Opens the selected backend.
    pub fn open(&self) -> StoreResult<Box<dyn KeyValueStore>> {
        Ok(match self {
            Self::Sqlite(path) => Box::new(SqliteStore::open(path)?),
            Self::File(dir) => Box::new(FileStore::open(dir.clone())?),
            Self::Memory => Box::new(MemoryStore::new()),
        })
    }
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::Sqlite(std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }
}

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub storage: StorageBackend,
    pub catalog_key: String,
    pub log_level: String,
    /// Absolute log directory; `None` leaves logging to the host.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            catalog_key: DEFAULT_CATALOG_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from `WHEREIS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let storage = StorageBackend::parse(
            non_blank(ENV_STORE).as_deref().unwrap_or_default(),
            non_blank(ENV_STORE_PATH).map(PathBuf::from),
        )?;
        let defaults = Self::default();

        Ok(Self {
            storage,
            catalog_key: non_blank(ENV_CATALOG_KEY).unwrap_or(defaults.catalog_key),
            log_level: non_blank(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: non_blank(ENV_LOG_DIR).map(PathBuf::from),
        })
    }

    /// Opens the configured store and wraps it in a repository.
    pub fn open_repository(&self) -> StoreResult<ItemRepository<Box<dyn KeyValueStore>>> {
        let store = self.storage.open()?;
        Ok(ItemRepository::with_key(store, self.catalog_key.clone()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_key.trim().is_empty() {
            return Err(ConfigError::BlankCatalogKey);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, StorageBackend, ENV_CATALOG_KEY, ENV_STORE, ENV_STORE_PATH};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_uses_sqlite_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.storage.label(), "sqlite");
        assert_eq!(config.catalog_key, "items");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn blank_values_behave_as_unset() {
        let config =
            CoreConfig::from_lookup(lookup(&[(ENV_STORE, "  "), (ENV_CATALOG_KEY, " ")])).unwrap();
        assert_eq!(config.storage.label(), "sqlite");
        assert_eq!(config.catalog_key, "items");
    }

    #[test]
    fn file_backend_uses_given_directory() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_STORE, "FILE"),
            (ENV_STORE_PATH, "/var/lib/whereis"),
        ]))
        .unwrap();
        assert_eq!(
            config.storage,
            StorageBackend::File(PathBuf::from("/var/lib/whereis"))
        );
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_STORE, "cloud")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownBackend("cloud".to_string()));
    }

    #[tokio::test]
    async fn memory_backend_opens_a_working_repository() {
        let config = CoreConfig {
            storage: StorageBackend::Memory,
            ..CoreConfig::default()
        };
        config.validate().unwrap();
        let repo = config.open_repository().unwrap();
        assert!(repo.list().await.is_empty());
        assert_eq!(repo.store().backend_name(), "memory");
    }
}
