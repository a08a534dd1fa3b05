//! Private file-backed key-value store.
//!
//! # Invariants
//! - Each key maps to one `<key>.json` file inside the store directory.
//! - Writes go to a temp file in the same directory, are synced, then renamed
//!   over the target, so readers see the old or the new value, never a mix.
//!   On unix the directory is synced after the rename.
//! - On unix, value files are readable and writable by the owner only.

use super::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const VALUE_FILE_EXTENSION: &str = "json";

/// Directory of per-key value files.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory when missing.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            || key.starts_with('.')
        {
            return Err(StoreError::Unavailable(format!(
                "key `{key}` is not a valid file store key"
            )));
        }
        Ok(self.dir.join(format!("{key}.{VALUE_FILE_EXTENSION}")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.value_path(key)?;
        tokio::task::spawn_blocking(move || match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        })
        .await?
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.value_path(key)?;
        let dir = self.dir.clone();
        let value = value.to_string();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &path, &value)).await?
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

fn write_atomically(dir: &Path, target: &Path, value: &str) -> StoreResult<()> {
    let mut temp = NamedTempFile::new_in(dir)?;
    restrict_permissions(temp.as_file())?;
    temp.write_all(value.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(target).map_err(|err| StoreError::Io(err.error))?;
    sync_dir(dir)?;
    Ok(())
}

// The rename itself lives in the directory entry; flush it too.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}
