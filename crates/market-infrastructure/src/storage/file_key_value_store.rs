//! Durable key-value store backed by a single JSON file.
//!
//! Mirrors the browser `localStorage` the web client used: a flat map of
//! string keys to string values that survives restarts.

use super::atomic_file::{AtomicFile, FileFormat};
use crate::paths::MarketPaths;
use async_trait::async_trait;
use market_core::storage::KeyValueStore;
use market_core::{MarketError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type StoreMap = BTreeMap<String, String>;

/// `KeyValueStore` persisted to `local_storage.json`.
///
/// Every write goes through a locked read-modify-write so two processes
/// sharing the file never lose each other's keys.
#[derive(Clone)]
pub struct FileKeyValueStore {
    file: Arc<AtomicFile<StoreMap>>,
}

impl FileKeyValueStore {
    /// Opens the store at the default location resolved by [`MarketPaths`].
    pub fn open(paths: &MarketPaths) -> Result<Self> {
        let path = paths
            .local_storage_file()
            .map_err(|e| MarketError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Opens the store at an explicit file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicFile::new(path, FileFormat::Json)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    async fn run_blocking<F, R>(&self, op: F) -> Result<R>
    where
        F: FnOnce(&AtomicFile<StoreMap>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || op(&file))
            .await
            .map_err(|e| MarketError::internal(format!("Storage task failed: {}", e)))?
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.run_blocking(move |file| {
            let map = file.load()?.unwrap_or_default();
            Ok(map.get(&key).cloned())
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.run_blocking(move |file| {
            tracing::debug!("[FileKeyValueStore] set '{}' in {}", key, file.path().display());
            file.update(StoreMap::new(), |map| {
                map.insert(key, value);
            })?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.run_blocking(move |file| {
            if !file.path().exists() {
                return Ok(());
            }
            tracing::debug!("[FileKeyValueStore] remove '{}' from {}", key, file.path().display());
            file.update(StoreMap::new(), |map| {
                map.remove(&key);
            })?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_storage.json");

        let store = FileKeyValueStore::with_path(path.clone());
        store.set("currentUser", "{\"username\":\"alice\"}").await.unwrap();
        store.set("theme", "dark").await.unwrap();

        let reopened = FileKeyValueStore::with_path(path);
        assert_eq!(
            reopened.get("currentUser").await.unwrap().as_deref(),
            Some("{\"username\":\"alice\"}")
        );
        assert_eq!(reopened.get("theme").await.unwrap().as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn test_remove_only_drops_one_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_path(temp_dir.path().join("local_storage.json"));

        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.remove("a").await.unwrap();

        assert!(store.get("a").await.unwrap().is_none());
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty_and_remove_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("local_storage.json");
        let store = FileKeyValueStore::with_path(path.clone());

        assert!(store.get("currentUser").await.unwrap().is_none());
        store.remove("currentUser").await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_open_uses_paths_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MarketPaths::new(Some(temp_dir.path().to_path_buf()));
        let store = FileKeyValueStore::open(&paths).unwrap();

        assert_eq!(store.path(), temp_dir.path().join("local_storage.json"));
    }
}
