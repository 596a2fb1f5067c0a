//! `KeyValueStore` adapter over the file-backed `kv-store` crate.

use std::sync::Arc;

use async_trait::async_trait;
use camino::Utf8Path;
use kv_store::{FileKeyValueStore, StoreError, StoreKey};
use tokio::task;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

/// Device storage rooted at a data directory, one file per key.
///
/// Blocking file I/O runs on the runtime's blocking pool.
#[derive(Clone)]
pub struct DiskKeyValueStore {
    inner: Arc<FileKeyValueStore>,
}

impl DiskKeyValueStore {
    /// Open (creating if needed) the store at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] when the directory is unusable.
    pub fn open(root: &Utf8Path) -> Result<Self, StoreError> {
        Ok(Self {
            inner: Arc::new(FileKeyValueStore::open(root)?),
        })
    }

    pub fn root(&self) -> &Utf8Path {
        self.inner.root()
    }
}

fn parse_key(key: &str) -> Result<StoreKey, String> {
    StoreKey::new(key).map_err(|err| format!("invalid key {key:?}: {err}"))
}

#[async_trait]
impl KeyValueStore for DiskKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let key = parse_key(key).map_err(KeyValueStoreError::read)?;
        let inner = Arc::clone(&self.inner);
        task::spawn_blocking(move || inner.get_item(&key))
            .await
            .map_err(|err| KeyValueStoreError::read(err.to_string()))?
            .map_err(|err| KeyValueStoreError::read(err.to_string()))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let key = parse_key(key).map_err(KeyValueStoreError::write)?;
        let inner = Arc::clone(&self.inner);
        let value = value.to_owned();
        task::spawn_blocking(move || inner.set_item(&key, &value))
            .await
            .map_err(|err| KeyValueStoreError::write(err.to_string()))?
            .map_err(|err| KeyValueStoreError::write(err.to_string()))
    }

    async fn remove_item(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let key = parse_key(key).map_err(KeyValueStoreError::write)?;
        let inner = Arc::clone(&self.inner);
        task::spawn_blocking(move || inner.remove_item(&key))
            .await
            .map_err(|err| KeyValueStoreError::write(err.to_string()))?
            .map(|_| ())
            .map_err(|err| KeyValueStoreError::write(err.to_string()))
    }
}
