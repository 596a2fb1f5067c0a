//! In-memory `KeyValueStore` for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

#[derive(Default)]
struct Shared {
    values: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

/// Process-local store. Clones share the same contents, which lets a test
/// "restart" a service by building a new one over a clone.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    shared: Arc<Shared>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.shared
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Raw value under `key`, bypassing the port.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    /// Store `value` directly, without counting it as a write.
    pub fn seed(&self, key: &str, value: impl Into<String>) {
        self.values().insert(key.to_owned(), value.into());
    }

    /// Number of successful `set_item` calls.
    pub fn write_count(&self) -> usize {
        self.shared.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent writes and removals fail until switched off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.shared.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), KeyValueStoreError> {
        if self.shared.fail_writes.load(Ordering::SeqCst) {
            return Err(KeyValueStoreError::write("storage is read-only"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        Ok(self.raw(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        self.check_writable()?;
        self.seed(key, value);
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.check_writable()?;
        self.values().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_contents() {
        let store = MemoryKeyValueStore::new();
        let clone = store.clone();
        store.set_item("k", "v").await.expect("write");
        assert_eq!(clone.get_item("k").await.expect("read").as_deref(), Some("v"));
        assert_eq!(clone.write_count(), 1);
    }

    #[tokio::test]
    async fn failing_writes_leave_value_untouched() {
        let store = MemoryKeyValueStore::new();
        store.seed("k", "old");
        store.set_fail_writes(true);

        let error = store.set_item("k", "new").await.expect_err("write fails");

        assert!(matches!(error, KeyValueStoreError::Write { .. }));
        assert_eq!(store.raw("k").as_deref(), Some("old"));
        assert_eq!(store.write_count(), 0);
    }
}
