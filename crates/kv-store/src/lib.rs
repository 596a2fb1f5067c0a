//! File-backed string key-value storage with atomic writes.
//!
//! This crate gives the fishing diary a small on-device store with the same
//! shape as a mobile key-value API: `get_item`, `set_item` and `remove_item`
//! over string values. Each key maps to one file inside a capability-scoped
//! directory, and every write goes through a temporary file that is synced
//! and renamed over the target, so a crash mid-write never leaves a torn
//! value behind.
//!
//! The crate is independent of the diary's domain types; the diary wraps it
//! in an outbound adapter implementing its `KeyValueStore` port.
//!
//! # Example
//!
//! ```
//! use camino::Utf8Path;
//! use kv_store::{FileKeyValueStore, StoreKey};
//!
//! let temp = tempfile::tempdir().expect("temp dir");
//! let root = Utf8Path::from_path(temp.path()).expect("utf-8 temp path");
//! let store = FileKeyValueStore::open(root).expect("open store");
//! let key = StoreKey::new("fishingSpots").expect("valid key");
//!
//! store.set_item(&key, "[]").expect("write");
//! assert_eq!(store.get_item(&key).expect("read").as_deref(), Some("[]"));
//! assert!(store.remove_item(&key).expect("remove"));
//! assert!(store.get_item(&key).expect("read").is_none());
//! ```

mod atomic_io;
mod error;
mod key;
mod store;

pub use error::{StoreError, StoreKeyError};
pub use key::StoreKey;
pub use store::FileKeyValueStore;
