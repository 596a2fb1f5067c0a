//! Key-value storage adapters.
//!
//! - [`DiskKeyValueStore`]: durable, one file per key under a data directory.
//! - [`MemoryKeyValueStore`]: process-local, with write-failure injection.

mod file_store;
mod memory_store;

pub use file_store::DiskKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
