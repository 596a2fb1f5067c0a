//! Port for on-device key-value persistence.
//!
//! Mirrors the string-in, string-out storage API offered by mobile
//! platforms. Callers serialise their own values; the store never inspects
//! them.

use async_trait::async_trait;

use super::define_port_error;

/// Key holding the JSON-serialised spot collection.
pub const SPOTS_KEY: &str = "fishingSpots";
/// Key holding the JSON-serialised user profile.
pub const PROFILE_KEY: &str = "userData";

define_port_error! {
    /// Errors raised by key-value storage adapters.
    pub enum KeyValueStoreError {
        /// A stored value could not be read.
        Read { message: String } => "key-value read failed: {message}",
        /// A value could not be written.
        Write { message: String } => "key-value write failed: {message}",
    }
}

/// Port for string key-value storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` when absent.
    async fn get_item(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Replace the value stored under `key`.
    ///
    /// Implementations must either store `value` in full or leave the
    /// previous value untouched.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    async fn remove_item(&self, key: &str) -> Result<(), KeyValueStoreError>;
}
