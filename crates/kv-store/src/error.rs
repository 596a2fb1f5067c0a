//! Error types for the kv-store crate.
//!
//! Errors carry owned strings rather than `io::Error` so they stay `Clone`
//! and comparable in tests, following the project's `thiserror` conventions.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Validation errors raised when constructing a [`StoreKey`](crate::StoreKey).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreKeyError {
    /// The key is empty.
    #[error("store key must not be empty")]
    Empty,

    /// The key contains a character outside `[A-Za-z0-9_-]`.
    #[error("store key contains unsupported character {character:?}")]
    InvalidCharacter {
        /// The first offending character.
        character: char,
    },
}

/// Errors raised by [`FileKeyValueStore`](crate::FileKeyValueStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing directory could not be created or opened.
    #[error("failed to open store directory '{path}': {message}")]
    Open {
        /// Directory that failed to open.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// A stored value could not be read.
    #[error("failed to read key '{key}': {message}")]
    Read {
        /// Key being read.
        key: String,
        /// Description of the I/O error.
        message: String,
    },

    /// A value could not be written atomically.
    #[error("failed to write key '{key}': {message}")]
    Write {
        /// Key being written.
        key: String,
        /// Description of the I/O error.
        message: String,
    },

    /// A value could not be removed.
    #[error("failed to remove key '{key}': {message}")]
    Remove {
        /// Key being removed.
        key: String,
        /// Description of the I/O error.
        message: String,
    },
}
