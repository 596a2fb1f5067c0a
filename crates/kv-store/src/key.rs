//! Validated storage keys.

use std::fmt;

use crate::error::StoreKeyError;

/// Key naming one stored value.
///
/// Keys double as file stems on disk, so they are restricted to ASCII
/// letters, digits, `_` and `-`.
///
/// # Example
///
/// ```
/// use kv_store::{StoreKey, StoreKeyError};
///
/// let key = StoreKey::new("userData").expect("valid key");
/// assert_eq!(key.as_str(), "userData");
/// assert_eq!(StoreKey::new(""), Err(StoreKeyError::Empty));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey(String);

impl StoreKey {
    /// Validate and construct a key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreKeyError`] when the key is empty or contains a
    /// character that is unsafe in a file name.
    pub fn new(value: impl Into<String>) -> Result<Self, StoreKeyError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(StoreKeyError::Empty);
        }
        if let Some(character) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-')))
        {
            return Err(StoreKeyError::InvalidCharacter { character });
        }
        Ok(Self(raw))
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub(crate) fn file_name(&self) -> String {
        format!("{}.kv", self.0)
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for StoreKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
