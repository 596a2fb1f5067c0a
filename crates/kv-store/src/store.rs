//! Directory-backed key-value store.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::atomic_io::write_atomic;
use crate::error::StoreError;
use crate::key::StoreKey;

/// String key-value store persisting one file per key.
///
/// All file access goes through a capability [`Dir`], so a key can never
/// address a path outside the store's root.
#[derive(Debug)]
pub struct FileKeyValueStore {
    dir: Dir,
    root: Utf8PathBuf,
}

impl FileKeyValueStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] when the directory cannot be created or
    /// opened.
    pub fn open(root: &Utf8Path) -> Result<Self, StoreError> {
        let open_error = |err: io::Error| StoreError::Open {
            path: root.to_path_buf(),
            message: err.to_string(),
        };
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(open_error)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(open_error)?;
        Ok(Self {
            dir,
            root: root.to_path_buf(),
        })
    }

    /// Directory the store was opened at.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] for any failure other than a missing file.
    pub fn get_item(&self, key: &StoreKey) -> Result<Option<String>, StoreError> {
        match self.dir.read_to_string(key.file_name()) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Read {
                key: key.to_string(),
                message: err.to_string(),
            }),
        }
    }

    /// Atomically replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] when the temporary file cannot be
    /// written, synced, or renamed into place. The previous value is left
    /// intact in that case.
    pub fn set_item(&self, key: &StoreKey, value: &str) -> Result<(), StoreError> {
        write_atomic(&self.dir, &key.file_name(), value).map_err(|err| StoreError::Write {
            key: key.to_string(),
            message: err.to_string(),
        })
    }

    /// Remove the value stored under `key`.
    ///
    /// Returns whether a value existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Remove`] for any failure other than a missing
    /// file.
    pub fn remove_item(&self, key: &StoreKey) -> Result<bool, StoreError> {
        match self.dir.remove_file(key.file_name()) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StoreError::Remove {
                key: key.to_string(),
                message: err.to_string(),
            }),
        }
    }
}
