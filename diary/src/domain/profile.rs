//! The angler's profile: a display name and an optional avatar.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::ports::{KeyValueStore, PROFILE_KEY};

/// Stored user profile, serialised as `{"name": …, "image": …}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileStoreError {
    #[error("profile name must not be blank")]
    EmptyName,
    #[error("failed to persist profile: {message}")]
    PersistenceWriteFailure { message: String },
}

/// Reads and writes the profile under [`PROFILE_KEY`].
pub struct ProfileStore<S: ?Sized> {
    storage: Arc<S>,
}

impl<S> ProfileStore<S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Stored profile, or `None` when absent or unreadable.
    pub async fn load(&self) -> Option<UserProfile> {
        let raw = match self.storage.get_item(PROFILE_KEY).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, key = PROFILE_KEY, "failed to read profile");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|err| warn!(error = %err, key = PROFILE_KEY, "stored profile is not valid JSON"))
            .ok()
    }

    /// Persist `profile`. Blank names are rejected.
    pub async fn save(&self, profile: &UserProfile) -> Result<(), ProfileStoreError> {
        if profile.name.trim().is_empty() {
            return Err(ProfileStoreError::EmptyName);
        }
        let payload = serde_json::to_string(profile).map_err(|err| {
            ProfileStoreError::PersistenceWriteFailure {
                message: err.to_string(),
            }
        })?;
        self.storage
            .set_item(PROFILE_KEY, &payload)
            .await
            .map_err(|err| ProfileStoreError::PersistenceWriteFailure {
                message: err.to_string(),
            })?;
        info!(name = %profile.name, "saved profile");
        Ok(())
    }

    /// Forget the stored profile.
    pub async fn delete(&self) -> Result<(), ProfileStoreError> {
        self.storage
            .remove_item(PROFILE_KEY)
            .await
            .map_err(|err| ProfileStoreError::PersistenceWriteFailure {
                message: err.to_string(),
            })?;
        info!("deleted profile");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{KeyValueStoreError, MockKeyValueStore};
    use mockall::predicate::eq;

    fn store(storage: MockKeyValueStore) -> ProfileStore<MockKeyValueStore> {
        ProfileStore::new(Arc::new(storage))
    }

    #[tokio::test]
    async fn load_decodes_stored_profile() {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_get_item()
            .with(eq(PROFILE_KEY))
            .returning(|_| Ok(Some(r#"{"name":"Ada","image":null}"#.to_owned())));

        let profile = store(storage).load().await;

        assert_eq!(
            profile,
            Some(UserProfile {
                name: "Ada".into(),
                image: None,
            })
        );
    }

    #[tokio::test]
    async fn load_treats_garbage_as_absent() {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_get_item()
            .returning(|_| Ok(Some("[1,2".to_owned())));
        assert_eq!(store(storage).load().await, None);
    }

    #[tokio::test]
    async fn load_treats_read_failure_as_absent() {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_get_item()
            .returning(|_| Err(KeyValueStoreError::read("io")));
        assert_eq!(store(storage).load().await, None);
    }

    #[tokio::test]
    async fn save_rejects_blank_name_without_writing() {
        let mut storage = MockKeyValueStore::new();
        storage.expect_set_item().never();

        let result = store(storage).save(&UserProfile::default()).await;

        assert_eq!(result, Err(ProfileStoreError::EmptyName));
    }

    #[tokio::test]
    async fn save_writes_json_under_profile_key() {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_set_item()
            .withf(|key, value| {
                key == PROFILE_KEY && value == r#"{"name":"Ada","image":"file:///me.jpg"}"#
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let profile = UserProfile {
            name: "Ada".into(),
            image: Some("file:///me.jpg".into()),
        };

        store(storage).save(&profile).await.expect("save succeeds");
    }

    #[tokio::test]
    async fn save_surfaces_write_failure() {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_set_item()
            .returning(|_, _| Err(KeyValueStoreError::write("disk full")));
        let profile = UserProfile {
            name: "Ada".into(),
            image: None,
        };

        let result = store(storage).save(&profile).await;

        assert!(matches!(
            result,
            Err(ProfileStoreError::PersistenceWriteFailure { .. })
        ));
    }

    #[tokio::test]
    async fn delete_removes_profile_key() {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_remove_item()
            .with(eq(PROFILE_KEY))
            .times(1)
            .returning(|_| Ok(()));

        store(storage).delete().await.expect("delete succeeds");
    }
}
