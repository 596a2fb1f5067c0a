//! In-memory spot collection kept in lockstep with on-device storage.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{SpotDraft, SpotId, SpotImage, SpotRecord};
use crate::domain::Coordinate;
use crate::domain::ports::{KeyValueStore, KeyValueStoreError, SPOTS_KEY};

/// Errors surfaced by [`SpotStore`] mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpotStoreError {
    #[error("spot title must not be blank")]
    EmptyTitle,
    #[error("spot {id} not found")]
    NotFound { id: SpotId },
    #[error("failed to persist spots: {message}")]
    PersistenceWriteFailure { message: String },
}

impl From<KeyValueStoreError> for SpotStoreError {
    fn from(error: KeyValueStoreError) -> Self {
        Self::PersistenceWriteFailure {
            message: error.to_string(),
        }
    }
}

/// Ordered spot collection persisted as JSON under [`SPOTS_KEY`].
///
/// Every mutation builds the next collection, writes it in full, and only
/// then replaces the in-memory copy. A failed write leaves memory untouched,
/// so after any call the two copies re-serialise identically.
pub struct SpotStore<S: ?Sized> {
    storage: Arc<S>,
    spots: Vec<SpotRecord>,
}

impl<S: ?Sized> SpotStore<S> {
    /// Create an empty store. Call [`SpotStore::load`] to read persisted spots.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            spots: Vec::new(),
        }
    }

    /// Spots in insertion order.
    pub fn spots(&self) -> &[SpotRecord] {
        &self.spots
    }

    pub fn get(&self, id: &SpotId) -> Option<&SpotRecord> {
        self.spots.iter().find(|spot| &spot.id == id)
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    fn position(&self, id: &SpotId) -> Option<usize> {
        self.spots.iter().position(|spot| &spot.id == id)
    }

    fn require_title(title: &str) -> Result<(), SpotStoreError> {
        if title.trim().is_empty() {
            return Err(SpotStoreError::EmptyTitle);
        }
        Ok(())
    }

    fn decode(raw: &str) -> Result<Vec<SpotRecord>, serde_json::Error> {
        serde_json::from_str(raw).map(Self::drop_duplicate_ids)
    }

    /// Keep the first record for each id. Legacy numeric and string ids can
    /// normalise to the same value.
    fn drop_duplicate_ids(spots: Vec<SpotRecord>) -> Vec<SpotRecord> {
        let mut seen = HashSet::with_capacity(spots.len());
        spots
            .into_iter()
            .filter(|spot| {
                let fresh = seen.insert(spot.id.clone());
                if !fresh {
                    warn!(id = %spot.id, title = %spot.title, "dropping stored spot with duplicate id");
                }
                fresh
            })
            .collect()
    }
}

impl<S> SpotStore<S>
where
    S: KeyValueStore + ?Sized,
{
    /// Replace the in-memory view with the persisted collection.
    ///
    /// A missing key yields an empty collection. Read and decode failures
    /// are logged and also yield an empty collection. Records repeating an
    /// earlier id are dropped.
    pub async fn load(&mut self) -> &[SpotRecord] {
        self.spots = match self.storage.get_item(SPOTS_KEY).await {
            Ok(Some(raw)) => Self::decode(&raw).unwrap_or_else(|err| {
                warn!(error = %err, key = SPOTS_KEY, "stored spots are not valid JSON; starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, key = SPOTS_KEY, "failed to read stored spots; starting empty");
                Vec::new()
            }
        };
        debug!(count = self.spots.len(), "loaded spots");
        &self.spots
    }

    /// Re-read storage, discarding the in-memory view.
    pub async fn reload(&mut self) -> &[SpotRecord] {
        debug!("reloading spots");
        self.load().await
    }

    async fn commit(&mut self, next: Vec<SpotRecord>) -> Result<(), SpotStoreError> {
        let payload = serde_json::to_string(&next).map_err(|err| {
            SpotStoreError::PersistenceWriteFailure {
                message: format!("failed to encode spots: {err}"),
            }
        })?;
        if let Err(err) = self.storage.set_item(SPOTS_KEY, &payload).await {
            warn!(error = %err, key = SPOTS_KEY, "failed to persist spots; keeping previous collection");
            return Err(err.into());
        }
        self.spots = next;
        Ok(())
    }

    async fn insert(&mut self, record: SpotRecord) -> Result<SpotRecord, SpotStoreError> {
        Self::require_title(&record.title)?;
        let mut next = self.spots.clone();
        next.push(record.clone());
        self.commit(next).await?;
        info!(id = %record.id, title = %record.title, "created spot");
        Ok(record)
    }

    /// Append a new spot under a fresh id.
    pub async fn create(
        &mut self,
        coordinate: Coordinate,
        title: impl Into<String>,
        description: impl Into<String>,
        images: Vec<SpotImage>,
    ) -> Result<SpotRecord, SpotStoreError> {
        self.insert(SpotRecord {
            id: SpotId::random(),
            coordinate,
            title: title.into(),
            description: description.into(),
            images,
        })
        .await
    }

    /// Replace the title, description and images of an existing spot,
    /// keeping its id, coordinate and position.
    pub async fn update(
        &mut self,
        id: &SpotId,
        title: impl Into<String>,
        description: impl Into<String>,
        images: Vec<SpotImage>,
    ) -> Result<SpotRecord, SpotStoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| SpotStoreError::NotFound { id: id.clone() })?;
        let title = title.into();
        Self::require_title(&title)?;

        let mut next = self.spots.clone();
        let record = &mut next[index];
        record.title = title;
        record.description = description.into();
        record.images = images;
        let updated = record.clone();

        self.commit(next).await?;
        info!(id = %updated.id, "updated spot");
        Ok(updated)
    }

    /// Remove a spot. Returns `Ok(false)` without touching storage when the
    /// id is unknown.
    pub async fn delete(&mut self, id: &SpotId) -> Result<bool, SpotStoreError> {
        let Some(index) = self.position(id) else {
            debug!(id = %id, "delete requested for unknown spot");
            return Ok(false);
        };
        let mut next = self.spots.clone();
        next.remove(index);
        self.commit(next).await?;
        info!(id = %id, "deleted spot");
        Ok(true)
    }

    /// Persist a draft: update when its id is already stored, otherwise
    /// append it as a new spot under the draft's id.
    pub async fn save_draft(&mut self, draft: SpotDraft) -> Result<SpotRecord, SpotStoreError> {
        if self.position(&draft.id).is_some() {
            return self
                .update(&draft.id, draft.title, draft.description, draft.images)
                .await;
        }
        self.insert(SpotRecord {
            id: draft.id,
            coordinate: draft.coordinate,
            title: draft.title,
            description: draft.description,
            images: draft.images,
        })
        .await
    }
}
