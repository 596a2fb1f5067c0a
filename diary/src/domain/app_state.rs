//! Session state passed explicitly to every screen.

use std::sync::Arc;

use super::location::LocationController;
use super::profile::ProfileStore;
use super::spots::{SpotImage, SpotRecord, SpotStore, SpotStoreError};

/// Owns the session's location controller, spot collection and profile
/// store. The platform shell creates one per launch.
pub struct AppState<G: ?Sized, S: ?Sized> {
    pub location: LocationController<G>,
    pub spots: SpotStore<S>,
    pub profile: ProfileStore<S>,
}

impl<G, S> AppState<G, S>
where
    G: ?Sized,
    S: super::ports::KeyValueStore + ?Sized,
{
    /// Wire the session around a geolocation provider and device storage.
    pub fn new(location: LocationController<G>, storage: Arc<S>) -> Self {
        Self {
            location,
            spots: SpotStore::new(Arc::clone(&storage)),
            profile: ProfileStore::new(storage),
        }
    }

    /// Load persisted spots. Read failures leave the collection empty.
    pub async fn start(&mut self) {
        self.spots.load().await;
    }

    /// Create a spot at the controller's current coordinate.
    pub async fn drop_pin_here(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        images: Vec<SpotImage>,
    ) -> Result<SpotRecord, SpotStoreError> {
        let here = self.location.current();
        self.spots.create(here, title, description, images).await
    }
}
