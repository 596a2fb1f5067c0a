//! Fixed-answer geolocation provider for headless hosts and tests.
//!
//! There is no positioning hardware on a server or in CI, so this adapter
//! replays a configured permission outcome and fix.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::Coordinate;
use crate::domain::ports::{
    GeolocationError, GeolocationProvider, PermissionOutcome, PositionFix, PositionOptions,
};

#[derive(Debug, Clone)]
enum FixBehaviour {
    Fix(PositionFix),
    Fail(GeolocationError),
}

/// Provider answering every request the same way.
#[derive(Debug)]
pub struct StaticGeolocationProvider {
    permission: PermissionOutcome,
    fix: FixBehaviour,
    settings_opened: AtomicUsize,
}

impl StaticGeolocationProvider {
    /// Grant permission and report `coordinate`.
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            permission: PermissionOutcome::Granted,
            fix: FixBehaviour::Fix(PositionFix {
                latitude: coordinate.latitude(),
                longitude: coordinate.longitude(),
            }),
            settings_opened: AtomicUsize::new(0),
        }
    }

    /// Refuse permission.
    pub fn denied() -> Self {
        Self {
            permission: PermissionOutcome::Denied,
            fix: FixBehaviour::Fail(GeolocationError::permission_denied()),
            settings_opened: AtomicUsize::new(0),
        }
    }

    /// Grant permission but fail every position request with `error`.
    pub fn failing(error: GeolocationError) -> Self {
        Self {
            permission: PermissionOutcome::Granted,
            fix: FixBehaviour::Fail(error),
            settings_opened: AtomicUsize::new(0),
        }
    }

    /// How many times the settings screen was requested.
    pub fn settings_opened(&self) -> usize {
        self.settings_opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeolocationProvider for StaticGeolocationProvider {
    async fn request_permission(&self) -> Result<PermissionOutcome, GeolocationError> {
        Ok(self.permission)
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<PositionFix, GeolocationError> {
        match &self.fix {
            FixBehaviour::Fix(fix) => Ok(*fix),
            FixBehaviour::Fail(error) => Err(error.clone()),
        }
    }

    async fn open_settings(&self) -> Result<(), GeolocationError> {
        self.settings_opened.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_configured_fix() {
        let pier = Coordinate::new(1.0, 2.0).expect("valid coordinate");
        let provider = StaticGeolocationProvider::at(pier);

        let fix = provider
            .current_position(&PositionOptions::default())
            .await
            .expect("fix");

        assert_eq!(fix.latitude, 1.0);
        assert_eq!(fix.longitude, 2.0);
    }

    #[tokio::test]
    async fn counts_settings_requests() {
        let provider = StaticGeolocationProvider::denied();
        provider.open_settings().await.expect("settings open");
        provider.open_settings().await.expect("settings open");
        assert_eq!(provider.settings_opened(), 2);
    }
}
