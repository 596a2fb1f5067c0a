//! State machine driving permission prompts and position requests.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{LocationDecision, LocationError, LocationState, LocationStatus, RetryOutcome};
use crate::domain::ports::{
    GeolocationError, GeolocationProvider, PermissionOutcome, PositionFix, PositionOptions,
};
use crate::domain::{Coordinate, SAN_FRANCISCO};

/// Owns the session [`LocationState`] and talks to the platform through a
/// [`GeolocationProvider`].
///
/// The last call wins: a later `acquire` or `use_default` overwrites whatever
/// an earlier one stored.
pub struct LocationController<G: ?Sized> {
    provider: Arc<G>,
    options: PositionOptions,
    default_location: Coordinate,
    state: LocationState,
    permission_checked: bool,
}

impl<G: ?Sized> LocationController<G> {
    /// Create a controller with the San Francisco fallback and default
    /// position options.
    pub fn new(provider: Arc<G>) -> Self {
        Self {
            provider,
            options: PositionOptions::default(),
            default_location: SAN_FRANCISCO,
            state: LocationState::initial(SAN_FRANCISCO),
            permission_checked: false,
        }
    }

    /// Replace the fallback coordinate. Also resets the initial state when
    /// nothing has been resolved yet.
    pub fn with_default_location(mut self, default_location: Coordinate) -> Self {
        self.default_location = default_location;
        if self.state.status == LocationStatus::Uninitialized {
            self.state = LocationState::initial(default_location);
        }
        self
    }

    /// Replace the options used by [`Self::locate`] and [`Self::retry`].
    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> &LocationState {
        &self.state
    }

    /// Coordinate consumers should use right now.
    pub fn current(&self) -> Coordinate {
        self.state.current
    }

    pub fn default_location(&self) -> Coordinate {
        self.default_location
    }

    pub fn options(&self) -> PositionOptions {
        self.options
    }

    /// Whether a permission prompt has completed at least once.
    pub fn permission_checked(&self) -> bool {
        self.permission_checked
    }

    /// Decisions to present after a failure; empty otherwise.
    pub fn decisions(&self) -> &'static [LocationDecision] {
        match self.state.status {
            LocationStatus::Error => &[LocationDecision::UseDefault, LocationDecision::Retry],
            _ => &[],
        }
    }

    /// Switch to the fixed default coordinate. Idempotent.
    pub fn use_default(&mut self) -> Coordinate {
        self.state = LocationState {
            current: self.default_location,
            is_fallback: true,
            status: LocationStatus::Resolved,
            last_error: None,
        };
        info!(location = %self.default_location, "using default location");
        self.default_location
    }

    fn fail(&mut self, error: LocationError) -> LocationError {
        warn!(error = %error, "location resolution failed");
        self.state.status = LocationStatus::Error;
        self.state.last_error = Some(error.clone());
        error
    }

    fn map_provider_error(error: GeolocationError) -> LocationError {
        match error {
            GeolocationError::PermissionDenied => LocationError::PermissionDenied,
            GeolocationError::Timeout => LocationError::Timeout,
            GeolocationError::Unavailable { message } | GeolocationError::Settings { message } => {
                LocationError::Unavailable { message }
            }
        }
    }

    fn validate_fix(fix: PositionFix) -> Result<Coordinate, LocationError> {
        Coordinate::new(fix.latitude, fix.longitude).map_err(|err| LocationError::Unavailable {
            message: format!("platform reported an invalid fix: {err}"),
        })
    }
}

impl<G> LocationController<G>
where
    G: GeolocationProvider + ?Sized,
{
    /// Ask the platform for permission.
    ///
    /// Marks permission as checked whatever the outcome. A provider failure
    /// counts as a denial. Denial moves the state to
    /// [`LocationStatus::Error`] with [`LocationError::PermissionDenied`].
    pub async fn request_permission(&mut self) -> PermissionOutcome {
        let outcome = match self.provider.request_permission().await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "permission request failed; treating as denied");
                PermissionOutcome::Denied
            }
        };
        self.permission_checked = true;
        debug!(?outcome, "permission request completed");
        if outcome == PermissionOutcome::Denied {
            self.fail(LocationError::PermissionDenied);
        }
        outcome
    }

    /// Request one fresh fix.
    ///
    /// The timeout in `options` is forwarded to the platform and also
    /// enforced here. On failure `current` and `is_fallback` keep their
    /// previous values.
    pub async fn acquire(&mut self, options: PositionOptions) -> Result<Coordinate, LocationError> {
        self.state.status = LocationStatus::Resolving;
        self.state.last_error = None;

        let attempt =
            tokio::time::timeout(options.timeout, self.provider.current_position(&options)).await;
        let fix = match attempt {
            Ok(Ok(fix)) => fix,
            Ok(Err(err)) => return Err(self.fail(Self::map_provider_error(err))),
            Err(_) => return Err(self.fail(LocationError::Timeout)),
        };

        let coordinate = Self::validate_fix(fix).map_err(|err| self.fail(err))?;
        self.state = LocationState {
            current: coordinate,
            is_fallback: false,
            status: LocationStatus::Resolved,
            last_error: None,
        };
        info!(location = %coordinate, "location resolved");
        Ok(coordinate)
    }

    /// Prompt for permission and, when granted, acquire with the configured
    /// options.
    pub async fn locate(&mut self) -> Result<Coordinate, LocationError> {
        match self.request_permission().await {
            PermissionOutcome::Granted => self.acquire(self.options).await,
            PermissionOutcome::Denied => Err(LocationError::PermissionDenied),
        }
    }

    /// User-initiated retry.
    ///
    /// Once a permission prompt has completed, platforms will not show it
    /// again, so the settings screen is opened instead and the state is left
    /// alone. Otherwise the full [`Self::locate`] sequence runs.
    pub async fn retry(&mut self) -> RetryOutcome {
        if !self.permission_checked {
            return RetryOutcome::Attempted(self.locate().await);
        }
        match self.provider.open_settings().await {
            Ok(()) => {
                info!("opened location settings");
                RetryOutcome::OpenedSettings
            }
            Err(err) => {
                warn!(error = %err, "could not open location settings");
                RetryOutcome::SettingsUnavailable {
                    message: err.to_string(),
                }
            }
        }
    }
}
