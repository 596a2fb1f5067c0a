//! Driven port for the platform geolocation service.
//!
//! The platform owns permission dialogs and the positioning hardware. The
//! domain only sees the outcome of a permission prompt, a single raw fix, or
//! a typed failure.

use std::time::Duration;

use async_trait::async_trait;

use super::define_port_error;

/// Default time allowed for a single position request.
pub const DEFAULT_POSITION_TIMEOUT: Duration = Duration::from_millis(20_000);
/// Default maximum age of a cached platform fix.
pub const DEFAULT_POSITION_MAX_AGE: Duration = Duration::from_millis(1_000);

/// Outcome of a platform permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    /// The user granted location access.
    Granted,
    /// The user declined, dismissed, or the prompt could not be shown.
    Denied,
}

/// Options forwarded to the platform for one position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Upper bound on how long the request may take.
    pub timeout: Duration,
    /// Oldest cached fix the platform may return instead of a fresh one.
    pub maximum_age: Duration,
    /// Request GPS-grade accuracy rather than network positioning.
    pub high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_POSITION_TIMEOUT,
            maximum_age: DEFAULT_POSITION_MAX_AGE,
            high_accuracy: true,
        }
    }
}

/// Raw fix reported by the platform, before domain validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
}

define_port_error! {
    /// Errors raised by geolocation adapters.
    pub enum GeolocationError {
        /// Permission was revoked or never granted.
        PermissionDenied => "location permission denied",
        /// The platform gave up before producing a fix.
        Timeout => "location request timed out",
        /// Positioning hardware or services are unavailable.
        Unavailable { message: String } => "location unavailable: {message}",
        /// The platform settings screen could not be opened.
        Settings { message: String } => "failed to open location settings: {message}",
    }
}

/// Port for permission prompts and single-shot position requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Ask the platform for location permission, showing a dialog if needed.
    async fn request_permission(&self) -> Result<PermissionOutcome, GeolocationError>;

    /// Request one position fix honouring `options`.
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<PositionFix, GeolocationError>;

    /// Open the platform settings screen for this app's location access.
    async fn open_settings(&self) -> Result<(), GeolocationError>;
}
