//! Location acquisition: permission prompts, single-shot fixes and the
//! default-location fallback.
//!
//! [`LocationController`] owns the session's [`LocationState`]. Failures move
//! the state to [`LocationStatus::Error`] and leave the fallback decision to
//! the caller via [`LocationController::decisions`]; the controller never
//! applies the default location on its own.

mod controller;

pub use controller::LocationController;

use thiserror::Error;

use super::Coordinate;

/// Resolution status of the session location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationStatus {
    /// Nothing has been attempted yet.
    Uninitialized,
    /// A position request is in flight.
    Resolving,
    /// `current` holds a usable coordinate.
    Resolved,
    /// The last attempt failed; see [`LocationState::last_error`].
    Error,
}

/// Why a location could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location request timed out")]
    Timeout,
    #[error("location unavailable: {message}")]
    Unavailable { message: String },
}

/// Snapshot of the session location.
///
/// Exactly one exists per session, owned by the controller and never
/// persisted. `last_error` is populated only while `status` is
/// [`LocationStatus::Error`].
#[derive(Debug, Clone, PartialEq)]
pub struct LocationState {
    pub current: Coordinate,
    pub is_fallback: bool,
    pub status: LocationStatus,
    pub last_error: Option<LocationError>,
}

impl LocationState {
    /// Initial state before any resolution attempt.
    pub fn initial(default_location: Coordinate) -> Self {
        Self {
            current: default_location,
            is_fallback: false,
            status: LocationStatus::Uninitialized,
            last_error: None,
        }
    }
}

/// Choices offered to the user after a failed resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationDecision {
    /// Accept the fixed default coordinate.
    UseDefault,
    /// Try again (or open settings if permission was already checked).
    Retry,
}

/// Result of [`LocationController::retry`].
#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome {
    /// Permission had already been checked, so the platform settings
    /// screen was opened instead of prompting again.
    OpenedSettings,
    /// Settings could not be opened.
    SettingsUnavailable { message: String },
    /// The permission and acquisition sequence ran again.
    Attempted(Result<Coordinate, LocationError>),
}
