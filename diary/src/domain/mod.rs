//! Domain entities, services and ports.
//!
//! Purpose: hold the fishing diary's behaviour independent of any platform.
//! Services own their state and reach the outside world only through the
//! traits in [`ports`].
//!
//! Public surface:
//! - Coordinate: validated WGS84 position.
//! - LocationController: permission/fix/fallback state machine.
//! - SpotStore: spot collection mirrored to key-value storage.
//! - ProfileStore: the angler's profile.
//! - WeatherService: last good weather report.
//! - ForecastService: moon phase and fishing advice for a day.
//! - AppState: the per-session bundle the UI drives.

pub mod app_state;
pub mod coordinate;
pub mod fishing;
pub mod forecast_service;
pub mod location;
pub mod ports;
pub mod profile;
pub mod spots;
pub mod weather;

pub use self::app_state::AppState;
pub use self::coordinate::{Coordinate, CoordinateValidationError, SAN_FRANCISCO};
pub use self::fishing::{MoonAdvice, MoonPhase, WeatherAdvice};
pub use self::forecast_service::{FishingForecast, ForecastService};
pub use self::location::{
    LocationController, LocationDecision, LocationError, LocationState, LocationStatus,
    RetryOutcome,
};
pub use self::profile::{ProfileStore, ProfileStoreError, UserProfile};
pub use self::spots::{
    ImageId, SpotDraft, SpotId, SpotImage, SpotRecord, SpotStore, SpotStoreError,
};
pub use self::weather::{
    ConditionGroup, WeatherCondition, WeatherError, WeatherIcon, WeatherReport, WeatherService,
};
