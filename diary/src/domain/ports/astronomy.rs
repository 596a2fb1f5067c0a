//! Driven port for sun and moon calculations.
//!
//! Astronomy adapters are pure functions of an instant (or calendar date)
//! and a coordinate, so the port is synchronous. Instants that do not occur
//! on a given day at a given latitude (polar day or night) are `None`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::Coordinate;

/// Illuminated part of the moon at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonIllumination {
    /// Illuminated fraction of the disc, `0.0..=1.0`.
    pub fraction: f64,
    /// Position in the lunar cycle: 0 new, 0.25 first quarter, 0.5 full,
    /// 0.75 last quarter.
    pub phase: f64,
    /// Midpoint angle in radians of the illuminated limb.
    pub angle: f64,
}

/// Moonrise and moonset within one UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MoonTimes {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
    /// The moon stays above the horizon all day.
    pub always_up: bool,
    /// The moon stays below the horizon all day.
    pub always_down: bool,
}

/// Sun events for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SunTimes {
    pub solar_noon: Option<DateTime<Utc>>,
    pub nadir: Option<DateTime<Utc>>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub sunrise_end: Option<DateTime<Utc>>,
    pub sunset_start: Option<DateTime<Utc>>,
    pub dawn: Option<DateTime<Utc>>,
    pub dusk: Option<DateTime<Utc>>,
    pub nautical_dawn: Option<DateTime<Utc>>,
    pub nautical_dusk: Option<DateTime<Utc>>,
    pub night_end: Option<DateTime<Utc>>,
    pub night: Option<DateTime<Utc>>,
    pub golden_hour_end: Option<DateTime<Utc>>,
    pub golden_hour: Option<DateTime<Utc>>,
}

/// Position of the sun in the observer's sky, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunPosition {
    /// Height above the horizon.
    pub altitude: f64,
    /// Direction measured from south towards west.
    pub azimuth: f64,
}

/// Port for astronomical calculations.
#[cfg_attr(test, mockall::automock)]
pub trait Astronomy: Send + Sync {
    /// Moon illumination at `at`.
    fn moon_illumination(&self, at: DateTime<Utc>) -> MoonIllumination;

    /// Moonrise and moonset during the UTC day `date`.
    fn moon_times(&self, date: NaiveDate, coordinate: Coordinate) -> MoonTimes;

    /// Sun events for the day containing noon UTC on `date`.
    fn sun_times(&self, date: NaiveDate, coordinate: Coordinate) -> SunTimes;

    /// Sun position at `at`.
    fn sun_position(&self, at: DateTime<Utc>, coordinate: Coordinate) -> SunPosition;
}
