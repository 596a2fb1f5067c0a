//! Geographic coordinates in WGS84 decimal degrees.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors raised by [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateValidationError {
    NonFinite,
    LatitudeOutOfRange { value: f64 },
    LongitudeOutOfRange { value: f64 },
}

impl fmt::Display for CoordinateValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite => write!(f, "coordinate components must be finite"),
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude must be within [-90, 90] (got {value})")
            }
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude must be within [-180, 180] (got {value})")
            }
        }
    }
}

impl std::error::Error for CoordinateValidationError {}

/// A validated latitude/longitude pair.
///
/// ## Invariants
/// - Both components are finite.
/// - Latitude lies in `-90..=90`, longitude in `-180..=180`.
///
/// Serialised as `{"latitude": …, "longitude": …}`; deserialisation applies
/// the same validation as [`Coordinate::new`].
///
/// # Examples
/// ```
/// use fishing_diary::domain::Coordinate;
///
/// let pier = Coordinate::new(37.8087, -122.4098).expect("valid coordinate");
/// assert_eq!(pier.latitude(), 37.8087);
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Fallback used when the device location cannot be obtained.
pub const SAN_FRANCISCO: Coordinate = Coordinate {
    latitude: 37.7749,
    longitude: -122.4194,
};

impl Coordinate {
    /// Validate and construct a coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateValidationError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateValidationError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateValidationError::LatitudeOutOfRange { value: latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateValidationError::LongitudeOutOfRange { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateValidationError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(0.0, 0.0)]
    fn accepts_boundary_values(#[case] latitude: f64, #[case] longitude: f64) {
        let coordinate = Coordinate::new(latitude, longitude).expect("boundary is valid");
        assert_eq!(coordinate.latitude(), latitude);
        assert_eq!(coordinate.longitude(), longitude);
    }

    #[rstest]
    #[case::nan_latitude(f64::NAN, 0.0, CoordinateValidationError::NonFinite)]
    #[case::infinite_longitude(0.0, f64::INFINITY, CoordinateValidationError::NonFinite)]
    #[case::latitude(90.5, 0.0, CoordinateValidationError::LatitudeOutOfRange { value: 90.5 })]
    #[case::longitude(0.0, -180.1, CoordinateValidationError::LongitudeOutOfRange { value: -180.1 })]
    fn rejects_invalid_components(
        #[case] latitude: f64,
        #[case] longitude: f64,
        #[case] expected: CoordinateValidationError,
    ) {
        assert_eq!(Coordinate::new(latitude, longitude), Err(expected));
    }

    #[test]
    fn serialises_with_platform_field_names() {
        let json = serde_json::to_string(&SAN_FRANCISCO).expect("serialise");
        assert_eq!(json, r#"{"latitude":37.7749,"longitude":-122.4194}"#);
    }

    #[test]
    fn deserialisation_validates_ranges() {
        let result = serde_json::from_str::<Coordinate>(r#"{"latitude":120.0,"longitude":0.0}"#);
        assert!(result.is_err(), "out-of-range latitude must not decode");
    }
}
