//! Diary configuration loaded via OrthoConfig.
//!
//! Every value is optional; accessors apply defaults. Environment variables
//! use the `FISHING_DIARY_` prefix, e.g. `FISHING_DIARY_WEATHER_API_KEY`.

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::ports::{DEFAULT_POSITION_MAX_AGE, DEFAULT_POSITION_TIMEOUT, PositionOptions};
use crate::domain::{Coordinate, CoordinateValidationError, SAN_FRANCISCO};
use crate::outbound::weather::DEFAULT_WEATHER_ENDPOINT;

const DEFAULT_DATA_DIR: &str = ".fishing-diary";
const DEFAULT_WEATHER_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised when configured values are unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("invalid weather endpoint {value:?}: {message}")]
    InvalidWeatherEndpoint { value: String, message: String },
    #[error("invalid default location: {0}")]
    InvalidDefaultLocation(#[from] CoordinateValidationError),
}

/// Configuration values for the diary core and the forecast binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FISHING_DIARY")]
pub struct DiarySettings {
    /// Directory holding persisted spots and profile.
    pub data_dir: Option<String>,
    /// Current-weather endpoint override.
    pub weather_endpoint: Option<String>,
    /// OpenWeatherMap API key. Weather is unavailable without one.
    pub weather_api_key: Option<String>,
    /// Weather request timeout in milliseconds.
    pub weather_timeout_ms: Option<u64>,
    /// Position request timeout in milliseconds.
    pub location_timeout_ms: Option<u64>,
    /// Oldest acceptable cached fix in milliseconds.
    pub location_max_age_ms: Option<u64>,
    /// Ask for GPS-grade accuracy. Environment or config file only.
    #[ortho_config(skip_cli)]
    pub high_accuracy: Option<bool>,
    /// Fallback latitude.
    pub default_latitude: Option<f64>,
    /// Fallback longitude.
    pub default_longitude: Option<f64>,
}

impl DiarySettings {
    pub fn data_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    /// Parsed weather endpoint, falling back to the public API.
    pub fn weather_endpoint(&self) -> Result<Url, SettingsError> {
        let raw = self
            .weather_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_WEATHER_ENDPOINT);
        Url::parse(raw).map_err(|err| SettingsError::InvalidWeatherEndpoint {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn weather_api_key(&self) -> Option<&str> {
        self.weather_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn weather_timeout(&self) -> Duration {
        self.weather_timeout_ms
            .map_or(DEFAULT_WEATHER_TIMEOUT, Duration::from_millis)
    }

    /// Options used for device position requests.
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            timeout: self
                .location_timeout_ms
                .map_or(DEFAULT_POSITION_TIMEOUT, Duration::from_millis),
            maximum_age: self
                .location_max_age_ms
                .map_or(DEFAULT_POSITION_MAX_AGE, Duration::from_millis),
            high_accuracy: self.high_accuracy.unwrap_or(true),
        }
    }

    /// Fallback coordinate. Each component defaults to San Francisco.
    pub fn default_location(&self) -> Result<Coordinate, SettingsError> {
        let latitude = self.default_latitude.unwrap_or(SAN_FRANCISCO.latitude());
        let longitude = self.default_longitude.unwrap_or(SAN_FRANCISCO.longitude());
        Ok(Coordinate::new(latitude, longitude)?)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for diary configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "FISHING_DIARY_DATA_DIR",
        "FISHING_DIARY_WEATHER_ENDPOINT",
        "FISHING_DIARY_WEATHER_API_KEY",
        "FISHING_DIARY_WEATHER_TIMEOUT_MS",
        "FISHING_DIARY_LOCATION_TIMEOUT_MS",
        "FISHING_DIARY_LOCATION_MAX_AGE_MS",
        "FISHING_DIARY_HIGH_ACCURACY",
        "FISHING_DIARY_DEFAULT_LATITUDE",
        "FISHING_DIARY_DEFAULT_LONGITUDE",
    ];

    fn load_from_empty_args() -> DiarySettings {
        DiarySettings::load_from_iter([OsString::from("fishing-diary")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(settings.data_dir(), Utf8PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(
            settings.weather_endpoint().expect("default endpoint parses").as_str(),
            DEFAULT_WEATHER_ENDPOINT
        );
        assert_eq!(settings.weather_api_key(), None);
        assert_eq!(settings.weather_timeout(), DEFAULT_WEATHER_TIMEOUT);
        assert_eq!(settings.position_options(), PositionOptions::default());
        assert_eq!(settings.default_location(), Ok(SAN_FRANCISCO));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FISHING_DIARY_DATA_DIR", Some("/tmp/diary".to_owned())),
            (
                "FISHING_DIARY_WEATHER_ENDPOINT",
                Some("http://localhost:8080/weather".to_owned()),
            ),
            ("FISHING_DIARY_WEATHER_API_KEY", Some("abc123".to_owned())),
            ("FISHING_DIARY_WEATHER_TIMEOUT_MS", Some("2500".to_owned())),
            ("FISHING_DIARY_LOCATION_TIMEOUT_MS", Some("5000".to_owned())),
            ("FISHING_DIARY_LOCATION_MAX_AGE_MS", Some("0".to_owned())),
            ("FISHING_DIARY_HIGH_ACCURACY", Some("false".to_owned())),
            ("FISHING_DIARY_DEFAULT_LATITUDE", Some("51.5".to_owned())),
            ("FISHING_DIARY_DEFAULT_LONGITUDE", Some("-0.12".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.data_dir(), Utf8PathBuf::from("/tmp/diary"));
        assert_eq!(
            settings.weather_endpoint().expect("endpoint parses").as_str(),
            "http://localhost:8080/weather"
        );
        assert_eq!(settings.weather_api_key(), Some("abc123"));
        assert_eq!(settings.weather_timeout(), Duration::from_millis(2_500));
        let options = settings.position_options();
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(options.maximum_age, Duration::ZERO);
        assert!(!options.high_accuracy);
        let location = settings.default_location().expect("valid default");
        assert_eq!(location.latitude(), 51.5);
        assert_eq!(location.longitude(), -0.12);
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("true"), true)]
    #[case(Some("false"), false)]
    fn high_accuracy_follows_environment(#[case] value: Option<&str>, #[case] expected: bool) {
        let mut guarded = VARS.map(|name| (name, None::<String>));
        guarded[6] = ("FISHING_DIARY_HIGH_ACCURACY", value.map(str::to_owned));
        let _guard = lock_env(guarded);

        let settings = load_from_empty_args();

        assert_eq!(settings.position_options().high_accuracy, expected);
    }

    #[rstest]
    fn out_of_range_default_location_is_rejected() {
        let mut guarded = VARS.map(|name| (name, None::<String>));
        guarded[7] = ("FISHING_DIARY_DEFAULT_LATITUDE", Some("123".to_owned()));
        let _guard = lock_env(guarded);

        let settings = load_from_empty_args();

        assert!(matches!(
            settings.default_location(),
            Err(SettingsError::InvalidDefaultLocation(_))
        ));
    }

    #[rstest]
    fn blank_api_key_counts_as_missing() {
        let mut guarded = VARS.map(|name| (name, None::<String>));
        guarded[2] = ("FISHING_DIARY_WEATHER_API_KEY", Some("  ".to_owned()));
        let _guard = lock_env(guarded);

        assert_eq!(load_from_empty_args().weather_api_key(), None);
    }
}
