//! Current weather for the active location.
//!
//! [`WeatherService`] keeps the last good [`WeatherReport`] and refreshes it
//! on demand through a [`WeatherSource`]. A failed refresh is reported once
//! and leaves the previous report in place.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::Coordinate;
use super::ports::{WeatherSource, WeatherSourceError};

/// Broad condition family reported by the provider (`weather[0].main`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionGroup {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Other(String),
}

impl ConditionGroup {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Mist => "Mist",
            Self::Fog => "Fog",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for ConditionGroup {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Drizzle" => Self::Drizzle,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" => Self::Mist,
            "Fog" => Self::Fog,
            _ => Self::Other(value),
        }
    }
}

impl From<ConditionGroup> for String {
    fn from(value: ConditionGroup) -> Self {
        match value {
            ConditionGroup::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ConditionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon family the UI should show for a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherIcon {
    Lightning,
    Pouring,
    Rainy,
    Snowy,
    Fog,
    Sunny,
    Cloudy,
}

impl WeatherIcon {
    /// Map a provider condition code to an icon family.
    pub fn from_condition_id(id: u16) -> Self {
        match id {
            200..=299 => Self::Lightning,
            300..=399 => Self::Pouring,
            500..=599 => Self::Rainy,
            600..=699 => Self::Snowy,
            700..=799 => Self::Fog,
            800 => Self::Sunny,
            _ => Self::Cloudy,
        }
    }
}

/// Primary condition of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherCondition {
    pub id: u16,
    pub group: ConditionGroup,
    pub description: String,
}

/// Current conditions at one place, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location_name: String,
    pub country: Option<String>,
    pub coordinate: Coordinate,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_percent: u8,
    pub pressure_hpa: f64,
    pub wind_speed_ms: f64,
    pub wind_gust_ms: Option<f64>,
    pub visibility_m: Option<u32>,
    pub cloud_cover_percent: u8,
    pub condition: WeatherCondition,
    pub timezone_offset_secs: i32,
}

impl WeatherReport {
    /// Wind speed in km/h, rounded to the nearest whole number.
    pub fn wind_speed_kmh(&self) -> f64 {
        (self.wind_speed_ms * 3.6).round()
    }

    /// Visibility in kilometres.
    pub fn visibility_km(&self) -> Option<f64> {
        self.visibility_m.map(|metres| f64::from(metres) / 1000.0)
    }

    pub fn icon(&self) -> WeatherIcon {
        WeatherIcon::from_condition_id(self.condition.id)
    }

    /// Condition description with its first letter upper-cased.
    pub fn headline(&self) -> String {
        let mut chars = self.condition.description.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Failure surfaced to the UI as a one-shot alert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("failed to fetch weather data: {source}")]
    NetworkFetchFailure {
        #[source]
        source: WeatherSourceError,
    },
}

/// Keeps the latest successful report.
pub struct WeatherService<W: ?Sized> {
    source: Arc<W>,
    latest: Option<WeatherReport>,
}

impl<W> WeatherService<W>
where
    W: WeatherSource + ?Sized,
{
    pub fn new(source: Arc<W>) -> Self {
        Self {
            source,
            latest: None,
        }
    }

    /// Last successful report, if any.
    pub fn latest(&self) -> Option<&WeatherReport> {
        self.latest.as_ref()
    }

    /// Fetch fresh conditions at `coordinate`.
    ///
    /// On failure the previous report is kept and the error is returned for
    /// the caller to show once. There is no retry.
    pub async fn refresh(&mut self, coordinate: Coordinate) -> Result<&WeatherReport, WeatherError> {
        match self.source.fetch_current(coordinate).await {
            Ok(report) => {
                info!(
                    location = %report.location_name,
                    condition = %report.condition.group,
                    temperature_c = report.temperature_c,
                    "weather refreshed"
                );
                Ok(self.latest.insert(report))
            }
            Err(source) => {
                warn!(error = %source, %coordinate, "weather refresh failed; keeping previous report");
                Err(WeatherError::NetworkFetchFailure { source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockWeatherSource;
    use rstest::rstest;

    fn sample_report(description: &str) -> WeatherReport {
        WeatherReport {
            location_name: "San Francisco".into(),
            country: Some("US".into()),
            coordinate: crate::domain::SAN_FRANCISCO,
            temperature_c: 14.2,
            feels_like_c: 13.1,
            temp_min_c: 12.0,
            temp_max_c: 16.5,
            humidity_percent: 81,
            pressure_hpa: 1015.0,
            wind_speed_ms: 4.12,
            wind_gust_ms: None,
            visibility_m: Some(10_000),
            cloud_cover_percent: 20,
            condition: WeatherCondition {
                id: 801,
                group: ConditionGroup::Clouds,
                description: description.into(),
            },
            timezone_offset_secs: -25_200,
        }
    }

    #[rstest]
    #[case(211, WeatherIcon::Lightning)]
    #[case(301, WeatherIcon::Pouring)]
    #[case(500, WeatherIcon::Rainy)]
    #[case(601, WeatherIcon::Snowy)]
    #[case(741, WeatherIcon::Fog)]
    #[case(800, WeatherIcon::Sunny)]
    #[case(804, WeatherIcon::Cloudy)]
    #[case(450, WeatherIcon::Cloudy)]
    fn icons_follow_condition_code_ranges(#[case] id: u16, #[case] expected: WeatherIcon) {
        assert_eq!(WeatherIcon::from_condition_id(id), expected);
    }

    #[test]
    fn derived_units_match_display_rules() {
        let report = sample_report("few clouds");
        assert_eq!(report.wind_speed_kmh(), 15.0);
        assert_eq!(report.visibility_km(), Some(10.0));
        assert_eq!(report.headline(), "Few clouds");
    }

    #[rstest]
    #[case("Clear", ConditionGroup::Clear)]
    #[case("Thunderstorm", ConditionGroup::Thunderstorm)]
    #[case("Haze", ConditionGroup::Other("Haze".into()))]
    fn condition_groups_parse_provider_names(#[case] raw: &str, #[case] expected: ConditionGroup) {
        let group = ConditionGroup::from(raw.to_owned());
        assert_eq!(group, expected);
        assert_eq!(String::from(group), raw);
    }

    #[tokio::test]
    async fn refresh_stores_latest_report() {
        let mut source = MockWeatherSource::new();
        source
            .expect_fetch_current()
            .times(1)
            .returning(|_| Ok(sample_report("few clouds")));
        let mut service = WeatherService::new(Arc::new(source));

        let report = service
            .refresh(crate::domain::SAN_FRANCISCO)
            .await
            .expect("refresh succeeds");

        assert_eq!(report.location_name, "San Francisco");
        assert!(service.latest().is_some());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_report() {
        let mut source = MockWeatherSource::new();
        let mut responses = vec![
            Err(WeatherSourceError::timeout("10s elapsed")),
            Ok(sample_report("few clouds")),
        ];
        source
            .expect_fetch_current()
            .times(2)
            .returning(move |_| responses.pop().expect("response queued"));
        let mut service = WeatherService::new(Arc::new(source));
        service
            .refresh(crate::domain::SAN_FRANCISCO)
            .await
            .expect("first refresh succeeds");

        let error = service
            .refresh(crate::domain::SAN_FRANCISCO)
            .await
            .expect_err("second refresh fails");

        assert!(matches!(error, WeatherError::NetworkFetchFailure { .. }));
        assert_eq!(service.latest(), Some(&sample_report("few clouds")));
    }
}
