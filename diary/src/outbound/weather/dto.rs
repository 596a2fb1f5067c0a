//! DTOs for decoding OpenWeatherMap current-weather responses.
//!
//! The adapter decodes into these transport DTOs first, then validates and
//! maps them into a domain [`WeatherReport`] in one pass.

use serde::Deserialize;

use crate::domain::{Coordinate, WeatherCondition, WeatherReport};

/// The API reports `cod` as a number on success and sometimes as a string
/// on errors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum CodDto {
    Number(i64),
    Text(String),
}

impl CodDto {
    pub(super) fn is_ok(&self) -> bool {
        match self {
            Self::Number(code) => *code == 200,
            Self::Text(code) => code.trim() == "200",
        }
    }

    pub(super) fn describe(&self) -> String {
        match self {
            Self::Number(code) => code.to_string(),
            Self::Text(code) => code.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CurrentWeatherDto {
    pub(super) cod: Option<CodDto>,
    pub(super) message: Option<String>,
    pub(super) coord: Option<CoordDto>,
    #[serde(default)]
    pub(super) weather: Vec<ConditionDto>,
    pub(super) main: Option<MainDto>,
    pub(super) visibility: Option<u32>,
    pub(super) wind: Option<WindDto>,
    pub(super) clouds: Option<CloudsDto>,
    pub(super) sys: Option<SysDto>,
    #[serde(default)]
    pub(super) timezone: i32,
    #[serde(default)]
    pub(super) name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CoordDto {
    pub(super) lon: f64,
    pub(super) lat: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConditionDto {
    pub(super) id: u16,
    pub(super) main: String,
    #[serde(default)]
    pub(super) description: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct MainDto {
    pub(super) temp: f64,
    pub(super) feels_like: Option<f64>,
    pub(super) temp_min: Option<f64>,
    pub(super) temp_max: Option<f64>,
    #[serde(default)]
    pub(super) pressure: f64,
    #[serde(default)]
    pub(super) humidity: u8,
}

#[derive(Debug, Deserialize)]
pub(super) struct WindDto {
    #[serde(default)]
    pub(super) speed: f64,
    pub(super) gust: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CloudsDto {
    #[serde(default)]
    pub(super) all: u8,
}

#[derive(Debug, Deserialize)]
pub(super) struct SysDto {
    pub(super) country: Option<String>,
}

impl CurrentWeatherDto {
    pub(super) fn into_domain(self) -> Result<WeatherReport, String> {
        let coord = self.coord.ok_or("response missing coord")?;
        let coordinate = Coordinate::new(coord.lat, coord.lon)
            .map_err(|err| format!("response coord invalid: {err}"))?;
        let main = self.main.ok_or("response missing main block")?;
        if !main.temp.is_finite() {
            return Err("response temperature is not finite".to_owned());
        }
        let primary = self
            .weather
            .into_iter()
            .next()
            .ok_or("response has no weather conditions")?;
        let wind = self.wind.unwrap_or(WindDto {
            speed: 0.0,
            gust: None,
        });

        Ok(WeatherReport {
            location_name: self.name,
            country: self.sys.and_then(|sys| sys.country),
            coordinate,
            temperature_c: main.temp,
            feels_like_c: main.feels_like.unwrap_or(main.temp),
            temp_min_c: main.temp_min.unwrap_or(main.temp),
            temp_max_c: main.temp_max.unwrap_or(main.temp),
            humidity_percent: main.humidity,
            pressure_hpa: main.pressure,
            wind_speed_ms: wind.speed,
            wind_gust_ms: wind.gust,
            visibility_m: self.visibility,
            cloud_cover_percent: self.clouds.map_or(0, |clouds| clouds.all),
            condition: WeatherCondition {
                id: primary.id,
                group: primary.main.into(),
                description: primary.description,
            },
            timezone_offset_secs: self.timezone,
        })
    }
}
