//! Weather outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `WeatherSource`
//! port against the OpenWeatherMap current-weather API.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_WEATHER_ENDPOINT, OpenWeatherHttpSource};
