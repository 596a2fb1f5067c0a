//! Reqwest-backed OpenWeatherMap source adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into domain weather reports.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{CodDto, CurrentWeatherDto};
use crate::domain::ports::{WeatherSource, WeatherSourceError};
use crate::domain::{Coordinate, WeatherReport};

/// Current-weather endpoint used when none is configured.
pub const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
const DEFAULT_USER_AGENT: &str = "fishing-diary/0.1";

/// Weather source that performs HTTP GET requests against one endpoint.
pub struct OpenWeatherHttpSource {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl OpenWeatherHttpSource {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// Without an API key every fetch fails with
    /// [`WeatherSourceError::Unauthorized`] before touching the network.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherHttpSource {
    async fn fetch_current(
        &self,
        coordinate: Coordinate,
    ) -> Result<WeatherReport, WeatherSourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| WeatherSourceError::unauthorized("no weather API key configured"))?;
        let url = build_request_url(&self.endpoint, coordinate, api_key);
        debug!(endpoint = %self.endpoint, %coordinate, "requesting current weather");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_report(body.as_ref())
    }
}

fn build_request_url(endpoint: &Url, coordinate: Coordinate, api_key: &str) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("lat", &coordinate.latitude().to_string())
        .append_pair("lon", &coordinate.longitude().to_string())
        .append_pair("units", "metric")
        .append_pair("appid", api_key);
    url
}

fn parse_report(body: &[u8]) -> Result<WeatherReport, WeatherSourceError> {
    let decoded: CurrentWeatherDto = serde_json::from_slice(body).map_err(|error| {
        WeatherSourceError::decode(format!("invalid weather JSON payload: {error}"))
    })?;
    if let Some(cod) = decoded.cod.as_ref().filter(|cod| !cod.is_ok()) {
        return Err(map_api_code(cod, decoded.message.as_deref()));
    }
    decoded.into_domain().map_err(WeatherSourceError::decode)
}

fn map_api_code(cod: &CodDto, message: Option<&str>) -> WeatherSourceError {
    let text = format!("api code {}: {}", cod.describe(), message.unwrap_or("no message"));
    match cod.describe().trim().parse::<u16>().ok().and_then(|code| StatusCode::from_u16(code).ok()) {
        Some(status) if status.is_client_error() || status.is_server_error() => {
            classify_status(status, text)
        }
        _ => WeatherSourceError::decode(text),
    }
}

fn map_transport_error(error: reqwest::Error) -> WeatherSourceError {
    if error.is_timeout() {
        WeatherSourceError::timeout(error.to_string())
    } else {
        WeatherSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> WeatherSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };
    classify_status(status, message)
}

fn classify_status(status: StatusCode, message: String) -> WeatherSourceError {
    match status {
        StatusCode::UNAUTHORIZED => WeatherSourceError::unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => WeatherSourceError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            WeatherSourceError::timeout(message)
        }
        _ if status.is_client_error() => WeatherSourceError::invalid_request(message),
        _ => WeatherSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
