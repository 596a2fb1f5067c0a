//! Driven port for current-conditions weather lookups.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Coordinate, WeatherReport};

define_port_error! {
    /// Errors raised by weather source adapters.
    pub enum WeatherSourceError {
        /// The request timed out.
        Timeout { message: String } => "weather request timed out: {message}",
        /// Network or server failure.
        Transport { message: String } => "weather transport failure: {message}",
        /// The provider throttled the request.
        RateLimited { message: String } => "weather provider rate limited: {message}",
        /// The API key was missing or rejected.
        Unauthorized { message: String } => "weather provider rejected credentials: {message}",
        /// The provider rejected the request parameters.
        InvalidRequest { message: String } => "weather request rejected: {message}",
        /// The response body could not be decoded into a report.
        Decode { message: String } => "weather response decode failed: {message}",
    }
}

/// Port for fetching the current weather at a coordinate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch current conditions at `coordinate` in metric units.
    async fn fetch_current(
        &self,
        coordinate: Coordinate,
    ) -> Result<WeatherReport, WeatherSourceError>;
}
