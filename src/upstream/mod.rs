//! Upstream weather data sources
//!
//! The [`WeatherUpstream`] trait is the seam between the lookup orchestrator
//! and the network. [`OpenMeteoClient`] is the production implementation;
//! tests substitute their own.

mod open_meteo;

pub use open_meteo::OpenMeteoClient;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Current-condition fields requested from the forecast API, in request order
pub const FORECAST_FIELDS: [&str; 10] = [
    "temperature_2m",
    "apparent_temperature",
    "relative_humidity_2m",
    "precipitation",
    "rain",
    "cloud_cover",
    "surface_pressure",
    "wind_speed_10m",
    "wind_direction_10m",
    "weather_code",
];

/// Failure talking to an upstream API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// Connection, TLS, or timeout failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-success status
    #[error("unexpected status {0}")]
    Status(u16),

    /// Success status but the body could not be decoded
    #[error("undecodable body: {0}")]
    Decode(String),
}

/// Geocoding search response
///
/// The API omits `results` entirely when nothing matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodingResponse {
    /// Matches, best first
    #[serde(default)]
    pub results: Option<Vec<GeocodingResult>>,
}

impl GeocodingResponse {
    /// Best match, if any
    #[must_use]
    pub fn into_first(self) -> Option<GeocodingResult> {
        self.results.and_then(|results| results.into_iter().next())
    }
}

/// A single geocoding match
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodingResult {
    /// Place name
    pub name: String,
    /// Country name (absent for some territories)
    #[serde(default)]
    pub country: Option<String>,
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
}

/// A source of geocoding and forecast data
///
/// Implementations must be `Send + Sync + 'static` so they can be shared
/// across request tasks behind an `Arc<dyn WeatherUpstream>`.
#[async_trait]
pub trait WeatherUpstream: Send + Sync + 'static {
    /// Resolve a free-text city name. Only the best match is requested.
    async fn geocode(&self, city: &str) -> Result<GeocodingResponse, UpstreamError>;

    /// Fetch current conditions for a coordinate pair.
    ///
    /// Returns the raw JSON body; shape checks belong to the caller.
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Value, UpstreamError>;
}
