//! Weather gateway core types
//!
//! Shared between the HTTP surface and the lookup orchestrator. The
//! [`WeatherResponse`] is both the cached payload and the API body, so its
//! field names are part of the public wire contract.

use serde::{Deserialize, Serialize};

/// Country reported when the geocoder omits one
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// A geocoded place, resolved from a free-text city name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    /// Normalized place name as reported by the geocoder
    pub name: String,
    /// Country name, or [`UNKNOWN_COUNTRY`]
    pub country: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Current conditions for a city, denormalized with its location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    /// City name
    pub city: String,
    /// Country
    pub country: String,
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,

    /// Current temperature in Celsius
    pub temperature: f64,
    /// Feels-like temperature in Celsius
    pub apparent_temperature: f64,

    /// Relative humidity in %
    pub humidity: i32,
    /// Total precipitation in mm
    pub precipitation: f64,
    /// Rain in mm
    pub rain: f64,

    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_direction: i32,

    /// Cloud cover in %
    pub cloud_cover: i32,
    /// Surface pressure in hPa
    pub pressure: f64,
    /// WMO weather code
    pub weather_code: i32,
    /// Observation time, local to the location
    pub timestamp: String,
}
