//! Lookup failures

use thiserror::Error;

use crate::upstream::UpstreamError;

/// Why a weather lookup failed
///
/// The `Display` text is safe to hand to clients; upstream detail is only
/// reachable through `source()` and `Debug`.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Geocoder answered but had no match
    #[error("City not found: {0}")]
    CityNotFound(String),

    /// Geocoder unreachable, errored, or sent an unreadable body
    #[error("Failed to geocode city: {city}")]
    GeocodingFailure {
        /// City as requested
        city: String,
        /// Underlying upstream failure
        #[source]
        source: UpstreamError,
    },

    /// Forecast API unreachable or errored
    #[error("Weather data provider is unavailable")]
    UpstreamUnavailable(#[source] UpstreamError),

    /// Forecast API answered with a body missing the expected structure
    #[error("Weather data provider returned an unexpected payload")]
    MalformedUpstreamPayload(String),
}
