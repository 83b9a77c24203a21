//! Weather lookup orchestration
//!
//! `lookup` runs cache check → geocode → forecast → assemble → cache store.
//! A cache hit makes no upstream calls; a miss always makes both before
//! anything is cached.

mod conditions;
mod error;

pub use error::LookupError;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;
use weather_core::{LocationData, UNKNOWN_COUNTRY, WeatherResponse};

use crate::cache::{CacheStatsSnapshot, TtlCache};
use crate::upstream::{UpstreamError, WeatherUpstream};
use conditions::{CurrentConditions, parse_current};

/// Namespace prefix for weather cache keys
const CACHE_NAMESPACE: &str = "weather";

/// Resolves city names to current weather, caching results per city
pub struct WeatherService {
    upstream: Arc<dyn WeatherUpstream>,
    cache: Arc<TtlCache<WeatherResponse>>,
    ttl: Duration,
}

impl WeatherService {
    /// Create a service over an upstream source and a shared cache.
    ///
    /// Successful lookups are cached for `ttl`.
    pub fn new(
        upstream: Arc<dyn WeatherUpstream>,
        cache: Arc<TtlCache<WeatherResponse>>,
        ttl: Duration,
    ) -> Self {
        Self {
            upstream,
            cache,
            ttl,
        }
    }

    /// Cache key for a city: namespaced, NFC-normalized and lowercased
    #[must_use]
    pub fn cache_key(city: &str) -> String {
        let normalized: String = city.nfc().collect();
        format!("{CACHE_NAMESPACE}:{}", normalized.to_lowercase())
    }

    /// Current weather for `city`
    ///
    /// Concurrent misses for the same city are not collapsed: each performs
    /// its own upstream round trip and the last write wins.
    pub async fn lookup(&self, city: &str) -> Result<WeatherResponse, LookupError> {
        // Decomposed and precomposed spellings share one entry and one query
        let normalized: String = city.nfc().collect();
        let city = normalized.as_str();
        let cache_key = Self::cache_key(city);

        if let Some(cached) = self.cache.get(&cache_key) {
            debug!(city = %city, cache_key = %cache_key, "Cache hit");
            return Ok(cached);
        }

        let location = self.geocode(city).await?;
        let current = self.fetch_current(&location).await?;
        let response = assemble(location, current);

        self.cache.set(&cache_key, response.clone(), self.ttl);
        info!(
            city = %response.city,
            cache_key = %cache_key,
            ttl_secs = self.ttl.as_secs(),
            "Cached weather lookup"
        );

        Ok(response)
    }

    /// Snapshot of the underlying cache statistics
    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    async fn geocode(&self, city: &str) -> Result<LocationData, LookupError> {
        let response = self.upstream.geocode(city).await.map_err(|source| {
            warn!(city = %city, error = %source, "Geocoding request failed");
            LookupError::GeocodingFailure {
                city: city.to_string(),
                source,
            }
        })?;

        let Some(result) = response.into_first() else {
            debug!(city = %city, "Geocoder returned no results");
            return Err(LookupError::CityNotFound(city.to_string()));
        };

        Ok(LocationData {
            name: result.name,
            country: result.country.unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
            latitude: result.latitude,
            longitude: result.longitude,
        })
    }

    async fn fetch_current(
        &self,
        location: &LocationData,
    ) -> Result<CurrentConditions, LookupError> {
        let body = self
            .upstream
            .forecast(location.latitude, location.longitude)
            .await
            .map_err(|source| {
                warn!(
                    latitude = location.latitude,
                    longitude = location.longitude,
                    error = %source,
                    "Forecast request failed"
                );
                match source {
                    UpstreamError::Decode(reason) => {
                        LookupError::MalformedUpstreamPayload(reason)
                    }
                    other => LookupError::UpstreamUnavailable(other),
                }
            })?;

        parse_current(body).map_err(|reason| {
            warn!(
                latitude = location.latitude,
                longitude = location.longitude,
                error = %reason,
                "Forecast payload rejected"
            );
            LookupError::MalformedUpstreamPayload(reason)
        })
    }
}

fn assemble(location: LocationData, current: CurrentConditions) -> WeatherResponse {
    WeatherResponse {
        city: location.name,
        country: location.country,
        latitude: location.latitude,
        longitude: location.longitude,
        temperature: current.temperature_2m,
        apparent_temperature: current.apparent_temperature,
        humidity: current.relative_humidity_2m,
        precipitation: current.precipitation.unwrap_or(0.0),
        rain: current.rain.unwrap_or(0.0),
        wind_speed: current.wind_speed_10m,
        wind_direction: current.wind_direction_10m,
        cloud_cover: current.cloud_cover,
        pressure: current.surface_pressure,
        weather_code: current.weather_code,
        timestamp: current.time,
    }
}
