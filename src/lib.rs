//! Weather Gateway Library
//!
//! Current-weather lookups by city name, composed from the Open-Meteo
//! geocoding and forecast APIs and cached per city for a bounded time.
//!
//! # Features
//!
//! - **TTL cache**: concurrent, lazily evicting, with hit/miss statistics
//! - **Typed failures**: a closed set of lookup errors mapped to HTTP statuses
//! - **Pluggable upstream**: the [`upstream::WeatherUpstream`] trait lets tests
//!   and alternative providers replace Open-Meteo
//! - **Production plumbing**: CORS, tracing, graceful shutdown

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod upstream;
pub mod weather;

pub use error::{Error, Result};
pub use weather_core::{LocationData, WeatherResponse};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => subscriber
            .with(fmt::layer().json())
            .try_init()
            .map_err(|e| Error::Internal(e.to_string()))?,
        _ => subscriber
            .with(fmt::layer())
            .try_init()
            .map_err(|e| Error::Internal(e.to_string()))?,
    }

    Ok(())
}
