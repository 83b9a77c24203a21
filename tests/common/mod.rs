//! Shared test fixtures

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use weather_gateway::upstream::{
    GeocodingResponse, GeocodingResult, UpstreamError, WeatherUpstream,
};

/// Upstream with canned answers and call counters
pub struct MockUpstream {
    pub geocode_result: Result<GeocodingResponse, UpstreamError>,
    pub forecast_result: Result<Value, UpstreamError>,
    pub panic_on_geocode: bool,
    pub geocode_calls: AtomicUsize,
    pub forecast_calls: AtomicUsize,
}

impl MockUpstream {
    pub fn new(
        geocode_result: Result<GeocodingResponse, UpstreamError>,
        forecast_result: Result<Value, UpstreamError>,
    ) -> Self {
        Self {
            geocode_result,
            forecast_result,
            panic_on_geocode: false,
            geocode_calls: AtomicUsize::new(0),
            forecast_calls: AtomicUsize::new(0),
        }
    }

    /// Geocodes everything to TestCity, TestLand (1.0, 2.0)
    pub fn test_city() -> Self {
        Self::new(Ok(geocoded("TestCity", Some("TestLand"))), Ok(test_forecast()))
    }

    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    pub fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherUpstream for MockUpstream {
    async fn geocode(&self, _city: &str) -> Result<GeocodingResponse, UpstreamError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        assert!(!self.panic_on_geocode, "geocoder exploded");
        self.geocode_result.clone()
    }

    async fn forecast(&self, _latitude: f64, _longitude: f64) -> Result<Value, UpstreamError> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        self.forecast_result.clone()
    }
}

pub fn geocoded(name: &str, country: Option<&str>) -> GeocodingResponse {
    GeocodingResponse {
        results: Some(vec![GeocodingResult {
            name: name.to_string(),
            country: country.map(str::to_string),
            latitude: 1.0,
            longitude: 2.0,
        }]),
    }
}

/// Forecast body for TestCity; `precipitation` and `rain` are absent
pub fn test_forecast() -> Value {
    json!({
        "latitude": 1.0,
        "longitude": 2.0,
        "current": {
            "time": "2025-01-01T12:00:00",
            "temperature_2m": 25.0,
            "apparent_temperature": 26.0,
            "relative_humidity_2m": 60,
            "wind_speed_10m": 10.0,
            "wind_direction_10m": 180,
            "cloud_cover": 20,
            "surface_pressure": 1012.0,
            "weather_code": 1
        }
    })
}
