//! Open-Meteo geocoding and forecast client

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{FORECAST_FIELDS, GeocodingResponse, UpstreamError, WeatherUpstream};
use crate::Result;
use crate::config::UpstreamConfig;

/// HTTP client for the Open-Meteo APIs
///
/// Holds one `reqwest::Client`, so every request shares its connection pool.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    search_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    /// Create a client from upstream configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            search_url: format!("{}/search", config.geocoding_base_url.trim_end_matches('/')),
            forecast_url: format!("{}/forecast", config.forecast_base_url.trim_end_matches('/')),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<T, UpstreamError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let response = check_status(response)?;

        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

fn check_status(response: Response) -> std::result::Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        debug!(url = %response.url(), status = status.as_u16(), "Upstream returned error status");
        Err(UpstreamError::Status(status.as_u16()))
    }
}

#[async_trait]
impl WeatherUpstream for OpenMeteoClient {
    async fn geocode(&self, city: &str) -> std::result::Result<GeocodingResponse, UpstreamError> {
        let query = [
            ("name", city.to_string()),
            ("count", "1".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];
        self.get_json(&self.search_url, &query).await
    }

    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> std::result::Result<Value, UpstreamError> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", FORECAST_FIELDS.join(",")),
            ("timezone", "auto".to_string()),
        ];
        self.get_json(&self.forecast_url, &query).await
    }
}
