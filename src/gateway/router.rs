//! HTTP router and handlers

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};
use unicode_normalization::UnicodeNormalization;

use crate::config::CorsConfig;
use crate::weather::{LookupError, WeatherService};

/// Weather endpoint path
pub const WEATHER_PATH: &str = "/api/v1/weather";

/// Accepted city name length, in characters
const CITY_LEN: std::ops::RangeInclusive<usize> = 2..=80;

/// Shared application state
pub struct AppState {
    /// Weather lookup orchestrator
    pub weather: Arc<WeatherService>,
}

/// Create the router
pub fn create_router(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(WEATHER_PATH, get(weather_handler))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(cors))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for the configured origins; methods and headers are
/// mirrored from the preflight request.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Error body returned to clients: `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        let status = match &err {
            LookupError::CityNotFound(_) | LookupError::GeocodingFailure { .. } => {
                StatusCode::NOT_FOUND
            }
            LookupError::UpstreamUnavailable(_) | LookupError::MalformedUpstreamPayload(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %message, "Request handler panicked");
    ApiError::internal().into_response()
}

/// Query string of the weather endpoint
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    /// City name to look up
    pub city: Option<String>,
}

/// Check a city name: 2–80 characters, each a letter (any script), space,
/// hyphen, or apostrophe. The name is checked in NFC form so decomposed
/// accents count as the letters they compose.
pub fn validate_city(city: &str) -> Result<(), String> {
    let city: String = city.nfc().collect();
    let len = city.chars().count();
    if !CITY_LEN.contains(&len) {
        return Err(format!(
            "city must be between {} and {} characters",
            CITY_LEN.start(),
            CITY_LEN.end()
        ));
    }

    if let Some(bad) = city
        .chars()
        .find(|c| !(c.is_alphabetic() || matches!(c, ' ' | '-' | '\'' | '\u{2019}')))
    {
        return Err(format!(
            "city may only contain letters, spaces, hyphens and apostrophes (found '{bad}')"
        ));
    }

    if !city.chars().any(char::is_alphabetic) {
        return Err("city must contain at least one letter".to_string());
    }

    Ok(())
}

/// GET / - service banner
async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "message": "Weather API",
        "usage": format!("{WEATHER_PATH}?city={{city}}"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health - liveness plus cache statistics
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "cache": state.weather.cache_stats(),
    }))
}

/// GET /api/v1/weather?city=... - current weather for a city
async fn weather_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
    })?;

    let city = query
        .city
        .ok_or_else(|| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "city is required"))?;

    validate_city(&city).map_err(|detail| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, detail))?;

    let response = state.weather.lookup(&city).await?;
    Ok(Json(response).into_response())
}
