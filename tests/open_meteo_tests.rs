//! Open-Meteo client tests against a local mock server

mod common;

use std::time::Duration;

use serde_json::json;
use weather_gateway::config::{Config, UpstreamConfig};
use weather_gateway::gateway::Gateway;
use weather_gateway::upstream::{FORECAST_FIELDS, OpenMeteoClient, UpstreamError, WeatherUpstream};
use weather_gateway::weather::LookupError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn upstream_config(server: &MockServer) -> UpstreamConfig {
    UpstreamConfig {
        geocoding_base_url: server.uri(),
        forecast_base_url: server.uri(),
        timeout: Duration::from_secs(2),
        ..Default::default()
    }
}

fn paris_geocoding() -> serde_json::Value {
    json!({
        "results": [{
            "id": 2988507,
            "name": "Paris",
            "latitude": 48.85341,
            "longitude": 2.3488,
            "country_code": "FR",
            "country": "France"
        }],
        "generationtime_ms": 0.9
    })
}

#[tokio::test]
async fn test_geocode_sends_expected_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Paris"))
        .and(query_param("count", "1"))
        .and(query_param("language", "en"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_geocoding()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenMeteoClient::new(&upstream_config(&server)).unwrap();
    let first = client.geocode("Paris").await.unwrap().into_first().unwrap();

    assert_eq!(first.name, "Paris");
    assert_eq!(first.country.as_deref(), Some("France"));
    assert!((first.latitude - 48.85341).abs() < 1e-9);
}

#[tokio::test]
async fn test_geocode_no_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generationtime_ms": 0.3})))
        .mount(&server)
        .await;

    let client = OpenMeteoClient::new(&upstream_config(&server)).unwrap();
    assert!(client.geocode("Xyzzy").await.unwrap().into_first().is_none());
}

#[tokio::test]
async fn test_forecast_sends_expected_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "48.85"))
        .and(query_param("longitude", "2.35"))
        .and(query_param("current", FORECAST_FIELDS.join(",")))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::test_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenMeteoClient::new(&upstream_config(&server)).unwrap();
    let body = client.forecast(48.85, 2.35).await.unwrap();

    assert_eq!(body["current"]["weather_code"], 1);
}

#[tokio::test]
async fn test_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = OpenMeteoClient::new(&upstream_config(&server)).unwrap();
    assert_eq!(
        client.forecast(1.0, 2.0).await.unwrap_err(),
        UpstreamError::Status(503)
    );
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = OpenMeteoClient::new(&upstream_config(&server)).unwrap();
    assert!(matches!(
        client.forecast(1.0, 2.0).await.unwrap_err(),
        UpstreamError::Decode(_)
    ));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(paris_geocoding())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = UpstreamConfig {
        timeout: Duration::from_millis(100),
        ..upstream_config(&server)
    };
    let client = OpenMeteoClient::new(&config).unwrap();

    assert!(matches!(
        client.geocode("Paris").await.unwrap_err(),
        UpstreamError::Transport(_)
    ));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_geocoding()))
        .expect(1)
        .mount(&server)
        .await;

    let config = UpstreamConfig {
        geocoding_base_url: format!("{}/", server.uri()),
        ..upstream_config(&server)
    };
    let client = OpenMeteoClient::new(&config).unwrap();
    assert!(client.geocode("Paris").await.is_ok());
}

#[tokio::test]
async fn test_gateway_lookup_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_geocoding()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": {
                "time": "2025-06-01T14:15",
                "temperature_2m": 22.4,
                "apparent_temperature": 21.9,
                "relative_humidity_2m": 48,
                "precipitation": 0.0,
                "rain": 0.0,
                "cloud_cover": 12,
                "surface_pressure": 1006.3,
                "wind_speed_10m": 9.4,
                "wind_direction_10m": 230,
                "weather_code": 0
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        upstream: upstream_config(&server),
        ..Default::default()
    };
    let gateway = Gateway::new(config).unwrap();
    let weather = gateway.weather();

    let first = weather.lookup("Paris").await.unwrap();
    assert_eq!(first.city, "Paris");
    assert_eq!(first.country, "France");
    assert_eq!(first.humidity, 48);
    assert_eq!(first.timestamp, "2025-06-01T14:15");

    // Served from cache; the `expect(1)` mocks verify on drop
    let second = weather.lookup("paris").await.unwrap();
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_gateway_lookup_geocoder_down() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::test_forecast()))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        upstream: upstream_config(&server),
        ..Default::default()
    };
    let weather = Gateway::new(config).unwrap().weather();

    assert!(matches!(
        weather.lookup("Paris").await.unwrap_err(),
        LookupError::GeocodingFailure { .. }
    ));
}
