//! Integration tests for the Open-Meteo client using wiremock
//!
//! These tests run the client, and a gateway on top of it, against a mock
//! HTTP server.

use std::sync::Arc;

use chrono::NaiveDate;
use clima_cache::{ExpiringCache, MemoryBackend};
use clima_weather::{
    DayRequest, ForecastProvider, ForecastRequest, GeocodingProvider, OpenMeteoClient,
    OpenMeteoConfig, SearchRequest, WeatherError, WeatherGateway,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

/// Sample forecast response with a week of daily and hourly data
fn sample_forecast_response(hours: usize) -> serde_json::Value {
    let times: Vec<String> = (0..hours)
        .map(|h| format!("2024-01-{:02}T{:02}:00", 15 + h / 24, h % 24))
        .collect();
    serde_json::json!({
        "latitude": -23.5,
        "longitude": -46.625,
        "generationtime_ms": 0.21,
        "utc_offset_seconds": -10800,
        "timezone": "America/Sao_Paulo",
        "timezone_abbreviation": "-03",
        "elevation": 760.0,
        "current": {
            "time": "2024-01-15T12:00",
            "interval": 900,
            "temperature_2m": 23.6,
            "relative_humidity_2m": 65,
            "wind_speed_10m": 9.8,
            "weather_code": 61
        },
        "daily": {
            "time": ["2024-01-15", "2024-01-16", "2024-01-17", "2024-01-18",
                     "2024-01-19", "2024-01-20", "2024-01-21"],
            "weather_code": [61, 3, 2, 1, 0, 80, 95],
            "temperature_2m_max": [27.5, 28.1, 29.9, 30.2, 31.0, 26.4, 24.8],
            "temperature_2m_min": [18.2, 18.9, 19.5, 20.1, 20.0, 19.3, 18.6],
            "precipitation_sum": [4.2, 0.0, 0.0, 0.0, 0.0, 12.5, 30.1]
        },
        "hourly": {
            "time": times,
            "temperature_2m": vec![22.5; hours],
            "relative_humidity_2m": vec![68; hours],
            "wind_speed_10m": vec![7.2; hours],
            "precipitation": vec![0.1; hours]
        }
    })
}

/// Sample geocoding response
fn sample_geocoding_response() -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "id": 3_448_439,
            "name": "São Paulo",
            "latitude": -23.5475,
            "longitude": -46.63611,
            "elevation": 769.0,
            "feature_code": "PPLA",
            "country_code": "BR",
            "timezone": "America/Sao_Paulo",
            "country": "Brasil",
            "admin1": "São Paulo"
        }],
        "generationtime_ms": 0.6
    })
}

/// Create a test client configured to use the mock server for both APIs
fn create_test_client(mock_server: &MockServer) -> OpenMeteoClient {
    let config = OpenMeteoConfig {
        base_url: mock_server.uri(),
        geocoding_url: mock_server.uri(),
        timeout_secs: 5,
    };
    OpenMeteoClient::new(config).expect("Failed to create client")
}

fn forecast_request(hours: u32) -> ForecastRequest {
    ForecastRequest {
        timezone: "America/Sao_Paulo".into(),
        forecast_days: 7,
        forecast_hours: hours,
    }
}

fn search_request() -> SearchRequest {
    SearchRequest {
        count: 1,
        language: "pt".into(),
    }
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn test_forecast_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("forecast_hours", "48"))
        .and(query_param("forecast_days", "7"))
        .and(query_param("timezone", "America/Sao_Paulo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response(48)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let raw = client
        .forecast(-23.55, -46.63, &forecast_request(48))
        .await
        .expect("forecast should succeed");

    let current = raw.current.expect("current present");
    assert_eq!(current.temperature_2m, Some(23.6));
    assert_eq!(current.weather_code, Some(61));
    assert_eq!(raw.daily.expect("daily present").time.len(), 7);
    assert_eq!(raw.hourly.expect("hourly present").time.len(), 48);
}

#[tokio::test]
async fn test_forecast_requests_all_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param(
            "current",
            "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code",
        ))
        .and(query_param(
            "daily",
            "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum",
        ))
        .and(query_param(
            "hourly",
            "temperature_2m,relative_humidity_2m,wind_speed_10m,precipitation",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response(24)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    assert!(client
        .forecast(-23.55, -46.63, &forecast_request(24))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_day_forecast_uses_date_bounds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("start_date", "2024-01-15"))
        .and(query_param("end_date", "2024-01-15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "hourly": {
                "time": ["2024-01-15T00:00", "2024-01-15T01:00"],
                "temperature_2m": [19.5, 19.1],
                "relative_humidity_2m": [88, 90],
                "wind_speed_10m": [3.2, 2.9]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let request = DayRequest {
        date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"),
        timezone: "America/Sao_Paulo".into(),
    };
    let raw = client
        .day_forecast(-23.55, -46.63, &request)
        .await
        .expect("day forecast should succeed");

    let hourly = raw.hourly.expect("hourly present");
    assert_eq!(hourly.time.len(), 2);
    assert!(hourly.precipitation.is_none());
}

// ============================================================================
// Geocoding
// ============================================================================

#[tokio::test]
async fn test_search_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "São Paulo"))
        .and(query_param("count", "1"))
        .and(query_param("language", "pt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_geocoding_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let matches = client
        .search("São Paulo", &search_request())
        .await
        .expect("search should succeed");

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "São Paulo");
    assert_eq!(matches[0].country.as_deref(), Some("Brasil"));
    assert!(matches[0].admin2.is_none());
}

#[tokio::test]
async fn test_search_without_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"generationtime_ms": 0.3})),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let matches = client
        .search("Xyzzy", &search_request())
        .await
        .expect("search should succeed");
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_reverse_returns_first_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_geocoding_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let found = client
        .reverse(-23.55, -46.63, &search_request())
        .await
        .expect("reverse should succeed")
        .expect("should find a place");
    assert_eq!(found.name, "São Paulo");
}

// ============================================================================
// Error scenarios
// ============================================================================

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.forecast(-23.55, -46.63, &forecast_request(24)).await;

    assert_eq!(
        result,
        Err(WeatherError::Status {
            status: 503,
            message: "maintenance".into(),
        })
    );
}

#[tokio::test]
async fn test_empty_error_body_uses_reason() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.search("São Paulo", &search_request()).await;

    assert_eq!(
        result,
        Err(WeatherError::Status {
            status: 429,
            message: "Too Many Requests".into(),
        })
    );
}

#[tokio::test]
async fn test_invalid_json_maps_to_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.forecast(-23.55, -46.63, &forecast_request(24)).await;

    assert!(matches!(result, Err(WeatherError::Parse(_))));
}

#[tokio::test]
async fn test_invalid_coordinates_skip_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    assert!(matches!(
        client.forecast(100.0, 0.0, &forecast_request(24)).await,
        Err(WeatherError::InvalidCoordinates { .. })
    ));
    assert!(matches!(
        client.reverse(0.0, 190.0, &search_request()).await,
        Err(WeatherError::InvalidCoordinates { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_server_maps_to_transport() {
    let config = OpenMeteoConfig {
        base_url: "http://127.0.0.1:1".into(),
        geocoding_url: "http://127.0.0.1:1".into(),
        timeout_secs: 1,
    };
    let client = OpenMeteoClient::new(config).expect("client creation should succeed");

    let result = client.forecast(-23.55, -46.63, &forecast_request(24)).await;
    assert!(matches!(result, Err(WeatherError::Transport(_))));
}

// ============================================================================
// Gateway over HTTP
// ============================================================================

#[tokio::test]
async fn test_gateway_caches_http_responses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_geocoding_response()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("forecast_hours", "24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response(24)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Arc::new(create_test_client(&mock_server));
    let cache = ExpiringCache::new(MemoryBackend::with_defaults());
    let gateway = WeatherGateway::new(client.clone(), client, cache);

    let place = gateway
        .search_location("São Paulo")
        .await
        .expect("search should succeed")
        .expect("should find a match");
    gateway
        .search_location("são paulo")
        .await
        .expect("search should succeed");

    let first = gateway
        .weather_data(place.latitude, place.longitude, "24h")
        .await
        .expect("weather should succeed");
    let second = gateway
        .weather_data(place.latitude, place.longitude, "24h")
        .await
        .expect("weather should succeed");

    assert_eq!(first, second);
    assert_eq!(first.current.temperature, 24);
    assert_eq!(first.current.description, "Chuva leve");
    assert_eq!(first.current.icon, "chuva.png");
    assert_eq!(first.forecast.len(), 7);
    assert_eq!(first.hourly.temperature.len(), 24);
    assert_eq!(first.hourly.temperature.values[0], 23);
    // `.expect(1)` on each mock is verified when the server drops
}
