//! Open-Meteo HTTP client
//!
//! Implements both provider traits against the Open-Meteo forecast and
//! geocoding APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Result, WeatherError};
use crate::models::{validate_coordinates, GeoMatch, RawForecast};
use crate::provider::{
    DayRequest, ForecastProvider, ForecastRequest, GeocodingProvider, SearchRequest,
};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,precipitation";

/// Open-Meteo client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenMeteoConfig {
    /// Forecast API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Geocoding API base URL (default: <https://geocoding-api.open-meteo.com/v1>)
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            geocoding_url: default_geocoding_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Geocoding response envelope; `results` is absent when nothing matched
#[derive(Debug, Deserialize)]
struct GeoResults {
    #[serde(default)]
    results: Option<Vec<GeoMatch>>,
}

/// Open-Meteo HTTP client
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoClient {
    /// Create a client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: OpenMeteoConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a client with the default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self> {
        Self::new(OpenMeteoConfig::default())
    }

    /// Get the client configuration
    pub fn config(&self) -> &OpenMeteoConfig {
        &self.config
    }

    async fn get_json<T, Q>(&self, url: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("unknown").to_string()
        } else {
            body
        };
        Err(WeatherError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    #[instrument(skip(self, request), fields(lat = %latitude, lon = %longitude, hours = request.forecast_hours))]
    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        request: &ForecastRequest,
    ) -> Result<RawForecast> {
        validate_coordinates(latitude, longitude)?;

        let url = format!("{}/forecast", self.config.base_url);
        debug!(url = %url, "Fetching forecast");

        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("timezone", request.timezone.clone()),
            ("forecast_days", request.forecast_days.to_string()),
            ("forecast_hours", request.forecast_hours.to_string()),
        ];
        self.get_json(&url, &query).await
    }

    #[instrument(skip(self, request), fields(lat = %latitude, lon = %longitude, date = %request.date))]
    async fn day_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        request: &DayRequest,
    ) -> Result<RawForecast> {
        validate_coordinates(latitude, longitude)?;

        let url = format!("{}/forecast", self.config.base_url);
        debug!(url = %url, "Fetching single-day forecast");

        let date = request.date.format("%Y-%m-%d").to_string();
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("start_date", date.clone()),
            ("end_date", date),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("timezone", request.timezone.clone()),
        ];
        self.get_json(&url, &query).await
    }
}

#[async_trait]
impl GeocodingProvider for OpenMeteoClient {
    #[instrument(skip(self, request))]
    async fn search(&self, name: &str, request: &SearchRequest) -> Result<Vec<GeoMatch>> {
        let url = format!("{}/search", self.config.geocoding_url);
        debug!(url = %url, "Searching location");

        let query = [
            ("name", name.to_string()),
            ("count", request.count.to_string()),
            ("language", request.language.clone()),
            ("format", "json".to_string()),
        ];
        let found: GeoResults = self.get_json(&url, &query).await?;
        Ok(found.results.unwrap_or_default())
    }

    #[instrument(skip(self, request), fields(lat = %latitude, lon = %longitude))]
    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
        request: &SearchRequest,
    ) -> Result<Option<GeoMatch>> {
        validate_coordinates(latitude, longitude)?;

        let url = format!("{}/reverse", self.config.geocoding_url);
        debug!(url = %url, "Reverse geocoding");

        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("count", "1".to_string()),
            ("language", request.language.clone()),
            ("format", "json".to_string()),
        ];
        let found: GeoResults = self.get_json(&url, &query).await?;
        Ok(found.results.and_then(|r| r.into_iter().next()))
    }
}
