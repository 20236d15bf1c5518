//! Upstream collaborators
//!
//! The gateway never talks HTTP itself. It asks a [`ForecastProvider`] and a
//! [`GeocodingProvider`] for raw payloads and shapes what comes back.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{GeoMatch, RawForecast};

/// Parameters for a place lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Maximum number of matches
    pub count: u8,
    /// Language for place names
    pub language: String,
}

/// Parameters for a multi-day forecast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    /// IANA timezone for the returned times
    pub timezone: String,
    /// Number of daily entries
    pub forecast_days: u8,
    /// Number of hourly points
    pub forecast_hours: u32,
}

/// Parameters for a single-day hourly forecast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRequest {
    /// The day requested, used as both start and end date
    pub date: NaiveDate,
    /// IANA timezone for the returned times
    pub timezone: String,
}

/// Source of place names and coordinates
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Find places matching a name, best match first
    ///
    /// An unknown name yields an empty list, not an error.
    async fn search(&self, name: &str, request: &SearchRequest) -> Result<Vec<GeoMatch>>;

    /// Find the named place nearest to a coordinate pair
    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
        request: &SearchRequest,
    ) -> Result<Option<GeoMatch>>;
}

/// Source of raw forecast payloads
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Current conditions, daily aggregates and hourly series
    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        request: &ForecastRequest,
    ) -> Result<RawForecast>;

    /// Hourly series for a single day
    async fn day_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        request: &DayRequest,
    ) -> Result<RawForecast>;
}
