//! Cached weather and geocoding gateway

use std::sync::Arc;

use chrono::NaiveDate;
use clima_cache::{
    build_key, CacheBackend, CacheCategory, CacheMetrics, CacheStats, ExpiringCache,
    JsonSerializer, MemoryBackend, NoopMetrics, Serializer,
};
use tracing::{debug, instrument, warn};

use crate::codes;
use crate::config::GatewayConfig;
use crate::error::{Result, WeatherError};
use crate::models::{validate_coordinates, DaySnapshot, LocationResult, WeatherSnapshot};
use crate::provider::{
    DayRequest, ForecastProvider, ForecastRequest, GeocodingProvider, SearchRequest,
};
use crate::shape::{shape_day, shape_forecast, FORECAST_DAYS};
use crate::time_range::TimeRange;

/// Country reported for reverse lookups that do not name one
pub const DEFAULT_COUNTRY: &str = "Brasil";

const LOCATION_PREFIX: &str = "location";
const REVERSE_PREFIX: &str = "location-reverse";
const WEATHER_PREFIX: &str = "weather";
const DAY_PREFIX: &str = "weather-day";

/// Weather gateway
///
/// Wraps a forecast provider and a geocoding provider with an
/// [`ExpiringCache`]. Identical queries inside the TTL window are answered
/// from the cache; concurrent identical misses share one provider call.
///
/// # Example
///
/// ```rust,ignore
/// let cache = ExpiringCache::in_memory(MemoryConfig::default())?;
/// let gateway = WeatherGateway::new(Arc::new(forecasts), Arc::new(places), cache);
///
/// let snapshot = gateway.weather_data(-23.55, -46.63, "48h").await?;
/// println!("{}°C {}", snapshot.current.temperature, snapshot.current.description);
/// ```
pub struct WeatherGateway<F, G, B = MemoryBackend, S = JsonSerializer, M = NoopMetrics>
where
    F: ForecastProvider,
    G: GeocodingProvider,
    B: CacheBackend,
    S: Serializer,
    M: CacheMetrics,
{
    forecast: Arc<F>,
    geocoding: Arc<G>,
    cache: ExpiringCache<B, S, M>,
    config: GatewayConfig,
}

impl<F, G, B, S, M> WeatherGateway<F, G, B, S, M>
where
    F: ForecastProvider,
    G: GeocodingProvider,
    B: CacheBackend,
    S: Serializer,
    M: CacheMetrics,
{
    /// Create a gateway with the default configuration
    pub fn new(
        forecast: Arc<F>,
        geocoding: Arc<G>,
        cache: ExpiringCache<B, S, M>,
    ) -> Self {
        Self::with_config(forecast, geocoding, cache, GatewayConfig::default())
    }

    /// Create a gateway with a custom configuration
    pub fn with_config(
        forecast: Arc<F>,
        geocoding: Arc<G>,
        cache: ExpiringCache<B, S, M>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            forecast,
            geocoding,
            cache,
            config,
        }
    }

    /// Get the gateway configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get the underlying cache
    pub fn cache(&self) -> &ExpiringCache<B, S, M> {
        &self.cache
    }

    // ========================================================================
    // Locations
    // ========================================================================

    /// Look up a place by name
    ///
    /// The name is trimmed and lower-cased for the cache key, so
    /// `"São Paulo"` and `" são paulo "` share one entry. A blank name or a
    /// name with no match yields `None`, which is never cached.
    #[instrument(skip(self))]
    pub async fn search_location(&self, name: &str) -> Result<Option<LocationResult>> {
        let query = name.trim();
        if query.is_empty() {
            return Ok(None);
        }
        let key = build_key([LOCATION_PREFIX, query.to_lowercase().as_str()]);

        self.cache
            .cached_fetch(key, CacheCategory::Location, || async {
                let request = self.search_request();
                let matches = self.geocoding.search(query, &request).await?;
                debug!(matches = matches.len(), "Geocoding search returned");
                Ok::<_, WeatherError>(matches.into_iter().next().map(LocationResult::from))
            })
            .await
    }

    /// Name the place nearest to a coordinate pair
    #[instrument(skip(self))]
    pub async fn location_name(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<LocationResult>> {
        validate_coordinates(latitude, longitude)?;
        let key = build_key([REVERSE_PREFIX.to_string(), coord(latitude), coord(longitude)]);

        self.cache
            .cached_fetch(key, CacheCategory::Location, || async {
                let request = self.search_request();
                let found = self.geocoding.reverse(latitude, longitude, &request).await?;
                Ok::<_, WeatherError>(found.map(|m| {
                    let mut location = LocationResult::from(m);
                    location
                        .country
                        .get_or_insert_with(|| DEFAULT_COUNTRY.to_string());
                    location
                }))
            })
            .await
    }

    /// Name the place at a coordinate pair, or label it by its coordinates
    ///
    /// Never fails on provider errors: they are logged and the coordinate
    /// label is returned instead.
    #[instrument(skip(self))]
    pub async fn location_or_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationResult> {
        validate_coordinates(latitude, longitude)?;
        match self.location_name(latitude, longitude).await {
            Ok(Some(location)) => Ok(location),
            Ok(None) => Ok(LocationResult::from_coordinates(latitude, longitude)),
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed, using coordinates");
                Ok(LocationResult::from_coordinates(latitude, longitude))
            }
        }
    }

    // ========================================================================
    // Forecasts
    // ========================================================================

    /// Current conditions, seven daily entries and hourly series for a
    /// location
    ///
    /// Hourly series hold 24, 48 or 168 points depending on `time_range`.
    /// Unrecognised range tokens fall back to 24 hours.
    pub async fn weather_data(
        &self,
        latitude: f64,
        longitude: f64,
        time_range: impl Into<TimeRange>,
    ) -> Result<WeatherSnapshot> {
        self.weather_for_range(latitude, longitude, time_range.into())
            .await
    }

    #[instrument(skip(self))]
    async fn weather_for_range(
        &self,
        latitude: f64,
        longitude: f64,
        range: TimeRange,
    ) -> Result<WeatherSnapshot> {
        validate_coordinates(latitude, longitude)?;
        let key = weather_key(latitude, longitude, range);

        self.cache
            .get_or_fetch(key, CacheCategory::Weather, || async {
                let request = ForecastRequest {
                    timezone: self.config.timezone.clone(),
                    forecast_days: FORECAST_DAYS as u8,
                    forecast_hours: range.hours(),
                };
                let raw = self.forecast.forecast(latitude, longitude, &request).await?;
                shape_forecast(&raw, range)
            })
            .await
    }

    /// Hourly series for one day
    ///
    /// `date` must be `YYYY-MM-DD`. Day snapshots live for
    /// [`GatewayConfig::day_ttl`] rather than the weather category default.
    #[instrument(skip(self))]
    pub async fn specific_day_data(
        &self,
        latitude: f64,
        longitude: f64,
        date: &str,
    ) -> Result<DaySnapshot> {
        validate_coordinates(latitude, longitude)?;
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| WeatherError::InvalidDate(date.to_string()))?;
        let key = build_key([
            DAY_PREFIX.to_string(),
            coord(latitude),
            coord(longitude),
            day.format("%Y-%m-%d").to_string(),
        ]);
        let options = (CacheCategory::Weather, Some(self.config.day_ttl()));

        self.cache
            .get_or_fetch(key, options, || async {
                let request = DayRequest {
                    date: day,
                    timezone: self.config.timezone.clone(),
                };
                let raw = self
                    .forecast
                    .day_forecast(latitude, longitude, &request)
                    .await?;
                shape_day(&raw, day)
            })
            .await
    }

    /// Drop the cached snapshot for a location and range
    ///
    /// Returns whether an entry was removed.
    pub async fn invalidate_weather(
        &self,
        latitude: f64,
        longitude: f64,
        time_range: impl Into<TimeRange>,
    ) -> Result<bool> {
        validate_coordinates(latitude, longitude)?;
        let key = weather_key(latitude, longitude, time_range.into());
        Ok(self.cache.delete(key).await?)
    }

    // ========================================================================
    // Code tables
    // ========================================================================

    /// Description of a WMO weather code
    pub fn weather_description(&self, code: i32) -> &'static str {
        codes::weather_description(code)
    }

    /// Icon file for a WMO weather code
    pub fn weather_icon(&self, code: i32) -> &'static str {
        codes::weather_icon(code)
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Cache statistics
    pub async fn cache_stats(&self) -> Result<CacheStats> {
        Ok(self.cache.stats().await?)
    }

    /// Remove every cached entry
    pub async fn cache_clear(&self) -> Result<()> {
        Ok(self.cache.clear().await?)
    }

    /// Evict stale entries, returning how many were removed
    pub async fn cache_cleanup(&self) -> Result<usize> {
        Ok(self.cache.cleanup().await?)
    }

    fn search_request(&self) -> SearchRequest {
        SearchRequest {
            count: self.config.search_count,
            language: self.config.language.clone(),
        }
    }
}

fn weather_key(latitude: f64, longitude: f64, range: TimeRange) -> String {
    build_key([
        WEATHER_PREFIX.to_string(),
        coord(latitude),
        coord(longitude),
        range.to_string(),
    ])
}

/// Coordinate rounded to two decimals for cache keys
fn coord(value: f64) -> String {
    let formatted = format!("{value:.2}");
    if formatted == "-0.00" {
        "0.00".to_string()
    } else {
        formatted
    }
}
