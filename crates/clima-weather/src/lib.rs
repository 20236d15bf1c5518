//! clima-weather: cached weather and geocoding gateway
//!
//! [`WeatherGateway`] sits between consumers and the weather service. It
//! builds deterministic cache keys from normalised inputs, answers repeat
//! queries from an [`ExpiringCache`](clima_cache::ExpiringCache), and shapes
//! raw provider payloads into display-ready snapshots.
//!
//! # Features
//!
//! - `open-meteo` (default): [`OpenMeteoClient`], a reqwest implementation of
//!   both provider traits
//! - `cache-tracing` / `cache-metrics`: enable the `tracing` / `metrics`
//!   adapters in `clima-cache`
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "open-meteo")]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use clima_cache::{ExpiringCache, MemoryConfig};
//! use clima_weather::{OpenMeteoClient, WeatherGateway};
//!
//! let client = Arc::new(OpenMeteoClient::with_defaults()?);
//! let cache = ExpiringCache::in_memory(MemoryConfig::default())?;
//! let gateway = WeatherGateway::new(client.clone(), client, cache);
//!
//! if let Some(place) = gateway.search_location("São Paulo").await? {
//!     let weather = gateway.weather_data(place.latitude, place.longitude, "24h").await?;
//!     println!("{}: {}°C", place.name, weather.current.temperature);
//! }
//! # Ok(())
//! # }
//! ```

pub mod codes;
mod config;
mod error;
mod gateway;
mod models;
mod provider;
mod shape;
mod time_range;

#[cfg(feature = "open-meteo")]
mod client;

pub use codes::{weather_description, weather_icon, DEFAULT_ICON, UNKNOWN_DESCRIPTION};
pub use config::GatewayConfig;
pub use error::{Result, WeatherError};
pub use gateway::{WeatherGateway, DEFAULT_COUNTRY};
pub use models::{
    CurrentConditions, DailyForecast, DaySnapshot, GeoMatch, HourlyData, HourlySeries,
    LocationResult, RawCurrent, RawDaily, RawForecast, RawHourly, WeatherSnapshot,
};
pub use provider::{
    DayRequest, ForecastProvider, ForecastRequest, GeocodingProvider, SearchRequest,
};
pub use shape::{round_half_up, shape_day, shape_forecast, FORECAST_DAYS};
pub use time_range::TimeRange;

#[cfg(feature = "open-meteo")]
pub use client::{OpenMeteoClient, OpenMeteoConfig};
