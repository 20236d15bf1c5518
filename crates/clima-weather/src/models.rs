//! Weather data models
//!
//! Raw payloads as the provider reports them, and the shaped snapshots the
//! gateway caches and returns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WeatherError};

// ============================================================================
// Raw provider payloads
// ============================================================================

/// Forecast payload as reported by the provider
///
/// Sections the request did not ask for are absent. Missing arrays decode as
/// empty so shaping can report them precisely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecast {
    /// Latitude of the grid cell used
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude of the grid cell used
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Timezone the times are expressed in
    #[serde(default)]
    pub timezone: Option<String>,
    /// Current conditions
    #[serde(default)]
    pub current: Option<RawCurrent>,
    /// Daily aggregates
    #[serde(default)]
    pub daily: Option<RawDaily>,
    /// Hourly series
    #[serde(default)]
    pub hourly: Option<RawHourly>,
}

/// Current conditions block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCurrent {
    /// Observation time
    #[serde(default)]
    pub time: Option<String>,
    /// Temperature at 2m in °C
    #[serde(default)]
    pub temperature_2m: Option<f64>,
    /// Relative humidity at 2m in %
    #[serde(default)]
    pub relative_humidity_2m: Option<u8>,
    /// Wind speed at 10m in km/h
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
    /// WMO weather code
    #[serde(default)]
    pub weather_code: Option<i32>,
}

/// Daily aggregates block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDaily {
    /// Dates (YYYY-MM-DD)
    #[serde(default)]
    pub time: Vec<String>,
    /// WMO weather codes
    #[serde(default)]
    pub weather_code: Vec<i32>,
    /// Maximum temperatures in °C
    #[serde(default)]
    pub temperature_2m_max: Vec<f64>,
    /// Minimum temperatures in °C
    #[serde(default)]
    pub temperature_2m_min: Vec<f64>,
    /// Precipitation totals in mm
    #[serde(default)]
    pub precipitation_sum: Vec<f64>,
}

/// Hourly series block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHourly {
    /// Timestamps (YYYY-MM-DDTHH:MM)
    #[serde(default)]
    pub time: Vec<String>,
    /// Temperatures at 2m in °C
    #[serde(default)]
    pub temperature_2m: Vec<f64>,
    /// Relative humidity at 2m in %
    #[serde(default)]
    pub relative_humidity_2m: Vec<u8>,
    /// Wind speed at 10m in km/h
    #[serde(default)]
    pub wind_speed_10m: Vec<f64>,
    /// Precipitation in mm; some models do not report it
    #[serde(default)]
    pub precipitation: Option<Vec<f64>>,
}

/// One geocoding match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMatch {
    /// Place name
    pub name: String,
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
    /// Country name
    #[serde(default)]
    pub country: Option<String>,
    /// First-level subdivision (state)
    #[serde(default)]
    pub admin1: Option<String>,
    /// Second-level subdivision (municipality)
    #[serde(default)]
    pub admin2: Option<String>,
}

// ============================================================================
// Shaped snapshots
// ============================================================================

/// Current conditions, rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in °C, rounded
    pub temperature: i32,
    /// Relative humidity in %
    pub humidity: u8,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// WMO weather code
    pub weather_code: i32,
    /// Icon file for the code
    pub icon: String,
    /// Description of the code
    pub description: String,
}

/// One day of the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Forecast date
    pub date: NaiveDate,
    /// Maximum temperature in °C, rounded
    pub max_temp: i32,
    /// Minimum temperature in °C, rounded
    pub min_temp: i32,
    /// Precipitation total in mm
    pub precipitation: f64,
    /// WMO weather code
    pub weather_code: i32,
    /// Icon file for the code
    pub icon: String,
}

/// Parallel timestamp/value arrays for one variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries<T> {
    /// Timestamps
    pub times: Vec<String>,
    /// Values, one per timestamp
    pub values: Vec<T>,
}

impl<T> HourlySeries<T> {
    /// Number of points
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the series has no points
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterate `(time, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.times.iter().map(String::as_str).zip(self.values.iter())
    }
}

/// Hourly series for the four measured variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyData {
    /// Temperature in °C, rounded
    pub temperature: HourlySeries<i32>,
    /// Relative humidity in %
    pub humidity: HourlySeries<u8>,
    /// Wind speed in km/h
    pub wind_speed: HourlySeries<f64>,
    /// Precipitation in mm
    ///
    /// Values are empty when the provider did not report precipitation.
    pub precipitation: HourlySeries<f64>,
}

/// Shaped forecast for one location and time range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Current conditions
    pub current: CurrentConditions,
    /// Exactly seven daily entries
    pub forecast: Vec<DailyForecast>,
    /// Hourly series truncated to the time range
    pub hourly: HourlyData,
}

/// Hourly data for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySnapshot {
    /// The requested day
    pub date: NaiveDate,
    /// Whatever hours the provider returned for that day
    pub hourly: HourlyData,
}

/// A resolved place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    /// Place name
    pub name: String,
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
    /// Country name
    pub country: Option<String>,
    /// First-level subdivision (state)
    pub admin1: Option<String>,
    /// Second-level subdivision (municipality)
    pub admin2: Option<String>,
}

impl LocationResult {
    /// Location labelled by its coordinates, for when no place name is known
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self {
            name: format!("{latitude:.4}, {longitude:.4}"),
            latitude,
            longitude,
            country: None,
            admin1: None,
            admin2: None,
        }
    }
}

impl From<GeoMatch> for LocationResult {
    fn from(m: GeoMatch) -> Self {
        Self {
            name: m.name,
            latitude: m.latitude,
            longitude: m.longitude,
            country: m.country,
            admin1: m.admin1,
            admin2: m.admin2,
        }
    }
}

/// Reject latitudes outside ±90 and longitudes outside ±180 (NaN included)
pub(crate) fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(WeatherError::InvalidCoordinates {
            latitude,
            longitude,
        });
    }
    Ok(())
}
