//! Requested forecast windows

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WeatherError;

/// Window of hourly data returned with a forecast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    /// `24h`
    #[default]
    #[serde(rename = "24h")]
    Day,
    /// `48h`
    #[serde(rename = "48h")]
    TwoDays,
    /// `7d`
    #[serde(rename = "7d")]
    Week,
}

impl TimeRange {
    /// Number of hourly points kept
    pub const fn hours(self) -> u32 {
        match self {
            TimeRange::Day => 24,
            TimeRange::TwoDays => 48,
            TimeRange::Week => 168,
        }
    }

    /// Canonical token
    pub const fn as_str(self) -> &'static str {
        match self {
            TimeRange::Day => "24h",
            TimeRange::TwoDays => "48h",
            TimeRange::Week => "7d",
        }
    }

    /// Parse a token, falling back to 24 hours for anything unrecognised
    pub fn lenient(token: &str) -> Self {
        token.parse().unwrap_or_default()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(TimeRange::Day),
            "48h" => Ok(TimeRange::TwoDays),
            "7d" => Ok(TimeRange::Week),
            other => Err(WeatherError::InvalidTimeRange(other.to_string())),
        }
    }
}

impl From<&str> for TimeRange {
    fn from(token: &str) -> Self {
        TimeRange::lenient(token)
    }
}
