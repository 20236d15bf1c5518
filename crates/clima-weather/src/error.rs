//! Weather gateway errors

use clima_cache::CacheError;
use thiserror::Error;

/// Errors surfaced by the weather gateway and its providers
///
/// Clone-able so one failed fetch can be handed to every caller waiting on it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    /// The request never produced a response
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The provider answered with a non-success status
    #[error("Provider returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// The payload decoded but lacks a required field or has mismatched series
    #[error("Malformed payload: {0}")]
    Shaping(String),

    /// A date was not in `YYYY-MM-DD` form
    #[error("Invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A time range token outside `24h`, `48h`, `7d`
    #[error("Invalid time range {0:?}: expected 24h, 48h or 7d")]
    InvalidTimeRange(String),

    /// Coordinates outside the valid range
    #[error("Invalid coordinates ({latitude}, {longitude}): latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates {
        /// Requested latitude
        latitude: f64,
        /// Requested longitude
        longitude: f64,
    },

    /// The cache failed to store or decode a value
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result type alias for weather operations
pub type Result<T> = std::result::Result<T, WeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WeatherError::InvalidCoordinates {
            latitude: 91.0,
            longitude: 0.0,
        };
        assert!(err.to_string().contains("latitude"));
        assert!(err.to_string().contains("91"));

        let err = WeatherError::Status {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "Provider returned HTTP 503: unavailable");
    }

    #[test]
    fn test_cache_error_is_transparent() {
        let err: WeatherError = CacheError::Serialization("bad".into()).into();
        assert_eq!(err.to_string(), CacheError::Serialization("bad".into()).to_string());
        assert!(matches!(err, WeatherError::Cache(_)));
    }
}
