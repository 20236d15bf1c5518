//! Cache categories and their default lifetimes

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::CacheError;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;

/// Classification of a cached value, used only to pick a default TTL
///
/// The set is closed: parsing a name outside it fails instead of falling
/// back to [`CacheCategory::Default`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CacheCategory {
    /// Weather observations and forecasts
    Weather,
    /// Geocoding lookups
    Location,
    /// Market quotes
    Market,
    /// Agronomic and crop data
    Crops,
    /// User and session data
    User,
    /// Anything unclassified
    #[default]
    Default,
}

impl CacheCategory {
    /// Every category, in declaration order
    pub const ALL: [CacheCategory; 6] = [
        CacheCategory::Weather,
        CacheCategory::Location,
        CacheCategory::Market,
        CacheCategory::Crops,
        CacheCategory::User,
        CacheCategory::Default,
    ];

    /// Lifetime applied when a value is stored without an explicit TTL
    pub const fn default_ttl(self) -> Duration {
        match self {
            CacheCategory::Weather => Duration::from_secs(10 * MINUTE),
            CacheCategory::Location => Duration::from_secs(HOUR),
            CacheCategory::Market => Duration::from_secs(5 * MINUTE),
            CacheCategory::Crops => Duration::from_secs(30 * MINUTE),
            CacheCategory::User => Duration::from_secs(24 * HOUR),
            CacheCategory::Default => Duration::from_secs(15 * MINUTE),
        }
    }

    /// Get category as string label
    pub const fn as_str(self) -> &'static str {
        match self {
            CacheCategory::Weather => "weather",
            CacheCategory::Location => "location",
            CacheCategory::Market => "market",
            CacheCategory::Crops => "crops",
            CacheCategory::User => "user",
            CacheCategory::Default => "default",
        }
    }
}

impl fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheCategory {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| CacheError::UnknownCategory(s.to_string()))
    }
}
