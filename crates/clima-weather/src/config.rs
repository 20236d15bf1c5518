//! Gateway configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Weather gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// IANA timezone the provider reports times in (default: America/Sao_Paulo)
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Language for place names (default: pt)
    #[serde(default = "default_language")]
    pub language: String,

    /// Number of geocoding matches requested (default: 1)
    #[serde(default = "default_search_count")]
    pub search_count: u8,

    /// Lifetime of single-day snapshots in minutes (default: 20)
    #[serde(default = "default_day_ttl")]
    pub day_ttl_minutes: u64,
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

fn default_language() -> String {
    "pt".to_string()
}

const fn default_search_count() -> u8 {
    1
}

const fn default_day_ttl() -> u64 {
    20
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            language: default_language(),
            search_count: default_search_count(),
            day_ttl_minutes: default_day_ttl(),
        }
    }
}

impl GatewayConfig {
    /// TTL applied to single-day snapshots
    pub fn day_ttl(&self) -> Duration {
        Duration::from_secs(self.day_ttl_minutes * 60)
    }
}
