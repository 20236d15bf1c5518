//! Cache options and builder

use std::time::Duration;

use super::category::CacheCategory;

/// Configuration options for a cache entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheOptions {
    /// Category used to pick the default TTL
    pub category: CacheCategory,
    /// Explicit TTL, overriding the category default
    pub ttl: Option<Duration>,
}

impl CacheOptions {
    /// TTL the entry will be stored with
    pub fn effective_ttl(&self) -> Duration {
        self.ttl.unwrap_or_else(|| self.category.default_ttl())
    }
}

/// Builder for CacheOptions with fluent API
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheOpts(CacheOptions);

impl CacheOpts {
    /// Create new options builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category
    pub fn category(mut self, category: CacheCategory) -> Self {
        self.0.category = category;
        self
    }

    /// Set TTL
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.0.ttl = Some(duration);
        self
    }

    /// Set TTL only when one is given
    pub fn maybe_ttl(mut self, duration: Option<Duration>) -> Self {
        self.0.ttl = duration.or(self.0.ttl);
        self
    }

    /// Set TTL in seconds
    pub fn ttl_secs(self, seconds: u64) -> Self {
        self.ttl(Duration::from_secs(seconds))
    }

    /// Set TTL in minutes
    pub fn ttl_mins(self, minutes: u64) -> Self {
        self.ttl(Duration::from_secs(minutes * 60))
    }

    /// Build the options
    pub fn build(self) -> CacheOptions {
        self.0
    }
}

impl From<CacheOpts> for CacheOptions {
    fn from(opts: CacheOpts) -> Self {
        opts.0
    }
}

impl From<CacheCategory> for CacheOptions {
    fn from(category: CacheCategory) -> Self {
        CacheOptions {
            category,
            ttl: None,
        }
    }
}

impl From<Duration> for CacheOptions {
    fn from(ttl: Duration) -> Self {
        CacheOptions {
            ttl: Some(ttl),
            ..Default::default()
        }
    }
}

impl From<(CacheCategory, Option<Duration>)> for CacheOptions {
    fn from((category, ttl): (CacheCategory, Option<Duration>)) -> Self {
        CacheOptions { category, ttl }
    }
}
