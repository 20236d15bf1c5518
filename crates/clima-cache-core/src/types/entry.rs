//! Cache entry type

use std::time::Duration;
use tokio::time::Instant;

use super::category::CacheCategory;

/// A cached entry with its expiry metadata
///
/// Timestamps come from [`tokio::time::Instant`], so a paused test runtime
/// drives expiry deterministically.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached value
    pub value: T,
    /// When the entry was stored
    pub inserted_at: Instant,
    /// Lifetime measured from `inserted_at`
    pub ttl: Duration,
    /// Category the TTL was chosen for
    pub category: CacheCategory,
    /// Size in bytes
    pub size: usize,
}

impl<T> CacheEntry<T> {
    /// Create a new entry stamped with the current instant
    pub fn new(value: T, category: CacheCategory, ttl: Duration) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            ttl,
            category,
            size: 0,
        }
    }

    /// Set the recorded size
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Instant after which the entry is stale
    ///
    /// `None` when the TTL is too large to represent, which means never.
    pub fn expires_at(&self) -> Option<Instant> {
        self.inserted_at.checked_add(self.ttl)
    }

    /// Whether the entry is stale at `now`
    ///
    /// An entry is fresh while `now - inserted_at <= ttl`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) > self.ttl
    }

    /// Check if entry has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Get remaining TTL
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.age())
    }

    /// Get age of the entry
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }

    /// Map the value, keeping the metadata
    pub fn map<U, F>(self, f: F) -> CacheEntry<U>
    where
        F: FnOnce(T) -> U,
    {
        CacheEntry {
            value: f(self.value),
            inserted_at: self.inserted_at,
            ttl: self.ttl,
            category: self.category,
            size: self.size,
        }
    }
}
