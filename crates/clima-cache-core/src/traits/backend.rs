//! Cache backend trait

use async_trait::async_trait;
use crate::{CacheEntry, CacheError, CacheOptions, CacheStats};

/// Core trait for cache storage backends
///
/// A backend never hands out a stale entry: `get` and `exists` check
/// freshness and remove what they find expired.
#[async_trait]
pub trait CacheBackend: Send + Sync + 'static {
    /// Get a value from the cache
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry<Vec<u8>>>, CacheError>;

    /// Set a value in the cache, replacing any previous entry and its
    /// scheduled eviction
    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        options: &CacheOptions,
    ) -> Result<(), CacheError>;

    /// Delete a key from the cache
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Check if a fresh entry exists for the key
    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    /// Clear all entries from the cache
    async fn clear(&self) -> Result<(), CacheError>;

    /// Evict every expired entry
    ///
    /// Returns the number of entries evicted.
    async fn cleanup(&self) -> Result<usize, CacheError>;

    /// Get cache statistics
    async fn stats(&self) -> Result<CacheStats, CacheError>;

    /// Get the number of entries in the cache
    async fn len(&self) -> Result<usize, CacheError>;

    /// Check if the cache is empty
    async fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len().await? == 0)
    }
}
