//! Cache statistics

use std::collections::BTreeMap;

use serde::Serialize;

use super::category::CacheCategory;

/// Diagnostic snapshot of a cache
///
/// Entry counts describe the store at the moment the snapshot was taken;
/// taking a snapshot never evicts. The counters are cumulative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries currently held, fresh or not
    pub total_entries: usize,
    /// Entries still within their TTL
    pub valid_entries: usize,
    /// Entries past their TTL that nothing has evicted yet
    pub expired_entries: usize,
    /// Entries held per category
    pub by_category: BTreeMap<CacheCategory, usize>,
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of write operations
    pub writes: u64,
    /// Number of delete operations
    pub deletes: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Approximate memory usage in bytes
    pub memory_bytes: usize,
}

impl CacheStats {
    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Calculate miss ratio (0.0 to 1.0)
    pub fn miss_ratio(&self) -> f64 {
        1.0 - self.hit_ratio()
    }

    /// Total requests (hits + misses)
    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Entries held for one category
    pub fn category_count(&self, category: CacheCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}
