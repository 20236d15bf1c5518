//! In-memory cache backend using DashMap

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use clima_cache_core::{CacheBackend, CacheEntry, CacheOptions, CacheStats, Result};

use super::ttl_index::TtlIndex;

/// Configuration for the memory backend
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Maximum number of entries (0 = unlimited)
    pub max_capacity: usize,
    /// How often the sweeper drains due deadlines
    pub sweep_tick: Duration,
    /// How often the sweeper runs a full scan for expired entries
    pub cleanup_interval: Duration,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            sweep_tick: Duration::from_secs(1),
            cleanup_interval: Duration::from_secs(30 * 60),
        }
    }
}

impl MemoryConfig {
    /// Create config with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            max_capacity: capacity,
            ..Default::default()
        }
    }

    /// Create config with unlimited capacity
    pub fn unlimited() -> Self {
        Self {
            max_capacity: 0,
            ..Default::default()
        }
    }

    /// Set the sweeper tick
    pub fn sweep_tick(mut self, tick: Duration) -> Self {
        self.sweep_tick = tick;
        self
    }

    /// Set the full cleanup interval
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }
}

/// Internal statistics tracking
#[derive(Debug, Default)]
struct MemoryStats {
    hits: u64,
    misses: u64,
    writes: u64,
    deletes: u64,
    evictions: u64,
}

/// In-memory cache backend
///
/// Uses `DashMap` for concurrent access and a min-heap [`TtlIndex`] for eager
/// expiration. Cloning creates a new handle to the SAME underlying store.
#[derive(Clone)]
pub struct MemoryBackend {
    /// Main data store
    data: Arc<DashMap<String, CacheEntry<Vec<u8>>>>,
    /// Expiry deadlines
    ttl_index: Arc<Mutex<TtlIndex>>,
    /// Statistics
    stats: Arc<RwLock<MemoryStats>>,
    /// Configuration
    pub(crate) config: MemoryConfig,
}

impl MemoryBackend {
    /// Create a new memory backend
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            data: Arc::new(DashMap::with_capacity(config.max_capacity.min(10_000))),
            ttl_index: Arc::new(Mutex::new(TtlIndex::new())),
            stats: Arc::new(RwLock::new(MemoryStats::default())),
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(MemoryConfig::default())
    }

    /// Backend configuration
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Make room for `key` if the store is full
    ///
    /// Replacing an existing key never evicts. Otherwise stale entries go
    /// first, then whichever entry is closest to expiring.
    fn make_room(&self, key: &str) {
        let capacity = self.config.max_capacity;
        if capacity == 0 || self.data.len() < capacity || self.data.contains_key(key) {
            return;
        }

        self.cleanup_expired();

        while self.data.len() >= capacity {
            let soonest = self.ttl_index.lock().soonest();
            let victim = match soonest {
                Some(victim) => victim,
                None => match self.data.iter().next().map(|entry| entry.key().clone()) {
                    Some(victim) => victim,
                    None => break,
                },
            };

            if self.remove_entry(&victim).is_some() {
                self.stats.write().evictions += 1;
                debug!(target: "clima_cache", key = %victim, "evicted entry to make room");
            } else {
                self.ttl_index.lock().remove(&victim);
            }
        }
    }

    /// Remove an entry and cancel its deadline
    fn remove_entry(&self, key: &str) -> Option<CacheEntry<Vec<u8>>> {
        let (_, entry) = self.data.remove(key)?;
        self.cancel_deadline(key, &entry);
        Some(entry)
    }

    fn cancel_deadline(&self, key: &str, entry: &CacheEntry<Vec<u8>>) {
        if let Some(deadline) = entry.expires_at() {
            self.ttl_index.lock().cancel(key, deadline);
        }
    }

    /// Remove `key` only if the stored entry is stale at `now`
    fn evict_if_expired(&self, key: &str, now: Instant) -> bool {
        match self.data.remove_if(key, |_, entry| entry.is_expired_at(now)) {
            Some((key, entry)) => {
                self.cancel_deadline(&key, &entry);
                true
            }
            None => false,
        }
    }

    /// Evict every key whose deadline has passed, as recorded in the index
    ///
    /// Returns the number of entries removed. A key replaced since its
    /// deadline was recorded is left alone.
    pub fn evict_due(&self, now: Instant) -> usize {
        let due = self.ttl_index.lock().drain_due(now);
        if due.is_empty() {
            return 0;
        }

        let evicted = due
            .iter()
            .filter(|key| {
                self.data
                    .remove_if(key.as_str(), |_, entry| entry.is_expired_at(now))
                    .is_some()
            })
            .count();

        if evicted > 0 {
            self.stats.write().evictions += evicted as u64;
        }
        evicted
    }

    /// Scan the whole store and evict every stale entry
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let stale: Vec<String> = self
            .data
            .iter()
            .filter(|entry| entry.is_expired_at(now))
            .map(|entry| entry.key().clone())
            .collect();

        let evicted = stale
            .iter()
            .filter(|key| self.evict_if_expired(key, now))
            .count();

        if evicted > 0 {
            self.stats.write().evictions += evicted as u64;
        }
        evicted
    }

    /// Number of keys with a live deadline
    pub fn scheduled(&self) -> usize {
        self.ttl_index.lock().len()
    }

    /// Get approximate memory usage
    pub fn memory_usage(&self) -> usize {
        self.data
            .iter()
            .map(|entry| entry.size + entry.key().len())
            .sum()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry<Vec<u8>>>> {
        let now = Instant::now();

        let expired = match self.data.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let entry = entry.clone();
                self.stats.write().hits += 1;
                return Ok(Some(entry));
            }
            Some(_) => true,
            None => false,
        };

        if expired && self.evict_if_expired(key, now) {
            self.stats.write().evictions += 1;
        }
        self.stats.write().misses += 1;
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, options: &CacheOptions) -> Result<()> {
        self.make_room(key);

        let size = value.len();
        let entry = CacheEntry::new(value, options.category, options.effective_ttl()).with_size(size);
        let deadline = entry.expires_at();

        self.data.insert(key.to_string(), entry);

        let mut index = self.ttl_index.lock();
        match deadline {
            Some(deadline) => index.schedule(key.to_string(), deadline),
            None => {
                index.remove(key);
            }
        }
        drop(index);

        self.stats.write().writes += 1;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        if self.remove_entry(key).is_some() {
            self.stats.write().deletes += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let now = Instant::now();

        let expired = match self.data.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => return Ok(false),
        };

        if expired && self.evict_if_expired(key, now) {
            self.stats.write().evictions += 1;
        }
        Ok(!expired)
    }

    async fn clear(&self) -> Result<()> {
        self.data.clear();
        self.ttl_index.lock().clear();
        Ok(())
    }

    async fn cleanup(&self) -> Result<usize> {
        Ok(self.cleanup_expired())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let now = Instant::now();
        let mut total_entries = 0;
        let mut expired_entries = 0;
        let mut memory_bytes = 0;
        let mut by_category = BTreeMap::new();

        for entry in self.data.iter() {
            total_entries += 1;
            if entry.is_expired_at(now) {
                expired_entries += 1;
            }
            memory_bytes += entry.size + entry.key().len();
            *by_category.entry(entry.category).or_insert(0) += 1;
        }

        let stats = self.stats.read();
        Ok(CacheStats {
            total_entries,
            valid_entries: total_entries - expired_entries,
            expired_entries,
            by_category,
            hits: stats.hits,
            misses: stats.misses,
            writes: stats.writes,
            deletes: stats.deletes,
            evictions: stats.evictions,
            memory_bytes,
        })
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.data.len())
    }
}
