//! High-level expiring cache

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;

use clima_cache_core::{
    CacheBackend, CacheCategory, CacheEntry, CacheKey, CacheMetrics, CacheOperation, CacheOptions,
    CacheStats, EvictionReason, JsonSerializer, NoopMetrics, Result, Serializer,
};
use clima_cache_storage::{MemoryBackend, MemoryConfig, SweeperHandle};

mod coalescer;
use coalescer::Coalescer;

mod fetch;

/// Configuration for ExpiringCache
#[derive(Debug, Clone)]
pub struct ExpiringCacheConfig {
    /// Namespace prefix for all keys
    pub namespace: Option<String>,
    /// Per-category TTLs replacing the built-in defaults
    pub category_ttls: HashMap<CacheCategory, Duration>,
    /// Share one producer run among concurrent misses on the same key
    pub coalesce_fetches: bool,
}

impl Default for ExpiringCacheConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            category_ttls: HashMap::new(),
            coalesce_fetches: true,
        }
    }
}

impl ExpiringCacheConfig {
    /// Create config with namespace
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }

    /// Override the default TTL of one category
    pub fn category_ttl(mut self, category: CacheCategory, ttl: Duration) -> Self {
        self.category_ttls.insert(category, ttl);
        self
    }

    /// Disable in-flight deduplication
    pub fn no_coalescing(mut self) -> Self {
        self.coalesce_fetches = false;
        self
    }

    /// TTL used for a category when no explicit TTL is given
    pub fn ttl_for(&self, category: CacheCategory) -> Duration {
        self.category_ttls
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.default_ttl())
    }
}

/// Expiring key/value cache with pluggable serialization and metrics
///
/// Generic over:
/// - `B`: The storage backend
/// - `S`: The serializer
/// - `M`: The metrics collector
///
/// Clones share the same store. A sweeper started with
/// [`ExpiringCache::start_sweeper`] runs until the last clone is dropped or
/// [`ExpiringCache::shutdown`] is called.
pub struct ExpiringCache<B = MemoryBackend, S = JsonSerializer, M = NoopMetrics>
where
    B: CacheBackend,
    S: Serializer,
    M: CacheMetrics,
{
    backend: Arc<B>,
    serializer: Arc<S>,
    metrics: Arc<M>,
    config: ExpiringCacheConfig,
    coalescer: Coalescer,
    sweeper: Option<Arc<SweeperHandle>>,
}

// Constructors for default serializer/metrics
impl<B: CacheBackend> ExpiringCache<B, JsonSerializer, NoopMetrics> {
    /// Create a new cache with default JSON serializer and no metrics
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, ExpiringCacheConfig::default())
    }

    /// Create with custom config
    pub fn with_config(backend: B, config: ExpiringCacheConfig) -> Self {
        Self::with_serializer_and_metrics(backend, JsonSerializer, NoopMetrics, config)
    }
}

impl ExpiringCache<MemoryBackend, JsonSerializer, NoopMetrics> {
    /// In-memory cache with its sweeper running
    ///
    /// Must be called inside a Tokio runtime.
    pub fn in_memory(config: MemoryConfig) -> Result<Self> {
        Self::new(MemoryBackend::new(config)).start_sweeper()
    }
}

impl<S: Serializer, M: CacheMetrics> ExpiringCache<MemoryBackend, S, M> {
    /// Start background eviction on the current Tokio runtime
    pub fn start_sweeper(mut self) -> Result<Self> {
        let handle = self.backend.spawn_sweeper()?;
        self.sweeper = Some(Arc::new(handle));
        Ok(self)
    }
}

// Full generic implementation
impl<B, S, M> ExpiringCache<B, S, M>
where
    B: CacheBackend,
    S: Serializer,
    M: CacheMetrics,
{
    /// Create a cache with custom serializer and metrics
    pub fn with_serializer_and_metrics(
        backend: B,
        serializer: S,
        metrics: M,
        config: ExpiringCacheConfig,
    ) -> Self {
        Self {
            backend: Arc::new(backend),
            serializer: Arc::new(serializer),
            metrics: Arc::new(metrics),
            config,
            coalescer: Coalescer::new(),
            sweeper: None,
        }
    }

    /// Underlying storage backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Cache configuration
    pub fn config(&self) -> &ExpiringCacheConfig {
        &self.config
    }

    /// Stop the background sweeper, if one is running
    ///
    /// Reads keep evicting stale entries lazily.
    pub fn shutdown(&self) {
        if let Some(sweeper) = &self.sweeper {
            sweeper.shutdown();
        }
    }

    /// Get the full key with namespace prefix
    fn full_key(&self, key: &impl CacheKey) -> String {
        let key = key.full_key();
        match &self.config.namespace {
            Some(ns) => clima_cache_core::build_key([ns.as_str(), key.as_str()]),
            None => key,
        }
    }

    /// Fill in the configured category TTL when no explicit TTL is given
    fn resolve(&self, options: impl Into<CacheOptions>) -> CacheOptions {
        let mut options = options.into();
        if options.ttl.is_none() {
            options.ttl = Some(self.config.ttl_for(options.category));
        }
        options
    }

    /// Get a fresh entry, with its metadata
    pub async fn get_entry<T>(&self, key: impl CacheKey) -> Result<Option<CacheEntry<T>>>
    where
        T: DeserializeOwned,
    {
        let full_key = self.full_key(&key);
        self.read(&full_key).await
    }

    /// Get a value from cache
    ///
    /// Returns `None` if the key is missing or stale; a stale entry is
    /// evicted on the way.
    pub async fn get<T>(&self, key: impl CacheKey) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        Ok(self.get_entry(key).await?.map(|entry| entry.value))
    }

    /// Set a value in cache
    ///
    /// Replacing a key reschedules its eviction.
    pub async fn set<T>(
        &self,
        key: impl CacheKey,
        value: &T,
        options: impl Into<CacheOptions>,
    ) -> Result<()>
    where
        T: Serialize,
    {
        let full_key = self.full_key(&key);
        self.write(&full_key, value, self.resolve(options)).await
    }

    /// Check if a fresh entry exists for the key
    pub async fn has(&self, key: impl CacheKey) -> Result<bool> {
        let full_key = self.full_key(&key);
        self.backend.exists(&full_key).await
    }

    /// Delete a key from cache
    pub async fn delete(&self, key: impl CacheKey) -> Result<bool> {
        let full_key = self.full_key(&key);
        let start = Instant::now();

        let deleted = self.backend.delete(&full_key).await?;
        if deleted {
            self.metrics.record_eviction(EvictionReason::Invalidated, 1);
        }

        self.metrics
            .record_latency(CacheOperation::Delete, start.elapsed());
        Ok(deleted)
    }

    /// Clear all entries from cache
    pub async fn clear(&self) -> Result<()> {
        let count = self.backend.len().await?;
        self.backend.clear().await?;
        self.metrics
            .record_eviction(EvictionReason::Cleared, count as u64);
        Ok(())
    }

    /// Evict every stale entry, returning how many were removed
    pub async fn cleanup(&self) -> Result<usize> {
        let start = Instant::now();
        let evicted = self.backend.cleanup().await?;

        self.metrics
            .record_eviction(EvictionReason::Expired, evicted as u64);
        self.metrics
            .record_latency(CacheOperation::Cleanup, start.elapsed());
        Ok(evicted)
    }

    /// Get cache statistics
    pub async fn stats(&self) -> Result<CacheStats> {
        let stats = self.backend.stats().await?;
        self.metrics
            .record_size(stats.total_entries, stats.memory_bytes);
        Ok(stats)
    }

    /// Get the number of entries
    pub async fn len(&self) -> Result<usize> {
        self.backend.len().await
    }

    /// Check if cache is empty
    pub async fn is_empty(&self) -> Result<bool> {
        self.backend.is_empty().await
    }

    async fn read<T>(&self, full_key: &str) -> Result<Option<CacheEntry<T>>>
    where
        T: DeserializeOwned,
    {
        let start = Instant::now();
        let entry = self.backend.get(full_key).await?;
        self.metrics
            .record_latency(CacheOperation::Get, start.elapsed());

        match entry {
            Some(entry) => {
                self.metrics.record_hit(full_key);
                self.deserialize_entry(entry).map(Some)
            }
            None => {
                self.metrics.record_miss(full_key);
                Ok(None)
            }
        }
    }

    async fn write<T>(&self, full_key: &str, value: &T, options: CacheOptions) -> Result<()>
    where
        T: Serialize,
    {
        let serialize_start = Instant::now();
        let serialized = self.serializer.serialize(value)?;
        self.metrics
            .record_latency(CacheOperation::Serialize, serialize_start.elapsed());

        let set_start = Instant::now();
        self.backend.set(full_key, serialized, &options).await?;
        self.metrics
            .record_latency(CacheOperation::Set, set_start.elapsed());
        self.metrics
            .record_write(full_key, options.category, options.effective_ttl());

        Ok(())
    }

    /// Deserialize a cache entry
    fn deserialize_entry<T>(&self, entry: CacheEntry<Vec<u8>>) -> Result<CacheEntry<T>>
    where
        T: DeserializeOwned,
    {
        let deserialize_start = Instant::now();
        let value: T = self.serializer.deserialize(&entry.value)?;
        self.metrics
            .record_latency(CacheOperation::Deserialize, deserialize_start.elapsed());

        Ok(entry.map(|_| value))
    }
}

impl<B, S, M> Clone for ExpiringCache<B, S, M>
where
    B: CacheBackend,
    S: Serializer,
    M: CacheMetrics,
{
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            serializer: self.serializer.clone(),
            metrics: self.metrics.clone(),
            config: self.config.clone(),
            coalescer: self.coalescer.clone(),
            sweeper: self.sweeper.clone(),
        }
    }
}
