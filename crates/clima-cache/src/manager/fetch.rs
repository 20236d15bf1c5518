//! Read-through fetching

use std::future::Future;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;

use clima_cache_core::{
    CacheBackend, CacheError, CacheKey, CacheMetrics, CacheOperation, CacheOptions, Serializer,
};

use super::ExpiringCache;

impl<B, S, M> ExpiringCache<B, S, M>
where
    B: CacheBackend,
    S: Serializer,
    M: CacheMetrics,
{
    /// Return the fresh cached value for `key`, or run `producer` and cache
    /// what it yields
    ///
    /// - `Ok(Some(v))` from the producer is stored under `options` and returned.
    /// - `Ok(None)` is returned as is and nothing is stored.
    /// - `Err(e)` is returned unchanged and nothing is stored.
    ///
    /// Concurrent misses on the same key share one producer run and all
    /// receive its outcome, unless coalescing is disabled in the config.
    pub async fn cached_fetch<T, E, F, Fut>(
        &self,
        key: impl CacheKey,
        options: impl Into<CacheOptions>,
        producer: F,
    ) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
        E: From<CacheError> + Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        let full_key = self.full_key(&key);
        let options = self.resolve(options);
        let start = Instant::now();

        if let Some(entry) = self.read::<T>(&full_key).await? {
            return Ok(Some(entry.value));
        }

        let outcome = if self.config.coalesce_fetches {
            self.coalescer
                .run(
                    &full_key,
                    || self.fetch_and_store(&full_key, options, producer),
                    || self.metrics.record_coalesced(&full_key),
                )
                .await
        } else {
            self.fetch_and_store(&full_key, options, producer).await
        };

        self.metrics
            .record_latency(CacheOperation::Fetch, start.elapsed());
        outcome
    }

    /// Like [`cached_fetch`](Self::cached_fetch) for producers that always
    /// yield a value
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: impl CacheKey,
        options: impl Into<CacheOptions>,
        producer: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
        E: From<CacheError> + Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let fetched = self
            .cached_fetch(key, options, || async move { producer().await.map(Some) })
            .await?;

        fetched.ok_or_else(|| E::from(CacheError::Internal("producer yielded no value".into())))
    }

    async fn fetch_and_store<T, E, F, Fut>(
        &self,
        full_key: &str,
        options: CacheOptions,
        producer: F,
    ) -> Result<Option<T>, E>
    where
        T: Serialize,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        let Some(value) = producer().await? else {
            return Ok(None);
        };

        self.write(full_key, &value, options).await?;
        Ok(Some(value))
    }
}
