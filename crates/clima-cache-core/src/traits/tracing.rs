use crate::{CacheCategory, CacheMetrics, CacheOperation, EvictionReason};
use std::time::Duration;
use tracing::{debug, trace};

/// Metrics adapter that logs events via `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingMetrics {
    /// Service name/prefix (optional)
    service_name: Option<String>,
}

impl TracingMetrics {
    /// Create new tracing metrics adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with service name prefix
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }
}

impl CacheMetrics for TracingMetrics {
    fn record_hit(&self, key: &str) {
        debug!(
            target: "clima_cache",
            event = "hit",
            key = %key,
            service = ?self.service_name,
            "Cache Hit"
        );
    }

    fn record_miss(&self, key: &str) {
        debug!(
            target: "clima_cache",
            event = "miss",
            key = %key,
            service = ?self.service_name,
            "Cache Miss"
        );
    }

    fn record_write(&self, key: &str, category: CacheCategory, ttl: Duration) {
        debug!(
            target: "clima_cache",
            event = "set",
            key = %key,
            category = %category,
            ttl_secs = ttl.as_secs(),
            service = ?self.service_name,
            "Cache Set"
        );
    }

    fn record_coalesced(&self, key: &str) {
        debug!(
            target: "clima_cache",
            event = "coalesced",
            key = %key,
            service = ?self.service_name,
            "Cache Fetch Joined In-Flight Request"
        );
    }

    fn record_latency(&self, operation: CacheOperation, duration: Duration) {
        trace!(
            target: "clima_cache",
            event = "latency",
            operation = operation.as_str(),
            duration_ms = duration.as_millis(),
            service = ?self.service_name,
            "Cache Operation Latency"
        );
    }

    fn record_eviction(&self, reason: EvictionReason, count: u64) {
        debug!(
            target: "clima_cache",
            event = "eviction",
            reason = reason.as_str(),
            count = count,
            service = ?self.service_name,
            "Cache Eviction"
        );
    }

    fn record_size(&self, size: usize, memory_bytes: usize) {
        trace!(
            target: "clima_cache",
            event = "size",
            size = size,
            bytes = memory_bytes,
            service = ?self.service_name,
            "Cache Size Update"
        );
    }
}
