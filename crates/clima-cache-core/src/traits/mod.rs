//! Core traits for cache operations

mod backend;
mod key;
mod metrics;
mod serializer;

#[cfg(feature = "tracing")]
mod tracing;

pub use backend::CacheBackend;
pub use key::{build_key, CacheKey, CompositeKey, KEY_SEPARATOR};
pub use metrics::{CacheMetrics, CacheOperation, EvictionReason, NoopMetrics};
pub use serializer::{JsonSerializer, Serializer};

#[cfg(feature = "metrics")]
pub use metrics::MetricsCrateAdapter;

#[cfg(feature = "tracing")]
pub use self::tracing::TracingMetrics;
