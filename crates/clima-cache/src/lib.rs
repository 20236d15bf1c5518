//! clima-cache: Expiring in-memory cache with category TTLs
//!
//! # Features
//!
//! - **Category TTL policy** (weather, location, market, crops, user, default)
//! - **Eager eviction** from a min-heap deadline index plus lazy checks on read
//! - **Read-through fetching** that never caches absent values or errors
//! - **In-flight deduplication** of concurrent misses
//! - **Metrics integration**
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use clima_cache::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let cache = ExpiringCache::in_memory(MemoryConfig::default())?;
//!
//!     cache.set("key", &42i32, CacheOpts::new().ttl_secs(60)).await?;
//!
//!     match cache.get::<i32>("key").await? {
//!         Some(value) => println!("Got: {}", value),
//!         None => println!("Cache miss"),
//!     }
//!
//!     Ok(())
//! }
//! ```

mod manager;

// Re-export core
pub use clima_cache_core::*;

// Re-export storage
pub use clima_cache_storage::{MemoryBackend, MemoryConfig, SweeperHandle};

// Export manager
pub use manager::{ExpiringCache, ExpiringCacheConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        build_key, cache_key, CacheCategory, CacheError, CacheKey, CacheOpts, CacheStats,
        ExpiringCache, ExpiringCacheConfig, JsonSerializer, MemoryBackend, MemoryConfig, Result,
        Serializer,
    };
}
