//! Core types for cache operations

mod category;
mod entry;
mod options;
mod stats;

pub use category::CacheCategory;
pub use entry::CacheEntry;
pub use options::{CacheOptions, CacheOpts};
pub use stats::CacheStats;
