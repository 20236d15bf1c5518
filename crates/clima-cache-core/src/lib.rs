//! clima-cache-core: Core traits and types for the clima expiring cache
//!
//! This crate provides the entry model, the category-based TTL policy,
//! key building, and the backend/serializer/metrics seams used throughout
//! the clima workspace.

mod error;
mod traits;
mod types;

pub use error::{CacheError, Result};
pub use traits::*;
pub use types::*;
