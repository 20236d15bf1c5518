//! clima-cache-storage: Storage backends for the clima expiring cache

pub mod memory;

pub use memory::{MemoryBackend, MemoryConfig, SweeperHandle};
