//! In-memory cache backend

mod backend;
mod sweeper;
mod ttl_index;

pub use backend::{MemoryBackend, MemoryConfig};
pub use sweeper::SweeperHandle;
