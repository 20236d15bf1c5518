//! Background expiration task

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use clima_cache_core::{CacheError, Result};

use super::backend::MemoryBackend;

const MIN_TICK: Duration = Duration::from_millis(1);

/// Handle to a running sweeper task
///
/// The task is aborted when the handle is dropped.
#[derive(Debug)]
pub struct SweeperHandle {
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper
    pub fn shutdown(&self) {
        self.task.abort();
    }

    /// Whether the task has stopped
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl MemoryBackend {
    /// Spawn the sweeper on the current Tokio runtime
    ///
    /// Every `sweep_tick` it evicts the keys whose deadlines have passed;
    /// every `cleanup_interval` it scans the whole store. Fails outside a
    /// runtime.
    pub fn spawn_sweeper(&self) -> Result<SweeperHandle> {
        let handle = Handle::try_current()
            .map_err(|e| CacheError::Internal(format!("sweeper needs a tokio runtime: {e}")))?;

        let tick = self.config.sweep_tick.max(MIN_TICK);
        let cleanup_every = self.config.cleanup_interval.max(tick);
        let backend = self.clone();

        info!(
            target: "clima_cache",
            tick_ms = tick.as_millis() as u64,
            cleanup_secs = cleanup_every.as_secs(),
            "Starting cache sweeper"
        );

        let task = handle.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + tick, tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut cleanup = time::interval_at(Instant::now() + cleanup_every, cleanup_every);
            cleanup.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = backend.evict_due(Instant::now());
                        if evicted > 0 {
                            debug!(target: "clima_cache", evicted, "Evicted due entries");
                        }
                    }
                    _ = cleanup.tick() => {
                        let evicted = backend.cleanup_expired();
                        debug!(target: "clima_cache", evicted, "Periodic cleanup finished");
                    }
                }
            }
        });

        Ok(SweeperHandle { task })
    }
}
