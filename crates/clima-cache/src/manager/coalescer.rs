use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::broadcast;

/// Outcome of one producer run, shared with every attached caller
type Outcome = Arc<dyn Any + Send + Sync>;

struct Flight {
    id: u64,
    tx: broadcast::Sender<Outcome>,
}

/// In-flight request map
///
/// The first caller for a key becomes the leader and runs the work; callers
/// arriving while it runs attach and receive a clone of its outcome.
#[derive(Clone, Default)]
pub(crate) struct Coalescer {
    inflight: Arc<DashMap<String, Flight>>,
    next_id: Arc<AtomicU64>,
}

enum Role {
    Leader(LeaderGuard),
    Follower(broadcast::Receiver<Outcome>),
}

/// Clears the leader's map entry, on completion or when the leader is dropped
struct LeaderGuard {
    inflight: Arc<DashMap<String, Flight>>,
    key: String,
    id: u64,
    tx: broadcast::Sender<Outcome>,
}

impl LeaderGuard {
    fn complete(self, outcome: Outcome) {
        self.release();
        let _ = self.tx.send(outcome);
    }

    fn release(&self) {
        self.inflight.remove_if(&self.key, |_, flight| flight.id == self.id);
    }
}

impl Drop for LeaderGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl Coalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys with a producer currently running
    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }

    fn join(&self, key: &str) -> Role {
        match self.inflight.entry(key.to_string()) {
            Entry::Occupied(o) => Role::Follower(o.get().tx.subscribe()),
            Entry::Vacant(v) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let (tx, _rx) = broadcast::channel(1);
                v.insert(Flight { id, tx: tx.clone() });
                Role::Leader(LeaderGuard {
                    inflight: self.inflight.clone(),
                    key: key.to_string(),
                    id,
                    tx,
                })
            }
        }
    }

    /// Run `work` for `key`, sharing one run among concurrent callers
    ///
    /// `on_attach` fires when this caller attaches to another caller's run.
    /// If that leader goes away without an outcome, or produced a value of a
    /// different type, this caller runs its own `work`.
    pub async fn run<T, F, Fut>(&self, key: &str, work: F, on_attach: impl FnOnce()) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        match self.join(key) {
            Role::Leader(guard) => {
                let outcome = work().await;
                guard.complete(Arc::new(outcome.clone()));
                outcome
            }
            Role::Follower(mut rx) => {
                on_attach();
                let shared = rx
                    .recv()
                    .await
                    .ok()
                    .and_then(|outcome| outcome.downcast_ref::<T>().cloned());
                match shared {
                    Some(outcome) => outcome,
                    None => work().await,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_run() {
        let coalescer = Coalescer::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let attached = AtomicUsize::new(0);

        let call = || {
            let runs = runs.clone();
            coalescer.run(
                "key",
                move || async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok::<_, String>(Some(7u32))
                },
                || {
                    attached.fetch_add(1, Ordering::SeqCst);
                },
            )
        };

        let (a, b, c) = tokio::join!(call(), call(), call());

        assert_eq!(a, Ok(Some(7)));
        assert_eq!(b, Ok(Some(7)));
        assert_eq!(c, Ok(Some(7)));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(attached.load(Ordering::SeqCst), 2);
        assert_eq!(coalescer.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_are_shared() {
        let coalescer = Coalescer::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let call = || {
            let runs = runs.clone();
            coalescer.run(
                "key",
                move || async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Err::<Option<u32>, _>("boom".to_string())
                },
                || {},
            )
        };

        let (a, b) = tokio::join!(call(), call());
        assert_eq!(a, Err("boom".to_string()));
        assert_eq!(b, Err("boom".to_string()));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_follower_runs_own_work_when_leader_dropped() {
        let coalescer = Coalescer::new();
        let attached = AtomicUsize::new(0);

        let leader = coalescer.run(
            "key",
            || async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                1u32
            },
            || {},
        );
        let follower = coalescer.run(
            "key",
            || async { 2u32 },
            || {
                attached.fetch_add(1, Ordering::SeqCst);
            },
        );
        tokio::pin!(follower);

        tokio::select! {
            biased;
            _ = leader => unreachable!("leader sleeps for a minute"),
            _ = &mut follower => unreachable!("follower waits on the leader"),
            _ = tokio::time::sleep(Duration::from_millis(1)) => {}
        }

        assert_eq!(attached.load(Ordering::SeqCst), 1);
        assert_eq!(coalescer.in_flight(), 0);
        assert_eq!(follower.await, 2);
    }

    #[tokio::test]
    async fn test_sequential_calls_each_run() {
        let coalescer = Coalescer::new();
        let first = coalescer.run("key", || async { 1u8 }, || {}).await;
        let second = coalescer.run("key", || async { 2u8 }, || {}).await;
        assert_eq!((first, second), (1, 2));
        assert_eq!(coalescer.in_flight(), 0);
    }
}
