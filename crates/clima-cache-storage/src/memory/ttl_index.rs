//! Deadline index for eager expiration

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tokio::time::Instant;

/// Min-heap of expiry deadlines
///
/// Instead of one timer per entry, every key is pushed onto a heap ordered by
/// deadline and the sweeper pops whatever is due. Rescheduling or removing a
/// key only updates `deadlines`; the old heap record stays behind and is
/// discarded when it surfaces because its deadline no longer matches.
#[derive(Debug, Default)]
pub struct TtlIndex {
    /// Deadlines ordered soonest first
    heap: BinaryHeap<Reverse<(Instant, String)>>,
    /// Current deadline per key; the source of truth for cancellation
    deadlines: HashMap<String, Instant>,
}

impl TtlIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to expire after `deadline`, replacing any earlier schedule
    pub fn schedule(&mut self, key: String, deadline: Instant) {
        self.deadlines.insert(key.clone(), deadline);
        self.heap.push(Reverse((deadline, key)));
        self.maybe_compact();
    }

    /// Cancel the scheduled expiry of `key`
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.deadlines.remove(key).is_some();
        self.maybe_compact();
        removed
    }

    /// Cancel `key` only if it is still scheduled for `deadline`
    ///
    /// Leaves a newer schedule for the same key untouched.
    pub fn cancel(&mut self, key: &str, deadline: Instant) -> bool {
        if self.deadlines.get(key) != Some(&deadline) {
            return false;
        }
        self.remove(key)
    }

    /// Check if a key is scheduled
    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.deadlines.contains_key(key)
    }

    /// Scheduled deadline for a key
    #[cfg(test)]
    pub fn deadline(&self, key: &str) -> Option<Instant> {
        self.deadlines.get(key).copied()
    }

    /// Pop every key whose deadline lies strictly before `now`
    ///
    /// An entry is still fresh at exactly its deadline.
    pub fn drain_due(&mut self, now: Instant) -> Vec<String> {
        let mut due = Vec::new();

        while let Some(Reverse((deadline, _))) = self.heap.peek() {
            if *deadline >= now {
                break;
            }
            let Some(Reverse((deadline, key))) = self.heap.pop() else {
                break;
            };
            if self.deadlines.get(&key) == Some(&deadline) {
                self.deadlines.remove(&key);
                due.push(key);
            }
        }

        due
    }

    /// Key with the nearest live deadline
    pub fn soonest(&mut self) -> Option<String> {
        while let Some(Reverse((deadline, key))) = self.heap.peek() {
            if self.deadlines.get(key) == Some(deadline) {
                return Some(key.clone());
            }
            self.heap.pop();
        }
        None
    }

    /// Get the number of scheduled keys
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Check if empty
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Clear all scheduled keys
    pub fn clear(&mut self) {
        self.heap.clear();
        self.deadlines.clear();
    }

    /// Rebuild the heap once cancelled records dominate it
    fn maybe_compact(&mut self) {
        if self.heap.len() <= 64 || self.heap.len() <= self.deadlines.len() * 2 {
            return;
        }
        self.heap = self
            .deadlines
            .iter()
            .map(|(key, deadline)| Reverse((*deadline, key.clone())))
            .collect();
    }

    #[cfg(test)]
    fn heap_len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(base: Instant, secs: u64) -> Instant {
        base + Duration::from_secs(secs)
    }

    #[test]
    fn test_schedule_and_remove() {
        let base = Instant::now();
        let mut index = TtlIndex::new();

        index.schedule("key1".to_string(), at(base, 10));
        assert!(index.contains("key1"));
        assert_eq!(index.len(), 1);

        assert!(index.remove("key1"));
        assert!(!index.contains("key1"));
        assert!(!index.remove("key1"));
        assert!(index.drain_due(at(base, 60)).is_empty());
    }

    #[test]
    fn test_drain_due_in_deadline_order() {
        let base = Instant::now();
        let mut index = TtlIndex::new();

        index.schedule("late".to_string(), at(base, 30));
        index.schedule("early".to_string(), at(base, 5));
        index.schedule("middle".to_string(), at(base, 10));

        assert_eq!(index.drain_due(at(base, 11)), vec!["early", "middle"]);
        assert_eq!(index.len(), 1);
        assert!(index.contains("late"));
    }

    #[test]
    fn test_deadline_itself_is_not_due() {
        let base = Instant::now();
        let mut index = TtlIndex::new();

        index.schedule("key".to_string(), at(base, 10));
        assert!(index.drain_due(at(base, 10)).is_empty());
        assert_eq!(index.drain_due(at(base, 10) + Duration::from_millis(1)), vec!["key"]);
    }

    #[test]
    fn test_reschedule_cancels_previous_deadline() {
        let base = Instant::now();
        let mut index = TtlIndex::new();

        index.schedule("key1".to_string(), at(base, 10));
        index.schedule("key1".to_string(), at(base, 20));

        assert_eq!(index.len(), 1);
        assert!(index.drain_due(at(base, 15)).is_empty());
        assert_eq!(index.deadline("key1"), Some(at(base, 20)));
        assert_eq!(index.drain_due(at(base, 21)), vec!["key1"]);
    }

    #[test]
    fn test_cancel_ignores_newer_schedule() {
        let base = Instant::now();
        let mut index = TtlIndex::new();

        index.schedule("key".to_string(), at(base, 10));
        index.schedule("key".to_string(), at(base, 20));

        assert!(!index.cancel("key", at(base, 10)));
        assert!(index.contains("key"));
        assert!(index.cancel("key", at(base, 20)));
        assert!(index.is_empty());
    }

    #[test]
    fn test_soonest_skips_cancelled() {
        let base = Instant::now();
        let mut index = TtlIndex::new();

        index.schedule("a".to_string(), at(base, 1));
        index.schedule("b".to_string(), at(base, 2));
        index.remove("a");

        assert_eq!(index.soonest().as_deref(), Some("b"));
    }

    #[test]
    fn test_compaction_bounds_heap() {
        let base = Instant::now();
        let mut index = TtlIndex::new();

        for i in 0..1_000u64 {
            index.schedule("hot".to_string(), at(base, i));
        }

        assert_eq!(index.len(), 1);
        assert!(index.heap_len() <= 65);
        assert_eq!(index.deadline("hot"), Some(at(base, 999)));
    }

    #[test]
    fn test_clear() {
        let base = Instant::now();
        let mut index = TtlIndex::new();

        index.schedule("key1".to_string(), at(base, 10));
        index.schedule("key2".to_string(), at(base, 20));
        assert_eq!(index.len(), 2);

        index.clear();
        assert_eq!(index.len(), 0);
        assert!(index.is_empty());
        assert!(index.drain_due(at(base, 60)).is_empty());
    }
}
