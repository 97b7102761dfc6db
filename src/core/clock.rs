//! Virtual-time scheduler.
//!
//! Every delay in a turn is an entry here rather than a wall-clock timer, so
//! the engine can be driven deterministically: `advance` moves time forward
//! and hands back due entries one at a time, in due order, with insertion
//! order breaking ties.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Handle to a scheduled entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Pending timers keyed by `(due, insertion)`.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `item` to fire `delay_ms` after now.
    pub fn schedule(&mut self, delay_ms: u64, item: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((self.now.saturating_add(delay_ms), seq), item);
        TimerId(seq)
    }

    /// Cancel one entry. Returns it if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let key = self.queue.keys().find(|(_, seq)| *seq == id.0).copied()?;
        self.queue.remove(&key)
    }

    /// Cancel every pending entry matching `predicate`.
    ///
    /// Returns how many were removed.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|_, item| !predicate(item));
        before - self.queue.len()
    }

    /// Drop every pending entry. Time is kept.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Due time of the earliest pending entry.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest entry due at or before `until`.
    ///
    /// Time moves to the entry's due time, so anything scheduled while
    /// handling it is measured from that instant.
    pub fn pop_due(&mut self, until: u64) -> Option<(u64, T)> {
        let (&(due, seq), _) = self.queue.iter().next()?;
        if due > until {
            return None;
        }
        let item = self.queue.remove(&(due, seq))?;
        self.now = self.now.max(due);
        Some((due, item))
    }

    /// Move time forward to `to` without firing anything.
    ///
    /// Never moves backward.
    pub fn advance_to(&mut self, to: u64) {
        self.now = self.now.max(to);
    }

    /// Number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Iterate pending entries in due order.
    pub fn pending(&self) -> impl Iterator<Item = (u64, &T)> {
        self.queue.iter().map(|((due, _), item)| (*due, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut sched = Scheduler::new();
        sched.schedule(300, "c");
        sched.schedule(100, "a");
        sched.schedule(200, "b");

        let fired: Vec<_> = std::iter::from_fn(|| sched.pop_due(1000)).collect();
        assert_eq!(fired, vec![(100, "a"), (200, "b"), (300, "c")]);
        assert_eq!(sched.now(), 300);
    }

    #[test]
    fn test_ties_fire_in_insertion_order() {
        let mut sched = Scheduler::new();
        sched.schedule(50, 1);
        sched.schedule(50, 2);
        sched.schedule(50, 3);

        let fired: Vec<_> = std::iter::from_fn(|| sched.pop_due(50)).map(|(_, v)| v).collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_not_due_yet() {
        let mut sched = Scheduler::new();
        sched.schedule(500, ());

        assert!(sched.pop_due(499).is_none());
        assert_eq!(sched.next_due(), Some(500));
        assert!(sched.pop_due(500).is_some());
        assert!(sched.is_empty());
    }

    #[test]
    fn test_delays_measured_from_fire_time() {
        let mut sched = Scheduler::new();
        sched.schedule(100, "first");

        let (at, _) = sched.pop_due(1000).unwrap();
        assert_eq!(at, 100);

        sched.schedule(100, "second");
        assert_eq!(sched.next_due(), Some(200));
    }

    #[test]
    fn test_cancel() {
        let mut sched = Scheduler::new();
        let a = sched.schedule(10, "a");
        sched.schedule(20, "b");

        assert_eq!(sched.cancel(a), Some("a"));
        assert_eq!(sched.cancel(a), None);
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn test_cancel_where() {
        let mut sched = Scheduler::new();
        for i in 0..6 {
            sched.schedule(i * 10, i);
        }

        assert_eq!(sched.cancel_where(|v| v % 2 == 0), 3);
        let left: Vec<_> = sched.pending().map(|(_, v)| *v).collect();
        assert_eq!(left, vec![1, 3, 5]);
    }

    #[test]
    fn test_advance_to_never_rewinds() {
        let mut sched: Scheduler<()> = Scheduler::new();
        sched.advance_to(100);
        sched.advance_to(50);
        assert_eq!(sched.now(), 100);
    }
}
