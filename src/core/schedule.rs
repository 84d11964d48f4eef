//! Virtual-Time Scheduler
//!
//! Cooperative, single-threaded event queue driven by an explicit
//! millisecond clock. Every entry is tagged with the [`Epoch`] of the
//! phase that scheduled it so a whole phase can be cancelled in one call,
//! and so a consumer can recognise a late entry from a phase that is over.
//!
//! Entries due at the same instant pop in insertion order.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

/// Generation token of a phase.
///
/// A consumer keeps the epoch of its live phase and drops anything
/// carrying an older one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(pub u64);

impl Epoch {
    /// The epoch following this one.
    pub fn next(self) -> Self {
        Epoch(self.0 + 1)
    }
}

/// A queued entry.
#[derive(Clone, Debug)]
pub struct Scheduled<E> {
    /// Virtual time the entry is due at.
    pub due_ms: u64,
    /// Epoch of the phase that scheduled it.
    pub epoch: Epoch,
    /// Payload.
    pub event: E,
}

/// Virtual-time event queue.
#[derive(Debug)]
pub struct Scheduler<E> {
    now_ms: u64,
    next_seq: u64,
    /// Keyed by (due time, insertion sequence).
    queue: BTreeMap<(u64, u64), Scheduled<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    /// Create an empty scheduler at time zero.
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
        }
    }

    /// Current virtual time.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Queue `event` to fire `delay_ms` from now.
    pub fn schedule_in(&mut self, delay_ms: u64, epoch: Epoch, event: E) {
        let due_ms = self.now_ms.saturating_add(delay_ms);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due_ms, seq), Scheduled { due_ms, epoch, event });
    }

    /// Drop every entry scheduled under `epoch`. Returns how many were dropped.
    pub fn cancel_epoch(&mut self, epoch: Epoch) -> usize {
        let before = self.queue.len();
        self.queue.retain(|_, entry| entry.epoch != epoch);
        before - self.queue.len()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Number of queued entries.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of queued entries belonging to `epoch`.
    pub fn pending_in(&self, epoch: Epoch) -> usize {
        self.queue.values().filter(|e| e.epoch == epoch).count()
    }

    /// Due time of the earliest entry.
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest entry due at or before `until_ms`.
    ///
    /// The clock moves forward to the entry's due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Scheduled<E>> {
        let key = *self.queue.keys().next()?;
        if key.0 > until_ms {
            return None;
        }
        let entry = self.queue.remove(&key)?;
        self.now_ms = self.now_ms.max(entry.due_ms);
        Some(entry)
    }

    /// Move the clock to `until_ms`. Never moves backwards.
    pub fn advance_clock(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_due_order() {
        let mut sched = Scheduler::new();
        sched.schedule_in(300, Epoch(1), "c");
        sched.schedule_in(100, Epoch(1), "a");
        sched.schedule_in(200, Epoch(1), "b");

        let order: Vec<_> = std::iter::from_fn(|| sched.pop_due(1000))
            .map(|e| e.event)
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(sched.now_ms(), 300);
    }

    #[test]
    fn test_same_instant_keeps_insertion_order() {
        let mut sched = Scheduler::new();
        sched.schedule_in(100, Epoch(1), 1);
        sched.schedule_in(100, Epoch(1), 2);
        sched.schedule_in(100, Epoch(1), 3);

        assert_eq!(sched.pop_due(100).map(|e| e.event), Some(1));
        assert_eq!(sched.pop_due(100).map(|e| e.event), Some(2));
        assert_eq!(sched.pop_due(100).map(|e| e.event), Some(3));
    }

    #[test]
    fn test_not_due_yet() {
        let mut sched = Scheduler::new();
        sched.schedule_in(500, Epoch(0), ());

        assert!(sched.pop_due(499).is_none());
        assert_eq!(sched.next_due(), Some(500));
        assert!(sched.pop_due(500).is_some());
    }

    #[test]
    fn test_cancel_epoch_only_touches_that_epoch() {
        let mut sched = Scheduler::new();
        sched.schedule_in(100, Epoch(1), "old");
        sched.schedule_in(200, Epoch(1), "old");
        sched.schedule_in(150, Epoch(2), "new");

        assert_eq!(sched.cancel_epoch(Epoch(1)), 2);
        assert_eq!(sched.pending(), 1);
        assert_eq!(sched.pending_in(Epoch(2)), 1);
        assert_eq!(sched.pop_due(1000).map(|e| e.event), Some("new"));
    }

    #[test]
    fn test_schedule_relative_to_current_time() {
        let mut sched = Scheduler::new();
        sched.advance_clock(1000);
        sched.schedule_in(250, Epoch(0), ());

        assert_eq!(sched.next_due(), Some(1250));

        // Clock never runs backwards
        sched.advance_clock(10);
        assert_eq!(sched.now_ms(), 1000);
    }
}
