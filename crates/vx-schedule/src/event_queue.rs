//! `EventQueue` — simulated-time ordered event queue.
//!
//! # Ordering guarantee
//!
//! Events pop in non-decreasing timestamp order.  Events sharing a timestamp
//! pop in the order they were pushed, so a sampler tick and a packet arrival
//! scheduled for the same nanosecond are processed deterministically.
//!
//! # Performance note
//!
//! `BTreeMap` gives O(log W) insert and O(log W) pop where W = number of
//! distinct timestamps currently enqueued.  A running scenario holds a handful
//! of pending timestamps (one sampler tick, one or two source timers per
//! group, the in-flight deliveries and the pre-scheduled driver ticks), so
//! the constant is tiny.

use std::collections::{BTreeMap, VecDeque};

use vx_core::SimTime;

/// A priority queue mapping simulated timestamps → events due at that time.
pub struct EventQueue<E> {
    inner: BTreeMap<SimTime, VecDeque<E>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), total: 0 }
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` at absolute time `at`.
    pub fn push(&mut self, at: SimTime, event: E) {
        self.inner.entry(at).or_default().push_back(event);
        self.total += 1;
    }

    /// Remove and return the earliest event.
    pub fn pop(&mut self) -> Option<(SimTime, E)> {
        let mut entry = self.inner.first_entry()?;
        let at = *entry.key();
        let event = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        let event = event?;
        self.total -= 1;
        Some((at, event))
    }

    /// Like [`pop`][Self::pop] but leaves events at or after `horizon` queued.
    pub fn pop_before(&mut self, horizon: SimTime) -> Option<(SimTime, E)> {
        match self.next_time() {
            Some(t) if t < horizon => self.pop(),
            _ => None,
        }
    }

    /// The earliest timestamp with at least one queued event, or `None` if empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Total number of queued events across all timestamps.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Drop every queued event.  Used at loop teardown.
    pub fn clear(&mut self) {
        self.inner.clear();
        self.total = 0;
    }
}
