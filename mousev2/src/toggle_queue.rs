//! Lossless queue of alternating level changes.
//!
//! A toggle queue stores a sequence of level transitions with two counters
//! only. Since consecutive levels always alternate, the level of every queued
//! event is encoded in the parity of the counter value which points at it:
//!
//! ```text
//!   tail            head
//!    |               |
//!    v               v
//!    0   1   0   1   0        <- counter parity = level
//!        \_______________/
//!         undrained events
//! ```
//!
//! `put` runs in a single producer context (usually an interrupt handler) and
//! `get`/`get_or_last` in a single consumer context, so the queue needs no lock.
//! Both counters wrap at the same width, so the length stays correct across a
//! wraparound.

use core::sync::atomic::{AtomicU32, Ordering};

/// Errors of [`ToggleQueue`] operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToggleQueueError {
    /// The level equals the most recently queued one
    InvalidTransition,
    /// Nothing to dequeue
    Empty,
}

/// Single-producer single-consumer queue of alternating levels
#[derive(Debug)]
pub struct ToggleQueue {
    head: AtomicU32,
    tail: AtomicU32,
}

impl Default for ToggleQueue {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ToggleQueue {
    /// Create an empty queue whose last known level is `level`
    pub const fn new(level: bool) -> Self {
        Self {
            head: AtomicU32::new(level as u32),
            tail: AtomicU32::new(level as u32),
        }
    }

    /// Drop every pending event and restart from `level`.
    ///
    /// Must not race with `put` or `get`, it's meant for initialization.
    pub fn reset(&self, level: bool) {
        self.head.store(level as u32, Ordering::Relaxed);
        self.tail.store(level as u32, Ordering::Release);
    }

    /// Queue a level change.
    ///
    /// Fails with [`ToggleQueueError::InvalidTransition`] if `event` is the level
    /// which was queued last, the queue is left untouched in that case.
    pub fn put(&self, event: bool) -> Result<(), ToggleQueueError> {
        let head = self.head.load(Ordering::Relaxed);
        if parity(head) == event {
            return Err(ToggleQueueError::InvalidTransition);
        }
        self.head.store(head.wrapping_add(1), Ordering::Release);
        Ok(())
    }

    /// Dequeue the oldest pending level
    pub fn get(&self) -> Result<bool, ToggleQueueError> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return Err(ToggleQueueError::Empty);
        }
        let tail = tail.wrapping_add(1);
        self.tail.store(tail, Ordering::Release);
        Ok(parity(tail))
    }

    /// Dequeue the oldest pending level, or return the last dequeued level if
    /// the queue is empty
    pub fn get_or_last(&self) -> bool {
        match self.get() {
            Ok(level) => level,
            Err(_) => parity(self.tail.load(Ordering::Relaxed)),
        }
    }

    /// Number of undrained events
    pub fn len(&self) -> u32 {
        let tail = self.tail.load(Ordering::Acquire);
        self.head.load(Ordering::Acquire).wrapping_sub(tail)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Level of the most recently queued event
    pub fn last_queued(&self) -> bool {
        parity(self.head.load(Ordering::Acquire))
    }
}

#[inline]
fn parity(counter: u32) -> bool {
    counter & 1 == 1
}
