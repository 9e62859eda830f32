//! Mutex-guarded FIFO queue over a resizable ring buffer.
//!
//! # Overview
//!
//! - [`RingBufferQueue::enqueue`] grows the buffer 2x when it is full.
//! - [`RingBufferQueue::dequeue`] halves the buffer when it exceeds 1024 slots
//!   and is less than half full.
//! - [`RingBufferQueue::len`] and [`RingBufferQueue::capacity`] are lock-free
//!   atomic loads.
//!
//! # Example
//!
//! ```
//! use ringq::RingBufferQueue;
//!
//! let queue = RingBufferQueue::new(10);
//! for i in 0..11 {
//!     queue.enqueue(i);
//! }
//! assert_eq!(queue.capacity(), 20);
//! assert_eq!(queue.dequeue(), Some(0));
//! assert_eq!(queue.len(), 10);
//! ```
//!
//! # Locking
//!
//! Every mutation and [`peek`](RingBufferQueue::peek) runs under one
//! [`parking_lot::Mutex`] around the whole ring, resize copies included. The
//! guard is scoped, so every return path (the empty-queue one too) releases
//! it.
//!
//! The length and capacity counters are mirrored into atomics while the lock
//! is held and read without it. A reader racing an in-flight enqueue or
//! dequeue may see the value from just before it; callers must treat
//! `len()`, `capacity()` and `is_empty()` as snapshots.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::config::{CapacityError, DEFAULT_CAPACITY, QueueConfig};
use crate::queue::Queue;
use crate::ring::Ring;
use crate::trace::debug;

/// Counters published for lock-free readers.
///
/// Kept on their own cache line so polling `len()` does not contend with the
/// mutex word.
#[repr(align(64))]
struct Counters {
    len: AtomicUsize,
    capacity: AtomicUsize,
}

/// Thread-safe, auto-resizing FIFO queue.
///
/// `RingBufferQueue<T>` is [`Send`] and [`Sync`] for `T: Send`; share it with
/// an [`Arc`](std::sync::Arc).
pub struct RingBufferQueue<T> {
    ring: Mutex<Ring<T>>,
    counters: Counters,
}

impl<T> RingBufferQueue<T> {
    /// Creates a queue with `initial_capacity` slots.
    ///
    /// Capacities outside `[10, 65535]` are replaced by the default of 30
    /// rather than rejected; use [`try_with_capacity`](Self::try_with_capacity)
    /// to surface them as errors instead.
    #[must_use]
    pub fn new(initial_capacity: usize) -> Self {
        Self::with_config(QueueConfig::new(initial_capacity))
    }

    /// Creates a queue from a [`QueueConfig`], clamping like [`new`](Self::new).
    #[must_use]
    pub fn with_config(config: QueueConfig) -> Self {
        let capacity = config.effective_capacity();
        if capacity != config.initial_capacity {
            debug!(
                requested = config.initial_capacity,
                capacity, "initial capacity out of range, using default"
            );
        }
        Self::allocate(capacity)
    }

    /// Creates a queue with exactly `initial_capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `initial_capacity` is outside `[10, 65535]`.
    pub fn try_with_capacity(initial_capacity: usize) -> Result<Self, CapacityError> {
        QueueConfig::new(initial_capacity).validate()?;
        Ok(Self::allocate(initial_capacity))
    }

    fn allocate(capacity: usize) -> Self {
        Self {
            ring: Mutex::new(Ring::with_capacity(capacity)),
            counters: Counters {
                len: AtomicUsize::new(0),
                capacity: AtomicUsize::new(capacity),
            },
        }
    }

    /// Mirrors the ring's counters into the atomics. Caller holds the lock.
    #[inline]
    fn publish(&self, ring: &Ring<T>) {
        self.counters.len.store(ring.len(), Ordering::Release);
        self.counters
            .capacity
            .store(ring.capacity(), Ordering::Release);
    }

    /// Appends an item, doubling the buffer first if it is full.
    pub fn enqueue(&self, item: T) {
        let mut ring = self.ring.lock();
        ring.push(item);
        self.publish(&ring);
    }

    /// Removes and returns the oldest item.
    ///
    /// Returns `None` without touching length or capacity if the queue is
    /// empty. May shrink the buffer.
    pub fn dequeue(&self) -> Option<T> {
        let mut ring = self.ring.lock();
        let item = ring.pop()?;
        self.publish(&ring);
        Some(item)
    }

    /// Runs `f` on the oldest item without removing it.
    ///
    /// `f` runs with the queue locked; it must not call back into this queue.
    pub fn peek_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let ring = self.ring.lock();
        ring.front().map(f)
    }

    /// Removes every item, oldest first, under a single lock acquisition.
    ///
    /// The buffer ends up the same size as after the same number of
    /// [`dequeue`](Self::dequeue) calls.
    pub fn drain(&self) -> Vec<T> {
        let mut ring = self.ring.lock();
        let mut items = Vec::with_capacity(ring.len());
        while let Some(item) = ring.pop() {
            items.push(item);
        }
        self.publish(&ring);
        items
    }

    /// Number of items in the queue, read without locking.
    #[inline]
    pub fn len(&self) -> usize {
        self.counters.len.load(Ordering::Acquire)
    }

    /// Number of slots currently allocated, read without locking.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.counters.capacity.load(Ordering::Acquire)
    }

    /// Whether `len() == 0` at the time of the read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> RingBufferQueue<T> {
    /// Returns a clone of the oldest item without removing it.
    pub fn peek(&self) -> Option<T> {
        self.peek_with(T::clone)
    }
}

impl<T> Default for RingBufferQueue<T> {
    fn default() -> Self {
        Self::allocate(DEFAULT_CAPACITY)
    }
}

impl<T> fmt::Debug for RingBufferQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBufferQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

/// Enqueues every item in order under one lock acquisition.
///
/// The iterator is driven with the queue locked; it must not touch this queue.
impl<T> Extend<T> for &RingBufferQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut ring = self.ring.lock();
        for item in iter {
            ring.push(item);
        }
        self.publish(&ring);
    }
}

impl<T> Queue for RingBufferQueue<T> {
    type Item = T;

    fn enqueue(&self, item: T) {
        Self::enqueue(self, item);
    }

    fn dequeue(&self) -> Option<T> {
        Self::dequeue(self)
    }

    fn peek(&self) -> Option<T>
    where
        Self::Item: Clone,
    {
        self.peek_with(T::clone)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }
}
