//! Core resizable ring buffer algorithm.
//!
//! [`Ring`] is the unsynchronized storage behind
//! [`RingBufferQueue`](crate::RingBufferQueue). All methods take `&mut self`;
//! the queue wraps it in a mutex.
//!
//! # Layout
//!
//! ```text
//!            tail              head
//!             │                 │
//!  ┌────┬────┬▼───┬────┬────┬───▼┬────┐
//!  │None│None│ a  │ b  │ c  │None│None│
//!  └────┴────┴────┴────┴────┴────┴────┘
//! ```
//!
//! Live elements occupy `len` slots starting at `tail`, wrapping at the end of
//! the slice, and `head == (tail + len) % capacity`. Every other slot is
//! `None`.
//!
//! # Resizing
//!
//! - [`Ring::push`] on a full ring doubles the capacity first.
//! - [`Ring::pop`] halves the capacity when it exceeds
//!   [`SHRINK_THRESHOLD`] and fewer than half the slots remain live.
//!
//! Capacity therefore always stays `initial * 2^k` for some integer `k`. A
//! ring that did not start at a power-of-two multiple of the threshold can
//! end up below it (1920 halves to 960).
//!
//! Both relocate the live elements oldest-first to index 0 of a fresh slice.

use crate::config::{GROW_FACTOR, SHRINK_FACTOR, SHRINK_THRESHOLD};
use crate::trace::trace;

pub(crate) struct Ring<T> {
    slots: Box<[Option<T>]>,
    /// Next slot to write.
    head: usize,
    /// Oldest live slot.
    tail: usize,
    len: usize,
}

impl<T> Ring<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "ring capacity must be non-zero");
        Self {
            slots: empty_slots(capacity),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) const fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Advances an index to the next slot, wrapping to 0 at capacity.
    #[inline]
    const fn bump(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.slots.len() { 0 } else { next }
    }

    /// Appends an item, doubling the capacity first if the ring is full.
    pub(crate) fn push(&mut self, item: T) {
        if self.len == self.capacity() {
            let grown = self.capacity() * GROW_FACTOR;
            trace!(
                from = self.capacity(),
                to = grown,
                len = self.len,
                "growing ring"
            );
            self.relocate(grown);
        }

        self.slots[self.head] = Some(item);
        self.head = self.bump(self.head);
        self.len += 1;
    }

    /// Removes the oldest item, shrinking the ring afterwards if underused.
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let item = self.slots[self.tail].take();
        self.tail = self.bump(self.tail);
        self.len -= 1;

        if self.capacity() > SHRINK_THRESHOLD && self.len < self.capacity() / SHRINK_FACTOR {
            let shrunk = self.capacity() / SHRINK_FACTOR;
            trace!(
                from = self.capacity(),
                to = shrunk,
                len = self.len,
                "shrinking ring"
            );
            self.relocate(shrunk);
        }

        item
    }

    /// Oldest item, if any.
    #[inline]
    pub(crate) fn front(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.tail].as_ref()
    }

    /// Moves the live elements oldest-first into a fresh slice of
    /// `new_capacity` slots starting at index 0.
    fn relocate(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.len && new_capacity > 0);

        let mut slots = empty_slots(new_capacity);
        let mut index = self.tail;
        for slot in slots.iter_mut().take(self.len) {
            *slot = self.slots[index].take();
            index = self.bump(index);
        }

        self.slots = slots;
        self.tail = 0;
        self.head = self.len % new_capacity;
    }
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}
