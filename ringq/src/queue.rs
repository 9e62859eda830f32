//! The common queue interface.

use std::sync::Arc;

/// A FIFO queue shared by reference between threads.
///
/// All operations take `&self`; implementations provide their own
/// synchronization. None of them block waiting for the queue to change state:
/// an empty queue yields `None` immediately.
pub trait Queue {
    type Item;

    /// Appends an item to the back of the queue.
    fn enqueue(&self, item: Self::Item);

    /// Removes and returns the oldest item, or `None` if the queue is empty.
    fn dequeue(&self) -> Option<Self::Item>;

    /// Returns a copy of the oldest item without removing it.
    fn peek(&self) -> Option<Self::Item>
    where
        Self::Item: Clone;

    /// Number of items in the queue.
    fn len(&self) -> usize;

    /// Number of slots currently allocated.
    fn capacity(&self) -> usize;

    /// Whether the queue holds no items.
    ///
    /// Like [`len`](Queue::len) this is a snapshot and may be stale by the time
    /// the caller acts on it.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<Q: Queue + ?Sized> Queue for &Q {
    type Item = Q::Item;

    fn enqueue(&self, item: Self::Item) {
        (**self).enqueue(item);
    }

    fn dequeue(&self) -> Option<Self::Item> {
        (**self).dequeue()
    }

    fn peek(&self) -> Option<Self::Item>
    where
        Self::Item: Clone,
    {
        (**self).peek()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl<Q: Queue + ?Sized> Queue for Arc<Q> {
    type Item = Q::Item;

    fn enqueue(&self, item: Self::Item) {
        (**self).enqueue(item);
    }

    fn dequeue(&self) -> Option<Self::Item> {
        (**self).dequeue()
    }

    fn peek(&self) -> Option<Self::Item>
    where
        Self::Item: Clone,
    {
        (**self).peek()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}
