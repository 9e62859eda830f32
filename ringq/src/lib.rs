//! Thread-safe FIFO queue over an auto-resizing ring buffer.
//!
//! [`RingBufferQueue`] grows by doubling when full and halves itself when a
//! large buffer drains below half occupancy, so callers never manage capacity
//! by hand. Operations never block on queue state: dequeuing from an empty
//! queue returns `None` immediately.
//!
//! ```
//! use ringq::{Queue, RingBufferQueue};
//! use std::sync::Arc;
//!
//! let queue = Arc::new(RingBufferQueue::new(16));
//!
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     std::thread::spawn(move || {
//!         for i in 0..100u32 {
//!             queue.enqueue(i);
//!         }
//!     })
//! };
//! producer.join().unwrap();
//!
//! assert_eq!(queue.len(), 100);
//! assert_eq!(queue.peek(), Some(0));
//! ```

pub mod config;
pub mod queue;
mod ring;
pub mod sync;
mod trace;

pub use config::{CapacityError, QueueConfig};
pub use queue::Queue;
pub use sync::ring_buffer::RingBufferQueue;
pub use trace::init_tracing;
