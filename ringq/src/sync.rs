//! Thread-safe queues for in-process communication.
//!
//! Any number of threads may share a queue from this module, typically
//! behind an [`Arc`](std::sync::Arc).

pub mod ring_buffer;
