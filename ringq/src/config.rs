//! Capacity limits and queue configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest initial capacity accepted as-is.
pub const MIN_CAPACITY: usize = 10;

/// Largest initial capacity accepted as-is.
pub const MAX_INITIAL_CAPACITY: usize = u16::MAX as usize;

/// Initial capacity substituted for out-of-range requests.
pub const DEFAULT_CAPACITY: usize = 30;

/// Multiplier applied to the capacity when the buffer is full.
pub const GROW_FACTOR: usize = 2;

/// Divisor applied to the capacity when the buffer is underused.
pub const SHRINK_FACTOR: usize = 2;

/// Buffers are only shrunk while larger than this many slots.
pub const SHRINK_THRESHOLD: usize = 1024;

/// Rejected initial capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapacityError {
    /// Requested capacity is below [`MIN_CAPACITY`].
    #[error("initial capacity {requested} is below the minimum of {min}")]
    TooSmall { requested: usize, min: usize },
    /// Requested capacity is above [`MAX_INITIAL_CAPACITY`].
    #[error("initial capacity {requested} exceeds the maximum of {max}")]
    TooLarge { requested: usize, max: usize },
}

/// Configuration for a [`RingBufferQueue`](crate::RingBufferQueue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Number of slots allocated up front.
    pub initial_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl QueueConfig {
    #[must_use]
    pub const fn new(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }

    /// Checks that the initial capacity lies in
    /// `[MIN_CAPACITY, MAX_INITIAL_CAPACITY]`.
    ///
    /// # Errors
    ///
    /// Returns the bound the requested capacity falls outside of.
    pub const fn validate(&self) -> Result<(), CapacityError> {
        let requested = self.initial_capacity;
        if requested < MIN_CAPACITY {
            return Err(CapacityError::TooSmall {
                requested,
                min: MIN_CAPACITY,
            });
        }
        if requested > MAX_INITIAL_CAPACITY {
            return Err(CapacityError::TooLarge {
                requested,
                max: MAX_INITIAL_CAPACITY,
            });
        }
        Ok(())
    }

    /// Capacity a queue built from this config starts with.
    ///
    /// Out-of-range requests resolve to [`DEFAULT_CAPACITY`].
    #[must_use]
    pub const fn effective_capacity(&self) -> usize {
        match self.validate() {
            Ok(()) => self.initial_capacity,
            Err(_) => DEFAULT_CAPACITY,
        }
    }
}
