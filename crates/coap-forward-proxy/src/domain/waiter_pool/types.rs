//! Waiter pool types.

use std::fmt;

use crate::domain::{Endpoint, Timestamp};

/// Typed reference to an allocated waiter.
///
/// Handed to the request engine as the context of an outgoing request and
/// given back when the origin response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaiterHandle {
    pub(super) index: u16,
    pub(super) generation: u32,
}

impl WaiterHandle {
    /// Slot index inside the pool.
    pub fn index(&self) -> usize {
        usize::from(self.index)
    }

    /// Generation of the slot at allocation time.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for WaiterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "waiter#{}.{}", self.index, self.generation)
    }
}

/// A client whose request is being proxied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waiter {
    /// Where the origin response goes.
    pub remote: Endpoint,
    /// When the request was accepted (drives the timeout sweep).
    pub accepted_at: Timestamp,
}

/// Pool occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Waiters currently allocated.
    pub in_use: usize,
    /// Compile-time capacity.
    pub capacity: usize,
}
