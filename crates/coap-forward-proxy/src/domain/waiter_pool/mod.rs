//! # Waiter Pool
//!
//! Fixed-capacity arena of client waiters. One waiter is held for every
//! request currently proxied; it remembers where the origin response has to
//! be relayed to.
//!
//! ## Design
//!
//! - Capacity is a const generic: the arena is a plain array, no heap.
//! - Free slots form an intrusive free list, so allocate and free are O(1).
//! - Handles carry a generation; freeing bumps it, so a late or repeated
//!   free with an old handle is a no-op instead of corrupting a reused slot.

mod pool;
mod types;

pub use pool::WaiterPool;
pub use types::{PoolStats, Waiter, WaiterHandle};
