//! Waiter arena implementation.

use super::types::{PoolStats, Waiter, WaiterHandle};
use crate::domain::{Endpoint, Timestamp, WAITER_POOL_CAPACITY};

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u32,
    waiter: Option<Waiter>,
    next_free: Option<u16>,
}

/// Fixed-capacity arena of waiters.
///
/// `K` must fit in a `u16`; larger capacities are clamped at construction
/// (slots past `u16::MAX` are never handed out).
#[derive(Debug)]
pub struct WaiterPool<const K: usize = WAITER_POOL_CAPACITY> {
    slots: [Slot; K],
    free_head: Option<u16>,
    in_use: usize,
}

impl<const K: usize> Default for WaiterPool<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const K: usize> WaiterPool<K> {
    /// Create a pool with every slot free.
    pub fn new() -> Self {
        let usable = K.min(usize::from(u16::MAX));
        let slots = std::array::from_fn(|i| Slot {
            generation: 0,
            waiter: None,
            next_free: if i + 1 < usable {
                u16::try_from(i + 1).ok()
            } else {
                None
            },
        });
        Self {
            slots,
            free_head: if usable > 0 { Some(0) } else { None },
            in_use: 0,
        }
    }

    /// Claim a free slot for `remote`. `None` when the pool is exhausted.
    pub fn allocate(&mut self, remote: Endpoint, now: Timestamp) -> Option<WaiterHandle> {
        let index = self.free_head?;
        let slot = &mut self.slots[usize::from(index)];
        self.free_head = slot.next_free.take();
        slot.waiter = Some(Waiter {
            remote,
            accepted_at: now,
        });
        self.in_use += 1;
        Some(WaiterHandle {
            index,
            generation: slot.generation,
        })
    }

    /// Release the waiter behind `handle` and return it.
    ///
    /// Returns `None` (and changes nothing) for stale or already freed
    /// handles.
    pub fn free(&mut self, handle: WaiterHandle) -> Option<Waiter> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        let waiter = slot.waiter.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        slot.next_free = self.free_head;
        self.free_head = Some(handle.index);
        self.in_use -= 1;
        Some(waiter)
    }

    /// Look up a live waiter.
    pub fn get(&self, handle: WaiterHandle) -> Option<&Waiter> {
        let slot = self.slots.get(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.waiter.as_ref()
    }

    /// `true` if `handle` refers to a live waiter.
    pub fn contains(&self, handle: WaiterHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Iterate over live waiters.
    pub fn iter(&self) -> impl Iterator<Item = (WaiterHandle, &Waiter)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            let waiter = slot.waiter.as_ref()?;
            let index = u16::try_from(i).ok()?;
            Some((
                WaiterHandle {
                    index,
                    generation: slot.generation,
                },
                waiter,
            ))
        })
    }

    /// Free every waiter accepted at least `timeout_secs` before `now`,
    /// calling `on_expired` for each one. Returns the number freed.
    pub fn drain_expired<F>(&mut self, now: Timestamp, timeout_secs: u64, mut on_expired: F) -> usize
    where
        F: FnMut(WaiterHandle, Waiter),
    {
        let mut freed = 0;
        for i in 0..K {
            let slot = &self.slots[i];
            let expired = slot
                .waiter
                .is_some_and(|w| now.secs_since(w.accepted_at) >= timeout_secs);
            if !expired {
                continue;
            }
            let Ok(index) = u16::try_from(i) else {
                continue;
            };
            let handle = WaiterHandle {
                index,
                generation: slot.generation,
            };
            if let Some(waiter) = self.free(handle) {
                on_expired(handle, waiter);
                freed += 1;
            }
        }
        freed
    }

    /// Waiters currently allocated.
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Compile-time capacity.
    pub const fn capacity(&self) -> usize {
        K
    }

    /// `true` when the next allocation would fail.
    pub fn is_full(&self) -> bool {
        self.free_head.is_none()
    }

    /// Occupancy snapshot.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            in_use: self.in_use,
            capacity: K,
        }
    }
}
