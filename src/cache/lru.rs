//! Fixed-capacity LRU pool of subframe slots.
//!
//! The pool is an arena: `capacity` slots allocated once, linked into a
//! single circular doubly-linked list through `next`/`prev` index arrays.
//! `head` is the most-recently-used slot, `tail` the least-recently-used.
//! Slots are never deallocated; a load overwrites a slot in place.
//!
//! All list operations are O(1). Index-based linkage keeps the structure
//! ownership-safe without any pointer aliasing.

use crate::subframe::Subframe;

/// Fixed-capacity pool of [`Subframe`] slots with LRU ordering.
pub struct SubframeCache {
    slots: Vec<Subframe>,
    next: Vec<usize>,
    prev: Vec<usize>,
    head: usize,
    tail: usize,
}

impl SubframeCache {
    /// Create a pool with the given capacity.
    ///
    /// If the slot arena cannot be allocated at the requested capacity,
    /// the capacity is halved and retried until allocation succeeds: the
    /// cache degrades to a smaller pool rather than failing the caller.
    /// A degraded pool is logged as a warning.
    pub fn new(capacity: usize) -> Self {
        let mut slots: Vec<Subframe> = Vec::new();
        let mut granted = capacity;
        loop {
            match slots.try_reserve_exact(granted) {
                Ok(()) => break,
                Err(_) if granted > 0 => {
                    granted /= 2;
                }
                Err(_) => {
                    granted = 0;
                    break;
                }
            }
        }
        if granted < capacity {
            tracing::warn!(
                requested = capacity,
                granted = granted,
                "subframe pool allocation degraded to reduced capacity"
            );
        }

        slots.resize_with(granted, Subframe::default);

        // Wire the circular list: slot i links forward to i+1, the last
        // slot wraps to the first.
        let next = (0..granted).map(|i| (i + 1) % granted.max(1)).collect();
        let prev = (0..granted)
            .map(|i| (i + granted.max(1) - 1) % granted.max(1))
            .collect();

        Self {
            slots,
            next,
            prev,
            head: 0,
            tail: granted.saturating_sub(1),
        }
    }

    /// Number of slots in the pool.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the least-recently-used slot, or `None` for an empty pool.
    pub fn least_recently_used(&self) -> Option<usize> {
        if self.slots.is_empty() {
            None
        } else {
            Some(self.tail)
        }
    }

    /// Shared access to a slot.
    pub fn slot(&self, index: usize) -> &Subframe {
        &self.slots[index]
    }

    /// Exclusive access to a slot.
    pub fn slot_mut(&mut self, index: usize) -> &mut Subframe {
        &mut self.slots[index]
    }

    /// Promote a slot to most-recently-used.
    ///
    /// No-op if the slot is already at the head.
    pub fn touch(&mut self, index: usize) {
        if index == self.head {
            return;
        }
        if index == self.tail {
            // The head's predecessor is the tail in a circular list, so
            // rotating by one makes the old tail the new head.
            self.tail = self.prev[index];
            self.head = index;
            return;
        }
        self.unlink(index);
        self.link_before_head(index);
        self.head = index;
    }

    /// Demote a slot to least-recently-used.
    ///
    /// Used when a load into a freshly claimed slot fails and the slot
    /// must be returned to the eviction pool immediately.
    pub fn demote(&mut self, index: usize) {
        if index == self.tail {
            return;
        }
        if index == self.head {
            self.head = self.next[index];
            self.tail = index;
            return;
        }
        self.unlink(index);
        self.link_before_head(index);
        self.tail = index;
    }

    /// Slot indices from most- to least-recently-used.
    pub fn lru_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.slots.len());
        if self.slots.is_empty() {
            return order;
        }
        let mut current = self.head;
        loop {
            order.push(current);
            current = self.next[current];
            if current == self.head {
                break;
            }
        }
        order
    }

    /// Remove a slot from the cycle. The slot's own links are left stale
    /// and must be rewritten by the caller.
    fn unlink(&mut self, index: usize) {
        let (p, n) = (self.prev[index], self.next[index]);
        self.next[p] = n;
        self.prev[n] = p;
    }

    /// Insert a detached slot between the current tail and head.
    fn link_before_head(&mut self, index: usize) {
        let h = self.head;
        let t = self.prev[h];
        self.next[t] = index;
        self.prev[index] = t;
        self.next[index] = h;
        self.prev[h] = index;
    }
}
