//! Item slot arena.
//!
//! List items live in an arena of stable slots addressed by [`ItemIndex`]. A
//! fixed pool of [`DEFAULT_POOL_LEN`] slots is allocated up front and threaded
//! into a free-index stack; most lists are short-lived and small, so item
//! churn in the common case touches no allocator at all. When the pool runs
//! dry, items spill into a growable region instead. Growth is unbounded.
//!
//! [`release`](ItemArena::release) routes a slot back by an index-range
//! check: pool indices return to the free stack, spill indices drop their
//! item and recycle the spill slot. A slot is tracked by exactly one of the
//! two free lists at any time.

use crate::error::{ControlError, ControlResult};
use crate::model::item::ListItem;

/// Number of pre-allocated pool slots in a fresh arena.
pub const DEFAULT_POOL_LEN: usize = 32;

/// Index of an item slot inside an [`ItemArena`].
///
/// Indices below the pool length address the fixed pool; the rest address
/// the spill region. An index stays valid until the slot is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemIndex(u32);

impl ItemIndex {
    #[inline]
    fn to_usize(self) -> usize {
        self.0 as usize
    }
}

/// Fixed-pool item allocator with spill fallback.
pub struct ItemArena {
    /// Fixed block of slots, length never changes after construction.
    pool: Vec<Option<ListItem>>,
    /// Free-index stack for the pool.
    pool_free: Vec<u32>,
    /// Overflow slots, grown on demand.
    spill: Vec<Option<ListItem>>,
    /// Free-index stack for the spill region (indices into `spill`).
    spill_free: Vec<u32>,
}

impl ItemArena {
    /// Create an arena with the default pool length.
    pub fn new() -> Self {
        Self::with_pool_len(DEFAULT_POOL_LEN)
    }

    /// Create an arena with a specific pool length.
    pub fn with_pool_len(pool_len: usize) -> Self {
        let mut pool = Vec::with_capacity(pool_len);
        pool.resize_with(pool_len, || None);
        let pool_free = (0..pool_len as u32).rev().collect();
        Self {
            pool,
            pool_free,
            spill: Vec::new(),
            spill_free: Vec::new(),
        }
    }

    /// Length of the fixed pool.
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Store `item` in a slot and return its index.
    ///
    /// Prefers a pooled slot, then a recycled spill slot; grows the spill
    /// region only as a last resort, and reports [`ControlError::OutOfSpace`]
    /// instead of aborting when that growth cannot be satisfied.
    pub fn allocate(&mut self, item: ListItem) -> ControlResult<ItemIndex> {
        if let Some(slot) = self.pool_free.pop() {
            self.pool[slot as usize] = Some(item);
            return Ok(ItemIndex(slot));
        }

        if let Some(slot) = self.spill_free.pop() {
            self.spill[slot as usize] = Some(item);
            return Ok(ItemIndex(self.pool.len() as u32 + slot));
        }

        self.spill
            .try_reserve(1)
            .map_err(|_| ControlError::OutOfSpace)?;
        self.spill.push(Some(item));
        Ok(ItemIndex((self.pool.len() + self.spill.len() - 1) as u32))
    }

    /// Release a slot, dropping its item.
    ///
    /// Pool slots go back on the free stack; spill slots are emptied and
    /// recycled. Releasing an already-free slot is a no-op.
    pub fn release(&mut self, index: ItemIndex) {
        let i = index.to_usize();
        if i < self.pool.len() {
            if self.pool[i].take().is_some() {
                self.pool_free.push(i as u32);
            }
        } else {
            let s = i - self.pool.len();
            if s < self.spill.len() && self.spill[s].take().is_some() {
                self.spill_free.push(s as u32);
            }
        }
    }

    /// Borrow the item in a slot.
    pub fn get(&self, index: ItemIndex) -> Option<&ListItem> {
        let i = index.to_usize();
        if i < self.pool.len() {
            self.pool[i].as_ref()
        } else {
            self.spill.get(i - self.pool.len())?.as_ref()
        }
    }

    /// Mutably borrow the item in a slot.
    pub fn get_mut(&mut self, index: ItemIndex) -> Option<&mut ListItem> {
        let i = index.to_usize();
        if i < self.pool.len() {
            self.pool[i].as_mut()
        } else {
            self.spill.get_mut(i - self.pool.len())?.as_mut()
        }
    }

    /// Drop every item and rebuild the empty free chain.
    ///
    /// Idempotent: resetting an already-empty arena leaves it unchanged.
    pub fn reset(&mut self) {
        for slot in &mut self.pool {
            *slot = None;
        }
        self.pool_free = (0..self.pool.len() as u32).rev().collect();
        self.spill.clear();
        self.spill_free.clear();
    }

    /// Number of occupied slots.
    pub fn live_len(&self) -> usize {
        let pooled = self.pool.len() - self.pool_free.len();
        let spilled = self.spill.len() - self.spill_free.len();
        pooled + spilled
    }
}

impl Default for ItemArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str) -> ListItem {
        ListItem::new(text)
    }

    #[test]
    fn test_pool_preferred_over_spill() {
        let mut arena = ItemArena::with_pool_len(2);
        let a = arena.allocate(item("a")).unwrap();
        let b = arena.allocate(item("b")).unwrap();
        let c = arena.allocate(item("c")).unwrap();

        assert!(a.to_usize() < 2);
        assert!(b.to_usize() < 2);
        assert!(c.to_usize() >= 2);
        assert_eq!(arena.live_len(), 3);
    }

    #[test]
    fn test_release_routes_by_index_range() {
        let mut arena = ItemArena::with_pool_len(1);
        let pooled = arena.allocate(item("pooled")).unwrap();
        let spilled = arena.allocate(item("spilled")).unwrap();

        arena.release(spilled);
        assert!(arena.get(spilled).is_none());
        // The pooled slot is untouched by releasing a spill slot.
        assert_eq!(arena.get(pooled).unwrap().text(), "pooled");

        arena.release(pooled);
        assert_eq!(arena.live_len(), 0);

        // The pool slot is reused before any new spill growth.
        let again = arena.allocate(item("again")).unwrap();
        assert_eq!(again.to_usize(), pooled.to_usize());
    }

    #[test]
    fn test_spill_slot_recycled() {
        let mut arena = ItemArena::with_pool_len(1);
        let _pooled = arena.allocate(item("pooled")).unwrap();
        let first = arena.allocate(item("first")).unwrap();
        arena.release(first);

        let second = arena.allocate(item("second")).unwrap();
        assert_eq!(second.to_usize(), first.to_usize());
        assert_eq!(arena.get(second).unwrap().text(), "second");
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut arena = ItemArena::with_pool_len(2);
        let a = arena.allocate(item("a")).unwrap();
        arena.release(a);
        arena.release(a);

        // Both pool slots must still be distinct after the double release.
        let x = arena.allocate(item("x")).unwrap();
        let y = arena.allocate(item("y")).unwrap();
        assert_ne!(x.to_usize(), y.to_usize());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut arena = ItemArena::with_pool_len(2);
        arena.allocate(item("a")).unwrap();
        arena.allocate(item("b")).unwrap();
        arena.allocate(item("c")).unwrap();

        arena.reset();
        assert_eq!(arena.live_len(), 0);
        arena.reset();
        assert_eq!(arena.live_len(), 0);

        let a = arena.allocate(item("a")).unwrap();
        assert!(a.to_usize() < 2);
    }
}
