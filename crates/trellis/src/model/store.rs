//! Item sequence.
//!
//! [`ItemStore`] keeps list entries as a singly linked chain over the slot
//! arena: `head` plus per-item `next` links. Lookup by position is an O(pos)
//! walk; the store trades random access for O(1) relink on insert and
//! remove, which is the right trade for the moderate list sizes these
//! controls carry.

use std::cmp::Ordering;

use crate::error::{ControlError, ControlResult};
use crate::model::arena::{ItemArena, ItemIndex};
use crate::model::compare::{ByteWiseComparator, KeyComparator};
use crate::model::item::ListItem;

/// Ordered sequence of list items backed by the slot arena.
///
/// When created sorted, insertion ignores positions and places new items in
/// key order (after existing equal keys). The comparator drives both sorted
/// placement and prefix matching; it can only be swapped while the store is
/// empty.
pub struct ItemStore {
    arena: ItemArena,
    head: Option<ItemIndex>,
    len: usize,
    sorted: bool,
    comparator: Box<dyn KeyComparator>,
}

impl ItemStore {
    /// Create an empty store; `sorted` fixes the placement policy for life.
    pub fn new(sorted: bool) -> Self {
        Self {
            arena: ItemArena::new(),
            head: None,
            len: 0,
            sorted,
            comparator: Box::new(ByteWiseComparator),
        }
    }

    /// Create an empty store over an arena with a specific pool length.
    pub fn with_pool_len(sorted: bool, pool_len: usize) -> Self {
        Self {
            arena: ItemArena::with_pool_len(pool_len),
            head: None,
            len: 0,
            sorted,
            comparator: Box::new(ByteWiseComparator),
        }
    }

    /// Number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the store holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether sorted placement is active.
    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Swap the ordering strategy.
    ///
    /// Fails with `InvalidArgument` once items exist: entries placed under
    /// the old ordering would break the sorted invariant.
    pub fn set_comparator(&mut self, comparator: Box<dyn KeyComparator>) -> ControlResult<()> {
        if self.len > 0 {
            return Err(ControlError::InvalidArgument);
        }
        self.comparator = comparator;
        Ok(())
    }

    /// The active comparator.
    pub fn comparator(&self) -> &dyn KeyComparator {
        self.comparator.as_ref()
    }

    fn slot_at(&self, position: usize) -> Option<ItemIndex> {
        let mut current = self.head;
        for _ in 0..position {
            current = self.arena.get(current?)?.next;
        }
        current
    }

    /// Borrow the item at `position`, O(position).
    pub fn get(&self, position: usize) -> Option<&ListItem> {
        self.arena.get(self.slot_at(position)?)
    }

    /// Mutably borrow the item at `position`, O(position).
    pub fn get_mut(&mut self, position: usize) -> Option<&mut ListItem> {
        let slot = self.slot_at(position)?;
        self.arena.get_mut(slot)
    }

    /// Insert `item`, returning the resulting 0-based position.
    ///
    /// Sorted stores ignore `position` and place the item in key order,
    /// after any existing equal keys. Unsorted stores insert at `position`
    /// (clamped to the tail), or append when `position` is `None`.
    pub fn insert(&mut self, item: ListItem, position: Option<usize>) -> ControlResult<usize> {
        let insert_after = if self.sorted {
            self.sorted_predecessor(item.text())
        } else {
            match position {
                None => self.slot_at(self.len.saturating_sub(1)).map(|s| (s, self.len)),
                Some(p) => {
                    let p = p.min(self.len);
                    if p == 0 {
                        None
                    } else {
                        self.slot_at(p - 1).map(|s| (s, p))
                    }
                }
            }
        };

        let new_slot = self.arena.allocate(item)?;
        match insert_after {
            None => {
                let old_head = self.head.take();
                if let Some(node) = self.arena.get_mut(new_slot) {
                    node.next = old_head;
                }
                self.head = Some(new_slot);
                self.len += 1;
                Ok(0)
            }
            Some((prev_slot, pos)) => {
                let successor = self.arena.get(prev_slot).and_then(|p| p.next);
                if let Some(node) = self.arena.get_mut(new_slot) {
                    node.next = successor;
                }
                if let Some(prev) = self.arena.get_mut(prev_slot) {
                    prev.next = Some(new_slot);
                }
                self.len += 1;
                Ok(pos)
            }
        }
    }

    /// Find the slot a sorted insertion of `key` should link after, together
    /// with the resulting position. `None` means insert at the head.
    fn sorted_predecessor(&self, key: &str) -> Option<(ItemIndex, usize)> {
        let mut prev: Option<(ItemIndex, usize)> = None;
        let mut current = self.head;
        let mut position = 0;

        while let Some(slot) = current {
            let item = self.arena.get(slot)?;
            if self.comparator.compare(key, item.text(), usize::MAX) == Ordering::Less {
                break;
            }
            position += 1;
            prev = Some((slot, position));
            current = item.next;
        }

        prev
    }

    /// Unlink and return the item at `position`.
    ///
    /// Returns `None` when `position` is out of range; the chain is
    /// untouched in that case.
    pub fn remove(&mut self, position: usize) -> Option<ListItem> {
        if position >= self.len {
            return None;
        }

        let removed_slot = if position == 0 {
            let slot = self.head?;
            self.head = self.arena.get(slot)?.next;
            slot
        } else {
            let prev_slot = self.slot_at(position - 1)?;
            let slot = self.arena.get(prev_slot)?.next?;
            let successor = self.arena.get(slot)?.next;
            self.arena.get_mut(prev_slot)?.next = successor;
            slot
        };

        let removed = self.arena.get(removed_slot).cloned();
        self.arena.release(removed_slot);
        self.len -= 1;
        removed
    }

    /// Linear search from `start`.
    ///
    /// A `start` beyond the last item restarts from 0. Matching is a
    /// comparator prefix match; `exact` additionally requires equal lengths.
    /// The scan runs to the tail only; callers wanting wraparound issue a
    /// second scan from 0, which keeps "not found from here" distinguishable
    /// from "not found at all".
    pub fn find(&self, start: usize, key: &str, exact: bool) -> ControlResult<usize> {
        if key.is_empty() {
            return Err(ControlError::InvalidArgument);
        }

        let start = if start >= self.len { 0 } else { start };
        let mut current = self.slot_at(start);
        let mut position = start;

        while let Some(slot) = current {
            let item = self.arena.get(slot).ok_or(ControlError::NotFound)?;
            let matches = if exact {
                item.text().len() == key.len()
                    && self.comparator.compare(key, item.text(), key.len()) == Ordering::Equal
            } else {
                self.comparator.compare(key, item.text(), key.len()) == Ordering::Equal
            };
            if matches {
                return Ok(position);
            }
            current = item.next;
            position += 1;
        }

        Err(ControlError::NotFound)
    }

    /// Release every item and rebuild the empty free chain. Idempotent.
    pub fn reset(&mut self) {
        self.head = None;
        self.len = 0;
        self.arena.reset();
    }

    /// Iterate items in list order.
    pub fn iter(&self) -> Items<'_> {
        Items {
            store: self,
            current: self.head,
        }
    }

    /// Number of items reachable from the head by following links.
    ///
    /// Equals [`len`](Self::len) by construction; exposed so integrity can
    /// be asserted cheaply in tests and debug assertions.
    pub fn reachable_len(&self) -> usize {
        self.iter().count()
    }
}

/// Iterator over items in list order.
pub struct Items<'a> {
    store: &'a ItemStore,
    current: Option<ItemIndex>,
}

impl<'a> Iterator for Items<'a> {
    type Item = &'a ListItem;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.store.arena.get(self.current?)?;
        self.current = item.next;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::compare::CaseInsensitiveComparator;

    fn texts(store: &ItemStore) -> Vec<&str> {
        store.iter().map(|i| i.text()).collect()
    }

    #[test]
    fn test_append_order() {
        let mut store = ItemStore::new(false);
        store.insert(ListItem::new("Banana"), None).unwrap();
        store.insert(ListItem::new("Apple"), None).unwrap();
        store.insert(ListItem::new("Cherry"), None).unwrap();

        assert_eq!(texts(&store), ["Banana", "Apple", "Cherry"]);
        assert_eq!(store.find(0, "Ch", false), Ok(2));
    }

    #[test]
    fn test_sorted_order() {
        let mut store = ItemStore::new(true);
        store.insert(ListItem::new("Banana"), None).unwrap();
        store.insert(ListItem::new("Apple"), None).unwrap();
        store.insert(ListItem::new("Cherry"), None).unwrap();

        assert_eq!(texts(&store), ["Apple", "Banana", "Cherry"]);
    }

    #[test]
    fn test_sorted_equal_keys_stable() {
        let mut store = ItemStore::new(true);
        let first = store.insert(ListItem::new("B"), None).unwrap();
        store.get_mut(first).unwrap().set_user_data(1);
        store.insert(ListItem::new("A"), None).unwrap();
        let second = store.insert(ListItem::new("B"), None).unwrap();

        // The new equal key lands after the existing one.
        assert_eq!(second, 2);
        assert_eq!(store.get(1).unwrap().user_data(), 1);
        assert_eq!(store.get(2).unwrap().user_data(), 0);
    }

    #[test]
    fn test_positional_insert() {
        let mut store = ItemStore::new(false);
        store.insert(ListItem::new("First"), None).unwrap();
        store.insert(ListItem::new("Third"), None).unwrap();

        let pos = store.insert(ListItem::new("Second"), Some(1)).unwrap();
        assert_eq!(pos, 1);
        let pos = store.insert(ListItem::new("Zeroth"), Some(0)).unwrap();
        assert_eq!(pos, 0);
        // Past-the-end clamps to append.
        let pos = store.insert(ListItem::new("Last"), Some(99)).unwrap();
        assert_eq!(pos, 4);

        assert_eq!(
            texts(&store),
            ["Zeroth", "First", "Second", "Third", "Last"]
        );
    }

    #[test]
    fn test_index_stability_across_unrelated_insert() {
        let mut store = ItemStore::new(false);
        store.insert(ListItem::new("a"), None).unwrap();
        store.insert(ListItem::new("b"), None).unwrap();
        store.insert(ListItem::new("c"), None).unwrap();

        store.insert(ListItem::new("x"), Some(2)).unwrap();
        assert_eq!(store.get(0).unwrap().text(), "a");
        assert_eq!(store.get(1).unwrap().text(), "b");
        assert_eq!(store.get(3).unwrap().text(), "c");
    }

    #[test]
    fn test_remove() {
        let mut store = ItemStore::new(false);
        store.insert(ListItem::new("a"), None).unwrap();
        store.insert(ListItem::new("b"), None).unwrap();
        store.insert(ListItem::new("c"), None).unwrap();

        let removed = store.remove(1).unwrap();
        assert_eq!(removed.text(), "b");
        assert_eq!(texts(&store), ["a", "c"]);

        assert!(store.remove(2).is_none());
        assert_eq!(store.len(), 2);

        let removed = store.remove(0).unwrap();
        assert_eq!(removed.text(), "a");
        assert_eq!(texts(&store), ["c"]);
    }

    #[test]
    fn test_count_invariant() {
        let mut store = ItemStore::new(false);
        for text in ["a", "b", "c", "d", "e"] {
            store.insert(ListItem::new(text), None).unwrap();
        }
        store.remove(4);
        store.remove(0);
        store.insert(ListItem::new("f"), Some(1)).unwrap();

        assert_eq!(store.len(), store.reachable_len());
    }

    #[test]
    fn test_find_prefix_and_exact() {
        let mut store = ItemStore::new(false);
        store.insert(ListItem::new("Apple"), None).unwrap();
        store.insert(ListItem::new("Application"), None).unwrap();
        store.insert(ListItem::new("Banana"), None).unwrap();

        assert_eq!(store.find(0, "App", false), Ok(0));
        assert_eq!(store.find(1, "App", false), Ok(1));
        assert_eq!(store.find(0, "App", true), Err(ControlError::NotFound));
        assert_eq!(store.find(0, "Apple", true), Ok(0));
        // Start past the end restarts from 0.
        assert_eq!(store.find(17, "Banana", true), Ok(2));
        // No wraparound mid-scan.
        assert_eq!(store.find(1, "Apple", true), Err(ControlError::NotFound));
        assert_eq!(store.find(0, "", false), Err(ControlError::InvalidArgument));
    }

    #[test]
    fn test_reset_idempotent() {
        let mut store = ItemStore::new(false);
        store.insert(ListItem::new("a"), None).unwrap();
        store.insert(ListItem::new("b"), None).unwrap();

        store.reset();
        assert_eq!(store.len(), 0);
        assert_eq!(store.reachable_len(), 0);
        store.reset();
        assert_eq!(store.len(), 0);

        store.insert(ListItem::new("again"), None).unwrap();
        assert_eq!(texts(&store), ["again"]);
    }

    #[test]
    fn test_comparator_locked_once_populated() {
        let mut store = ItemStore::new(true);
        assert!(store
            .set_comparator(Box::new(CaseInsensitiveComparator))
            .is_ok());

        store.insert(ListItem::new("a"), None).unwrap();
        assert_eq!(
            store.set_comparator(Box::new(ByteWiseComparator)),
            Err(ControlError::InvalidArgument)
        );
    }

    #[test]
    fn test_sorted_beyond_pool_len() {
        let mut store = ItemStore::with_pool_len(true, 4);
        for text in ["delta", "alpha", "echo", "charlie", "bravo", "foxtrot"] {
            store.insert(ListItem::new(text), None).unwrap();
        }
        assert_eq!(
            texts(&store),
            ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"]
        );

        // Sorted invariant holds pairwise.
        let all: Vec<_> = texts(&store);
        for pair in all.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}
