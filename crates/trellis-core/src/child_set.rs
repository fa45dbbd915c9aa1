//! Growable, order-preserving child collection.
//!
//! Backing storage grows in fixed increments when full. Live items always
//! occupy `[0, len)`; slots past the live count are kept empty so a scan can
//! never report a stale entry.

use crate::error::{KernelError, Result};

/// Default number of slots added when the backing storage is full.
pub const DEFAULT_GROWTH: usize = 4;

/// An indexed collection of children, such as toolbar or tab items.
#[derive(Debug, Clone)]
pub struct IndexedChildSet<T> {
    slots: Vec<Option<T>>,
    count: usize,
    growth: usize,
}

impl<T> Default for IndexedChildSet<T> {
    fn default() -> Self {
        Self::with_growth(DEFAULT_GROWTH)
    }
}

impl<T> IndexedChildSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set that grows by `growth` slots at a time (at least one).
    pub fn with_growth(growth: usize) -> Self {
        Self {
            slots: Vec::new(),
            count: 0,
            growth: growth.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of backing slots, live or empty.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Insert `item` at `index`, shifting later items up by one.
    ///
    /// `index == len()` appends. Any index past that fails with
    /// [`KernelError::InvalidRange`] and leaves the set untouched.
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        if index > self.count {
            return Err(KernelError::InvalidRange {
                index,
                count: self.count,
            });
        }
        if self.count == self.slots.len() {
            let grown = self.slots.len() + self.growth;
            self.slots.resize_with(grown, || None);
        }
        for i in (index..self.count).rev() {
            self.slots[i + 1] = self.slots[i].take();
        }
        self.slots[index] = Some(item);
        self.count += 1;
        Ok(())
    }

    /// Append `item` and return its index.
    pub fn push(&mut self, item: T) -> usize {
        let index = self.count;
        if self.count == self.slots.len() {
            let grown = self.slots.len() + self.growth;
            self.slots.resize_with(grown, || None);
        }
        self.slots[index] = Some(item);
        self.count += 1;
        index
    }

    /// Remove the item at `index`, shifting later items down by one.
    ///
    /// Returns `None` when `index` is out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.count {
            return None;
        }
        let removed = self.slots[index].take();
        for i in index..self.count - 1 {
            self.slots[i] = self.slots[i + 1].take();
        }
        // The trailing slot was vacated by the shift (or by the take above).
        self.slots[self.count - 1] = None;
        self.count -= 1;
        removed
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.count {
            self.slots[index].as_ref()
        } else {
            None
        }
    }

    /// Live items in index order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots[..self.count].iter().filter_map(Option::as_ref)
    }

    /// Remove every item, returning them in index order.
    pub fn take_all(&mut self) -> Vec<T> {
        let items = self.slots[..self.count]
            .iter_mut()
            .filter_map(Option::take)
            .collect();
        self.count = 0;
        items
    }
}

impl<T: PartialEq> IndexedChildSet<T> {
    /// Index of the first live item equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.slots[..self.count]
            .iter()
            .position(|slot| slot.as_ref() == Some(item))
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    /// Remove `item`, returning the index it occupied.
    pub fn remove(&mut self, item: &T) -> Option<usize> {
        let index = self.index_of(item)?;
        self.remove_at(index);
        Some(index)
    }
}

impl<T: Clone> IndexedChildSet<T> {
    /// A copy of the live items. Mutating it never affects the set.
    pub fn snapshot(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}
