//! Swap-remove storage.
//!
//! [`UnorderedVec`] gives up element order in exchange for O(1) removal: removing a slot moves
//! the current last element into it. Any slot number held across a removal may now name a
//! different element and has to be re-resolved.

use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnorderedVec<T> {
    items: Vec<T>,
}

impl<T> Default for UnorderedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UnorderedVec<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Appends `item` and returns the slot it landed in.
    pub fn push(&mut self, item: T) -> usize {
        let idx = self.items.len();
        self.items.push(item);
        idx
    }

    /// Removes the element at `index`, moving the last element into the freed slot.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `[0, len)`.
    pub fn swap_remove(&mut self, index: usize) -> T {
        assert!(
            index < self.items.len(),
            "swap_remove index {index} out of range (len {})",
            self.items.len()
        );
        self.items.swap_remove(index)
    }

    pub fn try_swap_remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.swap_remove(index))
    }

    /// Removes the first element equal to `item`.
    pub fn remove_item(&mut self, item: &T) -> Option<T>
    where
        T: PartialEq,
    {
        let idx = self.position(|x| x == item)?;
        Some(self.items.swap_remove(idx))
    }

    pub fn position<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.items.iter().position(pred)
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slot of the element that the next [`swap_remove`](Self::swap_remove) would relocate.
    pub fn last_index(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Index<usize> for UnorderedVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for UnorderedVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> FromIterator<T> for UnorderedVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for UnorderedVec<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a UnorderedVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
