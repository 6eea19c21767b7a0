//! The ordered, duplicate-free list of chosen items.

use super::item::{Item, ItemKey};

/// Separator used by [`SelectedList::form_value`].
pub const FORM_VALUE_SEPARATOR: &str = ",";

/// Ordered list of selected items.
///
/// Items keep the order they were appended in and no two items share a key.
/// Every mutation reports whether it changed anything so the owner can fire
/// notifications exactly once per real change.
#[derive(Debug, Clone)]
pub struct SelectedList<T> {
    items: Vec<Item<T>>,
}

impl<T> Default for SelectedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SelectedList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a list from initial items, dropping later duplicates.
    pub fn from_items(items: impl IntoIterator<Item = Item<T>>) -> Self {
        let mut list = Self::new();
        for item in items {
            list.append(item);
        }
        list
    }

    /// Append an item to the end.
    ///
    /// Returns `false` without touching the list when the key is already
    /// present.
    pub fn append(&mut self, item: Item<T>) -> bool {
        if self.contains(&item.key) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove the item with the given key.
    pub fn remove(&mut self, key: &ItemKey) -> Option<Item<T>> {
        let index = self.items.iter().position(|item| &item.key == key)?;
        Some(self.items.remove(index))
    }

    /// Remove the most recently appended item.
    pub fn remove_last(&mut self) -> Option<Item<T>> {
        self.items.pop()
    }

    /// Check whether a key is selected.
    pub fn contains(&self, key: &ItemKey) -> bool {
        self.items.iter().any(|item| &item.key == key)
    }

    /// The most recently appended item.
    pub fn last(&self) -> Option<&Item<T>> {
        self.items.last()
    }

    /// Selected items in append order.
    pub fn items(&self) -> &[Item<T>] {
        &self.items
    }

    /// Iterate selected items in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, Item<T>> {
        self.items.iter()
    }

    /// Selected keys in append order.
    pub fn keys(&self) -> Vec<ItemKey> {
        self.items.iter().map(|item| item.key.clone()).collect()
    }

    /// Number of selected items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Comma-joined keys, suitable for a hidden form field.
    pub fn form_value(&self) -> String {
        self.items
            .iter()
            .map(|item| item.key.as_str())
            .collect::<Vec<_>>()
            .join(FORM_VALUE_SEPARATOR)
    }
}
