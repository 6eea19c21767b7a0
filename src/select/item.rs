//! Selectable items and their identity keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of an [`Item`].
///
/// Keys are compared by value. Callers may build them from strings or
/// integers; both end up as the same string-backed key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    /// Create a key from anything string-like.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for ItemKey {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<u32> for ItemKey {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for ItemKey {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

/// A selectable unit of data.
///
/// `text` is both what gets displayed by default and what the filter
/// matches against. `payload` is opaque to the picker and only handed back
/// to the caller's render functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<T> {
    /// Unique identity within a candidate collection.
    pub key: ItemKey,
    /// Display and filter text.
    pub text: String,
    /// Caller data used for rendering.
    pub payload: T,
}

impl<T> Item<T> {
    /// Create a new item with a payload.
    pub fn new(key: impl Into<ItemKey>, text: impl Into<String>, payload: T) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            payload,
        }
    }
}

impl Item<()> {
    /// Create an item that carries no payload.
    pub fn plain(key: impl Into<ItemKey>, text: impl Into<String>) -> Self {
        Self::new(key, text, ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_integer_and_string_are_equal() {
        assert_eq!(ItemKey::from(7u64), ItemKey::from("7"));
        assert_eq!(ItemKey::from(7i32), ItemKey::new("7"));
    }

    #[test]
    fn test_key_display() {
        let key = ItemKey::new("team-alpha");
        assert_eq!(key.to_string(), "team-alpha");
        assert_eq!(key.as_str(), "team-alpha");
    }

    #[test]
    fn test_plain_item() {
        let item = Item::plain(1u32, "Red");
        assert_eq!(item.key, ItemKey::from("1"));
        assert_eq!(item.text, "Red");
    }

    #[test]
    fn test_key_serializes_as_plain_string() {
        let key = ItemKey::new("red");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"red\"");
    }
}
