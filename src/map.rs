//! Insertion-ordered map type for JSON objects.
//!
//! This module provides [`JsonMap`], a wrapper around [`IndexMap`] used as the
//! backing store of [`JsonValue::Object`](crate::JsonValue::Object). JSON
//! object members keep the order in which they were inserted, which matters
//! for the serializer: field-by-field object mapping emits parent fields
//! before the declaring type's own fields, and that ordering must survive in
//! the produced object.
//!
//! Duplicate keys are not representable: inserting an existing key replaces
//! the previous value, which is exactly the overwrite behavior the map
//! serialization rule requires.

use indexmap::IndexMap;

/// An insertion-ordered map of string keys to JSON values.
///
/// # Examples
///
/// ```rust
/// use json_auto::{JsonMap, JsonValue};
///
/// let mut map = JsonMap::new();
/// map.insert("first".to_string(), JsonValue::from(1));
/// map.insert("second".to_string(), JsonValue::from(2));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonMap(IndexMap<String, crate::JsonValue>);

impl JsonMap {
    /// Creates an empty `JsonMap`.
    #[must_use]
    pub fn new() -> Self {
        JsonMap(IndexMap::new())
    }

    /// Creates an empty `JsonMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        JsonMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// An existing key keeps its position; only the value is replaced.
    pub fn insert(&mut self, key: String, value: crate::JsonValue) -> Option<crate::JsonValue> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::JsonValue> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[must_use]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut crate::JsonValue> {
        self.0.get_mut(key)
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// The relative order of the remaining members is preserved.
    pub fn remove(&mut self, key: &str) -> Option<crate::JsonValue> {
        self.0.shift_remove(key)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of members in the object.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the object has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::JsonValue> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::JsonValue> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::JsonValue> {
        self.0.iter()
    }
}

impl IntoIterator for JsonMap {
    type Item = (String, crate::JsonValue);
    type IntoIter = indexmap::map::IntoIter<String, crate::JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a JsonMap {
    type Item = (&'a String, &'a crate::JsonValue);
    type IntoIter = indexmap::map::Iter<'a, String, crate::JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, crate::JsonValue)> for JsonMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::JsonValue)>>(iter: T) -> Self {
        JsonMap(IndexMap::from_iter(iter))
    }
}

impl Extend<(String, crate::JsonValue)> for JsonMap {
    fn extend<T: IntoIterator<Item = (String, crate::JsonValue)>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonValue;

    #[test]
    fn insert_preserves_order() {
        let mut map = JsonMap::new();
        map.insert("z".to_string(), JsonValue::from(1));
        map.insert("a".to_string(), JsonValue::from(2));
        map.insert("m".to_string(), JsonValue::from(3));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn insert_overwrites_duplicate_key() {
        let mut map = JsonMap::new();
        assert!(map.insert("key".to_string(), JsonValue::from(1)).is_none());
        assert!(map.insert("key".to_string(), JsonValue::from(2)).is_some());
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("key"), Some(&JsonValue::from(2)));
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut map = JsonMap::new();
        map.insert("a".to_string(), JsonValue::from(1));
        map.insert("b".to_string(), JsonValue::from(2));
        map.insert("c".to_string(), JsonValue::from(3));
        assert_eq!(map.remove("b"), Some(JsonValue::from(2)));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }
}
