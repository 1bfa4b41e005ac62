//! Persistent collections: [`Map`], [`OrderedMap`], [`List`], [`Set`] and
//! [`OrderedSet`].
//!
//! Every collection is an immutable, reference-counted snapshot. Cloning is
//! O(1); "modifying" operations (`set`, `push`, `insert`, `remove`) return a
//! new collection and leave the receiver untouched (copy-on-write).
//!
//! There is no structural sharing: each such update copies the whole
//! underlying table, so it costs O(n). Building a collection by chaining
//! `set` or `push` is quadratic. Bulk construction goes through a mutable
//! builder (or `FromIterator`) instead, which is frozen once:
//!
//! ```
//! use transit_immutable::{Map, Value};
//!
//! let mut builder = Map::builder();
//! builder.set("a", 1).set("b", 2);
//! let map = builder.freeze();
//! let bigger = map.set("c", 3);
//! assert_eq!(map.len(), 2);
//! assert_eq!(bigger.get(&Value::from("c")), Some(&Value::Int(3)));
//! ```

use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::value::{unordered_hash, Value};

// ----------------------------------------------------------------
// Map

/// Unordered map with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Map(Arc<HashMap<Value, Value>>);

/// Mutable staging area for a [`Map`].
#[derive(Debug, Default)]
pub struct MapBuilder(HashMap<Value, Value>);

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> MapBuilder {
        MapBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.contains_key(key)
    }

    /// Entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    /// Returns a copy with `key` bound to `value`.
    #[must_use]
    pub fn set(&self, key: impl Into<Value>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).insert(key.into(), value.into());
        next
    }

    /// Returns a copy without `key`.
    #[must_use]
    pub fn remove(&self, key: &Value) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).remove(key);
        next
    }
}

impl MapBuilder {
    pub fn set(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn freeze(self) -> Map {
        Map(Arc::new(self.0))
    }
}

impl Hash for Map {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        unordered_hash(self.iter()).hash(state);
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut builder = Map::builder();
        for (k, v) in iter {
            builder.set(k, v);
        }
        builder.freeze()
    }
}

// ----------------------------------------------------------------
// OrderedMap

/// Map iterating in first-insertion order. Re-setting a key keeps its slot.
#[derive(Debug, Clone, Default)]
pub struct OrderedMap(Arc<IndexMap<Value, Value>>);

/// Mutable staging area for an [`OrderedMap`].
#[derive(Debug, Default)]
pub struct OrderedMapBuilder(IndexMap<Value, Value>);

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> OrderedMapBuilder {
        OrderedMapBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    #[must_use]
    pub fn set(&self, key: impl Into<Value>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).insert(key.into(), value.into());
        next
    }

    /// Returns a copy without `key`; the remaining entries keep their order.
    #[must_use]
    pub fn remove(&self, key: &Value) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).shift_remove(key);
        next
    }
}

impl OrderedMapBuilder {
    pub fn set(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn freeze(self) -> OrderedMap {
        OrderedMap(Arc::new(self.0))
    }
}

impl PartialEq for OrderedMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for OrderedMap {}

impl Hash for OrderedMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for entry in self.iter() {
            entry.hash(state);
        }
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut builder = OrderedMap::builder();
        for (k, v) in iter {
            builder.set(k, v);
        }
        builder.freeze()
    }
}

// ----------------------------------------------------------------
// List

/// Ordered sequence; duplicates allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct List(Arc<Vec<Value>>);

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }

    #[must_use]
    pub fn push(&self, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).push(value.into());
        next
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        List(Arc::new(items))
    }
}

impl<V: Into<Value>> FromIterator<V> for List {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        List::from(iter.into_iter().map(Into::into).collect::<Vec<_>>())
    }
}

// ----------------------------------------------------------------
// Set

/// Unordered set of unique values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Set(Arc<HashSet<Value>>);

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    /// Members in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }

    #[must_use]
    pub fn insert(&self, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).insert(value.into());
        next
    }

    #[must_use]
    pub fn remove(&self, value: &Value) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).remove(value);
        next
    }
}

impl Hash for Set {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        unordered_hash(self.iter()).hash(state);
    }
}

impl From<Vec<Value>> for Set {
    fn from(items: Vec<Value>) -> Self {
        Set(Arc::new(items.into_iter().collect()))
    }
}

impl<V: Into<Value>> FromIterator<V> for Set {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Set(Arc::new(iter.into_iter().map(Into::into).collect()))
    }
}

// ----------------------------------------------------------------
// OrderedSet

/// Set iterating in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct OrderedSet(Arc<IndexSet<Value>>);

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }

    #[must_use]
    pub fn insert(&self, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).insert(value.into());
        next
    }

    #[must_use]
    pub fn remove(&self, value: &Value) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.0).shift_remove(value);
        next
    }
}

impl PartialEq for OrderedSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for OrderedSet {}

impl Hash for OrderedSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for value in self.iter() {
            value.hash(state);
        }
    }
}

impl From<Vec<Value>> for OrderedSet {
    fn from(items: Vec<Value>) -> Self {
        OrderedSet(Arc::new(items.into_iter().collect()))
    }
}

impl<V: Into<Value>> FromIterator<V> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        OrderedSet(Arc::new(iter.into_iter().map(Into::into).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_leave_the_original_untouched() {
        let list = List::from_iter([1, 2]);
        let longer = list.push(3);
        assert_eq!(list.len(), 2);
        assert_eq!(longer.len(), 3);

        let map = Map::new().set("a", 1);
        let without = map.remove(&"a".into());
        assert!(map.contains_key(&"a".into()));
        assert!(without.is_empty());
    }

    #[test]
    fn ordered_map_keeps_first_insertion_slot() {
        let map = OrderedMap::new().set(2, "a").set(3, "b").set(1, "c").set(2, "z");
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec![Value::Int(2), Value::Int(3), Value::Int(1)]);
        assert_eq!(map.get(&2.into()), Some(&Value::from("z")));
    }

    #[test]
    fn ordered_kinds_compare_in_order() {
        let a = OrderedSet::from_iter([1, 2]);
        let b = OrderedSet::from_iter([2, 1]);
        assert_ne!(a, b);
        assert_eq!(Set::from_iter([1, 2]), Set::from_iter([2, 1]));

        let a = OrderedMap::from_iter([("x", 1), ("y", 2)]);
        let b = OrderedMap::from_iter([("y", 2), ("x", 1)]);
        assert_ne!(a, b);
        assert_eq!(
            Map::from_iter([("x", 1), ("y", 2)]),
            Map::from_iter([("y", 2), ("x", 1)])
        );
    }

    #[test]
    fn sets_collapse_duplicates() {
        assert_eq!(Set::from_iter([1, 2, 3, 3]).len(), 3);
        let ordered = OrderedSet::from_iter([1, 4, 3, 3]);
        let members: Vec<_> = ordered.iter().cloned().collect();
        assert_eq!(members, vec![Value::Int(1), Value::Int(4), Value::Int(3)]);
    }

    #[test]
    fn collections_work_as_keys() {
        let key = List::from_iter([1, 2]);
        let map = Map::new().set(key.clone(), List::from_iter([1, 2, 3, 4, 5]));
        assert!(map.contains_key(&List::from_iter([1, 2]).into()));
        assert_eq!(map.get(&key.into()).and_then(Value::as_list).map(List::len), Some(5));
    }
}
