//! The value model carried by the codec.
//!
//! The variant set is closed: native JSON shapes, the five persistent
//! collection kinds, protobuf messages and opaque values. The codec dispatches
//! on [`Value::kind`], never on the shape of the data.
//!
//! ## Equality
//!
//! - Values of different variants are never equal (`Int(1) != Float(1.0)`,
//!   `Map != OrderedMap` even with identical entries).
//! - Floats use SameValueZero: `NaN == NaN` and `-0.0 == 0.0`.
//! - `Object`, `Map` and `Set` ignore order; `OrderedMap`, `OrderedSet`,
//!   `List` and `Array` compare in order.
//!
//! Hashing agrees with equality, so any value can be a map key or set member.

use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::collections::{List, Map, OrderedMap, OrderedSet, Set};
use crate::constants::{
    TAG_LIST, TAG_MAP, TAG_MESSAGE, TAG_OPAQUE, TAG_ORDERED_MAP, TAG_ORDERED_SET, TAG_SET,
};
use crate::message::{Message, MessageValue};

/// A value the codec knows how to encode and decode.
#[derive(Debug, Clone)]
pub enum Value {
    /// JSON null; also the decode result of every opaque value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Native array.
    Array(Vec<Value>),
    /// Native string-keyed object, insertion order kept.
    Object(IndexMap<String, Value>),
    Map(Map),
    OrderedMap(OrderedMap),
    List(List),
    Set(Set),
    OrderedSet(OrderedSet),
    Message(MessageValue),
    /// Executable or otherwise non-data value; encoded lossily.
    Opaque(Opaque),
}

/// Encoding shape of a [`Value`], one per write/read handler pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Native,
    Map,
    OrderedMap,
    List,
    Set,
    OrderedSet,
    Message,
    Opaque,
}

impl Kind {
    pub const ALL: [Kind; 8] = [
        Kind::Native,
        Kind::Map,
        Kind::OrderedMap,
        Kind::List,
        Kind::Set,
        Kind::OrderedSet,
        Kind::Message,
        Kind::Opaque,
    ];

    /// Wire tag of this kind; `None` for native JSON values.
    pub const fn tag(self) -> Option<&'static str> {
        match self {
            Kind::Native => None,
            Kind::Map => Some(TAG_MAP),
            Kind::OrderedMap => Some(TAG_ORDERED_MAP),
            Kind::List => Some(TAG_LIST),
            Kind::Set => Some(TAG_SET),
            Kind::OrderedSet => Some(TAG_ORDERED_SET),
            Kind::Message => Some(TAG_MESSAGE),
            Kind::Opaque => Some(TAG_OPAQUE),
        }
    }

    /// Kind registered under `tag`, matched exactly.
    pub fn from_tag(tag: &str) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| kind.tag() == Some(tag))
    }
}

impl Value {
    /// Creates an opaque value wrapping `value`.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Value::Opaque(Opaque::new(value))
    }

    /// Wraps a protobuf message.
    pub fn message<M: Message>(message: M) -> Self {
        Value::Message(MessageValue::new(message))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Null
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Str(_)
            | Value::Array(_)
            | Value::Object(_) => Kind::Native,
            Value::Map(_) => Kind::Map,
            Value::OrderedMap(_) => Kind::OrderedMap,
            Value::List(_) => Kind::List,
            Value::Set(_) => Kind::Set,
            Value::OrderedSet(_) => Kind::OrderedSet,
            Value::Message(_) => Kind::Message,
            Value::Opaque(_) => Kind::Opaque,
        }
    }

    /// Variant name, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Str(_) => "Str",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Map(_) => "Map",
            Value::OrderedMap(_) => "OrderedMap",
            Value::List(_) => "List",
            Value::Set(_) => "Set",
            Value::OrderedSet(_) => "OrderedSet",
            Value::Message(_) => "Message",
            Value::Opaque(_) => "Opaque",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_ordered_map(&self) -> Option<&OrderedMap> {
        match self {
            Value::OrderedMap(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&Set> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_ordered_set(&self) -> Option<&OrderedSet> {
        match self {
            Value::OrderedSet(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&MessageValue> {
        match self {
            Value::Message(message) => Some(message),
            _ => None,
        }
    }

    /// Concrete message behind a `Message` value.
    pub fn downcast_message<T: Any>(&self) -> Option<&T> {
        self.as_message()?.downcast_ref()
    }

    /// Looks up `key` in a map-like value, or an index in a sequence.
    pub fn get(&self, key: impl Into<Value>) -> Option<&Value> {
        let key = key.into();
        match self {
            Value::Map(map) => map.get(&key),
            Value::OrderedMap(map) => map.get(&key),
            Value::Object(map) => map.get(key.as_str()?),
            Value::List(list) => list.get(usize::try_from(key.as_int()?).ok()?),
            Value::Array(items) => items.get(usize::try_from(key.as_int()?).ok()?),
            _ => None,
        }
    }

    /// Follows `path` through nested map-like values.
    pub fn get_in<I>(&self, path: I) -> Option<&Value>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        path.into_iter().try_fold(self, |current, key| current.get(key))
    }

    /// Membership for sequences and sets, value membership for maps.
    pub fn contains(&self, needle: &Value) -> bool {
        match self {
            Value::List(list) => list.contains(needle),
            Value::Array(items) => items.contains(needle),
            Value::Set(set) => set.contains(needle),
            Value::OrderedSet(set) => set.contains(needle),
            Value::Map(map) => map.values().any(|v| v == needle),
            Value::OrderedMap(map) => map.values().any(|v| v == needle),
            Value::Object(map) => map.values().any(|v| v == needle),
            _ => false,
        }
    }
}

/// Float equality with SameValueZero semantics.
fn same_value_zero(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

/// Bits of `f` normalised so that equal floats hash equally.
fn float_key(f: f64) -> u64 {
    if f.is_nan() {
        u64::MAX
    } else if f == 0.0 {
        0.0f64.to_bits()
    } else {
        f.to_bits()
    }
}

/// Order-independent hash of a sequence of items.
pub(crate) fn unordered_hash<T: Hash>(items: impl Iterator<Item = T>) -> u64 {
    items
        .map(|item| {
            let mut hasher = DefaultHasher::new();
            item.hash(&mut hasher);
            hasher.finish()
        })
        .fold(0u64, u64::wrapping_add)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => same_value_zero(*a, *b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::OrderedMap(a), Value::OrderedMap(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::OrderedSet(a), Value::OrderedSet(b)) => a == b,
            (Value::Message(a), Value::Message(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => float_key(*f).hash(state),
            Value::Str(s) => s.hash(state),
            Value::Array(items) => items.hash(state),
            Value::Object(map) => {
                map.len().hash(state);
                unordered_hash(map.iter()).hash(state);
            }
            Value::Map(map) => map.hash(state),
            Value::OrderedMap(map) => map.hash(state),
            Value::List(list) => list.hash(state),
            Value::Set(set) => set.hash(state),
            Value::OrderedSet(set) => set.hash(state),
            Value::Message(message) => message.hash(state),
            Value::Opaque(opaque) => opaque.hash(state),
        }
    }
}

/// A value without an interchange representation, such as a closure.
///
/// Compared and hashed by identity. Always encodes to the opaque marker and
/// always decodes to [`Value::Null`].
#[derive(Clone)]
pub struct Opaque(Arc<dyn Any + Send + Sync>);

impl Opaque {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Opaque(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({:p})", self.addr())
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Opaque {}

impl Hash for Opaque {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

// ----------------------------------------------------------------
// Conversions

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i.into())
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        i64::try_from(i).map_or(Value::Float(i as f64), Value::Int)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<OrderedMap> for Value {
    fn from(map: OrderedMap) -> Self {
        Value::OrderedMap(map)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

impl From<Set> for Value {
    fn from(set: Set) -> Self {
        Value::Set(set)
    }
}

impl From<OrderedSet> for Value {
    fn from(set: OrderedSet) -> Self {
        Value::OrderedSet(set)
    }
}

impl From<MessageValue> for Value {
    fn from(message: MessageValue) -> Self {
        Value::Message(message)
    }
}

impl From<Opaque> for Value {
    fn from(opaque: Opaque) -> Self {
        Value::Opaque(opaque)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn floats_use_same_value_zero() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::Float(-0.0), Value::Float(0.0));
        assert_ne!(Value::Float(1.0), Value::Int(1));

        let set: HashSet<Value> = [Value::Float(-0.0), Value::Float(0.0), Value::Float(f64::NAN)]
            .into_iter()
            .chain([Value::Float(f64::NAN)])
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn objects_compare_without_order() {
        let a: IndexMap<String, Value> = [("a".to_owned(), 1.into()), ("b".to_owned(), 2.into())]
            .into_iter()
            .collect();
        let b: IndexMap<String, Value> = [("b".to_owned(), 2.into()), ("a".to_owned(), 1.into())]
            .into_iter()
            .collect();
        let (a, b) = (Value::Object(a), Value::Object(b));
        assert_eq!(a, b);
        let set: HashSet<Value> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn kinds_map_to_unique_tags() {
        let tags: Vec<_> = Kind::ALL.iter().filter_map(|k| k.tag()).collect();
        let unique: HashSet<_> = tags.iter().collect();
        assert_eq!(tags.len(), unique.len());
        assert_eq!(tags, crate::constants::TAGS);
        for kind in Kind::ALL {
            if let Some(tag) = kind.tag() {
                assert_eq!(Kind::from_tag(tag), Some(kind));
            }
        }
        assert_eq!(Kind::from_tag("im"), None);
        assert_eq!(Kind::from_tag("~#iM"), None);
    }

    #[test]
    fn opaque_values_compare_by_identity() {
        let f = Opaque::new(|x: i32| x + 1);
        let g = Opaque::new(|x: i32| x + 1);
        assert_eq!(Value::Opaque(f.clone()), Value::Opaque(f.clone()));
        assert_ne!(Value::Opaque(f), Value::Opaque(g));
    }

    #[test]
    fn lookups_follow_paths() {
        let inner = Map::new().set("d", "deep");
        let outer = Value::from(Map::new().set("c", inner).set(1, List::from_iter([10, 20])));
        assert_eq!(outer.get_in(["c", "d"]), Some(&Value::from("deep")));
        assert_eq!(outer.get_in([Value::from(1), Value::from(1)]), Some(&Value::Int(20)));
        assert_eq!(outer.get_in(["c", "missing"]), None);
        assert!(outer.get("c").is_some_and(|c| c.contains(&"deep".into())));
    }

    #[test]
    fn converts_from_serde_json() {
        let v = Value::from(serde_json::json!({"a": [1, 2.5, null], "b": "x"}));
        assert_eq!(
            v.get("a"),
            Some(&Value::Array(vec![Value::Int(1), Value::Float(2.5), Value::Null]))
        );
        assert_eq!(v.get("b"), Some(&Value::from("x")));
    }
}
