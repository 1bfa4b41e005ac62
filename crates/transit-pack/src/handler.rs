//! Handler traits through which a value model plugs into the format.
//!
//! The writer never inspects values itself. It asks a [`WriteHandler`] for
//! the tag and representation of each value and recurses into every
//! [`Rep::Value`] leaf of that representation. The reader parses ground JSON
//! into values with [`FromGround`] and [`MapBuilder`], and offers every tagged
//! representation to a [`ReadHandler`].

use std::borrow::Cow;

use crate::TransitError;

/// Representation of a value as handed to the writer.
///
/// Borrowed wherever possible: handlers usually return `Rep::Value(&child)`
/// for the children of a collection and let the writer dispatch on them.
#[derive(Debug)]
pub enum Rep<'a, V> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Cow<'a, str>),
    Array(Vec<Rep<'a, V>>),
    /// Native string-keyed map, written in iteration order.
    Map(Vec<(Cow<'a, str>, Rep<'a, V>)>),
    /// A nested value, re-dispatched through the write handler.
    Value(&'a V),
}

/// Write side of a value model.
pub trait WriteHandler<V> {
    type Error: From<TransitError>;

    /// Tag of `value`, or `None` when its representation is native JSON.
    fn tag(&self, value: &V) -> Option<&'static str>;

    /// Representation of `value`.
    ///
    /// Types without a handler return [`TransitError::UnknownType`].
    fn rep<'a>(&self, value: &'a V) -> Result<Rep<'a, V>, Self::Error>;
}

/// Read side of a value model.
pub trait ReadHandler<V> {
    type Error: From<TransitError>;

    /// Rebuilds a value from the decoded representation of a tagged value.
    ///
    /// Returns `None` when no handler is registered for `tag`.
    fn read(&self, tag: &str, rep: V) -> Option<Result<V, Self::Error>>;
}

/// Strategy used by the reader to build native maps.
pub trait MapBuilder<V> {
    type Map;

    fn init(&self) -> Self::Map;

    fn add(&self, map: &mut Self::Map, key: V, value: V) -> Result<(), TransitError>;

    fn finalize(&self, map: Self::Map) -> V;
}

/// Ground value produced by the reader before any handler runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Ground<V> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<V>),
}

/// Conversion from ground JSON into a value model.
pub trait FromGround: Sized {
    fn from_ground(ground: Ground<Self>) -> Self;
}
