//! Transit JSON codec for persistent collections and protobuf messages.
//!
//! Values are [`Value`] trees mixing native JSON shapes with five persistent
//! collection kinds, schema-typed messages and opaque values. Each non-native
//! kind travels under its own tag:
//!
//! | Kind | Tag | Representation |
//! |---|---|---|
//! | [`Map`] | `iM` | `[k0, v0, k1, v1, ...]` |
//! | [`OrderedMap`] | `iOM` | `[k0, v0, k1, v1, ...]`, insertion order |
//! | [`List`] | `iL` | `[e0, e1, ...]` |
//! | [`Set`] | `iS` | `[e0, e1, ...]` |
//! | [`OrderedSet`] | `iOS` | `[e0, e1, ...]`, insertion order |
//! | [`MessageValue`] | `PB` | `[".pkg.Type", base64 payload]` |
//! | [`Opaque`] | `_` | null; always decodes to [`Value::Null`] |
//!
//! The free functions use a shared default codec: no filter, no message
//! support. Use [`with_filter`], [`with_namespaces`] or [`Codec::builder`] for
//! anything else.
//!
//! ```
//! use transit_immutable::{List, Map, Value};
//!
//! let value = Value::from(Map::new().set("a", List::from_iter([1, 2])));
//! let text = transit_immutable::encode(&value).unwrap();
//! assert_eq!(transit_immutable::decode(&text).unwrap(), value);
//! ```
//!
//! Encoding order of [`Map`] and [`Set`] members is unspecified.

mod codec;
mod collections;
mod decoder;
mod encoder;
mod error;
mod filter;
mod message;
#[cfg(feature = "prost")]
mod protobuf;
mod value;

pub mod constants;

use std::sync::OnceLock;

pub use codec::{Codec, CodecBuilder, CodecOptions};
pub use collections::{List, Map, MapBuilder, OrderedMap, OrderedMapBuilder, OrderedSet, Set};
pub use error::{CodecError, MessageDecodeError, ResolveError, Result};
pub use filter::EntryFilter;
pub use message::{Message, MessageType, MessageValue, Namespace, NamespaceRegistry};
#[cfg(feature = "prost")]
pub use protobuf::ProstType;
pub use transit_pack::TransitError;
pub use value::{Kind, Opaque, Value};

fn default_codec() -> &'static Codec {
    static DEFAULT: OnceLock<Codec> = OnceLock::new();
    DEFAULT.get_or_init(Codec::new)
}

/// Encodes `value` with the default codec.
pub fn encode(value: &Value) -> Result<String> {
    default_codec().encode(value)
}

/// Decodes `text` with the default codec.
pub fn decode(text: &str) -> Result<Value> {
    default_codec().decode(text)
}

/// See [`Codec::with_filter`].
pub fn with_filter<F>(predicate: F) -> Codec
where
    F: Fn(&Value, Option<&Value>) -> bool + Send + Sync + 'static,
{
    Codec::with_filter(predicate)
}

/// See [`Codec::with_namespaces`].
pub fn with_namespaces(
    namespaces: impl IntoIterator<Item = Namespace>,
    encode_messages: bool,
) -> Result<Codec> {
    Codec::with_namespaces(namespaces, encode_messages)
}
