//! Read handler and ground conversions for [`Value`].

use std::sync::Arc;

use indexmap::IndexMap;
use transit_pack::{FromGround, Ground, MapBuilder, ReadHandler, TransitError};

use crate::collections::{List, Map, OrderedMap, OrderedSet, Set};
use crate::constants::TAG_MESSAGE;
use crate::error::CodecError;
use crate::message::NamespaceRegistry;
use crate::value::{Kind, Value};

#[derive(Debug, Clone, Default)]
pub(crate) struct Decoder {
    registry: Option<Arc<NamespaceRegistry>>,
}

impl Decoder {
    /// Messages are decoded only when `registry` holds at least one namespace.
    pub(crate) fn new(registry: Option<Arc<NamespaceRegistry>>) -> Self {
        Self {
            registry: registry.filter(|r| !r.is_empty()),
        }
    }

    pub(crate) fn registry(&self) -> Option<&NamespaceRegistry> {
        self.registry.as_deref()
    }

    fn read_message(&self, registry: &NamespaceRegistry, rep: Value) -> Result<Value, CodecError> {
        match elements(Kind::Message, rep)?.as_slice() {
            [Value::Str(name), Value::Str(payload)] => {
                Ok(Value::Message(registry.decode(name, payload)?))
            }
            other => Err(CodecError::invalid(
                TAG_MESSAGE,
                format!("expected [name, payload], got {} elements", other.len()),
            )),
        }
    }
}

impl ReadHandler<Value> for Decoder {
    type Error = CodecError;

    fn read(&self, tag: &str, rep: Value) -> Option<Result<Value, CodecError>> {
        let kind = Kind::from_tag(tag)?;
        Some(match kind {
            Kind::Native => return None,
            Kind::Map => pairs(kind, rep).map(|pairs| {
                let mut builder = Map::builder();
                for (k, v) in pairs {
                    builder.set(k, v);
                }
                Value::Map(builder.freeze())
            }),
            Kind::OrderedMap => pairs(kind, rep).map(|pairs| {
                let mut builder = OrderedMap::builder();
                for (k, v) in pairs {
                    builder.set(k, v);
                }
                Value::OrderedMap(builder.freeze())
            }),
            Kind::List => elements(kind, rep).map(|items| Value::List(List::from(items))),
            Kind::Set => elements(kind, rep).map(|items| Value::Set(Set::from(items))),
            Kind::OrderedSet => elements(kind, rep).map(|items| Value::OrderedSet(OrderedSet::from(items))),
            Kind::Message => {
                let registry = self.registry.as_deref()?;
                self.read_message(registry, rep)
            }
            Kind::Opaque => Ok(Value::Null),
        })
    }
}

fn elements(kind: Kind, rep: Value) -> Result<Vec<Value>, CodecError> {
    match rep {
        Value::Array(items) => Ok(items),
        other => Err(CodecError::invalid(
            kind.tag().unwrap_or_default(),
            format!("expected an array, got {}", other.type_name()),
        )),
    }
}

fn pairs(kind: Kind, rep: Value) -> Result<Vec<(Value, Value)>, CodecError> {
    let items = elements(kind, rep)?;
    if items.len() % 2 != 0 {
        return Err(CodecError::invalid(
            kind.tag().unwrap_or_default(),
            format!("odd number of elements ({})", items.len()),
        ));
    }
    let mut out = Vec::with_capacity(items.len() / 2);
    let mut items = items.into_iter();
    while let (Some(k), Some(v)) = (items.next(), items.next()) {
        out.push((k, v));
    }
    Ok(out)
}

/// Builds native transit maps as [`Value::Object`].
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ObjectBuilder;

impl MapBuilder<Value> for ObjectBuilder {
    type Map = IndexMap<String, Value>;

    fn init(&self) -> Self::Map {
        IndexMap::new()
    }

    fn add(&self, map: &mut Self::Map, key: Value, value: Value) -> Result<(), TransitError> {
        match key {
            Value::Str(key) => {
                map.insert(key, value);
                Ok(())
            }
            other => Err(TransitError::Malformed(format!(
                "object key must be a string, got {}",
                other.type_name()
            ))),
        }
    }

    fn finalize(&self, map: Self::Map) -> Value {
        Value::Object(map)
    }
}

impl FromGround for Value {
    fn from_ground(ground: Ground<Self>) -> Self {
        match ground {
            Ground::Null => Value::Null,
            Ground::Bool(b) => Value::Bool(b),
            Ground::Int(i) => Value::Int(i),
            Ground::Float(f) => Value::Float(f),
            Ground::Str(s) => Value::Str(s),
            Ground::Array(items) => Value::Array(items),
        }
    }
}
