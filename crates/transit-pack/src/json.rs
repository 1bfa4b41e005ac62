//! Handler set that carries plain `serde_json` values through the format.
//!
//! Useful on its own for reading transit produced elsewhere when no custom
//! tags are expected, and as the reference implementation of the handler
//! traits.

use std::borrow::Cow;

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::handler::{FromGround, Ground, MapBuilder, ReadHandler, Rep, WriteHandler};
use crate::TransitError;

/// Handlers for [`serde_json::Value`]: every value is native, no tag is
/// accepted on read.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainJson;

impl WriteHandler<JsonValue> for PlainJson {
    type Error = TransitError;

    fn tag(&self, _value: &JsonValue) -> Option<&'static str> {
        None
    }

    fn rep<'a>(&self, value: &'a JsonValue) -> Result<Rep<'a, JsonValue>, TransitError> {
        Ok(match value {
            JsonValue::Null => Rep::Null,
            JsonValue::Bool(b) => Rep::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Rep::Int(i),
                None => Rep::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Rep::Str(Cow::Borrowed(s)),
            JsonValue::Array(items) => Rep::Array(items.iter().map(Rep::Value).collect()),
            JsonValue::Object(map) => Rep::Map(
                map.iter()
                    .map(|(k, v)| (Cow::Borrowed(k.as_str()), Rep::Value(v)))
                    .collect(),
            ),
        })
    }
}

impl ReadHandler<JsonValue> for PlainJson {
    type Error = TransitError;

    fn read(&self, _tag: &str, _rep: JsonValue) -> Option<Result<JsonValue, TransitError>> {
        None
    }
}

impl MapBuilder<JsonValue> for PlainJson {
    type Map = JsonMap<String, JsonValue>;

    fn init(&self) -> Self::Map {
        JsonMap::new()
    }

    fn add(&self, map: &mut Self::Map, key: JsonValue, value: JsonValue) -> Result<(), TransitError> {
        match key {
            JsonValue::String(key) => {
                map.insert(key, value);
                Ok(())
            }
            other => Err(TransitError::Malformed(format!(
                "json object key must be a string, got {other}"
            ))),
        }
    }

    fn finalize(&self, map: Self::Map) -> JsonValue {
        JsonValue::Object(map)
    }
}

impl FromGround for JsonValue {
    fn from_ground(ground: Ground<Self>) -> Self {
        match ground {
            Ground::Null => JsonValue::Null,
            Ground::Bool(b) => JsonValue::Bool(b),
            Ground::Int(i) => JsonValue::Number(i.into()),
            Ground::Float(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
            Ground::Str(s) => JsonValue::String(s),
            Ground::Array(items) => JsonValue::Array(items),
        }
    }
}
