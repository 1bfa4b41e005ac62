//! Write handler: one representation per [`Kind`](crate::Kind).

use std::borrow::Cow;

use transit_pack::{Rep, TransitError, WriteHandler};

use crate::error::CodecError;
use crate::filter::EntryFilter;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub(crate) struct Encoder {
    filter: EntryFilter,
    messages: bool,
}

impl Encoder {
    pub(crate) fn new(filter: EntryFilter, messages: bool) -> Self {
        Self { filter, messages }
    }

    pub(crate) fn filter(&self) -> &EntryFilter {
        &self.filter
    }

    pub(crate) fn encodes_messages(&self) -> bool {
        self.messages
    }
}

impl WriteHandler<Value> for Encoder {
    type Error = CodecError;

    fn tag(&self, value: &Value) -> Option<&'static str> {
        value.kind().tag()
    }

    fn rep<'a>(&self, value: &'a Value) -> Result<Rep<'a, Value>, CodecError> {
        Ok(match value {
            Value::Null => Rep::Null,
            Value::Bool(b) => Rep::Bool(*b),
            Value::Int(i) => Rep::Int(*i),
            Value::Float(f) => Rep::Float(*f),
            Value::Str(s) => Rep::Str(Cow::Borrowed(s)),
            Value::Array(items) => Rep::Array(items.iter().map(Rep::Value).collect()),
            Value::Object(map) => Rep::Map(
                map.iter()
                    .map(|(k, v)| (Cow::Borrowed(k.as_str()), Rep::Value(v)))
                    .collect(),
            ),
            Value::Map(map) => flat_pairs(self.filter.entries(map.iter())),
            Value::OrderedMap(map) => flat_pairs(self.filter.entries(map.iter())),
            Value::List(list) => elements(self.filter.values(list.iter())),
            Value::Set(set) => elements(self.filter.values(set.iter())),
            Value::OrderedSet(set) => elements(self.filter.values(set.iter())),
            Value::Message(message) => {
                if !self.messages {
                    return Err(TransitError::UnknownType(format!(
                        "message `{}` (message encoding is disabled)",
                        message.full_name()
                    ))
                    .into());
                }
                Rep::Array(vec![
                    Rep::Str(Cow::Owned(message.wire_name())),
                    Rep::Str(Cow::Owned(message.payload())),
                ])
            }
            Value::Opaque(_) => Rep::Null,
        })
    }
}

/// `[k0, v0, k1, v1, ...]`
fn flat_pairs<'a>(entries: Vec<(&'a Value, &'a Value)>) -> Rep<'a, Value> {
    Rep::Array(
        entries
            .into_iter()
            .flat_map(|(k, v)| [Rep::Value(k), Rep::Value(v)])
            .collect(),
    )
}

fn elements<'a>(values: Vec<&'a Value>) -> Rep<'a, Value> {
    Rep::Array(values.into_iter().map(Rep::Value).collect())
}
