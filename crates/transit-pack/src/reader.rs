//! Transit JSON reader.

use std::marker::PhantomData;

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::cache::ReadCache;
use crate::constants::{ESC, MAP_AS_ARRAY, QUOTE_TAG, RES, SUB, TAG_PREFIX};
use crate::handler::{FromGround, Ground, MapBuilder, ReadHandler};
use crate::TransitError;

/// Transit reader bound to one read handler and one map-building strategy.
///
/// Accepts both the cached array form and the verbose object form.
#[derive(Debug, Clone)]
pub struct Reader<H, B> {
    handler: H,
    builder: B,
}

impl<H, B> Reader<H, B> {
    pub fn new(handler: H, builder: B) -> Self {
        Self { handler, builder }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Decodes a transit JSON string.
    pub fn read<V>(&self, text: &str) -> Result<V, H::Error>
    where
        H: ReadHandler<V>,
        B: MapBuilder<V>,
        V: FromGround,
    {
        let json: JsonValue = serde_json::from_str(text).map_err(TransitError::from)?;
        self.read_json(&json)
    }

    /// Decodes a transit document already parsed into a JSON tree.
    pub fn read_json<V>(&self, json: &JsonValue) -> Result<V, H::Error>
    where
        H: ReadHandler<V>,
        B: MapBuilder<V>,
        V: FromGround,
    {
        let mut parser = Parser {
            handler: &self.handler,
            builder: &self.builder,
            cache: ReadCache::new(),
            _value: PhantomData,
        };
        parser.decode(json, false)
    }
}

struct Parser<'r, V, H, B> {
    handler: &'r H,
    builder: &'r B,
    cache: ReadCache,
    _value: PhantomData<fn() -> V>,
}

impl<V, H, B> Parser<'_, V, H, B>
where
    H: ReadHandler<V>,
    B: MapBuilder<V>,
    V: FromGround,
{
    fn decode(&mut self, json: &JsonValue, as_map_key: bool) -> Result<V, H::Error> {
        match json {
            JsonValue::Null => Ok(V::from_ground(Ground::Null)),
            JsonValue::Bool(b) => Ok(V::from_ground(Ground::Bool(*b))),
            JsonValue::Number(n) => {
                let ground = match n.as_i64() {
                    Some(i) => Ground::Int(i),
                    None => Ground::Float(n.as_f64().ok_or_else(|| {
                        TransitError::malformed(format!("unrepresentable number {n}"))
                    })?),
                };
                Ok(V::from_ground(ground))
            }
            JsonValue::String(s) => {
                let s = self.cache.read(s, as_map_key)?;
                self.decode_string(&s)
            }
            JsonValue::Array(items) => self.decode_array(items),
            JsonValue::Object(map) => self.decode_object(map),
        }
    }

    fn decode_string(&mut self, s: &str) -> Result<V, H::Error> {
        let mut chars = s.chars();
        if chars.next() != Some(ESC) {
            return Ok(V::from_ground(Ground::Str(s.to_owned())));
        }
        match chars.next() {
            Some(ESC | SUB | RES) => Ok(V::from_ground(Ground::Str(s[1..].to_owned()))),
            Some('#') => Err(TransitError::malformed(format!("tag `{s}` outside of a tagged value")).into()),
            Some(tag) => self.decode_scalar(tag, chars.as_str()),
            None => Err(TransitError::malformed("dangling escape character").into()),
        }
    }

    fn decode_scalar(&mut self, tag: char, rest: &str) -> Result<V, H::Error> {
        let bad = || TransitError::malformed(format!("invalid `{ESC}{tag}` scalar `{rest}`"));
        let ground = match tag {
            '_' => Ground::Null,
            '?' => match rest {
                "t" => Ground::Bool(true),
                "f" => Ground::Bool(false),
                _ => return Err(bad().into()),
            },
            'i' => Ground::Int(rest.parse().map_err(|_| bad())?),
            'd' => Ground::Float(rest.parse().map_err(|_| bad())?),
            'z' => Ground::Float(match rest {
                "NaN" => f64::NAN,
                "INF" => f64::INFINITY,
                "-INF" => f64::NEG_INFINITY,
                _ => return Err(bad().into()),
            }),
            _ => {
                let rep = V::from_ground(Ground::Str(rest.to_owned()));
                return self.apply(&tag.to_string(), rep);
            }
        };
        Ok(V::from_ground(ground))
    }

    fn decode_array(&mut self, items: &[JsonValue]) -> Result<V, H::Error> {
        if let [JsonValue::String(head), rest @ ..] = items {
            if head == MAP_AS_ARRAY {
                return self.decode_array_map(rest);
            }
            if let [rep] = rest {
                // The head passes through the cache exactly once, whether it
                // turns out to be a tag or a plain string.
                let head = self.cache.read(head, false)?;
                if let Some(tag) = head.strip_prefix(TAG_PREFIX) {
                    let rep = self.decode(rep, false)?;
                    return self.apply_tagged(tag, rep);
                }
                let first = self.decode_string(&head)?;
                let second = self.decode(rep, false)?;
                return Ok(V::from_ground(Ground::Array(vec![first, second])));
            }
        }
        let items = items
            .iter()
            .map(|item| self.decode(item, false))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(V::from_ground(Ground::Array(items)))
    }

    fn decode_array_map(&mut self, entries: &[JsonValue]) -> Result<V, H::Error> {
        if entries.len() % 2 != 0 {
            return Err(TransitError::malformed("map has a key without a value").into());
        }
        let mut map = self.builder.init();
        for pair in entries.chunks_exact(2) {
            let key = self.decode(&pair[0], true)?;
            let value = self.decode(&pair[1], false)?;
            self.builder.add(&mut map, key, value)?;
        }
        Ok(self.builder.finalize(map))
    }

    fn decode_object(&mut self, object: &JsonMap<String, JsonValue>) -> Result<V, H::Error> {
        if object.len() == 1 {
            if let Some((key, rep)) = object.iter().next() {
                if let Some(tag) = key.strip_prefix(TAG_PREFIX) {
                    let rep = self.decode(rep, false)?;
                    return self.apply_tagged(tag, rep);
                }
            }
        }
        let mut map = self.builder.init();
        for (key, value) in object {
            let key = self.cache.read(key, true)?;
            let key = self.decode_string(&key)?;
            let value = self.decode(value, false)?;
            self.builder.add(&mut map, key, value)?;
        }
        Ok(self.builder.finalize(map))
    }

    fn apply_tagged(&mut self, tag: &str, rep: V) -> Result<V, H::Error> {
        if tag == QUOTE_TAG {
            return Ok(rep);
        }
        self.apply(tag, rep)
    }

    fn apply(&self, tag: &str, rep: V) -> Result<V, H::Error> {
        match self.handler.read(tag, rep) {
            Some(result) => result,
            None => Err(TransitError::UnknownTag(tag.to_owned()).into()),
        }
    }
}
