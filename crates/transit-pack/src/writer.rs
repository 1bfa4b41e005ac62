//! Transit JSON writer.

use std::borrow::Cow;
use std::marker::PhantomData;

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::cache::WriteCache;
use crate::constants::{ESC, MAP_AS_ARRAY, MAX_SAFE_INTEGER, QUOTE_TAG, RES, SUB, TAG_PREFIX};
use crate::handler::{Rep, WriteHandler};
use crate::TransitError;

/// Options controlling the shape of the written document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterOptions {
    /// When `true`, maps are written as JSON objects, tagged values as
    /// single-key objects and nothing is cached ("json-verbose"). When
    /// `false` (default), maps and tagged values are arrays and repeated
    /// keys/tags are replaced by cache codes.
    pub verbose: bool,
}

/// Transit writer bound to one write handler.
///
/// The writer holds no per-call state: every [`write`](Writer::write) starts
/// from a fresh cache, so one writer may serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Writer<H> {
    handler: H,
    options: WriterOptions,
}

impl<H> Writer<H> {
    pub fn new(handler: H) -> Self {
        Self::with_options(handler, WriterOptions::default())
    }

    pub fn with_options(handler: H, options: WriterOptions) -> Self {
        Self { handler, options }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn options(&self) -> WriterOptions {
        self.options
    }

    /// Encodes `value` to a transit JSON string.
    pub fn write<V>(&self, value: &V) -> Result<String, H::Error>
    where
        H: WriteHandler<V>,
    {
        let json = self.write_json(value)?;
        Ok(serde_json::to_string(&json).map_err(TransitError::from)?)
    }

    /// Encodes `value` to a transit document held as a JSON tree.
    pub fn write_json<V>(&self, value: &V) -> Result<JsonValue, H::Error>
    where
        H: WriteHandler<V>,
    {
        let mut emitter = Emitter {
            handler: &self.handler,
            verbose: self.options.verbose,
            cache: WriteCache::new(),
            _value: PhantomData,
        };
        let root = emitter.emit_value(value)?;
        Ok(match root {
            JsonValue::Array(_) | JsonValue::Object(_) => root,
            scalar => emitter.tagged_json(QUOTE_TAG, scalar),
        })
    }
}

struct Emitter<'h, V, H> {
    handler: &'h H,
    verbose: bool,
    cache: WriteCache,
    _value: PhantomData<fn(&V)>,
}

impl<V, H: WriteHandler<V>> Emitter<'_, V, H> {
    fn emit_value(&mut self, value: &V) -> Result<JsonValue, H::Error> {
        let rep = self.handler.rep(value)?;
        match self.handler.tag(value) {
            None => self.emit_rep(rep),
            Some(tag) => self.emit_tagged(tag, rep),
        }
    }

    fn emit_rep(&mut self, rep: Rep<'_, V>) -> Result<JsonValue, H::Error> {
        Ok(match rep {
            Rep::Null => JsonValue::Null,
            Rep::Bool(b) => JsonValue::Bool(b),
            Rep::Int(i) => int_json(i),
            Rep::Float(f) => float_json(f),
            Rep::Str(s) => JsonValue::String(escape(s)),
            Rep::Array(items) => JsonValue::Array(
                items
                    .into_iter()
                    .map(|item| self.emit_rep(item))
                    .collect::<Result<_, _>>()?,
            ),
            Rep::Map(entries) => self.emit_map(entries)?,
            Rep::Value(value) => self.emit_value(value)?,
        })
    }

    fn emit_map(&mut self, entries: Vec<(Cow<'_, str>, Rep<'_, V>)>) -> Result<JsonValue, H::Error> {
        if self.verbose {
            let mut out = JsonMap::new();
            for (key, value) in entries {
                let value = self.emit_rep(value)?;
                out.insert(escape(key), value);
            }
            return Ok(JsonValue::Object(out));
        }
        let mut out = Vec::with_capacity(1 + entries.len() * 2);
        out.push(JsonValue::String(MAP_AS_ARRAY.to_owned()));
        for (key, value) in entries {
            // The key enters the cache before the value is emitted, which is
            // the order the reader sees them in.
            out.push(JsonValue::String(self.cache.write(escape(key), true)));
            out.push(self.emit_rep(value)?);
        }
        Ok(JsonValue::Array(out))
    }

    fn emit_tagged(&mut self, tag: &str, rep: Rep<'_, V>) -> Result<JsonValue, H::Error> {
        if tag.len() == 1 {
            match rep {
                Rep::Null => return Ok(JsonValue::String(format!("{ESC}{tag}"))),
                Rep::Str(s) => return Ok(JsonValue::String(format!("{ESC}{tag}{s}"))),
                rep => return self.emit_tagged_composite(tag, rep),
            }
        }
        self.emit_tagged_composite(tag, rep)
    }

    fn emit_tagged_composite(&mut self, tag: &str, rep: Rep<'_, V>) -> Result<JsonValue, H::Error> {
        if self.verbose {
            let rep = self.emit_rep(rep)?;
            return Ok(self.tagged_json(tag, rep));
        }
        let head = self.cache.write(format!("{TAG_PREFIX}{tag}"), false);
        let rep = self.emit_rep(rep)?;
        Ok(JsonValue::Array(vec![JsonValue::String(head), rep]))
    }

    /// Wraps an already emitted representation; used for the root quote,
    /// whose tag is too short to be cached.
    fn tagged_json(&self, tag: &str, rep: JsonValue) -> JsonValue {
        let head = format!("{TAG_PREFIX}{tag}");
        if self.verbose {
            let mut out = JsonMap::new();
            out.insert(head, rep);
            JsonValue::Object(out)
        } else {
            JsonValue::Array(vec![JsonValue::String(head), rep])
        }
    }
}

fn escape(s: Cow<'_, str>) -> String {
    if s.starts_with(ESC) || s.starts_with(SUB) || s.starts_with(RES) {
        format!("{ESC}{s}")
    } else {
        s.into_owned()
    }
}

fn int_json(i: i64) -> JsonValue {
    if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&i) {
        JsonValue::Number(i.into())
    } else {
        JsonValue::String(format!("{ESC}i{i}"))
    }
}

fn float_json(f: f64) -> JsonValue {
    match Number::from_f64(f) {
        Some(n) => JsonValue::Number(n),
        None if f.is_nan() => JsonValue::String(format!("{ESC}zNaN")),
        None if f > 0.0 => JsonValue::String(format!("{ESC}zINF")),
        None => JsonValue::String(format!("{ESC}z-INF")),
    }
}
