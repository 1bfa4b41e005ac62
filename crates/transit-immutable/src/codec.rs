//! The codec façade: a matched writer/reader pair over [`Value`].

use std::sync::Arc;

use tracing::{debug, trace};
use transit_pack::{Reader, Writer, WriterOptions};

use crate::decoder::{Decoder, ObjectBuilder};
use crate::encoder::Encoder;
use crate::error::Result;
use crate::filter::EntryFilter;
use crate::message::{Namespace, NamespaceRegistry};
use crate::value::Value;

/// Output options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecOptions {
    /// Write maps as JSON objects and tagged values as single-key objects,
    /// without the key/tag cache. Decoding accepts both forms regardless.
    pub verbose: bool,
}

/// Configures a [`Codec`]. Everything is fixed once [`build`](Self::build)
/// returns.
#[derive(Debug, Default)]
pub struct CodecBuilder {
    filter: EntryFilter,
    namespaces: Vec<Namespace>,
    encode_messages: bool,
    options: CodecOptions,
}

impl CodecBuilder {
    /// Drops collection entries for which `predicate` returns `false` when
    /// encoding. See [`EntryFilter`].
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value, Option<&Value>) -> bool + Send + Sync + 'static,
    {
        self.filter = EntryFilter::new(predicate);
        self
    }

    /// Uses a prebuilt filter, e.g. one shared with another codec.
    pub fn entry_filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Registers a namespace for decoding `PB` values.
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    pub fn namespaces(mut self, namespaces: impl IntoIterator<Item = Namespace>) -> Self {
        self.namespaces.extend(namespaces);
        self
    }

    /// Allows message values to be encoded. Off by default, in which case
    /// encoding a message fails with an unknown-type error.
    pub fn encode_messages(mut self, enabled: bool) -> Self {
        self.encode_messages = enabled;
        self
    }

    pub fn options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.options.verbose = verbose;
        self
    }

    /// Fails when two namespaces share a short name.
    pub fn build(self) -> Result<Codec> {
        let registry = NamespaceRegistry::new(self.namespaces)?;
        debug!(
            filter = self.filter.is_active(),
            namespaces = registry.len(),
            encode_messages = self.encode_messages,
            verbose = self.options.verbose,
            "building transit codec"
        );
        Ok(Codec::from_parts(
            Encoder::new(self.filter, self.encode_messages),
            Decoder::new(Some(Arc::new(registry))),
            self.options,
        ))
    }
}

/// Encoder and decoder for [`Value`] trees.
///
/// Immutable after construction and safe to share between threads.
///
/// ```
/// use transit_immutable::{Codec, List, Map, Value};
///
/// let codec = Codec::new();
/// let value = Value::from(Map::new().set("xs", List::from_iter([1, 2, 3])));
/// let text = codec.encode(&value).unwrap();
/// assert_eq!(text, r#"["~#iM",["xs",["~#iL",[1,2,3]]]]"#);
/// assert_eq!(codec.decode(&text).unwrap(), value);
/// ```
#[derive(Debug, Clone)]
pub struct Codec {
    writer: Writer<Encoder>,
    reader: Reader<Decoder, ObjectBuilder>,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec {
    /// No filter, no message support.
    pub fn new() -> Self {
        Self::from_parts(Encoder::default(), Decoder::default(), CodecOptions::default())
    }

    pub fn builder() -> CodecBuilder {
        CodecBuilder::default()
    }

    /// Codec whose encoder applies `predicate`. Decoding is unaffected.
    pub fn with_filter<F>(predicate: F) -> Self
    where
        F: Fn(&Value, Option<&Value>) -> bool + Send + Sync + 'static,
    {
        Self::from_parts(
            Encoder::new(EntryFilter::new(predicate), false),
            Decoder::default(),
            CodecOptions::default(),
        )
    }

    /// Codec that decodes messages of the given namespaces, and encodes
    /// messages when `encode_messages` is set.
    pub fn with_namespaces(
        namespaces: impl IntoIterator<Item = Namespace>,
        encode_messages: bool,
    ) -> Result<Self> {
        Self::builder()
            .namespaces(namespaces)
            .encode_messages(encode_messages)
            .build()
    }

    fn from_parts(encoder: Encoder, decoder: Decoder, options: CodecOptions) -> Self {
        let writer = Writer::with_options(
            encoder,
            WriterOptions {
                verbose: options.verbose,
            },
        );
        Self {
            writer,
            reader: Reader::new(decoder, ObjectBuilder),
        }
    }

    pub fn options(&self) -> CodecOptions {
        CodecOptions {
            verbose: self.writer.options().verbose,
        }
    }

    pub fn filter(&self) -> &EntryFilter {
        self.writer.handler().filter()
    }

    pub fn encodes_messages(&self) -> bool {
        self.writer.handler().encodes_messages()
    }

    pub fn decodes_messages(&self) -> bool {
        self.reader.handler().registry().is_some()
    }

    pub fn encode(&self, value: &Value) -> Result<String> {
        let text = self.writer.write(value)?;
        trace!(kind = ?value.kind(), bytes = text.len(), "encoded");
        Ok(text)
    }

    pub fn decode(&self, text: &str) -> Result<Value> {
        let value = self.reader.read::<Value>(text)?;
        trace!(kind = ?value.kind(), bytes = text.len(), "decoded");
        Ok(value)
    }

    /// Encodes to a JSON tree instead of text.
    pub fn encode_json(&self, value: &Value) -> Result<serde_json::Value> {
        self.writer.write_json(value)
    }

    /// Decodes an already parsed JSON tree.
    pub fn decode_json(&self, json: &serde_json::Value) -> Result<Value> {
        self.reader.read_json::<Value>(json)
    }
}
