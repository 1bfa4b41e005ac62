//! Schema-typed messages and their resolution by fully-qualified name.
//!
//! A [`Message`] is an instance that knows its own full name and binary
//! encoding. A [`MessageType`] is the matching decoder. Types are grouped into
//! [`Namespace`]s by the first segment of their full name, and a
//! [`NamespaceRegistry`] maps wire names of the form
//! `<root>.<namespace>.<path>.<Type>` back to a type.
//!
//! On the wire the root segment is empty: `test.messages.Item` is written as
//! `.test.messages.Item`.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::error::{CodecError, MessageDecodeError, ResolveError, Result};

/// A schema-typed message instance.
pub trait Message: fmt::Debug + Send + Sync + 'static {
    /// Full name without a leading dot, e.g. `test.messages.Item`.
    fn full_name(&self) -> String;

    fn encode_binary(&self) -> Vec<u8>;

    fn as_any(&self) -> &dyn Any;
}

/// Decoder for one message type.
pub trait MessageType: Send + Sync {
    fn full_name(&self) -> String;

    fn decode_binary(&self, bytes: &[u8]) -> std::result::Result<MessageValue, MessageDecodeError>;
}

/// Shared handle to a message instance.
///
/// Two handles are equal when they carry the same full name and the same
/// binary encoding.
#[derive(Clone)]
pub struct MessageValue(Arc<dyn Message>);

impl MessageValue {
    pub fn new<M: Message>(message: M) -> Self {
        Self(Arc::new(message))
    }

    pub fn full_name(&self) -> String {
        self.0.full_name()
    }

    pub fn encode_binary(&self) -> Vec<u8> {
        self.0.encode_binary()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref()
    }

    /// Name as written on the wire, with the empty root segment.
    pub(crate) fn wire_name(&self) -> String {
        format!(".{}", self.full_name())
    }

    pub(crate) fn payload(&self) -> String {
        STANDARD.encode(self.encode_binary())
    }
}

impl fmt::Debug for MessageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl PartialEq for MessageValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.full_name() == other.full_name() && self.encode_binary() == other.encode_binary())
    }
}

impl Eq for MessageValue {}

impl Hash for MessageValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name().hash(state);
        self.encode_binary().hash(state);
    }
}

/// Message types sharing one namespace, keyed by full name.
#[derive(Clone)]
pub struct Namespace {
    name: String,
    types: HashMap<String, Arc<dyn MessageType>>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a message type. Its full name must start with `<namespace>.`.
    pub fn register<T: MessageType + 'static>(&mut self, message_type: T) -> Result<&mut Self> {
        let full_name = message_type.full_name();
        let belongs = full_name
            .strip_prefix(self.name.as_str())
            .is_some_and(|rest| rest.len() > 1 && rest.starts_with('.'));
        if !belongs {
            return Err(CodecError::ForeignMessageType {
                full_name,
                namespace: self.name.clone(),
            });
        }
        self.types.insert(full_name, Arc::new(message_type));
        Ok(self)
    }

    /// Consuming form of [`register`](Self::register).
    pub fn with_type<T: MessageType + 'static>(mut self, message_type: T) -> Result<Self> {
        self.register(message_type)?;
        Ok(self)
    }

    /// Looks up a type by full name, without a leading dot.
    pub fn resolve(&self, full_name: &str) -> Option<&dyn MessageType> {
        self.types.get(full_name).map(|t| t.as_ref())
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.type_names().collect();
        names.sort_unstable();
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("types", &names)
            .finish()
    }
}

/// Namespaces keyed by short name.
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    namespaces: HashMap<String, Namespace>,
}

impl NamespaceRegistry {
    pub fn new(namespaces: impl IntoIterator<Item = Namespace>) -> Result<Self> {
        let mut registry = Self::default();
        for namespace in namespaces {
            if registry.namespaces.contains_key(namespace.name()) {
                return Err(CodecError::DuplicateNamespace(namespace.name));
            }
            registry.namespaces.insert(namespace.name.clone(), namespace);
        }
        Ok(registry)
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn get(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Resolves a wire name such as `.test.messages.Item`.
    pub fn resolve(&self, name: &str) -> std::result::Result<&dyn MessageType, ResolveError> {
        let (namespace, full_name) = split_name(name)?;
        let ns = self
            .namespaces
            .get(namespace)
            .ok_or_else(|| ResolveError::UnknownNamespace {
                namespace: namespace.to_owned(),
                name: name.to_owned(),
            })?;
        ns.resolve(full_name)
            .ok_or_else(|| ResolveError::UnknownType(name.to_owned()))
    }

    /// Resolves `name` and decodes the base64 `payload` as that type.
    pub fn decode(&self, name: &str, payload: &str) -> Result<MessageValue> {
        let message_type = self.resolve(name).inspect_err(|err| {
            debug!(name, error = %err, "message resolution failed");
        })?;
        let bytes = STANDARD.decode(payload)?;
        message_type
            .decode_binary(&bytes)
            .map_err(|source| CodecError::MessageDecode {
                name: message_type.full_name(),
                source,
            })
    }
}

/// Splits `<root>.<namespace>.<path>` into the namespace and the full name
/// without its root.
fn split_name(name: &str) -> std::result::Result<(&str, &str), ResolveError> {
    let malformed = || ResolveError::MalformedName(name.to_owned());
    let (_root, full_name) = name.split_once('.').ok_or_else(malformed)?;
    let (namespace, path) = full_name.split_once('.').ok_or_else(malformed)?;
    if namespace.is_empty() || path.split('.').any(str::is_empty) {
        return Err(malformed());
    }
    Ok((namespace, full_name))
}
