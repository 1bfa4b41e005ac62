//! Error types for codec construction, encoding and decoding.

use thiserror::Error;
use transit_pack::TransitError;

/// Failure to map a wire message name onto a registered message type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("malformed message name `{0}`: expected `<root>.<namespace>.<Type>`")]
    MalformedName(String),
    #[error("unknown namespace `{namespace}` in message name `{name}`")]
    UnknownNamespace { namespace: String, name: String },
    #[error("unknown message type `{0}`")]
    UnknownType(String),
}

/// Binary payload did not decode as the resolved message type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MessageDecodeError(pub String);

#[cfg(feature = "prost")]
impl From<prost::DecodeError> for MessageDecodeError {
    fn from(err: prost::DecodeError) -> Self {
        Self(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Transit(#[from] TransitError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("invalid `{tag}` representation: {reason}")]
    InvalidRepresentation { tag: &'static str, reason: String },
    #[error("failed to decode message `{name}`: {source}")]
    MessageDecode {
        name: String,
        #[source]
        source: MessageDecodeError,
    },
    #[error("message payload is not valid base64: {0}")]
    Payload(#[from] base64::DecodeError),
    #[error("namespace `{0}` registered twice")]
    DuplicateNamespace(String),
    #[error("message type `{full_name}` does not belong to namespace `{namespace}`")]
    ForeignMessageType { full_name: String, namespace: String },
}

impl CodecError {
    pub(crate) fn invalid(tag: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidRepresentation {
            tag,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = CodecError> = std::result::Result<T, E>;
