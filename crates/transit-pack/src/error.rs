//! Error type for transit writing and reading.

use thiserror::Error;

/// Errors raised by the transit [`Writer`](crate::Writer) and
/// [`Reader`](crate::Reader).
///
/// Handler error types must implement `From<TransitError>` so that format
/// failures and handler failures surface through one error type.
#[derive(Debug, Error)]
pub enum TransitError {
    /// The input text is not JSON.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    /// No write handler is registered for a value's runtime kind.
    #[error("cannot write value: no handler for type `{0}`")]
    UnknownType(String),
    /// No read handler is registered for a tag found in the input.
    #[error("cannot read value: no handler for tag `{0}`")]
    UnknownTag(String),
    /// The input is JSON but violates the transit encoding rules.
    #[error("malformed transit document: {0}")]
    Malformed(String),
}

impl TransitError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TransitError::Malformed(reason.into())
    }
}
