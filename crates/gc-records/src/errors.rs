//! Record error types.

use thiserror::Error;

/// Errors raised while building, encoding or signing records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Signing key is empty
    #[error("Signing key must not be empty")]
    EmptyKey,

    /// Signature is not valid hex
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// Entry could not be rendered as JSON
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<hex::FromHexError> for RecordError {
    fn from(err: hex::FromHexError) -> Self {
        Self::MalformedSignature(err.to_string())
    }
}
