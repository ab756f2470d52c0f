use thiserror::Error;

use crate::core::config::ConfigError;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store-specific error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote store answered with a non-2xx status. Never retried at
    /// this layer; retry policy belongs to the transport.
    #[error("remote store error (status {status}): {body}")]
    Remote { status: u16, body: String },

    /// File content was not valid transfer encoding or structured text
    #[error("decode error: {0}")]
    Decode(String),

    /// A single-entity read targeted a nonexistent path or item
    #[error("not found: {0}")]
    NotFound(String),

    /// A write operation targeted a read-only resource
    #[error("resource is read-only: {0}")]
    ReadOnly(String),

    /// Transport-level HTTP failure
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for StoreError {
    fn from(err: base64::DecodeError) -> Self {
        StoreError::Decode(format!("invalid base64 content: {}", err))
    }
}
