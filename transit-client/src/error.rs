//! Error types for the transit client.

use thiserror::Error;

/// Result type alias using [`TransitError`].
pub type Result<T> = std::result::Result<T, TransitError>;

/// Errors surfaced by the transit client.
#[derive(Error, Debug)]
pub enum TransitError {
    /// The native library reported a failure.
    #[error("{operation} failed: {message}")]
    Native { operation: String, message: String },

    /// Payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The shared library or one of its symbols could not be loaded.
    #[error("Failed to load transit library: {0}")]
    Library(String),

    /// A string could not cross the C boundary (interior NUL or invalid UTF-8).
    #[error("Invalid string passed across the native boundary in {operation}")]
    InvalidString { operation: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration parse error.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration validation error.
    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    /// Background worker error.
    #[error("Worker error: {0}")]
    Worker(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransitError {
    /// Create a native failure for `operation`.
    pub fn native(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Native {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a configuration validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ConfigValidation(msg.into())
    }

    /// Create a worker error.
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    /// Create an invalid-string error for `operation`.
    pub fn invalid_string(operation: impl Into<String>) -> Self {
        Self::InvalidString {
            operation: operation.into(),
        }
    }
}

impl From<transit_common::Error> for TransitError {
    fn from(err: transit_common::Error) -> Self {
        match err {
            transit_common::Error::Json(e) => Self::Serialization(e.to_string()),
            transit_common::Error::Config(msg) => Self::Config(msg),
            transit_common::Error::Io(e) => Self::Io(e),
        }
    }
}

impl From<serde_json::Error> for TransitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
