//! Core error types for kensui-core.
//!
//! This module defines the error hierarchy using thiserror. The split
//! mirrors how callers react: store errors surface from writes and are
//! swallowed (with defaults) by rendering reads, validation errors
//! reject bad input before it is persisted.

use thiserror::Error;

/// Core error type for kensui-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence errors from either store backend
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A rank id with no entry in the training catalog
    #[error("Unknown rank id: {0}")]
    UnknownRank(u32),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Remote store unreachable (connection, timeout)
    #[error("Remote store unreachable: {0}")]
    Remote(String),

    /// Remote store answered with an error payload or status
    #[error("Remote store rejected the request: {0}")]
    Rejected(String),

    /// Local store failure
    #[error("Local store error: {0}")]
    Local(String),

    /// A stored document failed to parse
    #[error("Corrupt document under '{key}': {message}")]
    Corrupt { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    SerializeFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value on caller-supplied data
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// The training catalog broke its ordering invariant
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Local(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Remote(format!("request timed out: {err}"))
        } else {
            StoreError::Remote(err.to_string())
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
