//! Cache-specific error types

use thiserror::Error;

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Unified error type for all cache operations
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("Series not found: {0}")]
    SeriesNotFound(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}
