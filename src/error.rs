//! Error types for the fallible outer layer
//!
//! The simulation itself never fails; only configuration parsing and storage
//! backends report errors.

use thiserror::Error;

/// Tuning/config loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed into a `Tuning`
    #[error("Tuning parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but describes an unusable configuration
    #[error("Invalid tuning: {0}")]
    Invalid(String),
}

/// High score storage errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend is missing (no window, storage disabled by the browser)
    #[error("Storage unavailable")]
    Unavailable,

    /// Backend rejected the write (quota, private browsing)
    #[error("Storage backend error: {0}")]
    Backend(String),
}
