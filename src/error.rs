//! Error types for the weather gateway

use std::io;

use thiserror::Error;

/// Result type alias for the weather gateway
pub type Result<T> = std::result::Result<T, Error>;

/// Process-level errors (startup, configuration, serving)
///
/// Request-scoped failures use [`crate::weather::LookupError`], which the
/// HTTP surface maps to status codes directly.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
