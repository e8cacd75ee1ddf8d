//! Common error types for the fotobatch tools

use thiserror::Error;

/// Common result type for fotobatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the fotobatch crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed delimited-text input (bad header, wrong cell count, ...)
    #[error("Tabular data error: {0}")]
    Tabular(String),

    /// Invalid record field content
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON (de)serialization error (wraps serde_json::Error)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
