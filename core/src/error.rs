//! Error types for thread-counter-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Worker error
    #[error("worker error: {0}")]
    Worker(String),
}

impl Error {
    /// A required builder field was never set
    pub fn missing_config(field: &str) -> Self {
        Error::Config(format!("missing required field: {field}"))
    }

    /// Configuration failed validation
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// A worker task could not be joined
    pub fn worker(message: impl Into<String>) -> Self {
        Error::Worker(message.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
