//! Error types for Smartcab

use thiserror::Error;

/// Main error type for Smartcab
#[derive(Error, Debug)]
pub enum SmartcabError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Trial controller error: {0}")]
    Controller(String),

    #[error("Trial records already flushed")]
    AlreadyFlushed,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Smartcab operations
pub type Result<T> = std::result::Result<T, SmartcabError>;
