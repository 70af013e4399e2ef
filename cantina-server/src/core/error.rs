//! Server-level errors (startup and shutdown paths)

use thiserror::Error;

/// Errors raised while bootstrapping or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for server lifecycle operations
pub type Result<T> = std::result::Result<T, ServerError>;
