//! Console error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Client error: {0}")]
    Client(#[from] clearhouse_client::ClientError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
