//! Error types for Memoir

use thiserror::Error;

/// Result type alias for Memoir operations
pub type Result<T> = std::result::Result<T, MemoirError>;

/// Main error type for Memoir
#[derive(Error, Debug)]
pub enum MemoirError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Memory not found: {0}")]
    NotFound(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
