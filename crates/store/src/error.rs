//! Error types for the history store

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the history store
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database corruption or schema mismatch
    #[error("Database error: {0}")]
    Database(String),

    /// A stored row could not be turned into a record
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Connection error: {0}")]
    ConnectionError(#[from] tokio_rusqlite::Error),
}

impl Error {
    /// Create a database error with a message
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create an invalid record error
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }
}
