//! Error types for the catalogue
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for catalogue operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the catalogue
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Backing storage failed or is unavailable
    ///
    /// Fatal for the current operation. Never retried by the search layer.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Optimistic validation failed at commit time
    #[error("Transaction conflict: {0}")]
    TransactionConflict(String),

    /// A search ran past its deadline
    #[error("Search timed out after {elapsed:?} (deadline {deadline:?})")]
    Timeout {
        /// Time spent before giving up
        elapsed: Duration,
        /// Deadline the caller asked for
        deadline: Duration,
    },

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid command, page or locale
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error is an optimistic concurrency conflict
    ///
    /// Conflicts are the only errors the transaction retry loop retries.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::TransactionConflict(_))
    }

    /// Whether this error originates from the backing storage
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
