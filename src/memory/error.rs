//! Error taxonomy for store and query operations.
//!
//! A missing node is not an error: lookups return `Ok(None)`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    /// Rejected input (empty content, malformed context, out-of-range weight).
    #[error("validation failed: {0}")]
    Validation(String),

    /// SQLite I/O or transaction failure.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Context (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A blocking database task panicked or was cancelled.
    #[error("database task failed: {0}")]
    Task(String),
}

impl MemoryError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type MemoryResult<T> = Result<T, MemoryError>;
