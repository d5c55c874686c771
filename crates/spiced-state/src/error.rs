//! Error types for the priority table.

use thiserror::Error;

/// Result type alias for priority table operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while reading or updating the priority table.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("priority table not found: {0}")]
    NotFound(String),

    #[error("lock error: {0}")]
    Lock(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("malformed priority table: {0}")]
    Deserialize(String),

    #[error("invalid priority table: {0}")]
    Invalid(String),

    #[error("no priorities left after {0}")]
    Exhausted(u32),
}
