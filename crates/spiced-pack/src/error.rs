//! Error types for service construction and build assembly.

use thiserror::Error;

/// Result type alias for registry operations.
pub type PackResult<T> = Result<T, PackError>;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("invalid service \"{service}\": {reason}")]
    InvalidService { service: String, reason: String },

    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    #[error("service \"{0}\" is registered twice")]
    DuplicateService(String),

    #[error("unknown service: {0}")]
    UnknownService(String),

    #[error("service \"{0}\" is already wired")]
    AlreadyWired(String),

    #[error("failed to render buildspec: {0}")]
    Render(String),
}
