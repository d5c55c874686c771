//! Error types for settings and project configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading settings or project configs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("projects directory not found: {}", .0.display())]
    ProjectsDirMissing(PathBuf),

    #[error("failed to scan projects: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("unknown cohort: {0}")]
    UnknownCohort(String),

    #[error("unknown project \"{project}\" in cohort \"{cohort}\"")]
    UnknownProject { cohort: String, project: String },
}
