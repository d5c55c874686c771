//! spiced-core — shared building blocks for the spicedlings deploy tooling.
//!
//! - **`settings`** — `spicedlings.toml` parsing with environment overrides
//! - **`identity`** — the (cohort, first name, last name) key of a project
//! - **`case`** — word splitting and case conversion
//! - **`names`** — deterministic stack, resource and tag names
//! - **`project`** — per-student project configs and their discovery on disk

pub mod case;
pub mod error;
pub mod identity;
pub mod names;
pub mod project;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use identity::SpicedlingIdentity;
pub use names::{Namer, StackTags, ascii};
pub use project::{
    ProjectCatalog, ProjectConfig, ProjectEntry, RepositoryConfig, Scalar, ServiceConfig,
    ServiceType,
};
pub use settings::Settings;
