//! spicedlings.toml settings parser.
//!
//! Every key is optional; missing keys fall back to the values the shared
//! AWS account was bootstrapped with. A handful of keys can be overridden
//! from the environment so secrets stay out of the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Default settings file name, looked up in the workspace root.
pub const SETTINGS_FILE: &str = "spicedlings.toml";

pub const ENV_PROJECTS_DIR: &str = "SPICEDLINGS_PROJECTS_DIR";
pub const ENV_PRIORITIES_FILE: &str = "SPICEDLINGS_PRIORITIES_FILE";
pub const ENV_POSTGRES_PASSWORD: &str = "SPICEDLINGS_POSTGRES_PASSWORD";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub infrastructure: InfrastructureSettings,
    pub naming: NamingSettings,
    pub build: BuildSettings,
    pub database: DatabaseSettings,
    pub paths: PathSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureSettings {
    /// Run containers in a private subnet. Requires a NAT gateway.
    pub private_subnet: bool,
    pub domain_name: String,
    pub core_stack_name: String,
    /// Only known once the core stack has been deployed.
    pub core_load_balancer_security_group_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingSettings {
    pub stack_prefix: String,
    pub application_group_tag: String,
    pub application_tag_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    pub dockerizer_repo: String,
    pub image_tag: String,
    /// Registry host the ECR repositories live under. Shell variables are
    /// expanded by CodeBuild at build time.
    pub image_registry: String,
    pub github_tokens_secret_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub postgres_password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub projects_dir: PathBuf,
    pub priorities_file: PathBuf,
}

impl Default for InfrastructureSettings {
    fn default() -> Self {
        Self {
            private_subnet: false,
            domain_name: "oliversieweke.com".to_string(),
            core_stack_name: "SpicedlingsFinalProjectsCore".to_string(),
            core_load_balancer_security_group_id: "sg-09e95cbdc436adad0".to_string(),
        }
    }
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            stack_prefix: "SpicedlingFinalProject".to_string(),
            application_group_tag: "Spicedlings Final Projects".to_string(),
            application_tag_prefix: "Spicedling Final Project".to_string(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            dockerizer_repo:
                "https://github.com/OliverSieweke/spicedlings-final-projects-dockerizer.git"
                    .to_string(),
            image_tag: "latest".to_string(),
            image_registry: "$AWS_ACCOUNT_ID.dkr.ecr.$AWS_DEFAULT_REGION.amazonaws.com"
                .to_string(),
            github_tokens_secret_name: "spicedlings-final-projects-github-tokens".to_string(),
        }
    }
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            projects_dir: PathBuf::from("projects"),
            priorities_file: PathBuf::from("state/target-groups-priorities.json"),
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `spicedlings.toml` from `root` (defaults when absent), apply
    /// environment overrides and resolve relative paths against `root`.
    pub fn load(root: &Path) -> ConfigResult<Self> {
        let file = root.join(SETTINGS_FILE);
        let mut settings = if file.is_file() {
            debug!(path = %file.display(), "loading settings");
            Self::from_file(&file)?
        } else {
            debug!(root = %root.display(), "no settings file, using defaults");
            Self::default()
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.resolve_paths(root);
        Ok(settings)
    }

    /// Override settings from a key lookup (the process environment in
    /// [`Settings::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_PROJECTS_DIR) {
            self.paths.projects_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup(ENV_PRIORITIES_FILE) {
            self.paths.priorities_file = PathBuf::from(file);
        }
        if let Some(password) = lookup(ENV_POSTGRES_PASSWORD) {
            self.database.postgres_password = Some(password);
        }
    }

    fn resolve_paths(&mut self, root: &Path) {
        if self.paths.projects_dir.is_relative() {
            self.paths.projects_dir = root.join(&self.paths.projects_dir);
        }
        if self.paths.priorities_file.is_relative() {
            self.paths.priorities_file = root.join(&self.paths.priorities_file);
        }
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.naming.stack_prefix, "SpicedlingFinalProject");
        assert_eq!(settings.infrastructure.core_stack_name, "SpicedlingsFinalProjectsCore");
        assert_eq!(settings.build.image_tag, "latest");
        assert!(!settings.infrastructure.private_subnet);
        assert!(settings.database.postgres_password.is_none());
    }

    #[test]
    fn test_parse_partial() {
        let toml_str = r#"
[infrastructure]
domain_name = "example.org"

[naming]
stack_prefix = "Bootcamp"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.infrastructure.domain_name, "example.org");
        assert_eq!(settings.naming.stack_prefix, "Bootcamp");
        assert_eq!(settings.naming.application_group_tag, "Spicedlings Final Projects");
        assert_eq!(settings.build.image_tag, "latest");
    }

    #[test]
    fn test_round_trip_through_toml() {
        let settings = Settings::default();
        let rendered = settings.to_toml_string().unwrap();
        assert!(rendered.contains("[infrastructure]"));
        let parsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_POSTGRES_PASSWORD, "hunter2"),
            (ENV_PROJECTS_DIR, "/srv/projects"),
        ]);
        let mut settings = Settings::default();
        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.database.postgres_password.as_deref(), Some("hunter2"));
        assert_eq!(settings.paths.projects_dir, PathBuf::from("/srv/projects"));
        assert_eq!(
            settings.paths.priorities_file,
            PathBuf::from("state/target-groups-priorities.json")
        );
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            "[paths]\nprojects_dir = \"students\"\n",
        )
        .unwrap();

        let mut settings = Settings::from_file(&dir.path().join(SETTINGS_FILE)).unwrap();
        settings.resolve_paths(dir.path());
        assert_eq!(settings.paths.projects_dir, dir.path().join("students"));
        assert_eq!(
            settings.paths.priorities_file,
            dir.path().join("state/target-groups-priorities.json")
        );
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "[naming\nstack_prefix = 1").unwrap();
        let err = Settings::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }
}
