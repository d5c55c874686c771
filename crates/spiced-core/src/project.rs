//! Per-student project configs and their discovery on disk.
//!
//! Projects live under `<projects_dir>/<cohort>/<student>.toml`. Keys are
//! camelCase:
//!
//! ```toml
//! firstName = "Daniel"
//! lastName = "Streif"
//! cohort = "Jasmine"
//! subDomain = "climbers-paradise"
//!
//! [repository]
//! gitHubOwner = "danielstreif"
//! repoName = "final-project"
//! branch = "main"
//!
//! [[services]]
//! type = "node-server"
//! name = "Node Server"
//! configs = { portEnvironmentVariable = "PORT", buildStep = true }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::case::upper_first;
use crate::error::{ConfigError, ConfigResult};
use crate::identity::SpicedlingIdentity;

pub const PROJECT_EXTENSION: &str = "toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub first_name: String,
    pub last_name: String,
    pub cohort: String,
    pub sub_domain: String,
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConfig {
    #[serde(rename = "gitHubOwner")]
    pub github_owner: String,
    pub repo_name: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    /// User whose token polls the repository; not needed for public repos.
    #[serde(rename = "invitedGitHubUsername", default = "default_invited_user")]
    pub invited_github_username: String,
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_invited_user() -> String {
    "OliverSieweke".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    NodeServer,
    Postgres,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::NodeServer => "node-server",
            ServiceType::Postgres => "postgres",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(rename = "type")]
    pub kind: ServiceType,
    pub name: String,
    /// Variant specific options, validated when the service is built.
    #[serde(default)]
    pub configs: BTreeMap<String, Scalar>,
    #[serde(default)]
    pub environment: BTreeMap<String, Scalar>,
    /// Secrets the operator fills in by hand.
    #[serde(default)]
    pub secret_environment_variables: BTreeSet<String>,
    /// Secrets generated with a random value.
    #[serde(default)]
    pub random_secret_environment_variables: BTreeSet<String>,
}

/// A string, number or boolean config value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl ProjectConfig {
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

    pub fn identity(&self) -> SpicedlingIdentity {
        SpicedlingIdentity::new(&self.cohort, &self.first_name, &self.last_name)
    }
}

// ── Discovery ──────────────────────────────────────────────────────

/// A project file found under a cohort directory.
#[derive(Debug, Clone)]
pub struct ProjectEntry {
    /// Cohort directory name, as found on disk.
    pub cohort: String,
    pub file_name: String,
    pub path: PathBuf,
    pub config: ProjectConfig,
}

impl ProjectEntry {
    /// Path relative to the projects directory, passed to the CDK app.
    pub fn configs_path(&self) -> String {
        format!("{}/{}", self.cohort, self.file_name)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.config.first_name, self.config.last_name)
    }

    /// Identity keyed on the cohort directory rather than the config's
    /// `cohort` field. Only used to pick the stack passed to `cdk deploy`;
    /// the deployed resources are named after [`ProjectConfig::identity`].
    pub fn directory_identity(&self) -> SpicedlingIdentity {
        SpicedlingIdentity::new(
            upper_first(&self.cohort),
            &self.config.first_name,
            &self.config.last_name,
        )
    }
}

/// Lists cohorts and projects below a projects directory.
#[derive(Debug, Clone)]
pub struct ProjectCatalog {
    root: PathBuf,
}

impl ProjectCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cohort directory names, sorted.
    pub fn cohorts(&self) -> ConfigResult<Vec<String>> {
        if !self.root.is_dir() {
            return Err(ConfigError::ProjectsDirMissing(self.root.clone()));
        }
        let mut cohorts = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_dir() {
                cohorts.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        cohorts.sort();
        Ok(cohorts)
    }

    /// Every project of a cohort, sorted by file name.
    pub fn projects(&self, cohort: &str) -> ConfigResult<Vec<ProjectEntry>> {
        let dir = self.root.join(cohort);
        if !dir.is_dir() {
            return Err(ConfigError::UnknownCohort(cohort.to_string()));
        }
        let mut projects = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(PROJECT_EXTENSION)
            {
                continue;
            }
            let config = ProjectConfig::from_file(path)?;
            debug!(cohort, file = %path.display(), "discovered project");
            projects.push(ProjectEntry {
                cohort: cohort.to_string(),
                file_name: entry.file_name().to_string_lossy().into_owned(),
                path: path.to_path_buf(),
                config,
            });
        }
        Ok(projects)
    }

    /// Find a project by file name, with or without the extension.
    pub fn project(&self, cohort: &str, project: &str) -> ConfigResult<ProjectEntry> {
        let wanted = project
            .strip_suffix(&format!(".{PROJECT_EXTENSION}"))
            .unwrap_or(project);
        self.projects(cohort)?
            .into_iter()
            .find(|entry| {
                Path::new(&entry.file_name)
                    .file_stem()
                    .is_some_and(|stem| stem == wanted)
            })
            .ok_or_else(|| ConfigError::UnknownProject {
                cohort: cohort.to_string(),
                project: project.to_string(),
            })
    }

    /// Resolve a `<cohort>/<file>` configs path.
    pub fn resolve(&self, configs_path: &str) -> ConfigResult<ProjectEntry> {
        match configs_path.split_once('/') {
            Some((cohort, project)) => self.project(cohort, project),
            None => Err(ConfigError::UnknownProject {
                cohort: String::new(),
                project: configs_path.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DANIEL: &str = r#"
firstName = "Daniel"
lastName = "Streif"
cohort = "Jasmine"
subDomain = "climbers-paradise"

[repository]
gitHubOwner = "danielstreif"
repoName = "final-project"
branch = "main"
invitedGitHubUsername = "OliverSieweke"

[[services]]
type = "node-server"
name = "Node Server"
secretEnvironmentVariables = ["MAPBOX_KEY"]
randomSecretEnvironmentVariables = ["SESSION_SECRET"]

[services.configs]
databaseUrlEnvironmentVariable = "DATABASE_URL"
portEnvironmentVariable = "PORT"
buildStep = true

[services.environment]
MAX_AGE = 604800000
SOCKET_URL = "http://climbers-paradise.oliversieweke.com"

[[services]]
type = "postgres"
name = "Postgres"
configs = { dbSetupScriptPath = "./setup.sql" }
"#;

    const MINIMAL: &str = r#"
firstName = "Thorsten"
lastName = "Staender"
cohort = "Jasmine"
subDomain = "aloha"

[repository]
gitHubOwner = "OliverSieweke"
repoName = "jasmine-petition"
"#;

    fn catalog_with(files: &[(&str, &str, &str)]) -> (tempfile::TempDir, ProjectCatalog) {
        let dir = tempfile::tempdir().unwrap();
        for (cohort, file, content) in files {
            let cohort_dir = dir.path().join(cohort);
            fs::create_dir_all(&cohort_dir).unwrap();
            fs::write(cohort_dir.join(file), content).unwrap();
        }
        let catalog = ProjectCatalog::new(dir.path());
        (dir, catalog)
    }

    #[test]
    fn test_parse_full_project() {
        let config: ProjectConfig = toml::from_str(DANIEL).unwrap();
        assert_eq!(config.sub_domain, "climbers-paradise");
        assert_eq!(config.repository.branch, "main");
        assert_eq!(config.services.len(), 2);

        let node = &config.services[0];
        assert_eq!(node.kind, ServiceType::NodeServer);
        assert_eq!(node.configs["buildStep"], Scalar::Bool(true));
        assert_eq!(node.environment["MAX_AGE"].to_string(), "604800000");
        assert!(node.secret_environment_variables.contains("MAPBOX_KEY"));
        assert!(node.random_secret_environment_variables.contains("SESSION_SECRET"));

        let postgres = &config.services[1];
        assert_eq!(postgres.kind, ServiceType::Postgres);
        assert_eq!(postgres.configs["dbSetupScriptPath"].as_str(), Some("./setup.sql"));
        assert!(postgres.environment.is_empty());
    }

    #[test]
    fn test_repository_defaults() {
        let config: ProjectConfig = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.repository.branch, "master");
        assert_eq!(config.repository.invited_github_username, "OliverSieweke");
        assert!(config.services.is_empty());
        assert_eq!(
            config.identity(),
            SpicedlingIdentity::new("Jasmine", "Thorsten", "Staender")
        );
    }

    #[test]
    fn test_unknown_service_type_is_rejected() {
        let bad = MINIMAL.to_string() + "\n[[services]]\ntype = \"redis\"\nname = \"Cache\"\n";
        assert!(toml::from_str::<ProjectConfig>(&bad).is_err());
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Bool(false).to_string(), "false");
        assert_eq!(Scalar::Float(1.5).to_string(), "1.5");
        assert_eq!(Scalar::from("x").to_string(), "x");
    }

    #[test]
    fn test_catalog_lists_cohorts_and_projects() {
        let (_dir, catalog) = catalog_with(&[
            ("jasmine", "thorsten-staender.toml", MINIMAL),
            ("jasmine", "daniel-streif.toml", DANIEL),
            ("jasmine", "notes.md", "not a project"),
            ("basil", "thorsten-staender.toml", MINIMAL),
        ]);

        assert_eq!(catalog.cohorts().unwrap(), vec!["basil", "jasmine"]);

        let projects = catalog.projects("jasmine").unwrap();
        let names: Vec<String> = projects.iter().map(|p| p.display_name()).collect();
        assert_eq!(names, vec!["Daniel Streif", "Thorsten Staender"]);
        assert_eq!(projects[0].configs_path(), "jasmine/daniel-streif.toml");
        assert_eq!(
            projects[0].directory_identity(),
            SpicedlingIdentity::new("Jasmine", "Daniel", "Streif")
        );
    }

    #[test]
    fn test_catalog_resolves_configs_path() {
        let (_dir, catalog) = catalog_with(&[("jasmine", "daniel-streif.toml", DANIEL)]);
        let entry = catalog.resolve("jasmine/daniel-streif.toml").unwrap();
        assert_eq!(entry.config.first_name, "Daniel");
        let entry = catalog.project("jasmine", "daniel-streif").unwrap();
        assert_eq!(entry.file_name, "daniel-streif.toml");

        assert!(matches!(
            catalog.resolve("jasmine/nobody.toml"),
            Err(ConfigError::UnknownProject { .. })
        ));
        assert!(matches!(
            catalog.projects("rosemary"),
            Err(ConfigError::UnknownCohort(_))
        ));
    }

    #[test]
    fn test_catalog_fails_on_malformed_project() {
        let (_dir, catalog) = catalog_with(&[("jasmine", "broken.toml", "firstName = ")]);
        assert!(matches!(
            catalog.projects("jasmine"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_projects_dir() {
        let catalog = ProjectCatalog::new("/definitely/not/here");
        assert!(matches!(
            catalog.cohorts(),
            Err(ConfigError::ProjectsDirMissing(_))
        ));
    }
}
