//! Services of a project and the docker commands that build them.
//!
//! The two service kinds differ only in the dockerizer template they pick
//! and the environment variables and build arguments they inject. Their
//! lifecycle is shared: constructed from config, secrets declared, then
//! wired to the load balancer exactly once.

use std::collections::BTreeMap;

use serde::Serialize;
use spiced_core::case::{kebab_case, upper_snake_case};
use spiced_core::settings::BuildSettings;
use spiced_core::{Namer, Scalar, ServiceConfig, ServiceType, Settings, SpicedlingIdentity};
use tracing::{debug, warn};

use crate::error::{PackError, PackResult};

/// Port every node server listens on; one exposed server per project.
pub const NODE_SERVER_PORT: u16 = 8080;

pub const DEFAULT_DB_SETUP_SCRIPT: &str = "./setup.sql";

/// Variant specific settings, validated from the `configs` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServiceKind {
    NodeServer {
        /// Use the dockerizer template with an `npm run build` step.
        build_step: bool,
        port_environment_variable: String,
        database_url_environment_variable: Option<String>,
    },
    Postgres {
        db_setup_script_path: String,
    },
}

impl ServiceKind {
    pub fn from_config(config: &ServiceConfig) -> PackResult<Self> {
        let options = ConfigReader {
            service: &config.name,
            configs: &config.configs,
        };
        match config.kind {
            ServiceType::NodeServer => Ok(ServiceKind::NodeServer {
                build_step: options.bool("buildStep")?.unwrap_or(false),
                port_environment_variable: options
                    .string("portEnvironmentVariable")?
                    .ok_or_else(|| options.invalid("portEnvironmentVariable is required"))?,
                database_url_environment_variable: options
                    .string("databaseUrlEnvironmentVariable")?,
            }),
            ServiceType::Postgres => Ok(ServiceKind::Postgres {
                db_setup_script_path: options
                    .string("dbSetupScriptPath")?
                    .unwrap_or_else(|| DEFAULT_DB_SETUP_SCRIPT.to_string()),
            }),
        }
    }

    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceKind::NodeServer { .. } => ServiceType::NodeServer,
            ServiceKind::Postgres { .. } => ServiceType::Postgres,
        }
    }

    /// Dockerizer template the Dockerfile is generated from.
    pub fn docker_file_template(&self) -> &'static str {
        match self {
            ServiceKind::NodeServer { build_step: true, .. } => "node-server",
            ServiceKind::NodeServer { build_step: false, .. } => "node-server-no-build",
            ServiceKind::Postgres { .. } => "postgres",
        }
    }

    fn build_args(&self) -> Vec<(&'static str, String)> {
        match self {
            ServiceKind::NodeServer { .. } => Vec::new(),
            ServiceKind::Postgres {
                db_setup_script_path,
            } => vec![("RELATIVE_DB_SETUP_SCRIPT_PATH", db_setup_script_path.clone())],
        }
    }

    fn injected_environment(&self, settings: &Settings) -> PackResult<Vec<(String, String)>> {
        let password = || {
            settings
                .database
                .postgres_password
                .clone()
                .ok_or(PackError::MissingSetting("database.postgres_password"))
        };
        match self {
            ServiceKind::NodeServer {
                port_environment_variable,
                database_url_environment_variable,
                ..
            } => {
                let mut env = vec![(
                    port_environment_variable.clone(),
                    NODE_SERVER_PORT.to_string(),
                )];
                if let Some(key) = database_url_environment_variable {
                    env.push((
                        key.clone(),
                        format!(
                            "postgres://postgres:{}@localhost:5432/postgres?rejectUnauthorized=false",
                            password()?
                        ),
                    ));
                }
                Ok(env)
            }
            ServiceKind::Postgres { .. } => {
                Ok(vec![("POSTGRES_PASSWORD".to_string(), password()?)])
            }
        }
    }
}

struct ConfigReader<'a> {
    service: &'a str,
    configs: &'a BTreeMap<String, Scalar>,
}

impl ConfigReader<'_> {
    fn invalid(&self, reason: impl Into<String>) -> PackError {
        PackError::InvalidService {
            service: self.service.to_string(),
            reason: reason.into(),
        }
    }

    fn string(&self, key: &str) -> PackResult<Option<String>> {
        match self.configs.get(key) {
            None => Ok(None),
            Some(Scalar::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.invalid(format!("{key} must be a string, got {other}"))),
        }
    }

    fn bool(&self, key: &str) -> PackResult<Option<bool>> {
        match self.configs.get(key) {
            None => Ok(None),
            Some(Scalar::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.invalid(format!("{key} must be a boolean, got {other}"))),
        }
    }
}

/// Lifecycle of a service within one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    /// Registered, environment and secrets captured.
    Constructed,
    /// Container, target and listener rules attached.
    Wired,
}

/// ECR repository the images of a service are pushed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRepository {
    pub name: String,
    pub uri: String,
}

impl ImageRepository {
    pub fn image(&self, tag: &str) -> String {
        format!("{}:{}", self.uri, tag)
    }
}

/// An environment variable whose value lives in Secrets Manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretVariable {
    pub key: String,
    pub secret_name: String,
    pub description: String,
    /// Populated with a random value instead of by the operator.
    pub generated: bool,
}

/// Everything a service needs from its project while being constructed.
#[derive(Debug, Clone, Copy)]
pub struct ServiceContext<'a> {
    pub identity: &'a SpicedlingIdentity,
    pub namer: &'a Namer,
    pub settings: &'a Settings,
}

impl ServiceContext<'_> {
    pub fn services_stack_name(&self) -> String {
        self.namer.services_stack_name(self.identity)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub name: String,
    pub kind: ServiceKind,
    pub repository: ImageRepository,
    environment: BTreeMap<String, String>,
    secrets: BTreeMap<String, SecretVariable>,
    state: ServiceState,
    /// Operator actions emitted while constructing the service.
    #[serde(skip)]
    warnings: Vec<String>,
}

impl Service {
    pub fn new(config: &ServiceConfig, ctx: &ServiceContext<'_>) -> PackResult<Self> {
        if config.name.trim().is_empty() {
            return Err(PackError::InvalidService {
                service: config.name.clone(),
                reason: "name must not be empty".to_string(),
            });
        }
        let kind = ServiceKind::from_config(config)?;

        let repository_name = ctx.namer.resource_kebab(&config.name, ctx.identity);
        let repository = ImageRepository {
            uri: format!("{}/{}", ctx.settings.build.image_registry, repository_name),
            name: repository_name,
        };

        let mut service = Self {
            name: config.name.clone(),
            kind,
            repository,
            environment: config
                .environment
                .iter()
                .map(|(key, value)| (key.clone(), value.to_string()))
                .collect(),
            secrets: BTreeMap::new(),
            state: ServiceState::Constructed,
            warnings: Vec::new(),
        };

        for (key, value) in service.kind.injected_environment(ctx.settings)? {
            service.add_environment_variable(key, value);
        }

        let stack_name = ctx.services_stack_name();
        for key in &config.random_secret_environment_variables {
            service.add_secret_environment_variable(&stack_name, key, true);
        }
        for key in &config.secret_environment_variables {
            service.add_secret_environment_variable(&stack_name, key, false);
        }

        if !config.secret_environment_variables.is_empty() {
            let message = format!(
                "Make sure to add appropriate values in the secrets manager for the secrets of the service \"{}\": {}.",
                service.name,
                config
                    .secret_environment_variables
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(",")
            );
            warn!(service = %service.name, "{message}");
            service.warnings.push(message);
        }

        debug!(
            service = %service.name,
            kind = %service.kind.service_type(),
            repository = %service.repository.name,
            "service constructed"
        );
        Ok(service)
    }

    pub fn add_environment_variable(&mut self, key: impl Into<String>, value: impl ToString) {
        self.environment.insert(key.into(), value.to_string());
    }

    /// Declare `key` as a secret named `UPPER_SNAKE(<stack>_<key>)`.
    pub fn add_secret_environment_variable(&mut self, stack_name: &str, key: &str, generated: bool) {
        let secret = SecretVariable {
            key: key.to_string(),
            secret_name: upper_snake_case(&format!("{stack_name}_{key}")),
            description: format!(
                "Environment Variable for the service \"{}\" of the stack \"{}\".",
                self.name, stack_name
            ),
            generated,
        };
        self.secrets.insert(key.to_string(), secret);
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    pub fn secrets(&self) -> impl Iterator<Item = &SecretVariable> {
        self.secrets.values()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub(crate) fn mark_wired(&mut self) -> PackResult<()> {
        match self.state {
            ServiceState::Constructed => {
                self.state = ServiceState::Wired;
                Ok(())
            }
            ServiceState::Wired => Err(PackError::AlreadyWired(self.name.clone())),
        }
    }

    // ── Docker ─────────────────────────────────────────────────────

    pub fn docker_file_template(&self) -> &'static str {
        self.kind.docker_file_template()
    }

    pub fn docker_file_name(&self) -> String {
        format!("{}.Dockerfile", self.docker_file_template())
    }

    pub fn container_name(&self) -> String {
        kebab_case(&self.name)
    }

    /// Generate the Dockerfile with the dockerizer, then build the image.
    pub fn build_commands(&self, build: &BuildSettings) -> Vec<String> {
        let template = self.docker_file_template();
        let build_args: String = self
            .kind
            .build_args()
            .into_iter()
            .map(|(key, value)| format!(" --build-arg {key}={value}"))
            .collect();
        vec![
            format!("echo Dockerizing service \\\"{}\\\"...", self.name),
            format!(
                "echo Step 1: Creating Dockerfile for the Service \\\"{}\\\" from template \\\"{}\\\"...",
                self.name, template
            ),
            "npx --version".to_string(),
            format!("npx {} {}", build.dockerizer_repo, template),
            format!(
                "echo Step2: Building Docker Image for the service \\\"{}\\\"...",
                self.name
            ),
            "docker --version".to_string(),
            format!(
                "docker build -f {} -t {}{} .",
                self.docker_file_name(),
                self.repository.image(&build.image_tag),
                build_args
            ),
        ]
    }

    /// Push the image built by [`Service::build_commands`].
    pub fn post_build_commands(&self, build: &BuildSettings) -> Vec<String> {
        vec![
            format!("echo Pushing the Docker image for the service \\\"{}\\\"...", self.name),
            "docker --version".to_string(),
            format!("docker push {}", self.repository.image(&build.image_tag)),
        ]
    }
}
