//! ServiceRegistry: the services of one project, in registration order.
//!
//! A registry is built once per invocation and handed by reference to the
//! buildspec assembly and to the wiring stage. Aggregated commands keep the
//! registration order of the services.

use serde::Serialize;
use spiced_core::settings::BuildSettings;
use spiced_core::ServiceConfig;
use tracing::{debug, info};

use crate::buildspec::BuildSpec;
use crate::error::{PackError, PackResult};
use crate::service::{Service, ServiceContext};

/// Shared by every project: log in to ECR before building.
pub const PRE_BUILD_COMMANDS: [&str; 3] = [
    "echo Logging in to Amazon ECR...",
    "aws --version",
    "$(aws ecr get-login --no-include-email --region $AWS_DEFAULT_REGION)",
];

pub const IMAGE_DEFINITIONS_FILE: &str = "imagedefinitions.json";

/// One record of `imagedefinitions.json`, read by the ECS deploy action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDefinition {
    pub name: String,
    pub image_uri: String,
}

#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: Vec<Service>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct and register every service of a project.
    pub fn from_configs(configs: &[ServiceConfig], ctx: &ServiceContext<'_>) -> PackResult<Self> {
        let mut registry = Self::new();
        for config in configs {
            registry.register(Service::new(config, ctx)?)?;
        }
        info!(
            services = registry.len(),
            stack = %ctx.services_stack_name(),
            "service registry built"
        );
        Ok(registry)
    }

    pub fn register(&mut self, service: Service) -> PackResult<()> {
        if self.get(&service.name).is_some() {
            return Err(PackError::DuplicateService(service.name));
        }
        debug!(service = %service.name, position = self.services.len(), "service registered");
        self.services.push(service);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Move `name` to the wired state. Fails if it was wired already.
    pub fn wire(&mut self, name: &str) -> PackResult<&Service> {
        let service = self
            .services
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| PackError::UnknownService(name.to_string()))?;
        service.mark_wired()?;
        debug!(service = name, "service wired");
        Ok(&*service)
    }

    /// Operator warnings of all services, in registration order.
    pub fn warnings(&self) -> Vec<String> {
        self.services
            .iter()
            .flat_map(|s| s.warnings().iter().cloned())
            .collect()
    }

    pub fn repository_names(&self) -> Vec<String> {
        self.services
            .iter()
            .map(|s| s.repository.name.clone())
            .collect()
    }

    // ── Build commands ─────────────────────────────────────────────

    pub fn pre_build_commands(&self) -> Vec<String> {
        PRE_BUILD_COMMANDS.iter().map(|c| c.to_string()).collect()
    }

    pub fn build_commands(&self, build: &BuildSettings) -> Vec<String> {
        self.services
            .iter()
            .flat_map(|s| s.build_commands(build))
            .collect()
    }

    /// Every push, then the single `imagedefinitions.json` write.
    pub fn post_build_commands(&self, build: &BuildSettings) -> PackResult<Vec<String>> {
        let mut commands: Vec<String> = self
            .services
            .iter()
            .flat_map(|s| s.post_build_commands(build))
            .collect();
        commands.push("echo Writing image definitions file...".to_string());
        commands.push(self.image_definitions_command(build)?);
        Ok(commands)
    }

    pub fn image_definitions(&self, build: &BuildSettings) -> Vec<ImageDefinition> {
        self.services
            .iter()
            .map(|s| ImageDefinition {
                name: s.container_name(),
                image_uri: s.repository.image(&build.image_tag),
            })
            .collect()
    }

    fn image_definitions_command(&self, build: &BuildSettings) -> PackResult<String> {
        let quote = |value: &str| {
            serde_json::to_string(value).map_err(|e| PackError::Render(e.to_string()))
        };
        let records = self
            .image_definitions(build)
            .iter()
            .map(|d| {
                Ok(format!(
                    "{{\"name\":{}, \"imageUri\":{}}}",
                    quote(&d.name)?,
                    quote(&d.image_uri)?
                ))
            })
            .collect::<PackResult<Vec<_>>>()?;
        Ok(format!(
            "echo '[{}]' > {}",
            records.join(","),
            IMAGE_DEFINITIONS_FILE
        ))
    }

    /// The CodeBuild specification of the project's pipeline.
    pub fn buildspec(&self, ctx: &ServiceContext<'_>) -> PackResult<BuildSpec> {
        let build = &ctx.settings.build;
        Ok(BuildSpec::new(
            self.pre_build_commands(),
            self.build_commands(build),
            self.post_build_commands(build)?,
            ctx.namer.resource_kebab("artifact", ctx.identity),
        ))
    }
}
