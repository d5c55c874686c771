//! StackPlan: the four stacks deployed for the final projects.
//!
//! The core stack is shared and deployed once. Each student then gets a
//! services stack (image repositories and secrets), a Fargate service stack
//! (cluster, task and load balancer wiring) and a pipeline stack (GitHub
//! source, docker build, ECS deploy).
//!
//! The pipeline is deployed in two steps. The first deploy creates the
//! source and build stages so images exist before the Fargate service is
//! started; the second, with `fargate_deploy_stage`, adds the deploy stage.

use serde::Serialize;
use spiced_core::names::{FARGATE_SERVICE_ROLE, PIPELINE_ROLE, SERVICES_ROLE};
use spiced_core::{ProjectConfig, Settings, StackTags, ascii};
use spiced_pack::{BuildSpec, ImageRepository, SecretVariable, ServiceContext, ServiceRegistry};
use spiced_state::PriorityStore;
use tracing::{info, warn};

use crate::error::{PlanError, PlanResult};
use crate::wiring::{ContainerDefinition, TargetWiring, wire_services};

pub const CORE_ROLE: &str = "Core";
pub const DEPLOYMENT_TIMEOUT_MINUTES: u32 = 30;

/// Tags of the shared core stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CoreTags {
    pub application_group: String,
    pub application_role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreStack {
    pub stack_name: String,
    pub tags: CoreTags,
    pub load_balancer_name: String,
    pub private_subnet: bool,
    pub warnings: Vec<String>,
}

impl CoreStack {
    pub fn new(settings: &Settings) -> Self {
        let infrastructure = &settings.infrastructure;
        let stack_name = infrastructure.core_stack_name.clone();
        let warnings = vec![
            format!(
                "Make sure to configure a CNAME record for \"*.{}\" pointing to the DNS name of the load balancer \"{}\".",
                infrastructure.domain_name, stack_name
            ),
            "Make sure to specify the \"core_load_balancer_security_group_id\" setting after creation of the load balancer and its security group.".to_string(),
        ];
        Self {
            tags: CoreTags {
                application_group: settings.naming.application_group_tag.clone(),
                application_role: CORE_ROLE.to_string(),
            },
            load_balancer_name: stack_name.clone(),
            stack_name,
            private_subnet: infrastructure.private_subnet,
            warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesStack {
    pub stack_name: String,
    pub tags: StackTags,
    pub repositories: Vec<ImageRepository>,
    pub secrets: Vec<SecretVariable>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FargateServiceStack {
    pub stack_name: String,
    pub tags: StackTags,
    pub service_name: String,
    pub cluster_name: String,
    pub security_group_name: String,
    pub security_group_description: String,
    pub assign_public_ip: bool,
    pub desired_count: u32,
    pub containers: Vec<ContainerDefinition>,
    pub targets: Vec<TargetWiring>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubSource {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Secrets Manager secret holding the tokens, keyed by GitHub user.
    pub oauth_token_secret_name: String,
    pub oauth_token_json_field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployStage {
    pub service_name: String,
    pub cluster_name: String,
    pub deployment_timeout_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStack {
    pub stack_name: String,
    pub tags: StackTags,
    pub pipeline_name: String,
    pub build_role_name: String,
    pub source: GitHubSource,
    pub build_project_name: String,
    pub build_project_description: String,
    pub buildspec: BuildSpec,
    /// Only present on the second deploy of the pipeline.
    pub deploy_stage: Option<DeployStage>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackPlan {
    pub core: CoreStack,
    pub services: ServicesStack,
    pub fargate_service: FargateServiceStack,
    pub pipeline: PipelineStack,
}

impl StackPlan {
    /// Plan every stack of one project.
    ///
    /// Builds the service registry, wires it (allocating the listener rule
    /// priority on first use) and renders the buildspec.
    pub fn build(
        project: &ProjectConfig,
        ctx: &ServiceContext<'_>,
        store: &PriorityStore,
        fargate_deploy_stage: bool,
    ) -> PlanResult<Self> {
        let identity = ctx.identity;
        let namer = ctx.namer;
        let settings = ctx.settings;

        let mut registry = ServiceRegistry::from_configs(&project.services, ctx)?;
        let services = ServicesStack {
            stack_name: namer.services_stack_name(identity),
            tags: namer.stack_tags(SERVICES_ROLE, identity),
            repositories: registry.services().map(|s| s.repository.clone()).collect(),
            secrets: registry.services().flat_map(|s| s.secrets().cloned()).collect(),
            warnings: registry.warnings(),
        };

        let buildspec = registry.buildspec(ctx)?;
        let wiring = wire_services(&mut registry, project, ctx, store)?;

        let main_resource = namer.main_resource_pascal(identity);
        let fargate_stack_name = namer.fargate_service_stack_name(identity);
        let fargate_service = FargateServiceStack {
            tags: namer.stack_tags(FARGATE_SERVICE_ROLE, identity),
            service_name: main_resource.clone(),
            cluster_name: main_resource.clone(),
            security_group_name: fargate_stack_name.clone(),
            security_group_description: ascii(&format!(
                "Fargate Service - {} - {} {}",
                identity.cohort, identity.first_name, identity.last_name
            )),
            assign_public_ip: !settings.infrastructure.private_subnet,
            desired_count: 1,
            containers: wiring.containers,
            targets: wiring.targets,
            stack_name: fargate_stack_name,
        };

        let repository = &project.repository;
        let pipeline_stack_name = namer.pipeline_stack_name(identity);
        let token_warning = format!(
            "Make sure a GitHub token for the invited user \"{}\" is provided in the secrets manager for the secret \"{}\".",
            repository.invited_github_username, settings.build.github_tokens_secret_name
        );
        warn!(stack = %pipeline_stack_name, "{token_warning}");
        let pipeline = PipelineStack {
            tags: namer.stack_tags(PIPELINE_ROLE, identity),
            pipeline_name: main_resource.clone(),
            build_role_name: namer.resource_pascal_without_separator("BuildRole", identity),
            source: GitHubSource {
                owner: repository.github_owner.clone(),
                repo: repository.repo_name.clone(),
                branch: repository.branch.clone(),
                oauth_token_secret_name: settings.build.github_tokens_secret_name.clone(),
                oauth_token_json_field: repository.invited_github_username.clone(),
            },
            build_project_name: pipeline_stack_name.clone(),
            build_project_description: format!(
                "Dockerize and Upload Application | {} - {} {}",
                identity.cohort, identity.first_name, identity.last_name
            ),
            buildspec,
            deploy_stage: fargate_deploy_stage.then(|| DeployStage {
                service_name: main_resource.clone(),
                cluster_name: main_resource.clone(),
                deployment_timeout_minutes: DEPLOYMENT_TIMEOUT_MINUTES,
            }),
            warnings: vec![token_warning],
            stack_name: pipeline_stack_name,
        };

        info!(
            project = %identity.full_name(),
            services = registry.len(),
            fargate_deploy_stage,
            "stack plan built"
        );
        Ok(Self {
            core: CoreStack::new(settings),
            services,
            fargate_service,
            pipeline,
        })
    }

    /// All operator warnings, core stack first.
    pub fn warnings(&self) -> Vec<&str> {
        self.core
            .warnings
            .iter()
            .chain(&self.services.warnings)
            .chain(&self.pipeline.warnings)
            .map(String::as_str)
            .collect()
    }

    pub fn to_json(&self) -> PlanResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlanError::Serialize(e.to_string()))
    }
}
