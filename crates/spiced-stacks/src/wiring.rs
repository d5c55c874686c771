//! Service wiring: containers of the Fargate task and load balancer targets.
//!
//! Every registered service becomes a container of the student's task
//! definition. Node servers are additionally routed from the shared HTTP
//! listener: host header `<subDomain>.<domain>` forwards to a target group
//! named after the sub domain, with a listener rule priority keyed on the
//! services stack name. Priorities already in the table keep that key.

use std::collections::BTreeMap;

use serde::Serialize;
use spiced_core::ProjectConfig;
use spiced_pack::{
    NODE_SERVER_PORT, SecretVariable, Service, ServiceContext, ServiceKind, ServiceRegistry,
};
use spiced_state::PriorityStore;
use tracing::{debug, info};

use crate::error::{PlanError, PlanResult};

pub const HEALTHY_HTTP_CODES: &str = "200-399";
pub const HEALTHY_THRESHOLD_COUNT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub container_port: u16,
    pub host_port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinition {
    pub name: String,
    pub image: String,
    pub environment: BTreeMap<String, String>,
    pub secrets: Vec<SecretVariable>,
    pub log_stream_prefix: String,
    pub port_mappings: Vec<PortMapping>,
}

/// Security group rule letting the load balancer reach the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRule {
    pub source_security_group_id: String,
    pub port: u16,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub enabled: bool,
    pub healthy_http_codes: String,
    pub healthy_threshold_count: u32,
}

impl Default for HealthCheck {
    fn default() -> Self {
        Self {
            enabled: true,
            healthy_http_codes: HEALTHY_HTTP_CODES.to_string(),
            healthy_threshold_count: HEALTHY_THRESHOLD_COUNT,
        }
    }
}

/// Listener rule and target group forwarding to one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetWiring {
    pub container_name: String,
    pub container_port: u16,
    pub ingress: IngressRule,
    pub target_group_name: String,
    pub host_header: String,
    pub health_check: HealthCheck,
    pub priority: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wiring {
    pub containers: Vec<ContainerDefinition>,
    pub targets: Vec<TargetWiring>,
}

/// Wire every registered service, in registration order.
///
/// Each service moves to the wired state; wiring a registry twice fails.
/// The listener priority is only allocated when the project has a node
/// server.
pub fn wire_services(
    registry: &mut ServiceRegistry,
    project: &ProjectConfig,
    ctx: &ServiceContext<'_>,
    store: &PriorityStore,
) -> PlanResult<Wiring> {
    let exposed: Vec<String> = registry
        .services()
        .filter(|s| matches!(s.kind, ServiceKind::NodeServer { .. }))
        .map(|s| s.name.clone())
        .collect();
    if exposed.len() > 1 {
        return Err(PlanError::MultipleTargets(exposed));
    }

    let stack_name = ctx.services_stack_name();
    let names: Vec<String> = registry.services().map(|s| s.name.clone()).collect();
    let mut wiring = Wiring::default();

    for name in &names {
        let service = registry.wire(name)?;
        let mut container = container_definition(service, ctx);

        if matches!(service.kind, ServiceKind::NodeServer { .. }) {
            let priority = store.allocate(&stack_name)?;
            container.port_mappings.push(PortMapping {
                container_port: NODE_SERVER_PORT,
                host_port: NODE_SERVER_PORT,
            });
            wiring.targets.push(target_wiring(&container, project, ctx, priority));
            info!(
                service = %name,
                host = %wiring.targets[0].host_header,
                priority,
                "service added as load balancer target"
            );
        }

        debug!(service = %name, container = %container.name, "container defined");
        wiring.containers.push(container);
    }
    Ok(wiring)
}

fn container_definition(service: &Service, ctx: &ServiceContext<'_>) -> ContainerDefinition {
    ContainerDefinition {
        name: service.container_name(),
        image: service.repository.image(&ctx.settings.build.image_tag),
        environment: service.environment().clone(),
        secrets: service.secrets().cloned().collect(),
        log_stream_prefix: ctx.namer.resource_kebab(&service.name, ctx.identity),
        port_mappings: Vec::new(),
    }
}

fn target_wiring(
    container: &ContainerDefinition,
    project: &ProjectConfig,
    ctx: &ServiceContext<'_>,
    priority: u32,
) -> TargetWiring {
    let infrastructure = &ctx.settings.infrastructure;
    TargetWiring {
        container_name: container.name.clone(),
        container_port: NODE_SERVER_PORT,
        ingress: IngressRule {
            source_security_group_id: infrastructure.core_load_balancer_security_group_id.clone(),
            port: NODE_SERVER_PORT,
            description: format!("Load balancer to target: {}", project.sub_domain),
        },
        target_group_name: project.sub_domain.clone(),
        host_header: format!("{}.{}", project.sub_domain, infrastructure.domain_name),
        health_check: HealthCheck::default(),
        priority,
    }
}
