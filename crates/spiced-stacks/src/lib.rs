//! spiced-stacks — what gets deployed for a student project.
//!
//! # Components
//!
//! - **`wiring`** — container definitions and load balancer targets, with
//!   listener rule priorities from the priority table
//! - **`plan`** — the core, services, Fargate service and pipeline stacks

pub mod error;
pub mod plan;
pub mod wiring;

pub use error::{PlanError, PlanResult};
pub use plan::{
    CoreStack, DeployStage, FargateServiceStack, PipelineStack, ServicesStack, StackPlan,
};
pub use wiring::{ContainerDefinition, HealthCheck, TargetWiring, Wiring, wire_services};
