use spiced_pack::PackError;
use spiced_state::StateError;
use thiserror::Error;

pub type PlanResult<T> = Result<T, PlanError>;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Pack(#[from] PackError),

    #[error("target group priority: {0}")]
    State(#[from] StateError),

    /// Only one node server per project can sit behind the load balancer.
    #[error("more than one load balancer target: {}", .0.join(", "))]
    MultipleTargets(Vec<String>),

    #[error("failed to serialize stack plan: {0}")]
    Serialize(String),
}
