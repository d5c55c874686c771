//! spiced-pack — services of a project and the commands that build them.
//!
//! Each service turns into a dockerizer invocation plus a `docker build`,
//! and a `docker push` once built. The [`ServiceRegistry`] concatenates
//! those per phase, in registration order, into a CodeBuild [`BuildSpec`]
//! whose post-build phase ends with the `imagedefinitions.json` file the
//! ECS deploy action reads.

pub mod buildspec;
pub mod error;
pub mod registry;
pub mod service;

pub use buildspec::BuildSpec;
pub use error::{PackError, PackResult};
pub use registry::{ImageDefinition, ServiceRegistry};
pub use service::{
    ImageRepository, NODE_SERVER_PORT, SecretVariable, Service, ServiceContext, ServiceKind,
    ServiceState,
};
