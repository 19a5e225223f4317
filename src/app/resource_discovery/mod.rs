//! ECS Resource Discovery
//!
//! Walks clusters, running tasks, task definition families and task definitions to
//! reach the container whose logs should be read, and extracts that container's
//! awslogs configuration.

#![warn(clippy::all, rust_2018_idioms)]

pub mod ecs;
pub mod log_configuration;
pub mod types;

pub use ecs::{EcsApi, EcsClient, EcsDiscovery};
pub use log_configuration::LogConfiguration;
pub use types::{
    ClusterRef, ContainerSpec, TaskDefinition, TaskDefinitionFamily, TaskDefinitionRef,
    TaskSummary,
};
