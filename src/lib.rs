//! ecslogs - read the logs of an ECS container from CloudWatch Logs
//!
//! Given a task definition (or a cluster) and a container, ecslogs finds the
//! container's awslogs configuration and then either runs a Logs Insights query,
//! reads the log streams directly, or opens the query in the CloudWatch console.
//!
//! # Architecture Overview
//!
//! - **Resource discovery** ([`app::resource_discovery`]): ECS clusters, tasks, task
//!   definitions and the container log configuration
//! - **Data plane** ([`app::data_plane`]): query building, query execution, stream
//!   retrieval and result formatting for CloudWatch Logs
//! - **Pagination** ([`app::pager`]): one lazy token-driven pager shared by every
//!   paginated AWS call
//! - **Flow** ([`app::viewer`]): ties the pieces together for the binary
//!
//! Remote services sit behind the [`app::data_plane::LogsApi`] and
//! [`app::resource_discovery::EcsApi`] traits.

#![warn(clippy::all, rust_2018_idioms)]

// Include logging macros first
#[macro_use]
pub mod logging_macros;

pub mod app;
