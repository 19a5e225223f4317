//! Data Plane Services Module
//!
//! Data plane services read the data held inside AWS resources, as opposed to the
//! control plane calls that discover those resources (see
//! [`resource_discovery`](crate::app::resource_discovery)).
//!
//! ## Available Services
//!
//! - **CloudWatch Logs**: Logs Insights queries and direct stream reads for the
//!   containers of an ECS task definition

pub mod cloudwatch_logs;

pub use cloudwatch_logs::{CloudWatchLogsClient, LogsApi};
