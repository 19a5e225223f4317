//! Core application modules for ecslogs.
//!
//! # Module Organization
//!
//! ## AWS Integration
//! - [`resource_discovery`] - ECS lookups down to a container's log configuration
//! - [`data_plane`] - CloudWatch Logs queries, stream reads and output formatting
//!
//! ## Shared Infrastructure
//! - [`pager`] - Lazy pagination over continuation tokens
//! - [`config`] - Layered run options and AWS SDK configuration
//! - [`error`] - Domain errors surfaced to the operator
//! - [`selector`] - Interactive picking of task definitions and containers
//!
//! ## Flow
//! - [`viewer`] - Resolves the target container and retrieves its logs

pub mod config;
pub mod data_plane;
pub mod error;
pub mod pager;
pub mod resource_discovery;
pub mod selector;
pub mod viewer;

pub use config::{AppOptions, ConfigFile, Mode, OptionArgs};
pub use error::ViewerError;
pub use viewer::{resolve_target, retrieve, LogOutput, LogTarget};
