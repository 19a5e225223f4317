//! Classified failures of the log viewer.
//!
//! Library operations return `anyhow::Result`; the variants here are the failures a
//! caller may want to tell apart (via `downcast_ref::<ViewerError>()`). Remote-call
//! failures stay as SDK errors wrapped with the name of the failing operation.

#![warn(clippy::all, rust_2018_idioms)]

use thiserror::Error;

use crate::app::data_plane::cloudwatch_logs::types::QueryStatistics;

/// Errors raised by the log query & result pipeline.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Output format outside of `simple`, `csv` and `json`.
    #[error("invalid format: {0}")]
    InvalidOutputFormat(String),

    /// `simple` output needs exactly one selected field.
    #[error("simple format can only be used when exactly one field is selected (got {0})")]
    SimpleFormatFieldCount(usize),

    /// A required awslogs option is not present on the container.
    #[error("{0} not set in log configuration")]
    MissingLogOption(&'static str),

    /// The container has no log configuration at all.
    #[error("container {0} has no log configuration")]
    MissingLogConfiguration(String),

    /// No container with the requested name in the task definition.
    #[error("cannot find container: {0}")]
    ContainerNotFound(String),

    /// The family has no registered task definition.
    #[error("no task definition found for family: {0}")]
    TaskDefinitionNotFound(String),

    /// The account has no task definition families to pick from.
    #[error("no task definition families found")]
    NoTaskDefinitionFamilies,

    /// The cluster has no running tasks to pick a task definition from.
    #[error("no running tasks found in cluster {0}")]
    NoRunningTasks(String),

    /// The operator aborted an interactive selection.
    #[error("{0} selection aborted")]
    SelectionAborted(String),

    /// The analytics engine reported a failed terminal state.
    #[error("query failed: {statistics}")]
    QueryFailed { statistics: QueryStatistics },
}
