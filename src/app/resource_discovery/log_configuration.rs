//! Extraction of the awslogs settings from a container definition.

#![warn(clippy::all, rust_2018_idioms)]

use std::collections::HashMap;

use super::types::ContainerSpec;
use crate::app::error::ViewerError;

pub const GROUP_OPTION: &str = "awslogs-group";
pub const STREAM_PREFIX_OPTION: &str = "awslogs-stream-prefix";

/// Where a container's logs live in CloudWatch Logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfiguration {
    pub log_group: String,
    pub stream_prefix: String,
}

impl LogConfiguration {
    /// Read the group and stream prefix from awslogs driver options.
    /// Both keys are required.
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self, ViewerError> {
        let log_group = options
            .get(GROUP_OPTION)
            .ok_or(ViewerError::MissingLogOption(GROUP_OPTION))?;
        let stream_prefix = options
            .get(STREAM_PREFIX_OPTION)
            .ok_or(ViewerError::MissingLogOption(STREAM_PREFIX_OPTION))?;

        Ok(Self {
            log_group: log_group.clone(),
            stream_prefix: stream_prefix.clone(),
        })
    }

    pub fn from_container(container: &ContainerSpec) -> Result<Self, ViewerError> {
        let options = container
            .log_options
            .as_ref()
            .ok_or_else(|| ViewerError::MissingLogConfiguration(container.name.clone()))?;

        if let Some(driver) = container.log_driver.as_deref() {
            if driver != "awslogs" {
                log_warn!(
                    "Container {} uses the {} log driver, expected awslogs",
                    container.name,
                    driver
                );
            }
        }

        Self::from_options(options)
    }

    /// Stream prefix narrowed to one container. ECS names awslogs streams
    /// `<prefix>/<container>/<task-id>`.
    pub fn container_stream_prefix(&self, container_name: &str) -> String {
        format!("{}/{}", self.stream_prefix, container_name)
    }
}
