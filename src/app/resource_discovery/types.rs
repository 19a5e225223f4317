//! ECS resources the viewer walks through to find a container's log configuration.

#![warn(clippy::all, rust_2018_idioms)]

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::app::error::ViewerError;
use crate::app::selector::Selectable;

/// Last path segment of an ECS ARN (`.../cluster/prod` -> `prod`)
pub fn arn_resource_name(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

/// An ECS cluster, identified by ARN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRef {
    pub arn: String,
}

impl ClusterRef {
    pub fn new(arn: impl Into<String>) -> Self {
        Self { arn: arn.into() }
    }

    pub fn name(&self) -> &str {
        arn_resource_name(&self.arn)
    }
}

impl Selectable for ClusterRef {
    fn label(&self) -> String {
        self.name().to_string()
    }
}

/// A task definition family name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinitionFamily {
    pub name: String,
}

impl TaskDefinitionFamily {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Selectable for TaskDefinitionFamily {
    fn label(&self) -> String {
        self.name.clone()
    }
}

/// A task definition revision, identified by ARN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinitionRef {
    pub arn: String,
}

impl TaskDefinitionRef {
    pub fn new(arn: impl Into<String>) -> Self {
        Self { arn: arn.into() }
    }
}

impl Selectable for TaskDefinitionRef {
    fn label(&self) -> String {
        self.arn.clone()
    }
}

/// The parts of a described task that matter for log lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub task_arn: String,
    pub task_definition_arn: String,
}

/// A container definition reduced to its name and log configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub name: String,
    /// Log driver (`awslogs`, `firelens`, ...), if a log configuration is set
    pub log_driver: Option<String>,
    /// Log driver options; `None` when the container has no log configuration
    pub log_options: Option<HashMap<String, String>>,
}

impl ContainerSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attach an awslogs configuration
    pub fn with_awslogs(mut self, options: HashMap<String, String>) -> Self {
        self.log_driver = Some("awslogs".to_string());
        self.log_options = Some(options);
        self
    }
}

impl Selectable for ContainerSpec {
    fn label(&self) -> String {
        if self.name.is_empty() {
            "<Unnamed>".to_string()
        } else {
            self.name.clone()
        }
    }
}

/// A described task definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub arn: String,
    pub family: String,
    pub revision: i32,
    pub containers: Vec<ContainerSpec>,
}

impl TaskDefinition {
    /// Find a container by exact name
    pub fn find_container(&self, name: &str) -> Result<&ContainerSpec, ViewerError> {
        self.containers
            .iter()
            .find(|container| container.name == name)
            .ok_or_else(|| ViewerError::ContainerNotFound(name.to_string()))
    }
}
