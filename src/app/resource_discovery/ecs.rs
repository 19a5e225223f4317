//! ECS resource discovery.
//!
//! [`EcsApi`] is the set of ECS calls the viewer makes, one request per call;
//! [`EcsDiscovery`] layers pagination and lookup rules on top of it.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_ecs as ecs;
use aws_types::SdkConfig;

use super::types::{
    ClusterRef, ContainerSpec, TaskDefinition, TaskDefinitionFamily, TaskDefinitionRef,
    TaskSummary,
};
use crate::app::error::ViewerError;
use crate::app::pager::{collect_all, paginate, take_items, Page};

/// DescribeTasks accepts at most this many task ARNs per request
const DESCRIBE_TASKS_BATCH: usize = 100;

#[async_trait]
pub trait EcsApi: Send + Sync {
    /// One page of cluster ARNs
    async fn list_clusters(&self, next_token: Option<String>) -> Result<Page<String>>;

    /// One page of ARNs of the tasks running in `cluster`
    async fn list_running_tasks(
        &self,
        cluster: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>>;

    async fn describe_tasks(&self, cluster: &str, task_arns: &[String]) -> Result<Vec<TaskSummary>>;

    /// One page of task definition family names
    async fn list_task_definition_families(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<String>>;

    /// One page of task definition ARNs of `family`, newest revision first
    async fn list_task_definitions(
        &self,
        family: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>>;

    async fn describe_task_definition(&self, task_definition: &str) -> Result<TaskDefinition>;
}

/// ECS client wrapper
#[derive(Clone)]
pub struct EcsClient {
    client: ecs::Client,
}

impl EcsClient {
    pub fn new(aws_config: &SdkConfig) -> Self {
        Self {
            client: ecs::Client::new(aws_config),
        }
    }

    fn container_to_spec(container: &ecs::types::ContainerDefinition) -> ContainerSpec {
        let log_configuration = container.log_configuration.as_ref();
        ContainerSpec {
            name: container.name.clone().unwrap_or_default(),
            log_driver: log_configuration.map(|config| config.log_driver.as_str().to_string()),
            log_options: log_configuration
                .map(|config| config.options.clone().unwrap_or_default()),
        }
    }
}

#[async_trait]
impl EcsApi for EcsClient {
    async fn list_clusters(&self, next_token: Option<String>) -> Result<Page<String>> {
        let response = self
            .client
            .list_clusters()
            .set_next_token(next_token)
            .send()
            .await
            .context("Failed to list ECS clusters")?;

        Ok(Page::new(
            response.cluster_arns.unwrap_or_default(),
            response.next_token,
        ))
    }

    async fn list_running_tasks(
        &self,
        cluster: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        let response = self
            .client
            .list_tasks()
            .cluster(cluster)
            .desired_status(ecs::types::DesiredStatus::Running)
            .set_next_token(next_token)
            .send()
            .await
            .with_context(|| format!("Failed to list running tasks in cluster {}", cluster))?;

        Ok(Page::new(
            response.task_arns.unwrap_or_default(),
            response.next_token,
        ))
    }

    async fn describe_tasks(&self, cluster: &str, task_arns: &[String]) -> Result<Vec<TaskSummary>> {
        let response = self
            .client
            .describe_tasks()
            .cluster(cluster)
            .set_tasks(Some(task_arns.to_vec()))
            .send()
            .await
            .with_context(|| format!("Failed to describe tasks in cluster {}", cluster))?;

        Ok(response
            .tasks
            .unwrap_or_default()
            .into_iter()
            .filter_map(|task| {
                Some(TaskSummary {
                    task_arn: task.task_arn?,
                    task_definition_arn: task.task_definition_arn?,
                })
            })
            .collect())
    }

    async fn list_task_definition_families(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        let response = self
            .client
            .list_task_definition_families()
            .set_next_token(next_token)
            .send()
            .await
            .context("Failed to list task definition families")?;

        Ok(Page::new(
            response.families.unwrap_or_default(),
            response.next_token,
        ))
    }

    async fn list_task_definitions(
        &self,
        family: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        let response = self
            .client
            .list_task_definitions()
            .family_prefix(family)
            .sort(ecs::types::SortOrder::Desc)
            .set_next_token(next_token)
            .send()
            .await
            .with_context(|| format!("Failed to list task definitions of family {}", family))?;

        Ok(Page::new(
            response.task_definition_arns.unwrap_or_default(),
            response.next_token,
        ))
    }

    async fn describe_task_definition(&self, task_definition: &str) -> Result<TaskDefinition> {
        let response = self
            .client
            .describe_task_definition()
            .task_definition(task_definition)
            .send()
            .await
            .with_context(|| format!("Failed to describe task definition {}", task_definition))?;

        let definition = response
            .task_definition
            .ok_or_else(|| ViewerError::TaskDefinitionNotFound(task_definition.to_string()))?;

        Ok(TaskDefinition {
            arn: definition.task_definition_arn.clone().unwrap_or_default(),
            family: definition.family.clone().unwrap_or_default(),
            revision: definition.revision,
            containers: definition
                .container_definitions
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(Self::container_to_spec)
                .collect(),
        })
    }
}

/// Paginated discovery over an [`EcsApi`]
pub struct EcsDiscovery<'a, A: EcsApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: EcsApi + ?Sized> EcsDiscovery<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn list_clusters(&self) -> Result<Vec<ClusterRef>> {
        let api = self.api;
        let arns = collect_all(paginate(move |token| api.list_clusters(token))).await?;
        Ok(arns.into_iter().map(ClusterRef::new).collect())
    }

    pub async fn list_running_tasks(&self, cluster: &str) -> Result<Vec<String>> {
        let api = self.api;
        collect_all(paginate(move |token| api.list_running_tasks(cluster, token))).await
    }

    /// Describe tasks, batching the ARNs to the DescribeTasks limit
    pub async fn describe_tasks(
        &self,
        cluster: &str,
        task_arns: &[String],
    ) -> Result<Vec<TaskSummary>> {
        let mut tasks = Vec::with_capacity(task_arns.len());
        for batch in task_arns.chunks(DESCRIBE_TASKS_BATCH) {
            tasks.extend(self.api.describe_tasks(cluster, batch).await?);
        }
        Ok(tasks)
    }

    /// Task definitions of the tasks running in `cluster`, each listed once,
    /// in the order first seen
    pub async fn running_task_definitions(&self, cluster: &str) -> Result<Vec<TaskDefinitionRef>> {
        let task_arns = self.list_running_tasks(cluster).await?;
        if task_arns.is_empty() {
            return Err(ViewerError::NoRunningTasks(cluster.to_string()).into());
        }

        let tasks = self.describe_tasks(cluster, &task_arns).await?;
        let mut definitions: Vec<TaskDefinitionRef> = Vec::new();
        for task in tasks {
            if !definitions
                .iter()
                .any(|known| known.arn == task.task_definition_arn)
            {
                definitions.push(TaskDefinitionRef::new(task.task_definition_arn));
            }
        }
        Ok(definitions)
    }

    pub async fn list_task_definition_families(&self) -> Result<Vec<TaskDefinitionFamily>> {
        let api = self.api;
        let families =
            collect_all(paginate(move |token| api.list_task_definition_families(token))).await?;
        Ok(families.into_iter().map(TaskDefinitionFamily::new).collect())
    }

    /// Describe the newest revision of a family. Only the first page of the
    /// listing is requested.
    pub async fn latest_task_definition(
        &self,
        family: &TaskDefinitionFamily,
    ) -> Result<TaskDefinition> {
        let api = self.api;
        let name = family.name.as_str();
        let newest = take_items(paginate(move |token| api.list_task_definitions(name, token)), 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ViewerError::TaskDefinitionNotFound(family.name.clone()))?;

        log_debug!("Latest task definition of {}: {}", family.name, newest);
        self.describe_task_definition(&newest).await
    }

    pub async fn describe_task_definition(&self, task_definition: &str) -> Result<TaskDefinition> {
        self.api.describe_task_definition(task_definition).await
    }
}
