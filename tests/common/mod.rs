//! In-memory stand-ins for the ECS and CloudWatch Logs services and the prompt.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use ecslogs::app::data_plane::cloudwatch_logs::{
    LogEvent, LogEventsPage, LogStreamSummary, LogsApi, QueryResults, QueryStatistics,
    QueryStatus, ResultField, ResultRow,
};
use ecslogs::app::pager::Page;
use ecslogs::app::resource_discovery::log_configuration::{GROUP_OPTION, STREAM_PREFIX_OPTION};
use ecslogs::app::resource_discovery::{ContainerSpec, EcsApi, TaskDefinition, TaskSummary};
use ecslogs::app::selector::Selector;

pub fn row(pairs: &[(&str, &str)]) -> ResultRow {
    pairs
        .iter()
        .map(|(field, value)| ResultField::new(*field, Some(value.to_string())))
        .collect()
}

pub fn poll(status: QueryStatus, rows: Vec<ResultRow>) -> QueryResults {
    let statistics = QueryStatistics::new(512.0, rows.len() as f64, 10.0);
    QueryResults::new(status, rows, statistics)
}

pub fn event(ms: i64, stream: &str, message: &str) -> LogEvent {
    LogEvent::from_millis(ms, stream.to_string(), message.to_string())
}

/// A `StartQuery` call as received by [`FakeLogs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedQuery {
    pub log_group: String,
    pub query: String,
    pub start: i64,
    pub end: i64,
}

/// CloudWatch Logs double.
///
/// Query polls are answered from a script. Stream listings are served in pages with
/// tokens `s1`, `s2`, ... and keep only the streams under the requested prefix. Each
/// stream's events are served in pages with tokens `p1`, `p2`, ...; reading past the
/// last page returns no events and echoes the token back, as the service does at the
/// end of a stream.
#[derive(Default)]
pub struct FakeLogs {
    query_script: Mutex<VecDeque<QueryResults>>,
    started: Mutex<Vec<StartedQuery>>,
    stream_pages: Vec<Vec<LogStreamSummary>>,
    fail_stream_listing: bool,
    events: HashMap<String, Vec<Vec<LogEvent>>>,
    failing_streams: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeLogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query_script(self, polls: Vec<QueryResults>) -> Self {
        *self.query_script.lock().unwrap() = polls.into();
        self
    }

    pub fn with_stream_pages(mut self, pages: Vec<Vec<&str>>) -> Self {
        self.stream_pages = pages
            .into_iter()
            .map(|page| page.into_iter().map(LogStreamSummary::new).collect())
            .collect();
        self
    }

    pub fn with_stream_events(mut self, stream: &str, pages: Vec<Vec<LogEvent>>) -> Self {
        self.events.insert(stream.to_string(), pages);
        self
    }

    pub fn with_failing_stream(mut self, stream: &str) -> Self {
        self.failing_streams.push(stream.to_string());
        self
    }

    pub fn with_failing_stream_listing(mut self) -> Self {
        self.fail_stream_listing = true;
        self
    }

    pub fn started_queries(&self) -> Vec<StartedQuery> {
        self.started.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn page_index(token: Option<&str>, marker: char) -> Result<usize> {
    match token {
        None => Ok(0),
        Some(token) => token
            .strip_prefix(marker)
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| anyhow!("unexpected token {:?}", token)),
    }
}

#[async_trait]
impl LogsApi for FakeLogs {
    async fn start_query(
        &self,
        log_group_name: &str,
        query_string: &str,
        start: i64,
        end: i64,
    ) -> Result<String> {
        self.record(format!("start_query {}", log_group_name));
        self.started.lock().unwrap().push(StartedQuery {
            log_group: log_group_name.to_string(),
            query: query_string.to_string(),
            start,
            end,
        });
        Ok("query-1".to_string())
    }

    async fn get_query_results(&self, query_id: &str) -> Result<QueryResults> {
        self.record(format!("get_query_results {}", query_id));
        self.query_script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted response for {}", query_id))
    }

    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        prefix: &str,
        next_token: Option<String>,
    ) -> Result<Page<LogStreamSummary>> {
        self.record(format!(
            "describe_log_streams {} {} {:?}",
            log_group_name, prefix, next_token
        ));
        if self.fail_stream_listing {
            return Err(anyhow!("ResourceNotFoundException: log group does not exist"));
        }

        let index = page_index(next_token.as_deref(), 's')?;
        let streams = self
            .stream_pages
            .get(index)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|stream| stream.is_under(prefix))
            .collect();
        let next = (index + 1 < self.stream_pages.len()).then(|| format!("s{}", index + 1));
        Ok(Page::new(streams, next))
    }

    async fn get_log_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        next_token: Option<String>,
    ) -> Result<LogEventsPage> {
        self.record(format!(
            "get_log_events {} {} {:?}",
            log_group_name, log_stream_name, next_token
        ));
        if self.failing_streams.iter().any(|s| s == log_stream_name) {
            return Err(anyhow!("ThrottlingException: rate exceeded"));
        }

        let pages = self.events.get(log_stream_name).cloned().unwrap_or_default();
        let index = page_index(next_token.as_deref(), 'p')?;
        match pages.get(index) {
            Some(events) => Ok(LogEventsPage {
                events: events.clone(),
                next_forward_token: Some(format!("p{}", index + 1)),
            }),
            None => Ok(LogEventsPage {
                events: Vec::new(),
                next_forward_token: Some(format!("p{}", index)),
            }),
        }
    }
}

pub fn awslogs(group: &str, prefix: &str) -> HashMap<String, String> {
    HashMap::from([
        (GROUP_OPTION.to_string(), group.to_string()),
        (STREAM_PREFIX_OPTION.to_string(), prefix.to_string()),
    ])
}

pub fn task_definition(family: &str, revision: i32, containers: Vec<ContainerSpec>) -> TaskDefinition {
    TaskDefinition {
        arn: task_definition_arn(family, revision),
        family: family.to_string(),
        revision,
        containers,
    }
}

pub fn task_definition_arn(family: &str, revision: i32) -> String {
    format!(
        "arn:aws:ecs:us-west-2:123456789012:task-definition/{}:{}",
        family, revision
    )
}

/// ECS double. Running tasks are listed two per page.
#[derive(Default)]
pub struct FakeEcs {
    clusters: Vec<String>,
    families: Vec<String>,
    revisions: HashMap<String, Vec<String>>,
    definitions: HashMap<String, TaskDefinition>,
    running: HashMap<String, Vec<TaskSummary>>,
    describe_batches: Mutex<Vec<usize>>,
    calls: Mutex<Vec<String>>,
}

impl FakeEcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(mut self, arn: &str) -> Self {
        self.clusters.push(arn.to_string());
        self
    }

    /// Register a revision; later revisions of a family are listed first
    pub fn with_task_definition(mut self, definition: TaskDefinition) -> Self {
        if !self.families.contains(&definition.family) {
            self.families.push(definition.family.clone());
        }
        self.revisions
            .entry(definition.family.clone())
            .or_default()
            .insert(0, definition.arn.clone());
        self.definitions.insert(definition.arn.clone(), definition);
        self
    }

    pub fn with_running_task(mut self, cluster: &str, task_arn: &str, definition_arn: &str) -> Self {
        self.running
            .entry(cluster.to_string())
            .or_default()
            .push(TaskSummary {
                task_arn: task_arn.to_string(),
                task_definition_arn: definition_arn.to_string(),
            });
        self
    }

    pub fn describe_batches(&self) -> Vec<usize> {
        self.describe_batches.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EcsApi for FakeEcs {
    async fn list_clusters(&self, next_token: Option<String>) -> Result<Page<String>> {
        self.record(format!("list_clusters {:?}", next_token));
        Ok(Page::last(self.clusters.clone()))
    }

    async fn list_running_tasks(
        &self,
        cluster: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        self.record(format!("list_running_tasks {} {:?}", cluster, next_token));
        let arns: Vec<String> = self
            .running
            .get(cluster)
            .map(|tasks| tasks.iter().map(|t| t.task_arn.clone()).collect())
            .unwrap_or_default();

        let index = page_index(next_token.as_deref(), 't')?;
        let start = index * 2;
        let page: Vec<String> = arns.iter().skip(start).take(2).cloned().collect();
        let next = (start + 2 < arns.len()).then(|| format!("t{}", index + 1));
        Ok(Page::new(page, next))
    }

    async fn describe_tasks(&self, cluster: &str, task_arns: &[String]) -> Result<Vec<TaskSummary>> {
        self.record(format!("describe_tasks {} {}", cluster, task_arns.len()));
        self.describe_batches.lock().unwrap().push(task_arns.len());
        let tasks = self.running.get(cluster).cloned().unwrap_or_default();
        Ok(task_arns
            .iter()
            .filter_map(|arn| tasks.iter().find(|t| &t.task_arn == arn).cloned())
            .collect())
    }

    async fn list_task_definition_families(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        self.record(format!("list_task_definition_families {:?}", next_token));
        Ok(Page::last(self.families.clone()))
    }

    async fn list_task_definitions(
        &self,
        family: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        self.record(format!("list_task_definitions {} {:?}", family, next_token));
        let revisions = self.revisions.get(family).cloned().unwrap_or_default();
        // Always claims another page so that over-fetching shows up in `calls`
        Ok(Page::new(revisions, Some("more".to_string())))
    }

    async fn describe_task_definition(&self, task_definition: &str) -> Result<TaskDefinition> {
        self.record(format!("describe_task_definition {}", task_definition));
        self.definitions
            .get(task_definition)
            .cloned()
            .ok_or_else(|| anyhow!("ClientException: unable to describe {}", task_definition))
    }
}

/// Answers prompts from a fixed list of indices and remembers the prompts it saw
#[derive(Default)]
pub struct ScriptedSelector {
    answers: VecDeque<usize>,
    pub prompts: Vec<(String, Vec<String>)>,
}

impl ScriptedSelector {
    pub fn new(answers: &[usize]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            prompts: Vec::new(),
        }
    }
}

impl Selector for ScriptedSelector {
    fn select_index(&mut self, labels: &[String], prompt: &str) -> Result<usize> {
        self.prompts.push((prompt.to_string(), labels.to_vec()));
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow!("unexpected prompt {:?}", prompt))
    }
}
