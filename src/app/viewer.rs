//! The viewer flow: find the container, then fetch its logs.
//!
//! [`resolve_target`] walks ECS (prompting where the options leave a choice open)
//! down to one container's awslogs configuration. [`retrieve`] then produces the
//! logs in the requested mode. Writing the result and opening the browser are left
//! to the caller.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;

use crate::app::config::{AppOptions, Mode};
use crate::app::data_plane::cloudwatch_logs::{
    build_console_url, write_events, write_results, LogEvent, LogQuery, LogsApi, OutputFormat,
    QueryExecutor, ResultRow, StreamRetriever, TimeRange,
};
use crate::app::error::ViewerError;
use crate::app::resource_discovery::{
    ContainerSpec, EcsApi, EcsDiscovery, LogConfiguration, TaskDefinition, TaskDefinitionFamily,
};
use crate::app::selector::{select_item, Selectable, Selector};

/// The container whose logs are read, and where they live
#[derive(Debug, Clone)]
pub struct LogTarget {
    pub task_definition: TaskDefinition,
    pub container: ContainerSpec,
    pub log_group: String,
    /// Stream prefix narrowed to the container (`<awslogs-stream-prefix>/<container>`)
    pub stream_prefix: String,
}

/// Retrieved logs, ready to be written
#[derive(Debug, Clone)]
pub enum LogOutput {
    Rows(Vec<ResultRow>),
    Events(Vec<LogEvent>),
    ConsoleUrl(String),
}

impl LogOutput {
    pub fn is_empty(&self) -> bool {
        match self {
            LogOutput::Rows(rows) => rows.is_empty(),
            LogOutput::Events(events) => events.is_empty(),
            LogOutput::ConsoleUrl(_) => false,
        }
    }

    /// Write rows in `format`, events as timestamped lines, or the console URL
    pub fn write_to<W: Write>(
        &self,
        sink: &mut W,
        format: OutputFormat,
        write_header: bool,
    ) -> Result<()> {
        match self {
            LogOutput::Rows(rows) => write_results(sink, rows, format, write_header),
            LogOutput::Events(events) => write_events(sink, events),
            LogOutput::ConsoleUrl(url) => {
                writeln!(sink, "{}", url)?;
                Ok(())
            }
        }
    }
}

fn format_epoch(seconds: i64) -> String {
    DateTime::from_timestamp(seconds, 0)
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| seconds.to_string())
}

/// Pick from `items`, skipping the prompt when there is only one choice
fn choose<'a, T, S>(selector: &mut S, items: &'a [T], prompt: &str) -> Result<&'a T>
where
    T: Selectable,
    S: Selector + ?Sized,
{
    if let [only] = items {
        log_info!("Using {} (only choice)", only.label());
        return Ok(only);
    }
    select_item(selector, items, prompt)
}

async fn select_task_definition<E, S>(
    discovery: &EcsDiscovery<'_, E>,
    selector: &mut S,
    options: &AppOptions,
) -> Result<TaskDefinition>
where
    E: EcsApi + ?Sized,
    S: Selector + ?Sized,
{
    if let Some(cluster) = &options.cluster {
        let definitions = discovery.running_task_definitions(cluster).await?;
        let chosen = choose(selector, &definitions, "Select Task Definition > ")?;
        return discovery.describe_task_definition(&chosen.arn).await;
    }

    let family = match &options.taskdef {
        Some(name) => TaskDefinitionFamily::new(name.clone()),
        None => {
            let families = discovery.list_task_definition_families().await?;
            if families.is_empty() {
                return Err(ViewerError::NoTaskDefinitionFamilies.into());
            }
            select_item(selector, &families, "Select Task Definition Family > ")?.clone()
        }
    };

    discovery.latest_task_definition(&family).await
}

/// Find the container to read and its log configuration
pub async fn resolve_target<E, S>(
    ecs: &E,
    selector: &mut S,
    options: &AppOptions,
) -> Result<LogTarget>
where
    E: EcsApi + ?Sized,
    S: Selector + ?Sized,
{
    let discovery = EcsDiscovery::new(ecs);
    let task_definition = select_task_definition(&discovery, selector, options).await?;
    log_info!(
        "Selected Task Definition: {} (revision {})",
        task_definition.family,
        task_definition.revision
    );

    let container = match &options.container {
        Some(name) => task_definition.find_container(name)?.clone(),
        None => {
            if task_definition.containers.is_empty() {
                return Err(anyhow::anyhow!(
                    "no container definitions found in task definition {}",
                    task_definition.arn
                ));
            }
            select_item(
                selector,
                &task_definition.containers,
                "Select Container Definition > ",
            )?
            .clone()
        }
    };
    log_info!("Selected Container: {}", container.name);

    let log_configuration = LogConfiguration::from_container(&container)?;
    let stream_prefix = log_configuration.container_stream_prefix(&container.name);

    Ok(LogTarget {
        log_group: log_configuration.log_group,
        stream_prefix,
        container,
        task_definition,
    })
}

/// Fetch the target's logs in the mode the options ask for.
///
/// `region` is only used to build the console URL.
pub async fn retrieve<L>(
    logs: &L,
    target: &LogTarget,
    options: &AppOptions,
    region: &str,
    now: DateTime<Utc>,
) -> Result<LogOutput>
where
    L: LogsApi + ?Sized,
{
    let range = TimeRange::ending_at(now, options.duration)?;
    log_info!(
        "Fetching logs from log group: {}, stream prefix: {}",
        target.log_group,
        target.stream_prefix
    );

    let query = LogQuery::new(
        target.stream_prefix.clone(),
        options.fields.clone(),
        &options.filter,
    )
    .render();

    match options.mode {
        Mode::Web => {
            let url = build_console_url(region, &target.log_group, &query, options.duration);
            log_info!("Opening AWS Console URL: {}", url);
            Ok(LogOutput::ConsoleUrl(url))
        }
        Mode::Direct => {
            if !options.filter.is_empty() {
                log_warn!("--filter is ignored when reading streams directly");
            }
            let events = StreamRetriever::new(logs)
                .retrieve(&target.log_group, &target.stream_prefix)
                .await?;
            Ok(LogOutput::Events(events))
        }
        Mode::Query => {
            log_info!(
                "Time range: {} to {}",
                format_epoch(range.start),
                format_epoch(range.end)
            );
            let rows = QueryExecutor::new(logs)
                .with_poll_interval(options.poll_interval)
                .query_logs(&target.log_group, &query, range)
                .await?;
            Ok(LogOutput::Rows(rows))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::data_plane::cloudwatch_logs::ResultField;

    #[test]
    fn test_empty_output_detection() {
        assert!(LogOutput::Rows(vec![]).is_empty());
        assert!(LogOutput::Events(vec![]).is_empty());
        assert!(!LogOutput::ConsoleUrl("https://example".to_string()).is_empty());
    }

    #[test]
    fn test_rows_written_in_requested_format() {
        let output = LogOutput::Rows(vec![ResultRow::new(vec![
            ResultField::new("@timestamp", Some("t1".to_string())),
            ResultField::new("@message", Some("hello".to_string())),
        ])]);
        let mut sink = Vec::new();

        output.write_to(&mut sink, OutputFormat::Csv, true).unwrap();

        assert_eq!(String::from_utf8(sink).unwrap(), "@timestamp,@message\nt1,hello\n");
    }
}
