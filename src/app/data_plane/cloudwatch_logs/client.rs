//! CloudWatch Logs Client Wrapper
//!
//! Implements [`LogsApi`] over the AWS SDK. Each call maps one request/response pair
//! and leaves pagination to the caller.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_cloudwatchlogs as cloudwatchlogs;
use aws_types::SdkConfig;

use super::api::LogsApi;
use super::types::{
    LogEvent, LogEventsPage, LogStreamSummary, QueryResults, QueryStatistics, QueryStatus,
    ResultField, ResultRow,
};
use crate::app::pager::Page;

/// CloudWatch Logs client wrapper
#[derive(Clone)]
pub struct CloudWatchLogsClient {
    client: cloudwatchlogs::Client,
}

impl CloudWatchLogsClient {
    /// Create a new CloudWatch Logs client from a loaded AWS config
    pub fn new(aws_config: &SdkConfig) -> Self {
        Self {
            client: cloudwatchlogs::Client::new(aws_config),
        }
    }

    fn convert_row(fields: Vec<cloudwatchlogs::types::ResultField>) -> ResultRow {
        fields
            .into_iter()
            .map(|field| ResultField::new(field.field.unwrap_or_default(), field.value))
            .collect()
    }

    fn convert_statistics(
        statistics: Option<&cloudwatchlogs::types::QueryStatistics>,
    ) -> QueryStatistics {
        statistics
            .map(|stats| {
                QueryStatistics::new(
                    stats.bytes_scanned(),
                    stats.records_matched(),
                    stats.records_scanned(),
                )
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl LogsApi for CloudWatchLogsClient {
    async fn start_query(
        &self,
        log_group_name: &str,
        query_string: &str,
        start: i64,
        end: i64,
    ) -> Result<String> {
        let response = self
            .client
            .start_query()
            .log_group_name(log_group_name)
            .query_string(query_string)
            .start_time(start)
            .end_time(end)
            .send()
            .await
            .with_context(|| format!("Failed to start query on log group: {}", log_group_name))?;

        response
            .query_id
            .ok_or_else(|| anyhow::anyhow!("StartQuery returned no query id"))
    }

    async fn get_query_results(&self, query_id: &str) -> Result<QueryResults> {
        let response = self
            .client
            .get_query_results()
            .query_id(query_id)
            .send()
            .await
            .with_context(|| format!("Failed to get results of query: {}", query_id))?;

        let status = response
            .status
            .as_ref()
            .map(|status| QueryStatus::from(status.as_str()))
            .unwrap_or_else(|| QueryStatus::Other("Unknown".to_string()));
        let statistics = Self::convert_statistics(response.statistics.as_ref());
        let rows = response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Self::convert_row)
            .collect();

        Ok(QueryResults::new(status, rows, statistics))
    }

    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        prefix: &str,
        next_token: Option<String>,
    ) -> Result<Page<LogStreamSummary>> {
        // The service rejects a name prefix combined with LastEventTime ordering,
        // so the prefix is applied to each page here, keeping the service order.
        let response = self
            .client
            .describe_log_streams()
            .log_group_name(log_group_name)
            .order_by(cloudwatchlogs::types::OrderBy::LastEventTime)
            .descending(true)
            .set_next_token(next_token)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to list log streams for log group: {}",
                    log_group_name
                )
            })?;

        let streams = response
            .log_streams
            .unwrap_or_default()
            .into_iter()
            .filter_map(|stream| {
                Some(LogStreamSummary {
                    name: stream.log_stream_name?,
                    last_event_timestamp: stream.last_event_timestamp,
                })
            })
            .filter(|stream| stream.is_under(prefix))
            .collect();

        Ok(Page::new(streams, response.next_token))
    }

    async fn get_log_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        next_token: Option<String>,
    ) -> Result<LogEventsPage> {
        let response = self
            .client
            .get_log_events()
            .log_group_name(log_group_name)
            .log_stream_name(log_stream_name)
            .start_from_head(true)
            .set_next_token(next_token)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to get log events from stream {} in log group {}",
                    log_stream_name, log_group_name
                )
            })?;

        let events = response
            .events
            .unwrap_or_default()
            .into_iter()
            .map(|event| {
                LogEvent::from_millis(
                    event.timestamp.unwrap_or(0),
                    log_stream_name.to_string(),
                    event.message.unwrap_or_default(),
                )
            })
            .collect();

        Ok(LogEventsPage {
            events,
            next_forward_token: response.next_forward_token,
        })
    }
}
