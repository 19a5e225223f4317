//! The CloudWatch Logs operations the viewer depends on.
//!
//! [`CloudWatchLogsClient`](super::client::CloudWatchLogsClient) implements this over
//! the AWS SDK; tests substitute in-memory fakes.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Result;
use async_trait::async_trait;

use super::types::{LogEventsPage, LogStreamSummary, QueryResults};
use crate::app::pager::Page;

#[async_trait]
pub trait LogsApi: Send + Sync {
    /// Submit a Logs Insights query and return its id.
    /// `start` and `end` are Unix epoch seconds.
    async fn start_query(
        &self,
        log_group_name: &str,
        query_string: &str,
        start: i64,
        end: i64,
    ) -> Result<String>;

    /// Poll the status (and, once complete, the rows) of a submitted query.
    async fn get_query_results(&self, query_id: &str) -> Result<QueryResults>;

    /// One page of the streams under `prefix` (`<prefix>/...`),
    /// most recently written first.
    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        prefix: &str,
        next_token: Option<String>,
    ) -> Result<Page<LogStreamSummary>>;

    /// One page of events of a stream, reading forward from its head.
    async fn get_log_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        next_token: Option<String>,
    ) -> Result<LogEventsPage>;
}
