//! Logs Insights query execution.
//!
//! A query is submitted once and then polled on a fixed interval until the service
//! reports a terminal state:
//!
//! ```text
//! Submitted ──▶ Running ──▶ Complete (rows)
//!                  │  ▲
//!                  └──┘ any non-terminal status: sleep, poll again
//!                  │
//!                  └────▶ Failed (statistics)
//! ```
//!
//! There is no iteration cap; wrap the call in `tokio::time::timeout` to bound it.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context, Result};
use std::time::Duration;

use super::api::LogsApi;
use super::types::{QueryStatus, ResultRow};
use crate::app::error::ViewerError;

/// Default delay between two `GetQueryResults` polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Time window of a query, in Unix epoch seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// The window ending at `end` and reaching `lookback` into the past
    pub fn ending_at(end: chrono::DateTime<chrono::Utc>, lookback: Duration) -> Result<Self> {
        let lookback = chrono::Duration::from_std(lookback)
            .with_context(|| format!("Lookback duration out of range: {:?}", lookback))?;
        let start = end
            .checked_sub_signed(lookback)
            .with_context(|| format!("Lookback of {} reaches before the earliest date", lookback))?;
        Ok(Self::new(start.timestamp(), end.timestamp()))
    }
}

/// State of one submitted query. Status only moves forward.
#[derive(Debug, Clone)]
pub struct QueryExecution {
    pub query_id: String,
    pub status: QueryStatus,
    pub rows: Vec<ResultRow>,
    pub polls: usize,
}

impl QueryExecution {
    fn submitted(query_id: String) -> Self {
        Self {
            query_id,
            status: QueryStatus::Running,
            rows: Vec::new(),
            polls: 0,
        }
    }

    fn observe(&mut self, status: QueryStatus) {
        debug_assert!(!self.status.is_terminal(), "query already finished");
        self.polls += 1;
        self.status = status;
    }

    pub fn is_complete(&self) -> bool {
        self.status == QueryStatus::Complete
    }
}

/// Drives a Logs Insights query to completion
pub struct QueryExecutor<'a, A: LogsApi + ?Sized> {
    api: &'a A,
    poll_interval: Duration,
}

impl<'a, A: LogsApi + ?Sized> QueryExecutor<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the delay between polls
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run the query and return the rows of the completed execution
    pub async fn query_logs(
        &self,
        log_group_name: &str,
        query_string: &str,
        range: TimeRange,
    ) -> Result<Vec<ResultRow>> {
        let execution = self.execute(log_group_name, query_string, range).await?;
        Ok(execution.rows)
    }

    /// Run the query and return the finished execution
    pub async fn execute(
        &self,
        log_group_name: &str,
        query_string: &str,
        range: TimeRange,
    ) -> Result<QueryExecution> {
        let query_id = self
            .api
            .start_query(log_group_name, query_string, range.start, range.end)
            .await?;
        log_debug!(
            "Started query {} on {} ({}..{}): {}",
            query_id,
            log_group_name,
            range.start,
            range.end,
            query_string
        );

        let mut execution = QueryExecution::submitted(query_id);

        loop {
            let results = self.api.get_query_results(&execution.query_id).await?;
            execution.observe(results.status.clone());
            log_debug!(
                "Query {} poll #{}: {}",
                execution.query_id,
                execution.polls,
                execution.status
            );

            match results.status {
                QueryStatus::Complete => {
                    execution.rows = results.rows;
                    log_info!(
                        "Query {} complete: {} rows, {}",
                        execution.query_id,
                        execution.rows.len(),
                        results.statistics
                    );
                    return Ok(execution);
                }
                QueryStatus::Failed => {
                    return Err(ViewerError::QueryFailed {
                        statistics: results.statistics,
                    }
                    .into());
                }
                QueryStatus::Running | QueryStatus::Other(_) => {
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }
}
