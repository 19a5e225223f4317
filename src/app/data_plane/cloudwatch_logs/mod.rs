//! CloudWatch Logs Integration Module
//!
//! The log query & result pipeline of the viewer.
//!
//! ## Features
//!
//! - Logs Insights query construction ([`query`]) and execution ([`executor`])
//! - Direct stream retrieval with a time-ordered merge ([`streams`])
//! - Result rendering as simple lines, CSV or JSON ([`writer`])
//! - Console deep links for opening a query in the browser ([`console_url`])
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ecslogs::app::data_plane::cloudwatch_logs::{
//!     build_query, write_results, CloudWatchLogsClient, OutputFormat, QueryExecutor, TimeRange,
//! };
//!
//! # async fn example(aws_config: &aws_types::SdkConfig) -> anyhow::Result<()> {
//! let client = CloudWatchLogsClient::new(aws_config);
//! let query = build_query("web/app", &["@timestamp", "@message"], "ERROR");
//! let range = TimeRange::ending_at(chrono::Utc::now(), std::time::Duration::from_secs(3600))?;
//!
//! let rows = QueryExecutor::new(&client)
//!     .query_logs("/ecs/app", &query, range)
//!     .await?;
//!
//! write_results(&mut std::io::stdout(), &rows, OutputFormat::Csv, true)?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod api;
pub mod client;
pub mod console_url;
pub mod executor;
pub mod query;
pub mod streams;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use api::LogsApi;
pub use client::CloudWatchLogsClient;
pub use console_url::build_console_url;
pub use executor::{QueryExecution, QueryExecutor, TimeRange, DEFAULT_POLL_INTERVAL};
pub use query::{build_query, LogQuery};
pub use streams::{merge_by_timestamp, write_events, StreamRetriever};
pub use types::{
    LogEvent, LogEventsPage, LogStreamSummary, QueryResults, QueryStatistics, QueryStatus,
    ResultField, ResultRow, RESERVED_POINTER_FIELD,
};
pub use writer::{write_results, OutputFormat};
