//! CloudWatch Logs Data Types
//!
//! Data structures for Logs Insights query results and direct stream retrieval.

#![warn(clippy::all, rust_2018_idioms)]

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record pointer returned by Logs Insights with every row. Never rendered.
pub const RESERVED_POINTER_FIELD: &str = "@ptr";

/// A single field of a Logs Insights result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultField {
    pub field: String,
    pub value: Option<String>,
}

impl ResultField {
    pub fn new(field: impl Into<String>, value: Option<String>) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }

    /// Whether this is the `@ptr` record pointer
    pub fn is_reserved(&self) -> bool {
        self.field == RESERVED_POINTER_FIELD
    }

    /// Value as rendered in output: absent values become the empty string
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// One row of a Logs Insights result, fields in the order the service returned them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub fields: Vec<ResultField>,
}

impl ResultRow {
    pub fn new(fields: Vec<ResultField>) -> Self {
        Self { fields }
    }

    /// Fields that may appear in rendered output, in source order
    pub fn visible_fields(&self) -> impl Iterator<Item = &ResultField> {
        self.fields.iter().filter(|field| !field.is_reserved())
    }
}

impl FromIterator<ResultField> for ResultRow {
    fn from_iter<I: IntoIterator<Item = ResultField>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Status of a Logs Insights query as seen by the poller.
///
/// Only `Complete` and `Failed` are terminal here; every other service status
/// keeps the poll loop going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Running,
    Complete,
    Failed,
    Other(String),
}

impl QueryStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueryStatus::Complete | QueryStatus::Failed)
    }
}

impl From<&str> for QueryStatus {
    fn from(status: &str) -> Self {
        match status {
            "Scheduled" | "Running" => QueryStatus::Running,
            "Complete" => QueryStatus::Complete,
            "Failed" => QueryStatus::Failed,
            other => QueryStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStatus::Running => write!(f, "Running"),
            QueryStatus::Complete => write!(f, "Complete"),
            QueryStatus::Failed => write!(f, "Failed"),
            QueryStatus::Other(status) => write!(f, "{}", status),
        }
    }
}

/// Response of one `GetQueryResults` poll
#[derive(Debug, Clone)]
pub struct QueryResults {
    pub status: QueryStatus,
    pub rows: Vec<ResultRow>,
    pub statistics: QueryStatistics,
}

impl QueryResults {
    pub fn new(status: QueryStatus, rows: Vec<ResultRow>, statistics: QueryStatistics) -> Self {
        Self {
            status,
            rows,
            statistics,
        }
    }
}

/// A log stream returned by `DescribeLogStreams`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStreamSummary {
    pub name: String,
    /// Last event time (Unix milliseconds), if the stream has events
    pub last_event_timestamp: Option<i64>,
}

impl LogStreamSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_event_timestamp: None,
        }
    }

    /// Time of the last event written to the stream
    pub fn last_event_time(&self) -> Option<DateTime<Utc>> {
        self.last_event_timestamp
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    /// Whether the stream is `<prefix>/...`. A sibling such as `<prefix>-sidecar/...`
    /// is not in scope.
    pub fn is_under(&self, prefix: &str) -> bool {
        self.name
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// A single log event read directly from a stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    /// Name of the log stream this event belongs to
    pub log_stream_name: String,
    pub message: String,
}

impl LogEvent {
    pub fn new(timestamp: DateTime<Utc>, log_stream_name: String, message: String) -> Self {
        Self {
            timestamp,
            log_stream_name,
            message,
        }
    }

    /// Build an event from a Unix millisecond timestamp as reported by the service.
    /// Out-of-range values fall back to the epoch.
    pub fn from_millis(timestamp_ms: i64, log_stream_name: String, message: String) -> Self {
        let timestamp = Utc
            .timestamp_millis_opt(timestamp_ms)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Self::new(timestamp, log_stream_name, message)
    }
}

/// One page of `GetLogEvents`
#[derive(Debug, Clone, Default)]
pub struct LogEventsPage {
    pub events: Vec<LogEvent>,
    pub next_forward_token: Option<String>,
}

/// Statistics about a CloudWatch Logs query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStatistics {
    /// Bytes scanned during the query
    pub bytes_scanned: f64,
    /// Number of records that matched the filter
    pub records_matched: f64,
    /// Total number of records scanned
    pub records_scanned: f64,
}

impl QueryStatistics {
    pub fn new(bytes_scanned: f64, records_matched: f64, records_scanned: f64) -> Self {
        Self {
            bytes_scanned,
            records_matched,
            records_scanned,
        }
    }
}

impl fmt::Display for QueryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{bytes scanned: {}, records matched: {}, records scanned: {}}}",
            self.bytes_scanned, self.records_matched, self.records_scanned
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_fields_skip_pointer() {
        let row: ResultRow = vec![
            ResultField::new("@timestamp", Some("t".to_string())),
            ResultField::new(RESERVED_POINTER_FIELD, Some("ptr".to_string())),
            ResultField::new("@message", None),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = row.visible_fields().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["@timestamp", "@message"]);
    }

    #[test]
    fn test_query_status_mapping() {
        assert_eq!(QueryStatus::from("Scheduled"), QueryStatus::Running);
        assert_eq!(QueryStatus::from("Complete"), QueryStatus::Complete);
        assert_eq!(QueryStatus::from("Failed"), QueryStatus::Failed);
        assert_eq!(
            QueryStatus::from("Cancelled"),
            QueryStatus::Other("Cancelled".to_string())
        );
        assert!(!QueryStatus::from("Timeout").is_terminal());
    }

    #[test]
    fn test_log_event_from_millis() {
        let event = LogEvent::from_millis(
            1_739_664_000_000,
            "web/app/1".to_string(),
            "hello".to_string(),
        );

        assert_eq!(event.timestamp.to_rfc3339(), "2025-02-16T00:00:00+00:00");
        assert_eq!(event.log_stream_name, "web/app/1");
    }

    #[test]
    fn test_stream_scope_stops_at_a_path_segment() {
        let prefix = "web/app";

        assert!(LogStreamSummary::new("web/app/3f2c").is_under(prefix));
        assert!(!LogStreamSummary::new("web/app-sidecar/3f2c").is_under(prefix));
        assert!(!LogStreamSummary::new("web/app").is_under(prefix));
        assert!(!LogStreamSummary::new("mesh/app/3f2c").is_under(prefix));
    }

    #[test]
    fn test_stream_last_event_time() {
        let stream = LogStreamSummary {
            name: "web/app/1".to_string(),
            last_event_timestamp: Some(1_739_664_000_000),
        };
        assert_eq!(
            stream.last_event_time().map(|time| time.to_rfc3339()),
            Some("2025-02-16T00:00:00+00:00".to_string())
        );
        assert_eq!(LogStreamSummary::new("web/app/2").last_event_time(), None);
    }

    #[test]
    fn test_statistics_display() {
        let stats = QueryStatistics::new(1024.0, 3.0, 10.0);
        assert_eq!(
            stats.to_string(),
            "{bytes scanned: 1024, records matched: 3, records scanned: 10}"
        );
    }
}
