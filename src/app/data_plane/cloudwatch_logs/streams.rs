//! Direct log stream retrieval.
//!
//! Reads every stream of a container straight from CloudWatch Logs instead of going
//! through Logs Insights, then merges the events into one time-ordered list.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Result;
use std::io::Write;

use super::api::LogsApi;
use super::types::{LogEvent, LogStreamSummary};
use crate::app::pager::{collect_all, paginate, Page};

/// Lists and reads the log streams of one log group
pub struct StreamRetriever<'a, A: LogsApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: LogsApi + ?Sized> StreamRetriever<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// All streams of `log_group_name` under `prefix` (`<prefix>/...`), in the
    /// order the service returns them (most recent event first).
    pub async fn list_log_streams(
        &self,
        log_group_name: &str,
        prefix: &str,
    ) -> Result<Vec<LogStreamSummary>> {
        let api = self.api;
        let pages = paginate(move |token| api.describe_log_streams(log_group_name, prefix, token));
        collect_all(pages).await
    }

    /// All events of one stream, from its head forward.
    pub async fn get_log_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
    ) -> Result<Vec<LogEvent>> {
        let api = self.api;
        let pages = paginate(move |token| async move {
            let page = api
                .get_log_events(log_group_name, log_stream_name, token)
                .await?;
            Ok::<_, anyhow::Error>(Page::new(page.events, page.next_forward_token))
        });
        collect_all(pages).await
    }

    /// Read every matching stream and merge the events by timestamp.
    ///
    /// Failing to list the streams is an error. Failing to read one stream is logged
    /// and that stream is skipped.
    pub async fn retrieve(&self, log_group_name: &str, prefix: &str) -> Result<Vec<LogEvent>> {
        let streams = self.list_log_streams(log_group_name, prefix).await?;
        log_info!(
            "Found {} log streams in {} with prefix {}",
            streams.len(),
            log_group_name,
            prefix
        );

        let mut events = Vec::new();
        for stream in &streams {
            match self.get_log_events(log_group_name, &stream.name).await {
                Ok(stream_events) => {
                    log_debug!(
                        "Read {} events from {} (last event {})",
                        stream_events.len(),
                        stream.name,
                        stream
                            .last_event_time()
                            .map(|time| time.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
                            .unwrap_or_else(|| "unknown".to_string())
                    );
                    events.extend(stream_events);
                }
                Err(e) => {
                    log_warn!("error fetching logs for stream {}: {:#}", stream.name, e);
                }
            }
        }

        merge_by_timestamp(&mut events);
        Ok(events)
    }
}

/// Stable sort by timestamp; events with equal timestamps keep their order.
pub fn merge_by_timestamp(events: &mut [LogEvent]) {
    events.sort_by_key(|event| event.timestamp);
}

/// Write events as `<RFC3339 timestamp>: <message>`, one per line.
pub fn write_events<W: Write + ?Sized>(sink: &mut W, events: &[LogEvent]) -> Result<()> {
    for event in events {
        writeln!(
            sink,
            "{}: {}",
            event
                .timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            event.message
        )?;
    }
    Ok(())
}
