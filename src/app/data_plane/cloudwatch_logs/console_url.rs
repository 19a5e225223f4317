//! Deep links into the CloudWatch Logs Insights console.

#![warn(clippy::all, rust_2018_idioms)]

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::time::Duration;

/// Everything except the unreserved characters `-`, `_`, `.` and `~`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encode a value for a URL query component, with spaces written as `+`.
fn encode(value: &str) -> String {
    value
        .split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Build the console URL that opens `query` over `log_group` in Logs Insights,
/// covering the last `lookback` (whole seconds).
pub fn build_console_url(region: &str, log_group: &str, query: &str, lookback: Duration) -> String {
    format!(
        "https://{region}.console.aws.amazon.com/cloudwatch/home?region={region}#logsV2:logs-insights$3FqueryDetail$3D~(end~0~start~-{start}~timeType~'RELATIVE~tz~'UTC~unit~'seconds~editorString~'{query}~source~(~'{group})~lang~'CWLI)",
        region = region,
        start = lookback.as_secs(),
        query = encode(query),
        group = encode(log_group),
    )
}
