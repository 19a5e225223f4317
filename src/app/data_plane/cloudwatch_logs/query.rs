//! Logs Insights query construction.

#![warn(clippy::all, rust_2018_idioms)]

/// An immutable Logs Insights query over the streams of one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    fields: Vec<String>,
    stream_prefix: String,
    filter: Option<String>,
}

impl LogQuery {
    /// Create a query; an empty `filter` means no message filter.
    pub fn new(stream_prefix: impl Into<String>, fields: Vec<String>, filter: &str) -> Self {
        Self {
            fields,
            stream_prefix: stream_prefix.into(),
            filter: (!filter.is_empty()).then(|| filter.to_string()),
        }
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Render the query string sent to `StartQuery`.
    pub fn render(&self) -> String {
        build_query(
            &self.stream_prefix,
            &self.fields,
            self.filter.as_deref().unwrap_or(""),
        )
    }
}

/// Build a Logs Insights query string.
///
/// The stream prefix is matched with regex delimiters (`like /prefix/`). The optional
/// message filter is single-quoted with every `'` escaped as `\'`; nothing else is
/// escaped.
pub fn build_query<S: AsRef<str>>(stream_prefix: &str, fields: &[S], filter: &str) -> String {
    let fields = fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    let mut query = format!("fields {} | filter @logStream like /{}/", fields, stream_prefix);

    if !filter.is_empty() {
        let escaped = filter.replace('\'', "\\'");
        query.push_str(&format!(" | filter @message like '{}'", escaped));
    }

    query
}
