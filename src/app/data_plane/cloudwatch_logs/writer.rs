//! Rendering of Logs Insights result rows.
//!
//! All three formats drop the `@ptr` field, keep the service's field order where the
//! format has one, and write nothing at all for an empty result.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use super::types::ResultRow;
use crate::app::error::ViewerError;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One value per line; only valid when a single field is selected
    #[default]
    Simple,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Simple => "simple",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(OutputFormat::Simple),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(ViewerError::InvalidOutputFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write result rows to `sink` in the given format.
///
/// `write_header` only affects CSV.
pub fn write_results<W: Write>(
    sink: &mut W,
    rows: &[ResultRow],
    format: OutputFormat,
    write_header: bool,
) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    match format {
        OutputFormat::Simple => write_simple(sink, rows),
        OutputFormat::Csv => write_csv(sink, rows, write_header),
        OutputFormat::Json => write_json(sink, rows),
    }
}

/// One line per row holding the first non-`@ptr` value (empty if absent).
pub fn write_simple<W: Write>(sink: &mut W, rows: &[ResultRow]) -> Result<()> {
    for row in rows {
        let value = row
            .visible_fields()
            .next()
            .map(|field| field.value_or_empty())
            .unwrap_or("");
        writeln!(sink, "{}", value)?;
    }
    Ok(())
}

/// CSV with columns taken from the first row.
///
/// Later rows are laid out positionally against those columns; fields past the
/// last column are dropped.
pub fn write_csv<W: Write>(sink: &mut W, rows: &[ResultRow], write_header: bool) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };

    let headers: Vec<&str> = first
        .visible_fields()
        .map(|field| field.field.as_str())
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(sink);

    if write_header {
        writer.write_record(&headers)?;
    }

    for row in rows {
        let mut record = vec![""; headers.len()];
        for (cell, field) in record.iter_mut().zip(row.visible_fields()) {
            *cell = field.value_or_empty();
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// A pretty-printed JSON array of `{field: value}` objects, keys sorted.
pub fn write_json<W: Write>(sink: &mut W, rows: &[ResultRow]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let records: Vec<BTreeMap<&str, &str>> = rows
        .iter()
        .map(|row| {
            row.visible_fields()
                .map(|field| (field.field.as_str(), field.value_or_empty()))
                .collect()
        })
        .collect();

    serde_json::to_writer_pretty(&mut *sink, &records)?;
    writeln!(sink)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::data_plane::cloudwatch_logs::types::{ResultField, RESERVED_POINTER_FIELD};
    use pretty_assertions::assert_eq;

    fn row(fields: &[(&str, Option<&str>)]) -> ResultRow {
        fields
            .iter()
            .map(|(name, value)| ResultField::new(*name, value.map(str::to_string)))
            .collect()
    }

    fn render(rows: &[ResultRow], format: OutputFormat, header: bool) -> String {
        let mut out = Vec::new();
        write_results(&mut out, rows, format, header).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_rows_write_nothing() {
        for format in [OutputFormat::Simple, OutputFormat::Csv, OutputFormat::Json] {
            assert_eq!(render(&[], format, true), "");
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert!(matches!(
            "CSV".parse::<OutputFormat>(),
            Err(ViewerError::InvalidOutputFormat(f)) if f == "CSV"
        ));
    }

    #[test]
    fn test_simple_skips_pointer_and_renders_absent_as_blank() {
        let rows = vec![
            row(&[(RESERVED_POINTER_FIELD, Some("p1")), ("@message", Some("log message 1"))]),
            row(&[("@message", None), (RESERVED_POINTER_FIELD, Some("p2"))]),
            row(&[("@message", Some("log message 2"))]),
        ];

        assert_eq!(
            render(&rows, OutputFormat::Simple, true),
            "log message 1\n\nlog message 2\n"
        );
    }

    #[test]
    fn test_csv_with_header() {
        let rows = vec![
            row(&[("time", Some("2025-02-16T00:00:00Z")), ("level", Some("INFO"))]),
            row(&[("time", Some("2025-02-16T00:00:01Z")), ("level", Some("WARN"))]),
        ];

        assert_eq!(
            render(&rows, OutputFormat::Csv, true),
            "time,level\n2025-02-16T00:00:00Z,INFO\n2025-02-16T00:00:01Z,WARN\n"
        );
    }

    #[test]
    fn test_csv_header_excludes_pointer() {
        let rows = vec![row(&[
            ("time", Some("t")),
            (RESERVED_POINTER_FIELD, Some("ptr")),
            ("level", None),
        ])];

        assert_eq!(render(&rows, OutputFormat::Csv, true), "time,level\nt,\n");
    }

    #[test]
    fn test_csv_without_header() {
        let rows = vec![row(&[
            ("time", Some("2025-02-16T00:00:00Z")),
            ("level", Some("INFO")),
        ])];

        assert_eq!(
            render(&rows, OutputFormat::Csv, false),
            "2025-02-16T00:00:00Z,INFO\n"
        );
    }

    #[test]
    fn test_csv_quotes_json_value() {
        let rows = vec![row(&[
            ("time", Some("2025-02-16T00:00:00Z")),
            ("message", Some(r#"{"key": "value"}"#)),
        ])];

        assert_eq!(
            render(&rows, OutputFormat::Csv, false),
            "2025-02-16T00:00:00Z,\"{\"\"key\"\": \"\"value\"\"}\"\n"
        );
    }

    #[test]
    fn test_csv_quotes_delimiters_and_newlines() {
        let rows = vec![row(&[("a", Some("x,y")), ("b", Some("line1\nline2"))])];

        assert_eq!(
            render(&rows, OutputFormat::Csv, false),
            "\"x,y\",\"line1\nline2\"\n"
        );
    }

    #[test]
    fn test_json_sorted_keys_and_indent() {
        let rows = vec![row(&[
            ("time", Some("2025-02-16T00:00:00Z")),
            ("level", Some("INFO")),
            ("message", Some("test message")),
        ])];

        assert_eq!(
            render(&rows, OutputFormat::Json, true),
            "[\n  {\n    \"level\": \"INFO\",\n    \"message\": \"test message\",\n    \"time\": \"2025-02-16T00:00:00Z\"\n  }\n]\n"
        );
    }

    #[test]
    fn test_json_excludes_pointer_and_keeps_absent_keys() {
        let rows = vec![
            row(&[(RESERVED_POINTER_FIELD, Some("ptr")), ("@message", None)]),
            row(&[("@message", Some("second"))]),
        ];

        let value: serde_json::Value =
            serde_json::from_str(&render(&rows, OutputFormat::Json, true)).unwrap();

        assert_eq!(
            value,
            serde_json::json!([{ "@message": "" }, { "@message": "second" }])
        );
    }

    #[test]
    fn test_json_nested_value_stays_a_string() {
        let rows = vec![row(&[
            ("time", Some("2025-02-16T00:00:00Z")),
            ("data", Some(r#"{"key":"value","nested":{"foo":"bar"}}"#)),
        ])];

        assert_eq!(
            render(&rows, OutputFormat::Json, true),
            "[\n  {\n    \"data\": \"{\\\"key\\\":\\\"value\\\",\\\"nested\\\":{\\\"foo\\\":\\\"bar\\\"}}\",\n    \"time\": \"2025-02-16T00:00:00Z\"\n  }\n]\n"
        );
    }
}
