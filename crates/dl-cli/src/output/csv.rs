//! RFC 4180 CSV for result sets: CRLF line endings, header row first,
//! fields quoted only when they contain a comma, quote, CR or LF.

use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use dl_core::responses::ResultSet;

use crate::output::value_to_cell;

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => value_to_cell(other),
    }
}

/// CSV text of a result set. NULL becomes an empty field.
#[must_use]
pub fn to_csv(result: &ResultSet) -> String {
    let mut out = String::new();
    let header = result
        .columns
        .iter()
        .map(|c| escape_field(c))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&header);
    out.push_str("\r\n");
    for row in &result.rows {
        let line = row
            .iter()
            .map(|v| escape_field(&cell(v)))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push_str("\r\n");
    }
    out
}

/// Write a result set as CSV to `path`.
pub fn write_csv(result: &ResultSet, path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, to_csv(result))
        .with_context(|| format!("failed to write CSV to {}", path.display()))
}
