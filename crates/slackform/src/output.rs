//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
        structured => render_structured(structured, data),
    }
}

/// Render a single item. Table rendering uses `detail_fn`.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Plain => Ok(id_fn(data)),
        structured => render_structured(structured, data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_structured<T: serde::Serialize + ?Sized>(
    format: &OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    match format {
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => serde_yaml::to_string(data)
            .map_err(|e| CliError::Internal(format!("YAML serialization failed: {e}"))),
        _ => Ok(serde_json::to_string_pretty(data)?),
    }
}

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Field/value detail view ──────────────────────────────────────────

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Compact one-cell rendering of a JSON value.
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".into(),
        Value::String(s) if s.is_empty() => "\"\"".into(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Unix seconds as a UTC datetime; anything else falls back to `cell`.
fn timestamp_cell(value: &Value) -> String {
    value
        .as_i64()
        .filter(|secs| *secs > 0)
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map_or_else(
            || cell(value),
            |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )
}

/// Two-column table of `id` followed by every field.
pub fn detail_table<'a>(
    id: &str,
    fields: impl IntoIterator<Item = (&'a String, &'a Value)>,
    color: bool,
) -> String {
    let id_cell = match (id.is_empty(), color) {
        (true, true) => "(absent)".dimmed().to_string(),
        (true, false) => "(absent)".into(),
        (false, true) => id.bold().to_string(),
        (false, false) => id.to_owned(),
    };

    let rows: Vec<FieldRow> = std::iter::once(FieldRow {
        field: "id".into(),
        value: id_cell,
    })
    .chain(fields.into_iter().map(|(k, v)| FieldRow {
        field: k.clone(),
        value: if k == "created" {
            timestamp_cell(v)
        } else {
            cell(v)
        },
    }))
    .collect();

    render_table(&rows)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn cell_flattens_lists_and_marks_empty_strings() {
        assert_eq!(cell(&json!(["C1", "C2"])), "C1, C2");
        assert_eq!(cell(&json!("")), "\"\"");
        assert_eq!(cell(&json!(null)), "-");
        assert_eq!(cell(&json!(true)), "true");
    }

    #[test]
    fn created_renders_as_utc_datetime() {
        assert_eq!(timestamp_cell(&json!(1_700_000_000)), "2023-11-14 22:13:20 UTC");
        assert_eq!(timestamp_cell(&json!(0)), "0");
    }

    #[test]
    fn detail_table_marks_absent_identity() {
        let fields = std::collections::BTreeMap::from([("name".to_owned(), json!("general"))]);
        let table = detail_table("", &fields, false);

        assert!(table.contains("(absent)"), "{table}");
        assert!(table.contains("general"), "{table}");
    }
}
