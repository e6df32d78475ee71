//! Rendering of command results.
//!
//! Every renderer returns a `String`; printing is left to the caller.
//! [`OutputFormat::Rich`] draws tables with `comfy-table`, the other formats
//! are plain text or machine-readable documents.

use colored::{ColoredString, Colorize};
use comfy_table::{
    Attribute, Cell, Color, ContentArrangement, Table,
    presets::{NOTHING, UTF8_FULL}
};
use csv::{Terminator, WriterBuilder};
use serde::Serialize;
use serde_json::{Value, json};

use crate::{
    lint::LintResult,
    query::{DryRunOutcome, QueryOutcome, format_bytes},
    schema::{FlatField, SchemaDiff, SchemaField, TableSchema}
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tables and colored summaries
    #[default]
    Rich,
    /// Plain line-oriented text
    Text,
    Json,
    Csv,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Rich,
            colored: true
        }
    }
}

impl OutputOptions {
    pub fn new(format: OutputFormat, colored: bool) -> Self {
        Self {
            format,
            colored
        }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.colored {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !self.colored {
            table.force_no_tty();
        }
        table
    }

    fn header(&self, names: &[&str]) -> Vec<Cell> {
        names
            .iter()
            .map(|name| {
                Cell::new(name)
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Cyan)
            })
            .collect()
    }
}

/// Render query results, showing at most `limit` rows.
pub fn format_query_result(outcome: &QueryOutcome, limit: usize, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => to_json(&outcome.records(limit)),
        OutputFormat::Yaml => to_yaml(&outcome.records(limit)),
        OutputFormat::Csv => format_csv(outcome, limit),
        OutputFormat::Rich | OutputFormat::Text => {
            let mut out = String::new();
            if outcome.rows.is_empty() {
                out.push_str(&opts.paint(
                    "Query executed successfully but returned no results.",
                    |s| s.yellow()
                ));
                out.push('\n');
            } else {
                let shown = limit.min(outcome.rows.len());
                out.push_str(&opts.paint(
                    &format!(
                        "Query Results (showing {} of {} rows)",
                        shown, outcome.rows_returned
                    ),
                    |s| s.bold()
                ));
                out.push('\n');
                let mut table = opts.table();
                let columns: Vec<&str> = outcome.columns.iter().map(String::as_str).collect();
                table.set_header(opts.header(&columns));
                for row in outcome.rows.iter().take(limit) {
                    table.add_row(row.iter().map(display_value).collect::<Vec<_>>());
                }
                out.push_str(&table.to_string());
                out.push('\n');
            }
            let check = opts.paint("✓", |s| s.green());
            out.push_str(&format!(
                "{} Execution time: {:.2} seconds\n",
                check, outcome.execution_time
            ));
            out.push_str(&format!(
                "{} Bytes processed: {}\n",
                check,
                format_bytes(outcome.bytes_processed)
            ));
            out.push_str(&format!(
                "{} Estimated cost: ${:.5}",
                check,
                outcome.estimated_cost()
            ));
            if !outcome.rows.is_empty() {
                out.push_str(&format!(
                    "\n{} Rows returned: {}",
                    check, outcome.rows_returned
                ));
            }
            out
        }
    }
}

/// Render a dry run result.
pub fn format_dry_run(outcome: &DryRunOutcome, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => to_json(outcome),
        OutputFormat::Yaml => to_yaml(outcome),
        _ => {
            let mut out = opts.paint("Dry Run Results", |s| s.bold());
            out.push('\n');
            if outcome.valid {
                out.push_str(&opts.paint("✓ Query valid", |s| s.green()));
                out.push_str(&format!(
                    "\nBytes to be processed: {}\nEstimated cost: {}",
                    opts.paint(&format_bytes(outcome.bytes_to_be_processed), |s| s.yellow()),
                    opts.paint(&format!("${:.5}", outcome.estimated_cost), |s| s.yellow())
                ));
            } else {
                out.push_str(&opts.paint("✗ Query invalid", |s| s.red()));
                out.push_str(&format!(
                    "\nError: {}",
                    outcome.error.as_deref().unwrap_or("unknown error")
                ));
            }
            out
        }
    }
}

/// Render a table schema.
///
/// `detailed` adds descriptions and nested fields.
pub fn format_schema(schema: &TableSchema, detailed: bool, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => to_json(&schema_document(schema, detailed)),
        OutputFormat::Yaml => to_yaml(&schema_document(schema, detailed)),
        _ => {
            let mut out = opts.paint(&format!("Schema for {}", schema.table_id), |s| s.bold());
            out.push('\n');
            let mut table = opts.table();
            let fields: Vec<FlatField> = if detailed {
                schema.flattened_fields()
            } else {
                schema
                    .fields
                    .iter()
                    .map(|f| FlatField {
                        name:        f.name.clone(),
                        field_type:  f.field_type.clone(),
                        mode:        f.mode().to_string(),
                        description: f.description.clone()
                    })
                    .collect()
            };
            if detailed {
                table.set_header(opts.header(&["Name", "Type", "Mode", "Description"]));
            } else {
                table.set_header(opts.header(&["Name", "Type", "Mode"]));
            }
            for field in &fields {
                let mut row = vec![
                    Cell::new(&field.name).fg(Color::Cyan),
                    Cell::new(&field.field_type).fg(Color::Green),
                    Cell::new(&field.mode).fg(Color::Yellow),
                ];
                if detailed {
                    row.push(Cell::new(field.description.as_deref().unwrap_or("")));
                }
                table.add_row(row);
            }
            out.push_str(&table.to_string());
            out.push('\n');
            out.push_str(&opts.paint("Table Info:", |s| s.bold()));
            out.push_str(&format!(
                "\n  Created: {}\n  Last modified: {}\n  Rows: {}\n  Size: {} bytes",
                schema
                    .created
                    .map_or_else(|| String::from("Unknown"), |t| t.to_rfc3339()),
                schema
                    .modified
                    .map_or_else(|| String::from("Unknown"), |t| t.to_rfc3339()),
                group_thousands(schema.num_rows.unwrap_or(0)),
                group_thousands(schema.num_bytes.unwrap_or(0))
            ));
            out
        }
    }
}

fn schema_document(schema: &TableSchema, detailed: bool) -> Value {
    let fields: Vec<Value> = if detailed {
        schema.fields.iter().map(field_document).collect()
    } else {
        schema
            .fields
            .iter()
            .map(|f| json!({"name": f.name, "type": f.field_type, "mode": f.mode()}))
            .collect()
    };
    json!({
        "table_id": schema.table_id,
        "created": schema.created.map(|t| t.to_rfc3339()),
        "modified": schema.modified.map(|t| t.to_rfc3339()),
        "num_rows": schema.num_rows,
        "num_bytes": schema.num_bytes,
        "schema": fields
    })
}

fn field_document(field: &SchemaField) -> Value {
    let nested: Vec<Value> = field.fields.iter().map(field_document).collect();
    json!({
        "name": field.name,
        "type": field.field_type,
        "mode": field.mode(),
        "description": field.description,
        "fields": if nested.is_empty() { Value::Null } else { Value::Array(nested) }
    })
}

/// Render a schema diff.
pub fn format_diff(diff: &SchemaDiff, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => to_json(diff),
        OutputFormat::Yaml => to_yaml(diff),
        OutputFormat::Text | OutputFormat::Csv => format_diff_text(diff),
        OutputFormat::Rich => format_diff_rich(diff, opts)
    }
}

fn format_diff_text(diff: &SchemaDiff) -> String {
    let mut lines = vec![
        format!("Schema diff: {} → {}", diff.table1, diff.table2),
        format!("Added fields: {}", diff.added.len()),
        format!("Removed fields: {}", diff.removed.len()),
        format!("Changed fields: {}", diff.changed.len()),
        format!("Unchanged fields: {}", diff.unchanged.len()),
    ];
    if !diff.added.is_empty() {
        lines.push(String::from("\nAdded fields:"));
        for field in &diff.added {
            lines.push(format!("+ {} ({}, {})", field.name, field.field_type, field.mode()));
        }
    }
    if !diff.removed.is_empty() {
        lines.push(String::from("\nRemoved fields:"));
        for field in &diff.removed {
            lines.push(format!("- {} ({}, {})", field.name, field.field_type, field.mode()));
        }
    }
    if !diff.changed.is_empty() {
        lines.push(String::from("\nChanged fields:"));
        for change in &diff.changed {
            lines.push(format!(
                "~ {}: ({}, {}) → ({}, {})",
                change.field,
                change.from.field_type,
                change.from.mode,
                change.to.field_type,
                change.to.mode
            ));
        }
    }
    lines.join("\n")
}

fn format_diff_rich(diff: &SchemaDiff, opts: &OutputOptions) -> String {
    let mut out = format!(
        "{} {} → {}\n",
        opts.paint("Schema diff:", |s| s.bold()),
        opts.paint(&diff.table1, |s| s.cyan()),
        opts.paint(&diff.table2, |s| s.cyan())
    );

    let mut summary = Table::new();
    summary.load_preset(NOTHING);
    if !opts.colored {
        summary.force_no_tty();
    }
    summary.add_row(vec![
        Cell::new("Added fields"),
        Cell::new(diff.added.len()).fg(Color::Green),
    ]);
    summary.add_row(vec![
        Cell::new("Removed fields"),
        Cell::new(diff.removed.len()).fg(Color::Red),
    ]);
    summary.add_row(vec![
        Cell::new("Changed fields"),
        Cell::new(diff.changed.len()).fg(Color::Yellow),
    ]);
    summary.add_row(vec![
        Cell::new("Unchanged fields"),
        Cell::new(diff.unchanged.len()).fg(Color::DarkGrey),
    ]);
    out.push_str(&summary.to_string());

    let sections = [
        ("Added Fields", &diff.added, Color::Green),
        ("Removed Fields", &diff.removed, Color::Red)
    ];
    for (title, fields, color) in sections {
        if fields.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}\n", opts.paint(title, |s| s.bold())));
        let mut table = opts.table();
        table.set_header(opts.header(&["Field Name", "Type", "Mode"]));
        for field in fields {
            table.add_row(vec![
                Cell::new(&field.name).fg(color),
                Cell::new(&field.field_type),
                Cell::new(field.mode()),
            ]);
        }
        out.push_str(&table.to_string());
    }

    if !diff.changed.is_empty() {
        out.push_str(&format!("\n{}\n", opts.paint("Changed Fields", |s| s.bold())));
        let mut table = opts.table();
        table.set_header(opts.header(&[
            "Field Name",
            "From Type",
            "To Type",
            "From Mode",
            "To Mode"
        ]));
        for change in &diff.changed {
            table.add_row(vec![
                Cell::new(&change.field).fg(Color::Yellow),
                Cell::new(&change.from.field_type),
                Cell::new(&change.to.field_type),
                Cell::new(&change.from.mode),
                Cell::new(&change.to.mode),
            ]);
        }
        out.push_str(&table.to_string());
    }
    out
}

/// Render lint issues, one `Line <n>: <message>` per issue.
///
/// Structured formats include the fixed SQL when present.
pub fn format_lint(result: &LintResult, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => to_json(result),
        OutputFormat::Yaml => to_yaml(result),
        _ => result
            .issues
            .iter()
            .map(|issue| {
                format!(
                    "{} {}",
                    opts.paint(&format!("Line {}:", issue.line), |s| s.yellow()),
                    issue.message
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn format_csv(outcome: &QueryOutcome, limit: usize) -> String {
    match write_csv(outcome, limit) {
        Ok(csv) => csv,
        Err(e) => {
            tracing::warn!(error = %e, "CSV rendering failed");
            String::new()
        }
    }
}

/// Header plus up to `limit` rows; null cells become empty fields.
fn write_csv(outcome: &QueryOutcome, limit: usize) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&outcome.columns)?;
    for row in outcome.rows.iter().take(limit) {
        writer.write_record(row.iter().map(|v| match v {
            Value::Null => String::new(),
            other => display_value(other)
        }))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes)
        .trim_end_matches('\n')
        .to_string())
}

/// Cell text: strings unquoted, NULL for null, JSON for nested values.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::from("NULL"),
        other => other.to_string()
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn to_yaml<T: Serialize + ?Sized>(value: &T) -> String {
    serde_yaml::to_string(value).unwrap_or_default()
}
