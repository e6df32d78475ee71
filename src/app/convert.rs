//! Conversion of CLI format choices to output formats.
//!
//! `table` renders as [`OutputFormat::Rich`]; the remaining names map
//! one-to-one.

use crate::{
    cli::{DiffFormat, LintFormat, QueryFormat, TableFormat},
    output::OutputFormat
};

/// Converts the query command format.
///
/// # Example
///
/// ```
/// use bq_bench::{app::convert_query_format, cli::QueryFormat, output::OutputFormat};
///
/// assert_eq!(convert_query_format(QueryFormat::Csv), OutputFormat::Csv);
/// ```
pub fn convert_query_format(format: QueryFormat) -> OutputFormat {
    match format {
        QueryFormat::Table => OutputFormat::Rich,
        QueryFormat::Json => OutputFormat::Json,
        QueryFormat::Csv => OutputFormat::Csv
    }
}

/// Converts the dryrun and schema command format.
pub fn convert_table_format(format: TableFormat) -> OutputFormat {
    match format {
        TableFormat::Table => OutputFormat::Rich,
        TableFormat::Json => OutputFormat::Json
    }
}

pub fn convert_diff_format(format: DiffFormat) -> OutputFormat {
    match format {
        DiffFormat::Rich => OutputFormat::Rich,
        DiffFormat::Text => OutputFormat::Text,
        DiffFormat::Json => OutputFormat::Json
    }
}

pub fn convert_lint_format(format: LintFormat) -> OutputFormat {
    match format {
        LintFormat::Text => OutputFormat::Text,
        LintFormat::Json => OutputFormat::Json,
        LintFormat::Yaml => OutputFormat::Yaml
    }
}
