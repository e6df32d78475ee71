//! Helper functions for CLI operations.
//!
//! Reading SQL input, resolving BigQuery settings against CLI overrides and
//! progress display.

use std::{
    fs::read_to_string,
    io::{self, ErrorKind, IsTerminal, Read},
    path::Path,
    time::Duration
};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::{BigQueryConfig, Config},
    error::{AppResult, file_read_error, input_error}
};

/// Message for query and dryrun when no SQL is available.
pub const NO_SQL_QUERY: &str = "No SQL provided. Use a SQL string, --file, or pipe SQL to stdin.";

/// Message for lint when no SQL is available.
pub const NO_SQL_LINT: &str = "No SQL provided. Use a file path or pipe SQL to stdin.";

/// Reads an SQL file, reporting a missing file by name.
pub fn read_sql_file(path: &Path) -> AppResult<String> {
    read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => input_error(format!("File {} not found", path.display())),
        _ => file_read_error(&path.display().to_string(), e)
    })
}

/// Reads all of `stdin` unless it is an interactive terminal.
pub fn read_piped(mut stdin: impl Read, interactive: bool) -> AppResult<Option<String>> {
    if interactive {
        return Ok(None);
    }
    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .map_err(|e| file_read_error("stdin", e))?;
    Ok(Some(buffer))
}

/// Resolves SQL for query and dryrun.
///
/// A file takes precedence over the argument; without either, piped stdin is
/// used. The result is trimmed and must not be empty.
pub fn resolve_query_sql(
    sql: Option<String>,
    file: Option<&Path>,
    stdin: impl Read,
    interactive: bool
) -> AppResult<String> {
    let text = match (file, sql) {
        (Some(path), _) => read_sql_file(path)?,
        (None, Some(sql)) if !sql.trim().is_empty() => sql,
        (None, _) => read_piped(stdin, interactive)?.unwrap_or_default()
    };
    let text = text.trim();
    if text.is_empty() {
        return Err(input_error(NO_SQL_QUERY));
    }
    Ok(text.to_string())
}

/// Resolves SQL for lint from a file or piped stdin, untrimmed.
pub fn resolve_lint_sql(file: Option<&Path>, stdin: impl Read, interactive: bool) -> AppResult<String> {
    if let Some(path) = file {
        return read_sql_file(path);
    }
    match read_piped(stdin, interactive)? {
        Some(sql) if !sql.is_empty() => Ok(sql),
        _ => Err(input_error(NO_SQL_LINT))
    }
}

/// Resolves SQL from the process stdin.
pub fn stdin_query_sql(sql: Option<String>, file: Option<&Path>) -> AppResult<String> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    resolve_query_sql(sql, file, stdin.lock(), interactive)
}

/// BigQuery settings with the CLI project applied.
pub fn bigquery_config(config: &Config, project: Option<String>) -> BigQueryConfig {
    let mut bigquery = config.bigquery.clone();
    if project.is_some() {
        bigquery.project = project;
    }
    bigquery
}

/// Spinner on stderr; hidden when stderr is not a terminal.
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
