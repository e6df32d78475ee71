//! Parameters and results of CLI commands.
//!
//! Each command runner takes a params struct built from the parsed CLI
//! arguments and returns a [`CommandOutput`], so commands can be exercised
//! without spawning a process.

use std::path::PathBuf;

use crate::cli::{DiffFormat, LintFormat, QueryFormat, TableFormat};

/// Parameters for the query command.
#[derive(Debug, Clone)]
pub struct QueryParams {
    pub sql:      Option<String>,
    pub file:     Option<PathBuf>,
    /// Overrides the configured project
    pub project:  Option<String>,
    /// Overrides the configured dataset
    pub dataset:  Option<String>,
    pub limit:    u32,
    pub format:   QueryFormat,
    pub no_color: bool
}

/// Parameters for the dryrun command.
#[derive(Debug, Clone)]
pub struct DryRunParams {
    pub sql:      Option<String>,
    pub file:     Option<PathBuf>,
    pub project:  Option<String>,
    pub dataset:  Option<String>,
    pub format:   TableFormat,
    pub no_color: bool
}

/// Parameters for the schema command.
#[derive(Debug, Clone)]
pub struct SchemaParams {
    pub table:    String,
    pub project:  Option<String>,
    pub format:   TableFormat,
    pub detailed: bool,
    pub no_color: bool
}

/// Parameters for the diff command.
#[derive(Debug, Clone)]
pub struct DiffParams {
    pub table1:   String,
    pub table2:   String,
    pub project:  Option<String>,
    pub format:   DiffFormat,
    pub no_color: bool
}

/// Parameters for the lint command.
#[derive(Debug, Clone)]
pub struct LintParams {
    /// SQL file; stdin is read when absent
    pub file:     Option<PathBuf>,
    pub fix:      bool,
    /// Destination for fixed SQL instead of the input file
    pub output:   Option<PathBuf>,
    pub format:   LintFormat,
    pub no_color: bool
}

/// Output from CLI command execution.
///
/// # Example
///
/// ```
/// use bq_bench::app::CommandOutput;
///
/// let output = CommandOutput::success(vec!["done".to_string()]);
/// assert_eq!(output.exit_code, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code for the process (0 = success, 1 = issues or invalid query)
    pub exit_code: i32,
    /// Lines to print to stdout
    pub stdout:    Vec<String>
}

impl CommandOutput {
    pub fn success(stdout: Vec<String>) -> Self {
        Self {
            exit_code: 0,
            stdout
        }
    }

    pub fn failure(stdout: Vec<String>) -> Self {
        Self {
            exit_code: 1,
            stdout
        }
    }
}
