//! # bq-bench Library
//!
//! BigQuery client, schema tooling and SQL linter behind the `bq-bench` CLI.
//!
//! # Modules
//!
//! - [`lint`] - Rule-based SQL linter with automatic fixes
//! - [`bigquery`] - REST client for queries, dry runs and table metadata
//! - [`schema`] - Table schema model and schema diff
//! - [`query`] - Query outcomes, byte formatting and cost estimation
//! - [`output`] - Result rendering (tables, text, JSON, CSV, YAML)
//! - [`app`] - Command runners used by the binary
//! - [`cli`] - Command-line definitions
//! - [`config`] - Configuration loading
//! - [`error`] - Error types and constructors
//!
//! # Example
//!
//! ```
//! use bq_bench::lint::lint;
//!
//! let result = lint("DELETE FROM logs", false);
//! assert_eq!(result.issues[0].rule_id, "LINT001");
//! ```

pub mod app;
pub mod bigquery;
pub mod cli;
pub mod config;
pub mod error;
pub mod lint;
pub mod output;
pub mod query;
pub mod schema;
