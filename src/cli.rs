use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// bq-bench - BigQuery query runner, schema inspector and SQL linter
#[derive(Parser, Debug)]
#[command(name = "bq-bench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a query and print the results
    Query {
        /// SQL to run (reads --file or stdin when omitted)
        sql: Option<String>,

        /// Read SQL from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Project to run the query in
        #[arg(short, long)]
        project: Option<String>,

        /// Default dataset for unqualified table names
        #[arg(short, long)]
        dataset: Option<String>,

        /// Maximum number of rows to show
        #[arg(short, long, default_value_t = 10)]
        limit: u32,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: QueryFormat
    },

    /// Validate a query and estimate its cost without running it
    Dryrun {
        /// SQL to validate (reads --file or stdin when omitted)
        sql: Option<String>,

        /// Read SQL from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(short, long)]
        project: Option<String>,

        #[arg(short, long)]
        dataset: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: TableFormat
    },

    /// Show the schema of a table
    Schema {
        /// Table reference ([project.]dataset.table)
        table: String,

        #[arg(short, long)]
        project: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: TableFormat,

        /// Include descriptions and nested fields
        #[arg(long, overrides_with = "simple")]
        detailed: bool,

        /// Top-level fields only (default)
        #[arg(long, overrides_with = "detailed")]
        simple: bool
    },

    /// Compare the schemas of two tables
    Diff {
        /// First table ([project.]dataset.table)
        table1: String,

        /// Second table ([project.]dataset.table)
        table2: String,

        #[arg(short, long)]
        project: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "rich")]
        format: DiffFormat
    },

    /// Lint SQL from a file or stdin
    Lint {
        /// SQL file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Apply automatic fixes
        #[arg(long, overrides_with = "no_fix")]
        fix: bool,

        /// Report issues without fixing (default)
        #[arg(long, overrides_with = "fix")]
        no_fix: bool,

        /// Write fixed SQL to this path instead of the input file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: LintFormat
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryFormat {
    Table,
    Json,
    Csv
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    Table,
    Json
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiffFormat {
    Rich,
    Text,
    Json
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LintFormat {
    Text,
    Json,
    Yaml
}
