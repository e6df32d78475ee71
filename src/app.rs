//! Application logic for the bq-bench CLI.
//!
//! Command runners live here, separated from the binary entry point so they
//! can be tested. Each returns a [`CommandOutput`] holding the exit code and
//! the text to print.

mod convert;
mod helpers;
mod lint;
mod query;
mod schema;
mod types;

pub use convert::{convert_diff_format, convert_lint_format, convert_query_format, convert_table_format};
pub use helpers::{
    NO_SQL_LINT, NO_SQL_QUERY, bigquery_config, read_sql_file, resolve_lint_sql,
    resolve_query_sql
};
pub use lint::{run_lint, run_lint_with_input};
pub use query::{run_dryrun, run_query};
pub use schema::{run_diff, run_schema};
pub use types::{CommandOutput, DiffParams, DryRunParams, LintParams, QueryParams, SchemaParams};

use crate::{
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};

/// Dispatches a parsed command line to its runner.
pub async fn run(cli: Cli, config: &Config) -> AppResult<CommandOutput> {
    let no_color = cli.no_color;
    match cli.command {
        Commands::Query {
            sql,
            file,
            project,
            dataset,
            limit,
            format
        } => {
            run_query(
                QueryParams {
                    sql,
                    file,
                    project,
                    dataset,
                    limit,
                    format,
                    no_color
                },
                config
            )
            .await
        }
        Commands::Dryrun {
            sql,
            file,
            project,
            dataset,
            format
        } => {
            run_dryrun(
                DryRunParams {
                    sql,
                    file,
                    project,
                    dataset,
                    format,
                    no_color
                },
                config
            )
            .await
        }
        Commands::Schema {
            table,
            project,
            format,
            detailed,
            ..
        } => {
            run_schema(
                SchemaParams {
                    table,
                    project,
                    format,
                    detailed,
                    no_color
                },
                config
            )
            .await
        }
        Commands::Diff {
            table1,
            table2,
            project,
            format
        } => {
            run_diff(
                DiffParams {
                    table1,
                    table2,
                    project,
                    format,
                    no_color
                },
                config
            )
            .await
        }
        Commands::Lint {
            file,
            fix,
            output,
            format,
            ..
        } => run_lint(
            LintParams {
                file,
                fix,
                output,
                format,
                no_color
            },
            config
        )
    }
}
