//! # bq-bench
//!
//! Command-line toolkit for BigQuery: run queries, dry-run them for cost,
//! inspect and diff table schemas, and lint SQL.
//!
//! # Quick Start
//!
//! ```bash
//! # Run a query, showing 20 rows
//! bq-bench query "SELECT name FROM dataset.users" -p my-project -l 20
//!
//! # Estimate cost without running
//! bq-bench dryrun -f report.sql --format json
//!
//! # Inspect and compare schemas
//! bq-bench schema dataset.users --detailed
//! bq-bench diff dataset.users dataset.users_v2 --format text
//!
//! # Lint and fix a file in place
//! bq-bench lint report.sql --fix
//! cat report.sql | bq-bench lint
//! ```
//!
//! # Exit Codes
//!
//! - `0` - Success, no lint issues, valid dry run
//! - `1` - Lint issues found, invalid dry run, or any error
//!
//! # Logging
//!
//! `--debug` enables debug logs; otherwise `RUST_LOG` is honored. Logs go to
//! stderr.

use std::process;

use bq_bench::{app::run, cli::Cli, config::Config, error::AppResult};
use clap::Parser;
use tokio::main;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("bq_bench=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bq_bench=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[main]
async fn main() {
    match execute().await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

async fn execute() -> AppResult<i32> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    if cli.no_color {
        colored::control::set_override(false);
    }
    tracing::debug!(command = ?cli.command, "bq-bench starting");

    let config = Config::load()?;
    let output = run(cli, &config).await?;
    for line in &output.stdout {
        println!("{}", line);
    }
    Ok(output.exit_code)
}
