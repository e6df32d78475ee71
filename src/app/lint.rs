use std::{
    fs,
    io::{self, IsTerminal, Read},
    path::Path
};

use colored::Colorize;

use super::{
    convert::convert_lint_format,
    helpers::resolve_lint_sql,
    types::{CommandOutput, LintParams}
};
use crate::{
    config::Config,
    error::{AppResult, file_write_error},
    lint::Linter,
    output::{OutputFormat, OutputOptions, format_lint}
};

/// Lints SQL from the params file or process stdin.
///
/// Exits with 1 when any issue is found. With `fix`, the fixed SQL goes to
/// `output`, back into the input file, or to stdout when reading stdin.
pub fn run_lint(params: LintParams, config: &Config) -> AppResult<CommandOutput> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    run_lint_with_input(params, config, stdin.lock(), interactive)
}

/// [`run_lint`] with an explicit stdin source.
pub fn run_lint_with_input(
    params: LintParams,
    config: &Config,
    stdin: impl Read,
    interactive: bool
) -> AppResult<CommandOutput> {
    let sql = resolve_lint_sql(params.file.as_deref(), stdin, interactive)?;
    let result = Linter::with_config(&config.lint).lint(&sql, params.fix);
    let opts = OutputOptions::new(convert_lint_format(params.format), !params.no_color);
    let structured = matches!(opts.format, OutputFormat::Json | OutputFormat::Yaml);

    let mut stdout = Vec::new();
    if let Some(fixed) = &result.fixed_sql {
        match params.output.as_deref().or(params.file.as_deref()) {
            Some(path) => {
                write_fixed(path, fixed)?;
                if !structured {
                    stdout.push(written_message(path, &opts));
                }
            }
            None if !structured => stdout.push(fixed.clone()),
            None => {}
        }
    }

    let report = format_lint(&result, &opts);
    if !report.is_empty() {
        stdout.push(report);
    }

    if result.is_clean() {
        Ok(CommandOutput::success(stdout))
    } else {
        Ok(CommandOutput::failure(stdout))
    }
}

fn write_fixed(path: &Path, sql: &str) -> AppResult<()> {
    fs::write(path, sql).map_err(|e| file_write_error(&path.display().to_string(), e))?;
    tracing::debug!(path = %path.display(), "fixed SQL written");
    Ok(())
}

fn written_message(path: &Path, opts: &OutputOptions) -> String {
    let label = "Fixed SQL written to:";
    if opts.colored {
        format!("{} {}", label.green().bold(), path.display())
    } else {
        format!("{} {}", label, path.display())
    }
}
