use super::{
    convert::{convert_query_format, convert_table_format},
    helpers::{bigquery_config, spinner, stdin_query_sql},
    types::{CommandOutput, DryRunParams, QueryParams}
};
use crate::{
    bigquery::BigQueryClient,
    config::Config,
    error::AppResult,
    output::{OutputOptions, format_dry_run, format_query_result}
};

/// Runs a query and renders up to `limit` rows.
pub async fn run_query(params: QueryParams, config: &Config) -> AppResult<CommandOutput> {
    let sql = stdin_query_sql(params.sql, params.file.as_deref())?;
    let bigquery = bigquery_config(config, params.project);
    let dataset = params.dataset.or_else(|| bigquery.dataset.clone());
    let client = BigQueryClient::with_retry_config(&bigquery, config.retry.clone());

    let pb = spinner("Running query...");
    let result = client.query(&sql, dataset.as_deref(), params.limit).await;
    pb.finish_and_clear();
    let outcome = result?;

    let opts = OutputOptions::new(convert_query_format(params.format), !params.no_color);
    Ok(CommandOutput::success(vec![format_query_result(
        &outcome,
        params.limit as usize,
        &opts
    )]))
}

/// Dry-runs a query; exits with 1 when the engine rejects it.
pub async fn run_dryrun(params: DryRunParams, config: &Config) -> AppResult<CommandOutput> {
    let sql = stdin_query_sql(params.sql, params.file.as_deref())?;
    let bigquery = bigquery_config(config, params.project);
    let dataset = params.dataset.or_else(|| bigquery.dataset.clone());
    let client = BigQueryClient::with_retry_config(&bigquery, config.retry.clone());

    let pb = spinner("Validating query...");
    let result = client.dry_run(&sql, dataset.as_deref()).await;
    pb.finish_and_clear();
    let outcome = result?;

    let opts = OutputOptions::new(convert_table_format(params.format), !params.no_color);
    let stdout = vec![format_dry_run(&outcome, &opts)];
    if outcome.valid {
        Ok(CommandOutput::success(stdout))
    } else {
        Ok(CommandOutput::failure(stdout))
    }
}
