use super::{
    convert::{convert_diff_format, convert_table_format},
    helpers::{bigquery_config, spinner},
    types::{CommandOutput, DiffParams, SchemaParams}
};
use crate::{
    bigquery::{BigQueryClient, TableRef},
    config::Config,
    error::AppResult,
    output::{OutputOptions, format_diff, format_schema},
    schema::{SchemaDiff, TableSchema}
};

/// Fetches and renders the schema of one table.
pub async fn run_schema(params: SchemaParams, config: &Config) -> AppResult<CommandOutput> {
    let bigquery = bigquery_config(config, params.project);
    let table = TableRef::parse(&params.table, bigquery.project.as_deref())?;
    let client = BigQueryClient::with_retry_config(&bigquery, config.retry.clone());

    let pb = spinner("Fetching schema...");
    let result = client.get_table(&table).await;
    pb.finish_and_clear();
    let schema = result?;

    let opts = OutputOptions::new(convert_table_format(params.format), !params.no_color);
    Ok(CommandOutput::success(vec![format_schema(
        &schema,
        params.detailed,
        &opts
    )]))
}

/// Compares the schemas of two tables.
///
/// Differences are reported, not treated as failure.
pub async fn run_diff(params: DiffParams, config: &Config) -> AppResult<CommandOutput> {
    let bigquery = bigquery_config(config, params.project);
    let left_ref = TableRef::parse(&params.table1, bigquery.project.as_deref())?;
    let right_ref = TableRef::parse(&params.table2, bigquery.project.as_deref())?;
    let client = BigQueryClient::with_retry_config(&bigquery, config.retry.clone());

    let pb = spinner("Fetching schemas...");
    let result = fetch_pair(&client, &left_ref, &right_ref).await;
    pb.finish_and_clear();
    let (left, right) = result?;

    let diff = SchemaDiff::compute(&params.table1, &left, &params.table2, &right);
    tracing::debug!(
        added = diff.added.len(),
        removed = diff.removed.len(),
        changed = diff.changed.len(),
        "schema diff computed"
    );
    let opts = OutputOptions::new(convert_diff_format(params.format), !params.no_color);
    Ok(CommandOutput::success(vec![format_diff(&diff, &opts)]))
}

async fn fetch_pair(
    client: &BigQueryClient,
    left: &TableRef,
    right: &TableRef
) -> AppResult<(TableSchema, TableSchema)> {
    let left = client.get_table(left).await?;
    let right = client.get_table(right).await?;
    Ok((left, right))
}
