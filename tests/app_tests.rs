//! Command runner tests against a mock BigQuery endpoint.

use bq_bench::{
    app::{DiffParams, DryRunParams, QueryParams, SchemaParams, run_diff, run_dryrun, run_query, run_schema},
    cli::{DiffFormat, QueryFormat, TableFormat},
    config::Config
};
use httpmock::prelude::*;
use serde_json::{Value, json};

fn config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.bigquery.api_url = server.base_url();
    config.bigquery.project = Some("proj".into());
    config.retry.max_retries = 0;
    config
}

fn table_body(fields: Value) -> Value {
    json!({"numRows": "3", "numBytes": "300", "schema": {"fields": fields}})
}

#[tokio::test]
async fn test_run_query_json() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/projects/proj/queries");
            then.status(200).json_body(json!({
                "jobComplete": true,
                "totalBytesProcessed": "100",
                "schema": {"fields": [{"name": "n", "type": "INTEGER"}]},
                "rows": [{"f": [{"v": "1"}]}, {"f": [{"v": "2"}]}]
            }));
        })
        .await;

    let output = run_query(
        QueryParams {
            sql:      Some("SELECT n FROM numbers".into()),
            file:     None,
            project:  None,
            dataset:  None,
            limit:    1,
            format:   QueryFormat::Json,
            no_color: true
        },
        &config(&server)
    )
    .await
    .unwrap();

    assert_eq!(output.exit_code, 0);
    let json: Value = serde_json::from_str(&output.stdout[0]).unwrap();
    assert_eq!(json, json!([{"n": "1"}]));
}

#[tokio::test]
async fn test_run_query_project_override() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/projects/cli-proj/queries");
            then.status(200).json_body(json!({"jobComplete": true}));
        })
        .await;

    let output = run_query(
        QueryParams {
            sql:      Some("SELECT 1".into()),
            file:     None,
            project:  Some("cli-proj".into()),
            dataset:  None,
            limit:    10,
            format:   QueryFormat::Table,
            no_color: true
        },
        &config(&server)
    )
    .await
    .unwrap();

    mock.assert_async().await;
    assert!(output.stdout[0].contains("returned no results"));
}

#[tokio::test]
async fn test_run_dryrun_invalid_exits_one() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/projects/proj/queries");
            then.status(400)
                .json_body(json!({"error": {"message": "Syntax error: Unexpected end of script"}}));
        })
        .await;

    let output = run_dryrun(
        DryRunParams {
            sql:      Some("SELECT".into()),
            file:     None,
            project:  None,
            dataset:  None,
            format:   TableFormat::Table,
            no_color: true
        },
        &config(&server)
    )
    .await
    .unwrap();

    assert_eq!(output.exit_code, 1);
    assert!(output.stdout[0].contains("✗ Query invalid"));
    assert!(output.stdout[0].contains("Syntax error"));
}

#[tokio::test]
async fn test_run_schema_uses_configured_project() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/projects/proj/datasets/crm/tables/users");
            then.status(200).json_body(table_body(json!([
                {"name": "id", "type": "INTEGER", "mode": "REQUIRED"}
            ])));
        })
        .await;

    let output = run_schema(
        SchemaParams {
            table:    "crm.users".into(),
            project:  None,
            format:   TableFormat::Table,
            detailed: false,
            no_color: true
        },
        &config(&server)
    )
    .await
    .unwrap();

    assert_eq!(output.exit_code, 0);
    assert!(output.stdout[0].contains("Schema for proj.crm.users"));
    assert!(output.stdout[0].contains("  Size: 300 bytes"));
}

#[tokio::test]
async fn test_run_schema_invalid_reference() {
    let server = MockServer::start_async().await;
    let result = run_schema(
        SchemaParams {
            table:    "users".into(),
            project:  None,
            format:   TableFormat::Json,
            detailed: false,
            no_color: true
        },
        &config(&server)
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_run_diff_text() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/projects/proj/datasets/crm/tables/users");
            then.status(200).json_body(table_body(json!([
                {"name": "id", "type": "INTEGER"},
                {"name": "email", "type": "STRING"}
            ])));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/projects/proj/datasets/crm/tables/users_v2");
            then.status(200).json_body(table_body(json!([
                {"name": "id", "type": "INTEGER"},
                {"name": "phone", "type": "STRING"}
            ])));
        })
        .await;

    let output = run_diff(
        DiffParams {
            table1:   "crm.users".into(),
            table2:   "crm.users_v2".into(),
            project:  None,
            format:   DiffFormat::Text,
            no_color: true
        },
        &config(&server)
    )
    .await
    .unwrap();

    assert_eq!(output.exit_code, 0);
    let text = &output.stdout[0];
    assert!(text.starts_with("Schema diff: crm.users → crm.users_v2"));
    assert!(text.contains("+ phone (STRING, NULLABLE)"));
    assert!(text.contains("- email (STRING, NULLABLE)"));
    assert!(text.contains("Unchanged fields: 1"));
}

#[tokio::test]
async fn test_run_diff_missing_table() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/projects/proj/datasets/crm/tables/users");
            then.status(200).json_body(table_body(json!([])));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/projects/proj/datasets/crm/tables/gone");
            then.status(404)
                .json_body(json!({"error": {"message": "Not found"}}));
        })
        .await;

    let result = run_diff(
        DiffParams {
            table1:   "crm.users".into(),
            table2:   "crm.gone".into(),
            project:  None,
            format:   DiffFormat::Json,
            no_color: true
        },
        &config(&server)
    )
    .await;
    assert!(result.is_err());
}
