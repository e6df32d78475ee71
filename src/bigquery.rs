//! BigQuery REST client.
//!
//! A thin async client over the v2 REST API covering the three calls the CLI
//! needs: synchronous query (`jobs.query`), dry run, and table metadata
//! (`tables.get`). Authentication uses an already-issued OAuth access token
//! sent as a bearer token.
//!
//! # Retry Behavior
//!
//! Requests are retried with exponential backoff on:
//! - Connection failures and timeouts
//! - Rate limiting (429)
//! - Server errors (5xx)
//!
//! # Example
//!
//! ```
//! use bq_bench::{
//!     bigquery::BigQueryClient,
//!     config::{BigQueryConfig, RetryConfig}
//! };
//!
//! let config = BigQueryConfig {
//!     project: Some("my-project".into()),
//!     access_token: Some("ya29.token".into()),
//!     ..Default::default()
//! };
//!
//! let client = BigQueryClient::with_retry_config(&config, RetryConfig::default());
//! assert_eq!(client.project().unwrap(), "my-project");
//! ```

mod table_ref;
mod types;

use std::time::{Duration, Instant};

use reqwest::{RequestBuilder, Response, StatusCode};
pub use table_ref::TableRef;
use tokio::time::sleep;
use types::{DatasetReference, ErrorResponse, QueryRequest, QueryResponse, TableResource, parse_int};

use crate::{
    config::{BigQueryConfig, RetryConfig},
    error::{AppResult, api_error, config_error, http_error},
    query::{DryRunOutcome, QueryOutcome},
    schema::TableSchema
};

/// HTTP client for the BigQuery REST API with retry support.
pub struct BigQueryClient {
    client:       reqwest::Client,
    base_url:     String,
    project:      Option<String>,
    access_token: Option<String>,
    retry_config: RetryConfig
}

impl BigQueryClient {
    /// Create client with default retry configuration
    pub fn new(config: &BigQueryConfig) -> Self {
        Self::with_retry_config(config, RetryConfig::default())
    }

    /// Create client with custom retry configuration
    pub fn with_retry_config(config: &BigQueryConfig, retry_config: RetryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            project: config.project.clone(),
            access_token: config.access_token.clone(),
            retry_config
        }
    }

    /// Project used for query jobs
    pub fn project(&self) -> AppResult<&str> {
        self.project.as_deref().ok_or_else(|| {
            config_error(
                "No project configured (use --project, GOOGLE_CLOUD_PROJECT or [bigquery] project)"
            )
        })
    }

    /// Run `sql` and return at most `max_results` rows.
    ///
    /// `dataset` (`dataset` or `project.dataset`) resolves unqualified table
    /// names.
    pub async fn query(
        &self,
        sql: &str,
        dataset: Option<&str>,
        max_results: u32
    ) -> AppResult<QueryOutcome> {
        let project = self.project()?;
        let request = QueryRequest {
            query:           sql,
            use_legacy_sql:  false,
            dry_run:         false,
            use_query_cache: true,
            max_results:     Some(max_results),
            default_dataset: dataset.map(|d| DatasetReference::parse(d, project))
        };
        let url = format!("{}/projects/{}/queries", self.base_url, project);

        let started = Instant::now();
        let response = self
            .send_with_retry(|| self.client.post(&url).json(&request))
            .await?;
        if !response.status().is_success() {
            return Err(api_error(error_message(response).await));
        }
        let result: QueryResponse = response.json().await.map_err(http_error)?;
        let execution_time = started.elapsed().as_secs_f64();

        if result.job_complete == Some(false) {
            return Err(api_error(
                "Query did not complete within the request timeout"
            ));
        }
        let bytes_processed = result.bytes_processed();
        let columns = result.columns();
        let total_rows = parse_int(result.total_rows.as_deref());
        let rows = result.into_rows();
        tracing::debug!(
            bytes_processed,
            rows = rows.len(),
            execution_time,
            "query finished"
        );
        Ok(QueryOutcome {
            execution_time,
            bytes_processed,
            rows_returned: total_rows.unwrap_or(rows.len() as u64),
            columns,
            rows
        })
    }

    /// Validate `sql` and report the bytes it would scan.
    ///
    /// Queries rejected by the engine (HTTP 400/404) produce an invalid
    /// outcome; transport and other API failures are errors.
    pub async fn dry_run(&self, sql: &str, dataset: Option<&str>) -> AppResult<DryRunOutcome> {
        let project = self.project()?;
        let request = QueryRequest {
            query:           sql,
            use_legacy_sql:  false,
            dry_run:         true,
            use_query_cache: false,
            max_results:     None,
            default_dataset: dataset.map(|d| DatasetReference::parse(d, project))
        };
        let url = format!("{}/projects/{}/queries", self.base_url, project);

        let response = self
            .send_with_retry(|| self.client.post(&url).json(&request))
            .await?;
        let status = response.status();
        if status.is_success() {
            let result: QueryResponse = response.json().await.map_err(http_error)?;
            return Ok(DryRunOutcome::valid(result.bytes_processed()));
        }
        let message = error_message(response).await;
        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            Ok(DryRunOutcome::invalid(message))
        } else {
            Err(api_error(message))
        }
    }

    /// Fetch table metadata and schema.
    pub async fn get_table(&self, table: &TableRef) -> AppResult<TableSchema> {
        let url = format!("{}/{}", self.base_url, table.path());
        let response = self.send_with_retry(|| self.client.get(&url)).await?;
        if !response.status().is_success() {
            return Err(api_error(format!(
                "Failed to get table {}: {}",
                table,
                error_message(response).await
            )));
        }
        let resource: TableResource = response.json().await.map_err(http_error)?;
        Ok(resource.into_schema(table))
    }

    async fn send_with_retry(
        &self,
        build: impl Fn() -> RequestBuilder
    ) -> AppResult<Response> {
        let mut delay = self.retry_config.initial_delay_ms;
        let mut attempt = 0;
        loop {
            let mut request = build();
            if let Some(token) = &self.access_token {
                request = request.bearer_auth(token);
            }
            let result = request.send().await;
            let retryable = match &result {
                Ok(response) => is_retryable_status(response.status()),
                Err(e) => e.is_timeout() || e.is_connect()
            };
            if !retryable || attempt >= self.retry_config.max_retries {
                return result.map_err(http_error);
            }
            attempt += 1;
            tracing::warn!(
                attempt = attempt + 1,
                max_attempts = self.retry_config.max_retries + 1,
                delay_ms = delay,
                "retrying BigQuery request"
            );
            sleep(Duration::from_millis(delay)).await;
            delay = ((delay as f64 * self.retry_config.backoff_factor) as u64)
                .min(self.retry_config.max_delay_ms);
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Error message from a failed response, falling back to the raw body.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    tracing::debug!(%status, %message, "BigQuery request failed");
    if status == StatusCode::UNAUTHORIZED {
        format!(
            "BigQuery API error {}: {} (set BQ_ACCESS_TOKEN or [bigquery] access_token)",
            status, message
        )
    } else {
        format!("BigQuery API error {}: {}", status, message)
    }
}
