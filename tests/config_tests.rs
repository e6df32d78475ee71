use std::collections::HashMap;

use bq_bench::config::{Config, DEFAULT_API_URL, LintConfig};
use tempfile::NamedTempFile;

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.bigquery.project.is_none());
    assert!(config.bigquery.access_token.is_none());
    assert_eq!(config.bigquery.api_url, DEFAULT_API_URL);
    assert!(config.lint.disabled.is_empty());
}

#[test]
fn test_default_retry_config() {
    let config = Config::default();

    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.retry.initial_delay_ms, 1000);
    assert_eq!(config.retry.max_delay_ms, 30000);
    assert_eq!(config.retry.backoff_factor, 2.0);
}

#[test]
fn test_from_toml_all_sections() {
    let config = Config::from_toml(
        r#"
[bigquery]
project = "analytics-prod"
dataset = "reporting"
api_url = "http://localhost:9050"

[retry]
max_retries = 5

[lint]
disabled = ["LINT004"]
"#
    )
    .unwrap();

    assert_eq!(config.bigquery.project.as_deref(), Some("analytics-prod"));
    assert_eq!(config.bigquery.dataset.as_deref(), Some("reporting"));
    assert_eq!(config.bigquery.api_url, "http://localhost:9050");
    assert_eq!(config.retry.max_retries, 5);
    assert_eq!(config.retry.initial_delay_ms, 1000);
    assert_eq!(config.lint.disabled, vec!["LINT004"]);
}

#[test]
fn test_from_toml_missing_api_url_uses_default() {
    let config = Config::from_toml("[bigquery]\nproject = \"p\"").unwrap();
    assert_eq!(config.bigquery.api_url, DEFAULT_API_URL);
}

#[test]
fn test_from_toml_invalid() {
    assert!(Config::from_toml("[bigquery\nproject = ").is_err());
}

#[test]
fn test_from_file() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "[lint]\ndisabled = [\"LINT002\", \"LINT003\"]\n").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.lint.disabled.len(), 2);
}

#[test]
fn test_from_missing_file() {
    assert!(Config::from_file(std::path::Path::new("/nonexistent/bq-bench.toml")).is_err());
}

#[test]
fn test_env_overrides_file_values() {
    let mut config = Config::from_toml("[bigquery]\nproject = \"from-file\"").unwrap();
    config.apply_env(env(&[
        ("GOOGLE_CLOUD_PROJECT", "from-env"),
        ("BQ_DATASET", "staging"),
        ("BQ_API_URL", "http://127.0.0.1:1234")
    ]));

    assert_eq!(config.bigquery.project.as_deref(), Some("from-env"));
    assert_eq!(config.bigquery.dataset.as_deref(), Some("staging"));
    assert_eq!(config.bigquery.api_url, "http://127.0.0.1:1234");
}

#[test]
fn test_access_token_precedence() {
    let mut config = Config::default();
    config.apply_env(env(&[("GOOGLE_OAUTH_ACCESS_TOKEN", "fallback")]));
    assert_eq!(config.bigquery.access_token.as_deref(), Some("fallback"));

    config.apply_env(env(&[
        ("BQ_ACCESS_TOKEN", "primary"),
        ("GOOGLE_OAUTH_ACCESS_TOKEN", "fallback")
    ]));
    assert_eq!(config.bigquery.access_token.as_deref(), Some("primary"));
}

#[test]
fn test_empty_env_keeps_values() {
    let mut config = Config::from_toml("[bigquery]\nproject = \"kept\"").unwrap();
    config.apply_env(env(&[]));
    assert_eq!(config.bigquery.project.as_deref(), Some("kept"));
}

#[test]
fn test_lint_config_default() {
    assert!(LintConfig::default().disabled.is_empty());
}
