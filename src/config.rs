//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.bq-bench.toml` in current directory
//! 4. `~/.config/bq-bench/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [bigquery]
//! project = "my-project"
//! dataset = "analytics"
//! api_url = "https://bigquery.googleapis.com/bigquery/v2"
//! access_token = "ya29..."     # or use BQ_ACCESS_TOKEN env var
//!
//! [retry]
//! max_retries = 3
//! initial_delay_ms = 1000
//! max_delay_ms = 30000
//! backoff_factor = 2.0
//!
//! [lint]
//! disabled = ["LINT004"]
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `GOOGLE_CLOUD_PROJECT` | Default project |
//! | `BQ_DATASET` | Default dataset |
//! | `BQ_API_URL` | REST API base URL |
//! | `BQ_ACCESS_TOKEN` | OAuth access token |
//! | `GOOGLE_OAUTH_ACCESS_TOKEN` | OAuth access token (fallback) |

use std::{
    env, fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;

use crate::error::{AppResult, config_error};

/// Default BigQuery REST endpoint
pub const DEFAULT_API_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bigquery: BigQueryConfig,
    #[serde(default)]
    pub retry:    RetryConfig,
    #[serde(default)]
    pub lint:     LintConfig
}

/// Lint configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LintConfig {
    /// Disabled rule IDs
    #[serde(default)]
    pub disabled: Vec<String>
}

/// BigQuery connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct BigQueryConfig {
    pub project:      Option<String>,
    pub dataset:      Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url:      String,
    pub access_token: Option<String>
}

fn default_api_url() -> String {
    String::from(DEFAULT_API_URL)
}

impl Default for BigQueryConfig {
    fn default() -> Self {
        Self {
            project:      None,
            dataset:      None,
            api_url:      default_api_url(),
            access_token: None
        }
    }
}

/// Retry configuration for API requests
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries:      u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms:     u64,
    pub backoff_factor:   f64
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries:      3,
            initial_delay_ms: 1000,
            max_delay_ms:     30000,
            backoff_factor:   2.0
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.bq-bench.toml)
    /// 3. Config file in home directory (~/.config/bq-bench/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("bq-bench")
                .join("config.toml");
            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        // Local config replaces the home config entirely
        let local_config = PathBuf::from(".bq-bench.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        config.apply_env(|key| env::var(key).ok());
        tracing::debug!(
            project = ?config.bigquery.project,
            api_url = %config.bigquery.api_url,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse TOML configuration text
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Override settings from environment variables read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(project) = lookup("GOOGLE_CLOUD_PROJECT") {
            self.bigquery.project = Some(project);
        }

        if let Some(dataset) = lookup("BQ_DATASET") {
            self.bigquery.dataset = Some(dataset);
        }

        if let Some(url) = lookup("BQ_API_URL") {
            self.bigquery.api_url = url;
        }

        if let Some(token) = lookup("BQ_ACCESS_TOKEN").or_else(|| lookup("GOOGLE_OAUTH_ACCESS_TOKEN"))
        {
            self.bigquery.access_token = Some(token);
        }
    }
}
