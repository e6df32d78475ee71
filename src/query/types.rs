use serde::Serialize;
use serde_json::{Map, Value};

use super::estimate_cost;

/// Result of an executed query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    /// Wall-clock seconds from request to response
    pub execution_time:  f64,
    pub bytes_processed: u64,
    /// Total rows produced by the query, which may exceed `rows.len()`
    pub rows_returned:   u64,
    pub columns:         Vec<String>,
    pub rows:            Vec<Vec<Value>>
}

impl QueryOutcome {
    pub fn estimated_cost(&self) -> f64 {
        estimate_cost(self.bytes_processed)
    }

    /// First `limit` rows as column-name keyed objects.
    pub fn records(&self, limit: usize) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// Result of a dry run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DryRunOutcome {
    pub valid:                 bool,
    pub bytes_to_be_processed: u64,
    pub estimated_cost:        f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:                 Option<String>
}

impl DryRunOutcome {
    pub fn valid(bytes: u64) -> Self {
        Self {
            valid:                 true,
            bytes_to_be_processed: bytes,
            estimated_cost:        estimate_cost(bytes),
            error:                 None
        }
    }

    /// Query rejected by the engine.
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid:                 false,
            bytes_to_be_processed: 0,
            estimated_cost:        0.0,
            error:                 Some(error.into())
        }
    }
}
