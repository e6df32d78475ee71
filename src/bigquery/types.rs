//! Wire types of the BigQuery v2 REST API.
//!
//! Only the fields this tool reads are modelled. Int64 values arrive as JSON
//! strings and are parsed leniently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TableRef;
use crate::schema::{SchemaField, TableSchema};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct QueryRequest<'a> {
    pub query:           &'a str,
    pub use_legacy_sql:  bool,
    pub dry_run:         bool,
    pub use_query_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results:     Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_dataset: Option<DatasetReference>
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DatasetReference {
    pub project_id: String,
    pub dataset_id: String
}

impl DatasetReference {
    /// `dataset` or `project.dataset`, the former resolved against `project`.
    pub fn parse(dataset: &str, project: &str) -> Self {
        match dataset.split_once('.') {
            Some((project_id, dataset_id)) => Self {
                project_id: project_id.to_string(),
                dataset_id: dataset_id.to_string()
            },
            None => Self {
                project_id: project.to_string(),
                dataset_id: dataset.to_string()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct QueryResponse {
    pub schema:                Option<SchemaResource>,
    pub rows:                  Vec<RowResource>,
    pub total_bytes_processed: Option<String>,
    pub total_rows:            Option<String>,
    pub job_complete:          Option<bool>
}

impl QueryResponse {
    pub fn bytes_processed(&self) -> u64 {
        parse_int(self.total_bytes_processed.as_deref()).unwrap_or(0)
    }

    pub fn columns(&self) -> Vec<String> {
        self.schema
            .as_ref()
            .map(|s| s.fields.iter().map(|f| f.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Rows with cell wrappers removed.
    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
            .into_iter()
            .map(|row| row.f.into_iter().map(cell_value).collect())
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SchemaResource {
    #[serde(default)]
    pub fields: Vec<FieldResource>
}

#[derive(Debug, Deserialize)]
pub(super) struct FieldResource {
    pub name:        String,
    #[serde(rename = "type")]
    pub field_type:  String,
    pub mode:        Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub fields:      Vec<FieldResource>
}

impl From<FieldResource> for SchemaField {
    fn from(field: FieldResource) -> Self {
        Self {
            name:        field.name,
            field_type:  field.field_type,
            mode:        field.mode,
            description: field.description,
            fields:      field.fields.into_iter().map(Into::into).collect()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RowResource {
    #[serde(default)]
    pub f: Vec<Value>
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(super) struct TableResource {
    pub creation_time:      Option<String>,
    pub last_modified_time: Option<String>,
    pub num_rows:           Option<String>,
    pub num_bytes:          Option<String>,
    pub schema:             Option<SchemaResource>
}

impl TableResource {
    pub fn into_schema(self, table: &TableRef) -> TableSchema {
        TableSchema {
            table_id:  table.to_string(),
            created:   parse_millis(self.creation_time.as_deref()),
            modified:  parse_millis(self.last_modified_time.as_deref()),
            num_rows:  parse_int(self.num_rows.as_deref()),
            num_bytes: parse_int(self.num_bytes.as_deref()),
            fields:    self
                .schema
                .map(|s| s.fields.into_iter().map(Into::into).collect())
                .unwrap_or_default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponse {
    pub error: ErrorBody
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub message: String
}

pub(super) fn parse_int(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.parse().ok())
}

fn parse_millis(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
}

/// Unwrap a `{"v": ...}` cell.
fn cell_value(cell: Value) -> Value {
    match cell {
        Value::Object(mut obj) => unwrap_value(obj.remove("v").unwrap_or(Value::Null)),
        other => unwrap_value(other)
    }
}

/// Records (`{"f": [...]}`) and repeated values become plain arrays.
fn unwrap_value(value: Value) -> Value {
    match value {
        Value::Object(mut record) if record.contains_key("f") => match record.remove("f") {
            Some(Value::Array(cells)) => Value::Array(cells.into_iter().map(cell_value).collect()),
            _ => Value::Array(Vec::new())
        },
        Value::Array(items) => Value::Array(items.into_iter().map(cell_value).collect()),
        other => other
    }
}
