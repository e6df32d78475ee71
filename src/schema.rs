//! Table schema representation and comparison.
//!
//! A [`TableSchema`] is built from the table metadata returned by the
//! catalog. Nested `RECORD` fields keep their tree shape in
//! [`SchemaField::fields`] and can be flattened into dotted names for display.
//!
//! # Example
//!
//! ```
//! use bq_bench::schema::{SchemaDiff, SchemaField, TableSchema};
//!
//! let old = TableSchema::new("p.d.users", vec![
//!     SchemaField::new("id", "INTEGER", "REQUIRED"),
//!     SchemaField::new("email", "STRING", "NULLABLE"),
//! ]);
//! let new = TableSchema::new("p.d.users_v2", vec![
//!     SchemaField::new("id", "STRING", "REQUIRED"),
//!     SchemaField::new("created_at", "TIMESTAMP", "NULLABLE"),
//! ]);
//!
//! let diff = SchemaDiff::compute("d.users", &old, "d.users_v2", &new);
//! assert_eq!(diff.added[0].name, "created_at");
//! assert_eq!(diff.removed[0].name, "email");
//! assert_eq!(diff.changed[0].field, "id");
//! assert!(diff.unchanged.is_empty());
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Mode reported when the catalog omits one
pub const DEFAULT_MODE: &str = "NULLABLE";

/// Column definition, possibly with nested fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    pub name:        String,
    #[serde(rename = "type")]
    pub field_type:  String,
    pub mode:        Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields:      Vec<SchemaField>
}

impl SchemaField {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>, mode: &str) -> Self {
        Self {
            name:        name.into(),
            field_type:  field_type.into(),
            mode:        Some(mode.to_string()),
            description: None,
            fields:      Vec::new()
        }
    }

    /// Mode with the catalog default applied.
    pub fn mode(&self) -> &str {
        self.mode.as_deref().unwrap_or(DEFAULT_MODE)
    }

    /// This field followed by all nested fields, depth first.
    ///
    /// Nested names are joined with dots (`address.city`).
    pub fn flatten(&self) -> Vec<FlatField> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<FlatField>) {
        let name = format!("{}{}", prefix, self.name);
        out.push(FlatField {
            name:        name.clone(),
            field_type:  self.field_type.clone(),
            mode:        self.mode().to_string(),
            description: self.description.clone()
        });
        let prefix = format!("{}.", name);
        for child in &self.fields {
            child.flatten_into(&prefix, out);
        }
    }
}

/// A field with its full dotted name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatField {
    pub name:        String,
    #[serde(rename = "type")]
    pub field_type:  String,
    pub mode:        String,
    pub description: Option<String>
}

/// Table metadata and schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    /// Fully qualified `project.dataset.table`
    pub table_id:  String,
    pub created:   Option<DateTime<Utc>>,
    pub modified:  Option<DateTime<Utc>>,
    pub num_rows:  Option<u64>,
    pub num_bytes: Option<u64>,
    #[serde(rename = "schema")]
    pub fields:    Vec<SchemaField>
}

impl TableSchema {
    pub fn new(table_id: impl Into<String>, fields: Vec<SchemaField>) -> Self {
        Self {
            table_id: table_id.into(),
            created: None,
            modified: None,
            num_rows: None,
            num_bytes: None,
            fields
        }
    }

    /// All fields including nested ones, depth first.
    pub fn flattened_fields(&self) -> Vec<FlatField> {
        self.fields.iter().flat_map(SchemaField::flatten).collect()
    }

    /// Top-level field by name.
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Type and mode of a field on one side of a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSignature {
    #[serde(rename = "type")]
    pub field_type: String,
    pub mode:       String
}

impl From<&SchemaField> for FieldSignature {
    fn from(field: &SchemaField) -> Self {
        Self {
            field_type: field.field_type.clone(),
            mode:       field.mode().to_string()
        }
    }
}

/// A field present in both tables with a different type or mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: String,
    pub from:  FieldSignature,
    pub to:    FieldSignature
}

/// Top-level field differences between two tables.
///
/// Every list is sorted by field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaDiff {
    pub table1:    String,
    pub table2:    String,
    /// Fields only in the second table
    pub added:     Vec<SchemaField>,
    /// Fields only in the first table
    pub removed:   Vec<SchemaField>,
    pub changed:   Vec<FieldChange>,
    pub unchanged: Vec<String>
}

impl SchemaDiff {
    /// Compare the top-level fields of `left` (table1) and `right` (table2).
    ///
    /// Fields are matched by name; a missing mode counts as `NULLABLE`.
    pub fn compute(table1: &str, left: &TableSchema, table2: &str, right: &TableSchema) -> Self {
        let left_fields: BTreeMap<&str, &SchemaField> =
            left.fields.iter().map(|f| (f.name.as_str(), f)).collect();
        let right_fields: BTreeMap<&str, &SchemaField> =
            right.fields.iter().map(|f| (f.name.as_str(), f)).collect();

        let mut diff = Self {
            table1:    table1.to_string(),
            table2:    table2.to_string(),
            added:     Vec::new(),
            removed:   Vec::new(),
            changed:   Vec::new(),
            unchanged: Vec::new()
        };

        for (name, field) in &left_fields {
            match right_fields.get(name) {
                None => diff.removed.push((*field).clone()),
                Some(other) => {
                    let from = FieldSignature::from(*field);
                    let to = FieldSignature::from(*other);
                    if from == to {
                        diff.unchanged.push(name.to_string());
                    } else {
                        diff.changed.push(FieldChange {
                            field: name.to_string(),
                            from,
                            to
                        });
                    }
                }
            }
        }
        diff.added = right_fields
            .iter()
            .filter(|(name, _)| !left_fields.contains_key(*name))
            .map(|(_, field)| (*field).clone())
            .collect();
        diff
    }

    /// Whether any field was added, removed or changed.
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty())
    }
}
