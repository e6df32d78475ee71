use std::fmt;

use crate::error::{AppResult, config_error, table_ref_error};

/// Fully qualified table reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub project: String,
    pub dataset: String,
    pub table:   String
}

impl TableRef {
    /// Parse `project.dataset.table` or `dataset.table`.
    ///
    /// A two-part reference takes its project from `default_project`.
    /// Surrounding backticks are ignored.
    pub fn parse(reference: &str, default_project: Option<&str>) -> AppResult<Self> {
        let parts: Vec<&str> = reference.trim().trim_matches('`').split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(table_ref_error(reference));
        }
        match parts.as_slice() {
            [project, dataset, table] => Ok(Self {
                project: project.to_string(),
                dataset: dataset.to_string(),
                table:   table.to_string()
            }),
            [dataset, table] => {
                let project = default_project.ok_or_else(|| {
                    config_error(format!(
                        "Project ID is required for '{}' (use --project or GOOGLE_CLOUD_PROJECT)",
                        reference
                    ))
                })?;
                Ok(Self {
                    project: project.to_string(),
                    dataset: dataset.to_string(),
                    table:   table.to_string()
                })
            }
            _ => Err(table_ref_error(reference))
        }
    }

    /// REST resource path below the API base URL.
    pub fn path(&self) -> String {
        format!(
            "projects/{}/datasets/{}/tables/{}",
            self.project, self.dataset, self.table
        )
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_parts() {
        let table = TableRef::parse("proj.sales.orders", None).unwrap();
        assert_eq!(table.project, "proj");
        assert_eq!(table.dataset, "sales");
        assert_eq!(table.table, "orders");
        assert_eq!(table.to_string(), "proj.sales.orders");
    }

    #[test]
    fn test_parse_two_parts_uses_default_project() {
        let table = TableRef::parse("sales.orders", Some("fallback")).unwrap();
        assert_eq!(table.project, "fallback");
        assert_eq!(table.path(), "projects/fallback/datasets/sales/tables/orders");
    }

    #[test]
    fn test_parse_two_parts_without_project() {
        assert!(TableRef::parse("sales.orders", None).is_err());
    }

    #[test]
    fn test_parse_backticks() {
        let table = TableRef::parse("`p.d.t`", None).unwrap();
        assert_eq!(table.to_string(), "p.d.t");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(TableRef::parse("orders", Some("p")).is_err());
        assert!(TableRef::parse("a.b.c.d", Some("p")).is_err());
        assert!(TableRef::parse("p..t", Some("p")).is_err());
    }
}
