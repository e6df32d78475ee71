use sqlparser::keywords::Keyword;

use super::Rule;
use crate::lint::{
    statement::{StatementType, split_statements},
    tokens::tokenize_statements,
    types::{Issue, RuleInfo, Severity}
};

/// DELETE or UPDATE without a WHERE clause affects every row
///
/// Only the statement's own clauses count: a WHERE inside a subquery does not
/// restrict the outer statement.
pub struct MissingWhere;

impl Rule for MissingWhere {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "LINT001",
            name:     "DELETE/UPDATE without WHERE",
            severity: Severity::High
        }
    }

    fn check(&self, sql: &str) -> Vec<Issue> {
        let tokens = tokenize_statements(sql);
        let info = self.info();
        split_statements(&tokens)
            .into_iter()
            .filter(|stmt| matches!(stmt.kind, StatementType::Delete | StatementType::Update))
            .filter(|stmt| !stmt.has_top_level_keyword(Keyword::WHERE))
            .map(|stmt| {
                Issue::new(
                    &info,
                    stmt.line,
                    format!(
                        "{} statement without WHERE clause (potential table-wide operation)",
                        stmt.kind
                    )
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(sql: &str) -> Vec<Issue> {
        MissingWhere.check(sql)
    }

    #[test]
    fn test_delete_without_where() {
        let issues = check("DELETE FROM t");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 1);
        assert_eq!(issues[0].severity, Severity::High);
        assert!(issues[0].message.starts_with("DELETE statement without WHERE"));
        assert!(!issues[0].fixable);
    }

    #[test]
    fn test_delete_with_where() {
        assert!(check("DELETE FROM t WHERE id=1").is_empty());
    }

    #[test]
    fn test_update_without_where() {
        let issues = check("update users set active = false");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.starts_with("UPDATE statement"));
    }

    #[test]
    fn test_update_with_lowercase_where() {
        assert!(check("update users set active = false where id = 3").is_empty());
    }

    #[test]
    fn test_where_in_subquery_does_not_count() {
        let issues = check("UPDATE t SET a = (SELECT MAX(b) FROM u WHERE u.k = 1)");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_where_with_subquery_condition() {
        assert!(check("DELETE FROM t WHERE id IN (SELECT id FROM u)").is_empty());
    }

    #[test]
    fn test_statement_line_numbers() {
        let sql = "SELECT 1;\n\nDELETE FROM a WHERE x = 1;\nUPDATE b\nSET c = 1;";
        let issues = check(sql);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 4);
    }

    #[test]
    fn test_select_only_text_has_no_issues() {
        assert!(check("SELECT * FROM t; SELECT a FROM b WHERE c = 1").is_empty());
        assert!(check("INSERT INTO t (a) VALUES (1)").is_empty());
    }

    #[test]
    fn test_where_inside_comment_does_not_count() {
        assert_eq!(check("DELETE FROM t -- WHERE id = 1").len(), 1);
    }

    #[test]
    fn test_malformed_statement_does_not_hide_others() {
        let issues = check("DELETE FROM t;\nSELECT 'unterminated");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 1);
        assert!(issues[0].message.starts_with("DELETE statement"));
    }

    #[test]
    fn test_malformed_statement_alone_yields_nothing() {
        assert!(check("DELETE FROM t WHERE name = 'unterminated").is_empty());
    }
}
