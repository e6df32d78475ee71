//! SQL linting for BigQuery queries.
//!
//! The linter runs a fixed, ordered set of text checks (see [`rules`]) and
//! optionally produces a fixed version of the input.
//!
//! # Pipeline
//!
//! ```text
//! SQL text ─▶ rules (in order) ─▶ issues
//!     │                             │
//!     └─▶ format_sql ─▶ baseline ─▶ apply fixes ─▶ fixed_sql
//! ```
//!
//! Fixes are applied to the formatted baseline, in detection order, in a
//! single pass: every fix matches against the baseline, a match overlapping an
//! earlier fix's match is dropped, and replacements are never re-scanned.
//!
//! # Example
//!
//! ```
//! use bq_bench::lint::{Severity, lint};
//!
//! let result = lint("DELETE FROM logs", false);
//! assert_eq!(result.issues.len(), 1);
//! assert_eq!(result.issues[0].severity, Severity::High);
//! assert!(result.fixed_sql.is_none());
//! ```

mod format;
pub mod rules;
mod statement;
mod tokens;
mod types;

use std::ops::Range;

pub use format::format_sql;
pub use rules::Rule;
pub use statement::StatementType;
pub use types::{Fix, Issue, LintResult, RuleInfo, Severity};

use crate::config::LintConfig;

/// Lint `sql` with every built-in rule.
pub fn lint(sql: &str, fix: bool) -> LintResult {
    Linter::new().lint(sql, fix)
}

/// Ordered rule set.
///
/// The linter holds no state between calls and can be shared across threads.
pub struct Linter {
    rules: Vec<Box<dyn Rule>>
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

impl Linter {
    /// Linter with all built-in rules.
    pub fn new() -> Self {
        Self {
            rules: rules::builtin_rules()
        }
    }

    /// Linter without the rules disabled in `config`.
    ///
    /// Rule IDs are compared case-insensitively; unknown IDs are ignored.
    pub fn with_config(config: &LintConfig) -> Self {
        let rules = rules::builtin_rules()
            .into_iter()
            .filter(|r| {
                !config
                    .disabled
                    .iter()
                    .any(|d| d.eq_ignore_ascii_case(r.info().id))
            })
            .collect();
        Self {
            rules
        }
    }

    /// Metadata of the active rules in execution order.
    pub fn rule_infos(&self) -> Vec<RuleInfo> {
        self.rules.iter().map(|r| r.info()).collect()
    }

    /// Run every rule and concatenate the issues in rule order.
    pub fn check(&self, sql: &str) -> Vec<Issue> {
        let issues: Vec<Issue> = self.rules.iter().flat_map(|r| r.check(sql)).collect();
        tracing::debug!(
            rules = self.rules.len(),
            issues = issues.len(),
            "lint checks finished"
        );
        issues
    }

    /// Check `sql` and, when `fix` is set, produce the fixed text.
    pub fn lint(&self, sql: &str, fix: bool) -> LintResult {
        let issues = self.check(sql);
        let fixed_sql = fix.then(|| apply_fixes(&format_sql(sql), &issues));
        LintResult {
            issues,
            fixed_sql
        }
    }
}

/// Apply the fixes carried by `issues` to `formatted`.
///
/// All patterns are matched against `formatted` itself. A match that overlaps
/// a match claimed by an earlier fix is skipped.
pub fn apply_fixes(formatted: &str, issues: &[Issue]) -> String {
    let mut claimed: Vec<(Range<usize>, String)> = Vec::new();
    for fix in issues.iter().filter_map(|i| i.fix.as_ref()) {
        let Some(re) = fix.regex() else {
            tracing::warn!(pattern = %fix.pattern, "skipping fix with invalid pattern");
            continue;
        };
        for caps in re.captures_iter(formatted) {
            let Some(m) = caps.get(0) else {
                continue;
            };
            let span = m.range();
            if span.is_empty() || claimed.iter().any(|(c, _)| overlaps(c, &span)) {
                continue;
            }
            let mut replacement = String::new();
            caps.expand(&fix.replacement, &mut replacement);
            claimed.push((span, replacement));
        }
    }
    claimed.sort_by_key(|(span, _)| span.start);

    let mut out = String::with_capacity(formatted.len() + claimed.len() * 8);
    let mut pos = 0;
    for (span, replacement) in claimed {
        out.push_str(&formatted[pos..span.start]);
        out.push_str(&replacement);
        pos = span.end;
    }
    out.push_str(&formatted[pos..]);
    out
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issues_in_rule_order() {
        let sql = "SELECT * FROM orders;\nDELETE FROM orders";
        let ids: Vec<&str> = lint(sql, false).issues.iter().map(|i| i.rule_id).collect();
        assert_eq!(ids, vec!["LINT001", "LINT002", "LINT003", "LINT003"]);
    }

    #[test]
    fn test_no_fix_leaves_fixed_sql_empty() {
        assert!(lint("SELECT a FROM t", false).fixed_sql.is_none());
        assert!(lint("SELECT a FROM t", true).fixed_sql.is_some());
    }

    #[test]
    fn test_lint_is_idempotent() {
        let sql = "SELECT `a`, b FROM dataset.table;\nUPDATE t SET x = 1";
        assert_eq!(lint(sql, false), lint(sql, false));
    }

    #[test]
    fn test_fix_applies_to_formatted_text() {
        let result = lint("select col1 from dataset.table", true);
        assert_eq!(
            result.fixed_sql.as_deref(),
            Some("SELECT col1\nFROM dataset.table AS t")
        );
    }

    #[test]
    fn test_fix_keeps_trailing_clause() {
        let result = lint("select col1 from web_orders where col1 > 1", true);
        assert_eq!(
            result.fixed_sql.as_deref(),
            Some("SELECT col1\nFROM web_orders AS w\nWHERE col1 > 1")
        );
    }

    #[test]
    fn test_clean_sql_is_only_formatted() {
        let result = lint("select col1 from web_orders wo", true);
        assert!(result.is_clean());
        assert_eq!(
            result.fixed_sql.as_deref(),
            Some("SELECT col1\nFROM web_orders wo")
        );
    }

    #[test]
    fn test_identical_fixes_apply_once() {
        let result = lint("SELECT col1 FROM t1;\nSELECT col2 FROM t1;", true);
        assert_eq!(result.fixable_count(), 2);
        assert_eq!(
            result.fixed_sql.as_deref(),
            Some("SELECT col1\nFROM t1 AS t;\n\nSELECT col2\nFROM t1 AS t;")
        );
    }

    #[test]
    fn test_overlapping_matches_are_skipped() {
        let info = RuleInfo {
            id:       "TEST",
            name:     "test",
            severity: Severity::Low
        };
        let issues = vec![
            Issue::new(&info, 1, "a").with_fix(Fix::new("abc", "X")),
            Issue::new(&info, 1, "b").with_fix(Fix::new("bcd", "Y")),
            Issue::new(&info, 1, "c").with_fix(Fix::new("e", "Z")),
        ];
        assert_eq!(apply_fixes("abcde", &issues), "XdZ");
    }

    #[test]
    fn test_replacement_not_rescanned() {
        let info = RuleInfo {
            id:       "TEST",
            name:     "test",
            severity: Severity::Low
        };
        let issues = vec![
            Issue::new(&info, 1, "a").with_fix(Fix::new("a", "b")),
            Issue::new(&info, 1, "b").with_fix(Fix::new("b", "c")),
        ];
        assert_eq!(apply_fixes("ab", &issues), "bc");
    }

    #[test]
    fn test_disabled_rules() {
        let config = LintConfig {
            disabled: vec!["lint002".into(), "LINT003".into(), "UNKNOWN".into()]
        };
        let linter = Linter::with_config(&config);
        let ids: Vec<&str> = linter.rule_infos().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["LINT001", "LINT004"]);
        assert!(linter.lint("SELECT * FROM orders", false).is_clean());
    }

    #[test]
    fn test_malformed_sql_never_fails() {
        let sql = "DELETE logs; SELECT 'unterminated";
        let result = lint(sql, true);
        let ids: Vec<&str> = result.issues.iter().map(|i| i.rule_id).collect();
        assert_eq!(ids, vec!["LINT001"]);
        assert_eq!(result.fixed_sql.as_deref(), Some(sql));
    }
}
