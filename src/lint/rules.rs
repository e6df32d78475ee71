//! Built-in lint rules.
//!
//! Rules are stateless text checks implementing [`Rule`]. They never share
//! state and never fail: text a rule cannot make sense of simply produces no
//! issues for that rule.
//!
//! | ID | Name | Severity | Fixable |
//! |----|------|----------|---------|
//! | LINT001 | DELETE/UPDATE without WHERE | HIGH | no |
//! | LINT002 | SELECT * usage | MEDIUM | no |
//! | LINT003 | Missing table alias | LOW | yes |
//! | LINT004 | Inconsistent column quoting | LOW | no |
//!
//! All checks are heuristics over raw text and tokens. Matches inside
//! comments or string literals are reported like any other text.

mod security;
mod style;

pub use security::MissingWhere;
pub use style::{InconsistentColumnQuoting, MissingTableAlias, SelectStar};

use super::types::{Issue, RuleInfo};

/// Trait for implementing lint rules.
///
/// # Example
///
/// ```
/// use bq_bench::lint::{Issue, Rule, RuleInfo, Severity};
///
/// struct NoCrossJoin;
///
/// impl Rule for NoCrossJoin {
///     fn info(&self) -> RuleInfo {
///         RuleInfo {
///             id:       "CUSTOM001",
///             name:     "CROSS JOIN usage",
///             severity: Severity::Medium
///         }
///     }
///
///     fn check(&self, sql: &str) -> Vec<Issue> {
///         if sql.to_uppercase().contains("CROSS JOIN") {
///             vec![Issue::new(&self.info(), 1, "CROSS JOIN detected")]
///         } else {
///             vec![]
///         }
///     }
/// }
///
/// assert_eq!(NoCrossJoin.check("SELECT 1 FROM a CROSS JOIN b").len(), 1);
/// ```
pub trait Rule: Send + Sync {
    /// Returns metadata about this rule.
    fn info(&self) -> RuleInfo;

    /// Checks raw SQL text and returns issues in the order they were found.
    fn check(&self, sql: &str) -> Vec<Issue>;
}

/// All built-in rules in execution order.
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(MissingWhere),
        Box::new(SelectStar),
        Box::new(MissingTableAlias),
        Box::new(InconsistentColumnQuoting),
    ]
}
