//! Type definitions for the lint engine.
//!
//! This module defines the core types used throughout the linter:
//! - [`Severity`] - Issue severity levels (LOW, MEDIUM, HIGH)
//! - [`Fix`] - Pattern/replacement pair attached to fixable issues
//! - [`Issue`] - Individual lint findings with location
//! - [`LintResult`] - Complete result of one lint invocation

use regex::Regex;
use serde::Serialize;

/// Severity level of a lint issue.
///
/// Ordered from lowest to highest so issues can be sorted or filtered by
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Stylistic inconsistency
    Low,
    /// Construct that is likely to cost more than necessary
    Medium,
    /// Construct that can damage data
    High
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH")
        }
    }
}

/// Automated correction for an issue.
///
/// `pattern` is a regular expression matched against the text being fixed and
/// `replacement` is an expansion template that may reference the pattern's
/// capture groups (`${1}`, `${2}`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub pattern:     String,
    pub replacement: String
}

impl Fix {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern:     pattern.into(),
            replacement: replacement.into()
        }
    }

    /// Compile the fix pattern.
    ///
    /// Returns `None` when the pattern is not a valid regular expression.
    pub fn regex(&self) -> Option<Regex> {
        Regex::new(&self.pattern).ok()
    }

    /// Apply this fix to `sql`, replacing every match of the pattern.
    ///
    /// Text is returned unchanged when the pattern does not compile or does
    /// not match.
    pub fn apply(&self, sql: &str) -> String {
        match self.regex() {
            Some(re) => re.replace_all(sql, self.replacement.as_str()).into_owned(),
            None => sql.to_string()
        }
    }
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Identifier of the rule that produced the issue (e.g., "LINT001")
    pub rule_id:  &'static str,
    /// 1-based line number in the linted text
    pub line:     usize,
    /// Human-readable description
    pub message:  String,
    /// Severity level
    pub severity: Severity,
    /// Whether [`fix`](Self::fix) is present
    pub fixable:  bool,
    /// Optional automated correction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix:      Option<Fix>
}

impl Issue {
    /// Create a non-fixable issue for the given rule.
    pub fn new(info: &RuleInfo, line: usize, message: impl Into<String>) -> Self {
        Self {
            rule_id: info.id,
            line,
            message: message.into(),
            severity: info.severity,
            fixable: false,
            fix: None
        }
    }

    /// Attach a fix, marking the issue as fixable.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fixable = true;
        self.fix = Some(fix);
        self
    }
}

/// Metadata about a rule for identification and configuration.
#[derive(Debug, Clone)]
pub struct RuleInfo {
    /// Unique rule identifier (e.g., "LINT001")
    pub id:       &'static str,
    /// Human-readable rule name
    pub name:     &'static str,
    /// Severity of issues produced by the rule
    pub severity: Severity
}

/// Result of one lint invocation.
///
/// `issues` keeps detection order: all issues of the first rule, then the
/// second, and so on. `fixed_sql` is only set when fixing was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LintResult {
    pub issues:    Vec<Issue>,
    pub fixed_sql: Option<String>
}

impl LintResult {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .count()
    }

    pub fn fixable_count(&self) -> usize {
        self.issues.iter().filter(|i| i.fixable).count()
    }

    /// Highest severity among all issues, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }
}
