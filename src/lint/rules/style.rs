use std::sync::LazyLock;

use regex::Regex;

use super::Rule;
use crate::lint::{
    tokens::line_at,
    types::{Fix, Issue, RuleInfo, Severity}
};

static SELECT_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)SELECT\s+\*\s+FROM").expect("SELECT * pattern is valid"));

static FROM_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bFROM\s+(`?[A-Za-z0-9._]+`?)").expect("FROM table pattern is valid")
});

static CLAUSE_AFTER_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\s+(?:JOIN|WHERE|GROUP|ORDER|LIMIT)\b|\s*;|\s*$)")
        .expect("clause pattern is valid")
});

static SELECT_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bSELECT\s+(.*?)\s+FROM\b").expect("SELECT list pattern is valid")
});

/// SELECT * scans every column of the table
pub struct SelectStar;

impl Rule for SelectStar {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "LINT002",
            name:     "SELECT * usage",
            severity: Severity::Medium
        }
    }

    fn check(&self, sql: &str) -> Vec<Issue> {
        let info = self.info();
        SELECT_STAR
            .find_iter(sql)
            .map(|m| {
                Issue::new(
                    &info,
                    line_at(sql, m.start()),
                    "Use of SELECT * (consider specifying columns explicitly)"
                )
            })
            .collect()
    }
}

/// Table in FROM without an alias
///
/// Only tables directly followed by a clause keyword, a semicolon, or the end
/// of the text are reported; anything else after the name is assumed to be an
/// alias. The fix inserts `AS <first letter of the table name>`.
pub struct MissingTableAlias;

impl Rule for MissingTableAlias {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "LINT003",
            name:     "Missing table alias",
            severity: Severity::Low
        }
    }

    fn check(&self, sql: &str) -> Vec<Issue> {
        let info = self.info();
        let mut issues = Vec::new();
        for caps in FROM_TABLE.captures_iter(sql) {
            let (Some(whole), Some(table)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(trailing) = CLAUSE_AFTER_TABLE.find(&sql[whole.end()..]) else {
                continue;
            };
            let name = table.as_str().trim_matches('`');
            let Some(alias) = suggest_alias(name) else {
                continue;
            };
            let fix = Fix::new(
                format!(
                    r"(?i)\bFROM\s+({}){}",
                    regex::escape(table.as_str()),
                    trailing_pattern(trailing.as_str())
                ),
                format!("FROM ${{1}} AS {alias}${{2}}")
            );
            issues.push(
                Issue::new(
                    &info,
                    line_at(sql, whole.start()),
                    format!("Table '{name}' has no alias (suggestion: '{alias}')")
                )
                .with_fix(fix)
            );
        }
        issues
    }
}

/// First letter of the last dotted segment, lower-cased.
fn suggest_alias(table: &str) -> Option<String> {
    let segment = table.rsplit('.').next()?;
    let first = segment.chars().next()?;
    Some(first.to_lowercase().collect())
}

/// Pattern matching the text that followed the table name.
///
/// Whitespace is matched loosely so the fix still applies after reformatting.
fn trailing_pattern(trailing: &str) -> String {
    let keyword = trailing.trim();
    if keyword.is_empty() {
        r"(\s*)$".to_string()
    } else if keyword == ";" {
        r"(\s*;)".to_string()
    } else {
        format!(r"(\s+{}\b)", regex::escape(keyword))
    }
}

/// Mixed backtick-quoted and plain columns in a SELECT list
///
/// Only the first SELECT list is inspected, and only when the text contains a
/// backtick somewhere. Function calls and arithmetic expressions are ignored.
pub struct InconsistentColumnQuoting;

impl Rule for InconsistentColumnQuoting {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            id:       "LINT004",
            name:     "Inconsistent column quoting",
            severity: Severity::Low
        }
    }

    fn check(&self, sql: &str) -> Vec<Issue> {
        if !sql.contains('`') {
            return vec![];
        }
        let Some(caps) = SELECT_LIST.captures(sql) else {
            return vec![];
        };
        let (Some(whole), Some(list)) = (caps.get(0), caps.get(1)) else {
            return vec![];
        };
        let (quoted, plain) = split_top_level(list.as_str())
            .into_iter()
            .map(str::trim)
            .filter(|col| !col.is_empty())
            .filter(|col| !col.contains(['(', '+', '-', '*', '/']))
            .fold((0usize, 0usize), |(quoted, plain), col| {
                if col.contains('`') {
                    (quoted + 1, plain)
                } else {
                    (quoted, plain + 1)
                }
            });
        if quoted > 0 && plain > 0 {
            return vec![Issue::new(
                &self.info(),
                line_at(sql, whole.start()),
                "Inconsistent column quoting (use backticks consistently for all columns)"
            )];
        }
        vec![]
    }
}

/// Split on commas outside parentheses and brackets.
fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}
