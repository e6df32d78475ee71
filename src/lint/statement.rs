//! Top-level statement scanning.
//!
//! Splits a token stream at depth-0 semicolons and classifies each statement
//! by its leading keyword. Parenthesis depth is tracked per token so checks can
//! restrict themselves to the statement's own clauses and ignore subqueries.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use super::tokens::SourceToken;

/// Classified statement type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Merge,
    Create,
    Drop,
    Alter,
    Truncate,
    Unknown
}

impl std::fmt::Display for StatementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Merge => "MERGE",
            Self::Create => "CREATE",
            Self::Drop => "DROP",
            Self::Alter => "ALTER",
            Self::Truncate => "TRUNCATE",
            Self::Unknown => "UNKNOWN"
        };
        f.write_str(name)
    }
}

impl StatementType {
    fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::SELECT => Some(Self::Select),
            Keyword::INSERT => Some(Self::Insert),
            Keyword::UPDATE => Some(Self::Update),
            Keyword::DELETE => Some(Self::Delete),
            Keyword::MERGE => Some(Self::Merge),
            Keyword::CREATE => Some(Self::Create),
            Keyword::DROP => Some(Self::Drop),
            Keyword::ALTER => Some(Self::Alter),
            Keyword::TRUNCATE => Some(Self::Truncate),
            _ => None
        }
    }

    fn is_dml(self) -> bool {
        matches!(
            self,
            Self::Select | Self::Insert | Self::Update | Self::Delete | Self::Merge
        )
    }
}

/// A significant (non-whitespace, non-comment) token inside a statement.
#[derive(Debug, Clone, Copy)]
pub struct ScannedToken<'a> {
    pub token: &'a SourceToken,
    /// Parenthesis depth relative to the start of the statement
    pub depth: usize
}

/// One top-level statement.
#[derive(Debug, Clone)]
pub struct Statement<'a> {
    pub kind:   StatementType,
    /// Line of the first significant token
    pub line:   usize,
    pub tokens: Vec<ScannedToken<'a>>
}

impl Statement<'_> {
    /// Whether `keyword` appears outside any parentheses of this statement.
    pub fn has_top_level_keyword(&self, keyword: Keyword) -> bool {
        self.tokens
            .iter()
            .any(|t| t.depth == 0 && t.token.is_keyword(keyword))
    }
}

/// Split tokens into top-level statements.
///
/// Empty statements (stray semicolons, comment-only tails) are dropped.
pub fn split_statements(tokens: &[SourceToken]) -> Vec<Statement<'_>> {
    let mut statements = Vec::new();
    let mut current: Vec<ScannedToken<'_>> = Vec::new();
    let mut depth = 0usize;
    for token in tokens.iter().filter(|t| !t.is_trivia()) {
        match token.token {
            Token::SemiColon if depth == 0 => {
                if let Some(stmt) = build_statement(std::mem::take(&mut current)) {
                    statements.push(stmt);
                }
                continue;
            }
            Token::LParen => {
                current.push(ScannedToken {
                    token,
                    depth
                });
                depth += 1;
                continue;
            }
            Token::RParen => depth = depth.saturating_sub(1),
            _ => {}
        }
        current.push(ScannedToken {
            token,
            depth
        });
    }
    if let Some(stmt) = build_statement(current) {
        statements.push(stmt);
    }
    statements
}

fn build_statement(tokens: Vec<ScannedToken<'_>>) -> Option<Statement<'_>> {
    let line = tokens.first()?.token.line;
    Some(Statement {
        kind: classify(&tokens),
        line,
        tokens
    })
}

/// Classify by the first keyword after any leading parentheses.
///
/// A leading `WITH` is skipped in favour of the first depth-0 DML keyword,
/// which belongs to the main query rather than a CTE body.
fn classify(tokens: &[ScannedToken<'_>]) -> StatementType {
    let Some(first) = tokens
        .iter()
        .find(|t| !matches!(t.token.token, Token::LParen))
    else {
        return StatementType::Unknown;
    };
    match first.token.keyword() {
        Some(Keyword::WITH) => tokens
            .iter()
            .filter(|t| t.depth == 0)
            .filter_map(|t| t.token.keyword().and_then(StatementType::from_keyword))
            .find(|kind| kind.is_dml())
            .unwrap_or(StatementType::Unknown),
        Some(keyword) => StatementType::from_keyword(keyword).unwrap_or(StatementType::Unknown),
        None => StatementType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::tokens::tokenize;

    fn kinds(sql: &str) -> Vec<StatementType> {
        let tokens = tokenize(sql).unwrap();
        split_statements(&tokens).iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_splits_on_semicolons() {
        assert_eq!(
            kinds("SELECT 1; DELETE FROM t; UPDATE t SET a = 1"),
            vec![
                StatementType::Select,
                StatementType::Delete,
                StatementType::Update
            ]
        );
    }

    #[test]
    fn test_skips_empty_statements() {
        assert_eq!(kinds(";; SELECT 1;;"), vec![StatementType::Select]);
        assert!(kinds("-- only a comment\n").is_empty());
    }

    #[test]
    fn test_with_classified_by_main_query() {
        assert_eq!(
            kinds("WITH x AS (SELECT 1) DELETE FROM t WHERE id IN (SELECT * FROM x)"),
            vec![StatementType::Delete]
        );
    }

    #[test]
    fn test_parenthesized_select() {
        assert_eq!(kinds("(SELECT 1)"), vec![StatementType::Select]);
    }

    #[test]
    fn test_unknown_statement() {
        assert_eq!(kinds("foo bar"), vec![StatementType::Unknown]);
    }

    #[test]
    fn test_statement_line_skips_comments() {
        let sql = "SELECT 1;\n-- cleanup\n\nDELETE FROM t";
        let tokens = tokenize(sql).unwrap();
        let statements = split_statements(&tokens);
        assert_eq!(statements[1].line, 4);
    }

    #[test]
    fn test_top_level_keyword_ignores_subqueries() {
        let sql = "UPDATE t SET a = (SELECT b FROM c WHERE c.id = 1)";
        let tokens = tokenize(sql).unwrap();
        let statements = split_statements(&tokens);
        assert!(!statements[0].has_top_level_keyword(Keyword::WHERE));
        assert!(statements[0].has_top_level_keyword(Keyword::SET));
    }

    #[test]
    fn test_semicolon_inside_parens_does_not_split() {
        assert_eq!(kinds("SELECT (1; 2)").len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(StatementType::Delete.to_string(), "DELETE");
    }
}
