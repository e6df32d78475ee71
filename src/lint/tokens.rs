//! Source-anchored tokenization.
//!
//! Wraps the `sqlparser` tokenizer (BigQuery dialect) and maps every token
//! back to the byte range it occupies in the original text, so callers can
//! reuse exact source slices instead of re-rendering tokens.

use std::ops::Range;

use sqlparser::{
    dialect::BigQueryDialect,
    keywords::Keyword,
    tokenizer::{Token, Tokenizer, Whitespace}
};

/// A token together with its location in the source text.
#[derive(Debug, Clone)]
pub struct SourceToken {
    pub token: Token,
    /// Byte range in the source text
    pub range: Range<usize>,
    /// 1-based line of the first character
    pub line:  usize
}

impl SourceToken {
    /// Source slice covered by this token.
    pub fn text<'a>(&self, sql: &'a str) -> &'a str {
        &sql[self.range.clone()]
    }

    /// Spaces, tabs, newlines and comments.
    pub fn is_trivia(&self) -> bool {
        matches!(self.token, Token::Whitespace(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(
            self.token,
            Token::Whitespace(Whitespace::SingleLineComment { .. })
                | Token::Whitespace(Whitespace::MultiLineComment(_))
        )
    }

    /// Keyword of an unquoted word token, `None` for anything else.
    pub fn keyword(&self) -> Option<Keyword> {
        match &self.token {
            Token::Word(w) if w.quote_style.is_none() && w.keyword != Keyword::NoKeyword => {
                Some(w.keyword)
            }
            _ => None
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }
}

/// Tokenize `sql` with source ranges.
///
/// Returns `None` when the tokenizer rejects the text (for example an
/// unterminated string literal).
pub fn tokenize(sql: &str) -> Option<Vec<SourceToken>> {
    let dialect = BigQueryDialect {};
    let tokens = match Tokenizer::new(&dialect, sql).tokenize_with_location() {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::debug!(error = %e, "tokenizer rejected input");
            return None;
        }
    };
    let line_starts = line_starts(sql);
    let starts: Vec<usize> = tokens
        .iter()
        .map(|t| {
            offset_of(
                sql,
                &line_starts,
                t.span.start.line as usize,
                t.span.start.column as usize
            )
        })
        .collect();
    let mut out = Vec::with_capacity(tokens.len());
    for (idx, t) in tokens.into_iter().enumerate() {
        let start = starts[idx];
        let end = starts.get(idx + 1).copied().unwrap_or(sql.len()).max(start);
        out.push(SourceToken {
            token: t.token,
            range: start..end,
            line:  t.span.start.line.max(1) as usize
        });
    }
    Some(out)
}

/// Tokenize `sql`, dropping only the statements the tokenizer rejects.
///
/// The text is first cut at depth-0 semicolons outside quotes and comments,
/// then each piece is tokenized on its own. Ranges and lines of the kept
/// tokens refer to the full text.
pub fn tokenize_statements(sql: &str) -> Vec<SourceToken> {
    if let Some(tokens) = tokenize(sql) {
        return tokens;
    }
    let mut out = Vec::new();
    for (offset, chunk) in raw_statements(sql) {
        let Some(tokens) = tokenize(chunk) else {
            tracing::debug!(line = line_at(sql, offset), "skipping untokenizable statement");
            continue;
        };
        let base_line = line_at(sql, offset) - 1;
        out.extend(tokens.into_iter().map(|t| SourceToken {
            token: t.token,
            range: t.range.start + offset..t.range.end + offset,
            line:  t.line + base_line
        }));
    }
    out
}

/// Cut raw text after each depth-0 `;` that is not inside a quote or comment.
///
/// Yields `(byte offset, piece)`; the terminating `;` stays with its piece.
fn raw_statements(sql: &str) -> Vec<(usize, &str)> {
    let bytes = sql.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' && quote != b'`' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 1;
            }
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b';' if depth == 0 => {
                pieces.push((start, &sql[start..=i]));
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < sql.len() {
        pieces.push((start, &sql[start..]));
    }
    pieces
}

/// 1-based line number of a byte offset.
pub fn line_at(sql: &str, offset: usize) -> usize {
    1 + sql
        .as_bytes()
        .iter()
        .take(offset.min(sql.len()))
        .filter(|b| **b == b'\n')
        .count()
}

fn line_starts(sql: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        sql.bytes()
            .enumerate()
            .filter(|(_, b)| *b == b'\n')
            .map(|(i, _)| i + 1)
    );
    starts
}

/// Convert a 1-based line/column (columns count characters) to a byte offset.
fn offset_of(sql: &str, line_starts: &[usize], line: usize, column: usize) -> usize {
    let Some(&line_start) = line_starts.get(line.saturating_sub(1)) else {
        return sql.len();
    };
    sql[line_start..]
        .char_indices()
        .nth(column.saturating_sub(1))
        .map(|(i, _)| line_start + i)
        .unwrap_or(sql.len())
}
