//! SQL pretty-printer used as the baseline for auto-fixing.
//!
//! The formatter rewrites only whitespace and letter case:
//!
//! - keywords are upper-cased, unquoted identifiers lower-cased
//! - quoted identifiers, literals and comments are copied verbatim
//! - clause keywords start a new line, indented 4 spaces per subquery level
//! - lines soft-wrap before exceeding 80 columns
//!
//! Because tokens are never merged, split or reordered, re-tokenizing the
//! output yields the input's token sequence modulo case.

use sqlparser::{
    keywords::Keyword,
    tokenizer::{Token, Whitespace}
};

use super::tokens::{SourceToken, tokenize};

const INDENT_WIDTH: usize = 4;
const WRAP_AFTER: usize = 80;

/// Format SQL text.
///
/// Text the tokenizer cannot handle is returned unchanged.
pub fn format_sql(sql: &str) -> String {
    let Some(tokens) = tokenize(sql) else {
        return sql.to_string();
    };
    let mut formatter = Formatter::new(sql, &tokens);
    formatter.run();
    let mut out = formatter.out.trim_end().to_string();
    if sql.ends_with('\n') && !out.is_empty() {
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paren {
    Subquery,
    Group
}

struct Formatter<'a> {
    sql:           &'a str,
    tokens:        &'a [SourceToken],
    out:           String,
    line_len:      usize,
    at_line_start: bool,
    pending_space: bool,
    new_statement: bool,
    parens:        Vec<Paren>,
    prev:          Option<&'a SourceToken>
}

impl<'a> Formatter<'a> {
    fn new(sql: &'a str, tokens: &'a [SourceToken]) -> Self {
        Self {
            sql,
            tokens,
            out: String::with_capacity(sql.len()),
            line_len: 0,
            at_line_start: true,
            pending_space: false,
            new_statement: false,
            parens: Vec::new(),
            prev: None
        }
    }

    fn run(&mut self) {
        let tokens = self.tokens;
        for (idx, token) in tokens.iter().enumerate() {
            if token.is_comment() {
                self.comment(token);
            } else if token.is_trivia() {
                self.pending_space = !self.out.is_empty();
            } else {
                self.significant(idx);
            }
        }
    }

    fn indent(&self) -> usize {
        INDENT_WIDTH
            * self
                .parens
                .iter()
                .filter(|p| **p == Paren::Subquery)
                .count()
    }

    fn comment(&mut self, token: &SourceToken) {
        let text = token.text(self.sql);
        if self.at_line_start {
            self.write_indent(self.indent());
        } else if self.pending_space {
            self.write(" ");
        }
        self.write(text);
        self.pending_space = false;
        let line_comment = matches!(
            token.token,
            Token::Whitespace(Whitespace::SingleLineComment { .. })
        );
        if line_comment && !self.at_line_start {
            self.newline();
        }
    }

    fn significant(&mut self, idx: usize) {
        let tokens = self.tokens;
        let token = &tokens[idx];
        if self.new_statement {
            self.new_statement = false;
            self.parens.clear();
            if !self.at_line_start {
                self.newline();
            }
            self.newline();
        }
        let text = self.render(idx);
        if matches!(token.token, Token::RParen) {
            self.parens.pop();
        }
        if !self.out.is_empty() && !self.at_line_start && self.starts_clause(token) {
            self.newline();
        }
        if self.at_line_start {
            self.write_indent(self.indent());
        } else if self.pending_space && !matches!(token.token, Token::SemiColon) {
            let width = text.lines().next().map_or(0, |l| l.chars().count());
            // one column is kept free for a trailing comma
            if self.line_len + 1 + width >= WRAP_AFTER && self.line_len > self.indent() {
                self.newline();
                self.write_indent(self.indent() + INDENT_WIDTH);
            } else {
                self.write(" ");
            }
        }
        self.write(&text);
        self.pending_space = false;
        match token.token {
            Token::LParen => {
                let kind = if self.next_is_query(idx) {
                    Paren::Subquery
                } else {
                    Paren::Group
                };
                self.parens.push(kind);
            }
            Token::SemiColon if self.parens.is_empty() => self.new_statement = true,
            _ => {}
        }
        self.prev = Some(token);
    }

    /// Token text with keyword/identifier case normalised.
    fn render(&self, idx: usize) -> String {
        let token = &self.tokens[idx];
        let text = token.text(self.sql);
        match &token.token {
            Token::Word(w) if w.quote_style.is_none() => {
                let in_dotted_name = self.prev_is_period() || self.next_is_period(idx);
                if w.keyword != Keyword::NoKeyword && !in_dotted_name {
                    text.to_uppercase()
                } else {
                    text.to_lowercase()
                }
            }
            _ => text.to_string()
        }
    }

    fn starts_clause(&self, token: &SourceToken) -> bool {
        if self.parens.last() == Some(&Paren::Group) || self.prev_is_period() {
            return false;
        }
        let Some(keyword) = token.keyword() else {
            return false;
        };
        let prev = self.prev.and_then(SourceToken::keyword);
        match keyword {
            Keyword::SELECT => !matches!(self.prev.map(|t| &t.token), Some(Token::LParen)),
            Keyword::FROM
            | Keyword::WHERE
            | Keyword::GROUP
            | Keyword::HAVING
            | Keyword::QUALIFY
            | Keyword::WINDOW
            | Keyword::ORDER
            | Keyword::LIMIT
            | Keyword::UNION
            | Keyword::INTERSECT
            | Keyword::SET
            | Keyword::VALUES => true,
            Keyword::EXCEPT => !matches!(self.prev.map(|t| &t.token), Some(Token::Mul)),
            Keyword::LEFT | Keyword::RIGHT | Keyword::INNER | Keyword::FULL | Keyword::CROSS => {
                true
            }
            Keyword::JOIN => !matches!(
                prev,
                Some(
                    Keyword::LEFT
                        | Keyword::RIGHT
                        | Keyword::INNER
                        | Keyword::FULL
                        | Keyword::CROSS
                        | Keyword::OUTER
                )
            ),
            _ => false
        }
    }

    fn next_significant(&self, idx: usize) -> Option<&'a SourceToken> {
        let tokens: &'a [SourceToken] = self.tokens;
        tokens[idx + 1..].iter().find(|t| !t.is_trivia())
    }

    fn next_is_query(&self, idx: usize) -> bool {
        self.next_significant(idx)
            .and_then(SourceToken::keyword)
            .is_some_and(|k| matches!(k, Keyword::SELECT | Keyword::WITH))
    }

    fn next_is_period(&self, idx: usize) -> bool {
        self.tokens
            .get(idx + 1)
            .is_some_and(|t| matches!(t.token, Token::Period))
    }

    fn prev_is_period(&self) -> bool {
        self.prev
            .is_some_and(|t| matches!(t.token, Token::Period))
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.line_len = 0;
        self.at_line_start = true;
    }

    fn write_indent(&mut self, width: usize) {
        self.out.extend(std::iter::repeat_n(' ', width));
        self.line_len += width;
        self.at_line_start = false;
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
        match text.rfind('\n') {
            Some(pos) => {
                self.line_len = text[pos + 1..].chars().count();
                self.at_line_start = pos + 1 == text.len();
            }
            None => {
                self.line_len += text.chars().count();
                self.at_line_start = false;
            }
        }
    }
}
