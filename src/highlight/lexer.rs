// src/highlight/lexer.rs

//! Single left-to-right scan of one line into classified tokens.
//! Nothing survives between calls; every line is scanned from position zero.

use log::trace;

use super::keywords::{
    follows_assignment, follows_return_or_yield, is_builtin, is_ident_continue, is_ident_start,
    is_keyword, is_pascal_case, is_sql_keyword, starts_with_sql_clause,
};
use super::{HighlightOptions, Token, TokenKind};

const TRIPLE_DOUBLE: &str = "\"\"\"";
const TRIPLE_SINGLE: &str = "'''";

/// Scanner state for a single line. `pos` is a byte offset that always sits
/// on a char boundary.
pub(super) struct LineLexer<'a> {
    line: &'a str,
    pos: usize,
    options: HighlightOptions,
    tokens: Vec<Token<'a>>,
}

impl<'a> LineLexer<'a> {
    pub(super) fn new(line: &'a str, options: HighlightOptions) -> Self {
        LineLexer {
            line,
            pos: 0,
            options,
            tokens: Vec::new(),
        }
    }

    /// Consumes the lexer and returns the line's tokens.
    pub(super) fn tokenize(mut self) -> Vec<Token<'a>> {
        if let Some(kind) = self.whole_line_kind() {
            self.pos = self.line.len();
            self.push(0, kind);
            return self.tokens;
        }

        while let Some(c) = self.peek() {
            let start = self.pos;
            let kind = match c {
                '"' | '\'' => {
                    self.scan_string(c);
                    TokenKind::String
                }
                c if c.is_ascii_digit() => {
                    self.scan_while(|c| c.is_ascii_digit() || c == '.' || c == '_');
                    TokenKind::Number
                }
                c if is_ident_start(c) => {
                    self.scan_while(is_ident_continue);
                    self.classify_word(start)
                }
                '@' if self.peek_second().is_some_and(is_ident_start) => {
                    self.bump();
                    self.scan_while(is_ident_continue);
                    TokenKind::Decorator
                }
                '#' if self.options.contains(HighlightOptions::INLINE_COMMENTS)
                    && quotes_balanced(&self.line[..start]) =>
                {
                    self.pos = self.line.len();
                    TokenKind::Comment
                }
                c => {
                    self.bump();
                    if c.is_whitespace() {
                        TokenKind::Text
                    } else {
                        TokenKind::Operator
                    }
                }
            };
            self.push(start, kind);
        }

        trace!("lexed {} tokens from {:?}", self.tokens.len(), self.line);
        self.tokens
    }

    /// Lines that are classified as a whole before any scanning.
    fn whole_line_kind(&self) -> Option<TokenKind> {
        let trimmed = self.line.trim();
        if trimmed.is_empty() {
            // Placeholder that keeps the line's height; its text is the line itself.
            return Some(TokenKind::Text);
        }
        if trimmed.starts_with('#') {
            return Some(TokenKind::Comment);
        }
        if self.options.contains(HighlightOptions::CONTINUATION_LINES)
            && (starts_with_sql_clause(self.line)
                || trimmed.starts_with(TRIPLE_DOUBLE)
                || trimmed.starts_with(TRIPLE_SINGLE))
        {
            return Some(TokenKind::String);
        }
        None
    }

    fn classify_word(&self, start: usize) -> TokenKind {
        let word = &self.line[start..self.pos];
        let before = &self.line[..start];

        if is_keyword(word) {
            TokenKind::Keyword
        } else if self.options.contains(HighlightOptions::SQL_KEYWORDS) && is_sql_keyword(word) {
            TokenKind::SqlKeyword
        } else if is_builtin(word) {
            TokenKind::Builtin
        } else if self.peek() == Some('(')
            && !follows_return_or_yield(before)
            && !follows_assignment(before)
        {
            TokenKind::Function
        } else if is_pascal_case(word) {
            TokenKind::Class
        } else {
            TokenKind::Text
        }
    }

    /// Consumes a quoted run starting at the opening quote. Unterminated
    /// strings run to the end of the line.
    fn scan_string(&mut self, quote: char) {
        let triple = if quote == '"' {
            TRIPLE_DOUBLE
        } else {
            TRIPLE_SINGLE
        };

        if self.line[self.pos..].starts_with(triple) {
            self.pos += triple.len();
            self.pos = match self.line[self.pos..].find(triple) {
                Some(offset) => self.pos + offset + triple.len(),
                None => self.line.len(),
            };
            return;
        }

        self.bump();
        let escapes = self.options.contains(HighlightOptions::ESCAPES);
        while let Some(c) = self.bump() {
            if c == quote {
                return;
            }
            if c == '\\' && escapes {
                self.bump();
            }
        }
    }

    fn scan_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.line[self.pos..].chars().next()
    }

    #[inline]
    fn peek_second(&self) -> Option<char> {
        self.line[self.pos..].chars().nth(1)
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn push(&mut self, start: usize, kind: TokenKind) {
        self.tokens.push(Token {
            text: &self.line[start..self.pos],
            kind,
        });
    }
}

/// A `#` only opens a comment when the text before it has an even number of
/// both quote characters.
fn quotes_balanced(before: &str) -> bool {
    let singles = before.matches('\'').count();
    let doubles = before.matches('"').count();
    singles % 2 == 0 && doubles % 2 == 0
}
