// src/highlight/mod.rs

//! Line-at-a-time syntax highlighting for Python/SQL flavoured code.
//!
//! [`highlight`] splits one line into [`Token`]s, each tagged with a
//! [`TokenKind`]. The scan is pure: the same line always yields the same
//! tokens, and concatenating every `token.text` reproduces the input.

mod keywords;
mod lexer;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use lexer::LineLexer;

/// Display category of a token. Colours are bound to categories by
/// [`crate::color::Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    /// SQL words such as `SELECT`, kept apart from language keywords.
    SqlKeyword,
    String,
    Comment,
    Number,
    Builtin,
    Function,
    Decorator,
    Operator,
    Class,
    /// Plain identifiers, whitespace and empty-line placeholders.
    Text,
}

/// A classified slice of the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
}

impl<'a> Token<'a> {
    pub fn new(text: &'a str, kind: TokenKind) -> Self {
        Token { text, kind }
    }

    /// True for the single token produced for an empty or blank line.
    pub fn is_placeholder(&self) -> bool {
        self.kind == TokenKind::Text && self.text.trim().is_empty()
    }
}

bitflags! {
    /// Scanner features that differ between the two highlighting modes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct HighlightOptions: u8 {
        /// A backslash inside a quoted string escapes the next character.
        const ESCAPES            = 1 << 0;
        /// `#` after code opens a comment when it is outside any quotes.
        const INLINE_COMMENTS    = 1 << 1;
        /// SQL words are classified as `SqlKeyword`.
        const SQL_KEYWORDS       = 1 << 2;
        /// Lines opening with an SQL clause or a triple quote are string bodies.
        const CONTINUATION_LINES = 1 << 3;
    }
}

/// Preset option sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HighlightMode {
    /// The typing code block: multi-line strings are recognised line by
    /// line, backslashes are literal, `#` only comments whole lines. SQL
    /// words are coloured only as part of those string bodies.
    Editor,
    /// The card preview: escape-aware strings and inline comments.
    #[default]
    Preview,
}

impl HighlightMode {
    pub fn options(self) -> HighlightOptions {
        match self {
            HighlightMode::Editor => HighlightOptions::CONTINUATION_LINES,
            HighlightMode::Preview => {
                HighlightOptions::ESCAPES
                    | HighlightOptions::INLINE_COMMENTS
                    | HighlightOptions::SQL_KEYWORDS
            }
        }
    }
}

impl Default for HighlightOptions {
    fn default() -> Self {
        HighlightMode::default().options()
    }
}

/// Tokenizes `line` with the default (preview) options.
pub fn highlight(line: &str) -> Vec<Token<'_>> {
    highlight_with(line, HighlightOptions::default())
}

/// Tokenizes `line` with an explicit option set.
pub fn highlight_with(line: &str, options: HighlightOptions) -> Vec<Token<'_>> {
    LineLexer::new(line, options).tokenize()
}

/// A highlighter bound to one option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Highlighter {
    options: HighlightOptions,
}

impl Highlighter {
    pub fn new(options: HighlightOptions) -> Self {
        Highlighter { options }
    }

    pub fn for_mode(mode: HighlightMode) -> Self {
        Highlighter::new(mode.options())
    }

    pub fn options(&self) -> HighlightOptions {
        self.options
    }

    pub fn highlight_line<'a>(&self, line: &'a str) -> Vec<Token<'a>> {
        highlight_with(line, self.options)
    }

    /// Highlights every line independently.
    pub fn highlight_lines<'a, S: AsRef<str>>(&self, lines: &'a [S]) -> Vec<Vec<Token<'a>>> {
        lines
            .iter()
            .map(|line| self.highlight_line(line.as_ref()))
            .collect()
    }
}
