// src/highlight/keywords.rs

//! Fixed word tables used to classify identifiers.

/// Python control-flow and declaration words.
const KEYWORDS: &[&str] = &[
    "import", "from", "as", "def", "class", "return", "if", "elif", "else", "for", "while", "try",
    "except", "finally", "with", "pass", "break", "continue", "and", "or", "not", "in", "is",
    "None", "True", "False", "lambda", "yield", "raise", "assert", "global", "nonlocal", "async",
    "await",
];

/// Common library aliases and builtin functions.
const BUILTINS: &[&str] = &[
    "pd", "np", "sql", "sns", "torch", "sp", "print", "len", "range", "enumerate", "zip", "map",
    "filter", "sorted", "sum", "min", "max", "abs", "open", "input", "type", "isinstance",
];

/// SQL words, matched case-insensitively.
const SQL_KEYWORDS: &[&str] = &["SELECT", "FROM", "WHERE", "AND", "OR", "JOIN", "ON"];

/// Line prefixes that mark the body of a multi-line SQL string.
/// Matched case-sensitively against the untrimmed line.
const SQL_CLAUSE_PREFIXES: &[&str] = &["SELECT", "FROM", "WHERE", "AND", "OR"];

pub(super) fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

pub(super) fn is_builtin(word: &str) -> bool {
    BUILTINS.contains(&word)
}

pub(super) fn is_sql_keyword(word: &str) -> bool {
    SQL_KEYWORDS.iter().any(|kw| kw.eq_ignore_ascii_case(word))
}

pub(super) fn starts_with_sql_clause(line: &str) -> bool {
    SQL_CLAUSE_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

#[inline]
pub(super) fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

#[inline]
pub(super) fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Uppercase first letter with at least one lowercase letter after it.
pub(super) fn is_pascal_case(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.any(char::is_lowercase),
        _ => false,
    }
}

/// True when `before` (the text left of a word) ends in `return` or `yield`
/// as a whole word, ignoring trailing whitespace.
pub(super) fn follows_return_or_yield(before: &str) -> bool {
    let before = before.trim_end();
    ["return", "yield"].iter().any(|kw| {
        before
            .strip_suffix(kw)
            .is_some_and(|head| !head.chars().next_back().is_some_and(is_ident_continue))
    })
}

/// True when `before` ends in `=`, ignoring trailing whitespace.
pub(super) fn follows_assignment(before: &str) -> bool {
    before.trim_end().ends_with('=')
}
