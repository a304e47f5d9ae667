//! Syntax tables for the ML language: the keyword set, accessor and modifier
//! subsets, the multi-character operator recognizer, and the delimiter and
//! whitespace predicates.
//!
//! `.` appears in both the operator and delimiter tables; the lexer tries
//! operator recognition first, so a lone `.` always lexes as an operator.

use std::sync::LazyLock;

use rustc_hash::FxHashSet;

/// The complete ML keyword set.
pub const KEYWORDS: [&str; 25] = [
    "if", "fn", "in", "for", "let", "cls", "rec", "pub", "pri", "pro", "elif", "else", "case",
    "this", "null", "true", "false", "while", "break", "const", "init", "return", "switch",
    "default", "continue",
];

static KEYWORD_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| KEYWORDS.iter().copied().collect());

/// Two-character operators, matched before any single-character operator.
const TWO_CHAR_OPERATORS: [&str; 19] = [
    "+=", "++", "-=", "--", "*=", "**", "/=", "%%", "==", "!=", "<=", "<<", ">=", ">>", "..",
    ".=", "&&", "||", "??",
];

/// Single-character operators.
const ONE_CHAR_OPERATORS: [char; 15] = [
    '+', '-', '*', '/', '%', '=', '!', '<', '>', '.', '&', '|', '?', '^', '~',
];

/// Whitespace skipped between tokens: space, tab, carriage return, newline.
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Exact-match test against the keyword set.
pub fn is_keyword(s: &str) -> bool {
    KEYWORD_SET.contains(s)
}

/// Whether `s` is an accessor keyword (`pub`, `pri`, `pro`).
pub fn is_accessor(s: &str) -> bool {
    matches!(s, "pub" | "pri" | "pro")
}

/// Whether `s` is a modifier keyword (`static`, `const`, `init`).
pub fn is_modifier(s: &str) -> bool {
    matches!(s, "static" | "const" | "init")
}

/// Length in bytes of the operator at the start of `s`: 2 for a two-character
/// operator, 1 for a single-character operator, 0 when `s` does not start
/// with an operator.
pub fn operator_length(s: &str) -> usize {
    if let Some(prefix) = s.get(..2) {
        if TWO_CHAR_OPERATORS.contains(&prefix) {
            return 2;
        }
    }
    match s.chars().next() {
        Some(c) if ONE_CHAR_OPERATORS.contains(&c) => 1,
        _ => 0,
    }
}

/// Whether `c` is a delimiter: `( ) [ ] { } : ; . ,`.
pub fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | ':' | ';' | '.' | ',')
}
