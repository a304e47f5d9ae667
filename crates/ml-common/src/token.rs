use serde::Serialize;

use crate::span::Span;

/// Every kind of token the ML lexer can produce.
///
/// `Boolean` is part of the token vocabulary but the lexer's alphabetic rule
/// only emits `Keyword`/`Identifier`; `true` and `false` arrive as keywords
/// and the parser re-tags them when it builds literals. `None` marks input
/// the lexer could not classify and exists for error recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    None,
    Integer,
    Float,
    Boolean,
    Character,
    Str,
    Identifier,
    Keyword,
    Operator,
    Delimiter,
    Eof,
}

/// A token: kind, raw lexeme text, and source span.
///
/// The lexeme is the exact source text, including the surrounding quotes of
/// string and character literals as they appeared (an unterminated string
/// keeps only its opening quote).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self { kind, lexeme: lexeme.into(), span }
    }

    /// Whether this token terminates the stream: a true Eof, or a `None`
    /// token with no lexeme (the non-recoverable lexical state).
    pub fn is_terminal(&self) -> bool {
        self.kind == TokenKind::Eof || (self.kind == TokenKind::None && self.lexeme.is_empty())
    }
}
