// ML lexer -- tokenizer for the ML language.

mod cursor;

use cursor::Cursor;
use ml_common::diagnostic::{Diagnostic, Level};
use ml_common::span::{Position, Span};
use ml_common::syntax;
use ml_common::token::{Token, TokenKind};

/// The ML lexer. Converts source text into a stream of tokens.
///
/// A single forward pass over a [`Cursor`]. Malformed literals and
/// unrecognized characters produce diagnostics and placeholder tokens rather
/// than stopping the pass, so downstream stages always receive a stream that
/// ends in exactly one `Eof` token.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    source: &'src str,
    file: String,
    /// Start of the token currently being scanned.
    start: Position,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text. `file` labels the
    /// source in diagnostics.
    pub fn new(source: &'src str, file: impl Into<String>) -> Self {
        Self {
            cursor: Cursor::new(source),
            source,
            file: file.into(),
            start: Position::origin(),
            diagnostics: Vec::new(),
        }
    }

    /// Convenience: tokenize the entire source, returning the token stream
    /// and whatever diagnostics the pass produced.
    pub fn tokenize(source: &str, file: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut lexer = Lexer::new(source, file);
        let tokens = lexer.lex();
        (tokens, lexer.into_diagnostics())
    }

    /// Tokenize the whole source. The returned stream always ends with a
    /// single `Eof` token; lexical errors are reported through
    /// [`Lexer::diagnostics`] and never stop the pass.
    pub fn lex(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.cursor.eat_while(syntax::is_whitespace);
            self.start = self.cursor.pos();

            let Some(c) = self.cursor.peek() else {
                tokens.push(Token::new(TokenKind::Eof, "", Span::at(self.start)));
                break;
            };

            let token = if c.is_ascii_alphabetic() || c == '_' {
                self.lex_alpha()
            } else if c.is_ascii_digit() {
                self.lex_numeric()
            } else if c == '\'' {
                self.lex_character()
            } else if c == '"' {
                self.lex_string()
            } else if syntax::operator_length(self.cursor.rest()) > 0 {
                self.lex_operator()
            } else if syntax::is_delimiter(c) {
                self.lex_delimiter()
            } else {
                self.cursor.advance();
                let token = self.make(TokenKind::None);
                self.error(
                    format!("Unrecognized character '{}'", c),
                    "this character is not part of the language",
                    token.span,
                    4,
                );
                token
            };
            tokens.push(token);
        }
        tokens
    }

    /// Diagnostics accumulated so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the lexer, yielding its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    // ── Token categories ───────────────────────────────────────────────

    /// `[A-Za-z_][A-Za-z0-9_]*` -- keyword or identifier.
    fn lex_alpha(&mut self) -> Token {
        self.cursor
            .eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let lexeme = self.lexeme();
        let kind = if syntax::is_keyword(lexeme) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.make(kind)
    }

    /// Digits, optionally a fraction. The `.` is consumed only when the
    /// character after it is not another `.`, which keeps `1..10` lexing as
    /// two integers around a range operator.
    fn lex_numeric(&mut self) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.') && self.cursor.peek_next() != Some('.') {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
            return self.make(TokenKind::Float);
        }
        self.make(TokenKind::Integer)
    }

    /// A character literal: `'x'`, `'\n'`, with diagnostics for `''` and a
    /// missing closing quote. The lexeme keeps whichever quotes were seen.
    fn lex_character(&mut self) -> Token {
        self.cursor.advance(); // opening '
        let mut empty = false;
        match self.cursor.peek() {
            Some('\'') => empty = true,
            Some('\\') => {
                self.cursor.advance();
                self.cursor.advance();
            }
            Some(_) => {
                self.cursor.advance();
            }
            None => {}
        }
        let terminated = self.cursor.peek() == Some('\'');
        if terminated {
            self.cursor.advance();
        }

        let token = self.make(TokenKind::Character);
        if empty {
            self.error(
                "Empty character literal",
                "character literals must contain exactly one character",
                token.span,
                3,
            );
        } else if !terminated {
            self.error(
                "Unterminated character literal",
                "add a closing ' quote",
                token.span,
                2,
            );
        }
        token
    }

    /// A string literal: everything up to the next `"`. Reaching end of
    /// input first is an error; the lexeme spans from the opening quote to
    /// wherever consumption stopped.
    fn lex_string(&mut self) -> Token {
        self.cursor.advance(); // opening "
        self.cursor.eat_while(|c| c != '"');
        let terminated = self.cursor.peek() == Some('"');
        if terminated {
            self.cursor.advance();
        }

        let token = self.make(TokenKind::Str);
        if !terminated {
            self.error(
                "Unterminated string literal",
                "add a closing \" quote",
                token.span,
                1,
            );
        }
        token
    }

    /// One operator character, upgraded to two when the pair is itself an
    /// operator (maximal munch).
    fn lex_operator(&mut self) -> Token {
        let length = syntax::operator_length(self.cursor.rest());
        self.cursor.advance();
        if length == 2 {
            self.cursor.advance();
        }
        self.make(TokenKind::Operator)
    }

    fn lex_delimiter(&mut self) -> Token {
        self.cursor.advance();
        self.make(TokenKind::Delimiter)
    }

    // ── Helpers ────────────────────────────────────────────────────────

    /// The source text consumed since `start`.
    fn lexeme(&self) -> &'src str {
        self.cursor.slice(self.start.index, self.cursor.pos().index)
    }

    /// Build a token from `start` to the current cursor position.
    fn make(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.lexeme(), Span::new(self.start, self.cursor.pos()))
    }

    fn error(&mut self, message: impl Into<String>, help: &str, span: Span, code: u32) {
        self.diagnostics.push(Diagnostic::new(
            Level::Error,
            message,
            help,
            span,
            self.file.clone(),
            self.source,
            code,
        ));
    }
}
