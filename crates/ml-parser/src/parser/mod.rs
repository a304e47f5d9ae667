//! Recursive-descent parser for ML.
//!
//! Consumes the lexer's token stream and produces a [`Program`]. Expression
//! parsing climbs an explicit precedence ladder (`expressions.rs`);
//! declarations and control flow live in `declarations.rs` and
//! `statements.rs`. The parser never aborts: every expectation failure is
//! recorded as a diagnostic and the stream keeps moving, either by advancing
//! a token or by continuing with a best-effort subtree.

mod declarations;
mod expressions;
mod statements;

use ml_common::diagnostic::{Diagnostic, Level};
use ml_common::span::{Position, Span};
use ml_common::syntax;
use ml_common::token::{Token, TokenKind};

use crate::ast::{Program, Stmt, StmtKind};

/// Parser state: the token stream, a cursor into it, and a copy of the last
/// consumed token for anchoring "just past" diagnostics.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    last: Token,
    diagnostics: Vec<Diagnostic>,
    source: String,
    file: String,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, source: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            tokens,
            pos: 0,
            last: Token::new(TokenKind::None, "", Span::at(Position::origin())),
            diagnostics: Vec::new(),
            source: source.into(),
            file: file.into(),
        }
    }

    /// Parse the whole token stream into a program. The top-level loop
    /// either accepts a statement or skips one token and retries, so it
    /// always terminates.
    pub fn parse_program(&mut self) -> Program {
        let start = self.current_span();
        let mut statements = Vec::new();
        while !self.is_eof() {
            let before = self.pos;
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            if self.pos == before {
                self.advance();
            }
        }
        let span = start.merge(self.last.span);
        Program { statements, span }
    }

    /// Diagnostics accumulated so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the parser, yielding its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    // ── Statement dispatch ─────────────────────────────────────────────

    /// Dispatch on the lookahead lexeme. Returns `None` when the input was
    /// dropped as an unparseable fragment (a diagnostic has been emitted).
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        let lexeme = self.peek()?.lexeme.clone();
        match lexeme.as_str() {
            "return" => self.parse_return(),
            "break" => self.parse_break(),
            "continue" => self.parse_continue(),
            "{" => self.parse_block(),
            "let" => self.parse_variable_statement(),
            "fn" => self.parse_function_statement(),
            "rec" => self.parse_record_statement(),
            "cls" => self.parse_class_statement(),
            "if" => self.parse_if(),
            "switch" => self.parse_switch(),
            "while" => self.parse_while(),
            "for" => self.parse_for(),
            s if syntax::is_accessor(s) && self.next_significant_is_fn() => {
                self.parse_function_statement()
            }
            s if syntax::is_accessor(s) || syntax::is_modifier(s) => {
                self.parse_modifier_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Whether the token run starting here is accessors/modifiers followed
    /// by `fn`. Used both for statement dispatch and for telling class
    /// methods apart from fields.
    pub(crate) fn next_significant_is_fn(&self) -> bool {
        let mut offset = 0;
        while let Some(token) = self.look(offset) {
            let lexeme = token.lexeme.as_str();
            if syntax::is_accessor(lexeme) || syntax::is_modifier(lexeme) {
                offset += 1;
            } else {
                return lexeme == "fn";
            }
        }
        false
    }

    // ── Stream primitives ──────────────────────────────────────────────

    /// Read the current token without consuming it.
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Read the token `offset` past the current one without consuming.
    pub(crate) fn look(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    /// Consume and return the current token.
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        self.last = token.clone();
        Some(token)
    }

    /// Whether the cursor is past the last token or sitting on a terminal
    /// token (Eof, or the lexer's dead-end None).
    pub(crate) fn is_eof(&self) -> bool {
        match self.tokens.get(self.pos) {
            Some(token) => token.is_terminal(),
            None => true,
        }
    }

    pub(crate) fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    pub(crate) fn check_value(&self, value: &str) -> bool {
        self.peek().is_some_and(|t| t.lexeme == value)
    }

    /// Whether the current token is an operator with one of these lexemes.
    pub(crate) fn check_operator(&self, values: &[&str]) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Operator && values.contains(&t.lexeme.as_str()))
    }

    /// Consume the current token iff it has this kind.
    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check_kind(kind) {
            self.advance()
        } else {
            None
        }
    }

    /// Consume the current token iff it has this lexeme.
    pub(crate) fn match_value(&mut self, value: &str) -> bool {
        if self.check_value(value) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of this kind, or report the mismatch and advance
    /// anyway so the stream keeps progressing.
    pub(crate) fn expect_kind(&mut self, kind: TokenKind, what: &str) -> Option<Token> {
        if self.check_kind(kind) {
            return self.advance();
        }
        let (span, found) = self.mismatch_context();
        self.error(
            format!("Unexpected token '{}'", found),
            format!("expected {}", what),
            span,
            101,
        );
        if !self.is_eof() {
            self.advance();
        }
        None
    }

    /// Consume a token with this lexeme, or report the mismatch and advance
    /// anyway.
    pub(crate) fn expect_value(&mut self, value: &str) -> Option<Token> {
        if self.check_value(value) {
            return self.advance();
        }
        let (span, _) = self.mismatch_context();
        self.error(
            format!("Expected value '{}'", value),
            format!("insert '{}' here", value),
            span,
            102,
        );
        if !self.is_eof() {
            self.advance();
        }
        None
    }

    // ── Spans and diagnostics ──────────────────────────────────────────

    /// The span of the current token, or a zero-width span just past the
    /// last consumed token at end of stream.
    pub(crate) fn current_span(&self) -> Span {
        match self.peek() {
            Some(token) => token.span,
            None => Span::at(self.last.span.end),
        }
    }

    /// Span covering `start` through the last consumed token.
    pub(crate) fn span_from(&self, start: Span) -> Span {
        start.merge(self.last.span)
    }

    fn mismatch_context(&self) -> (Span, String) {
        match self.peek() {
            Some(token) => (token.span, token.lexeme.clone()),
            None => (Span::at(self.last.span.end), String::new()),
        }
    }

    pub(crate) fn error(
        &mut self,
        message: impl Into<String>,
        help: impl Into<String>,
        span: Span,
        code: u32,
    ) {
        self.diagnostics.push(Diagnostic::new(
            Level::Error,
            message,
            help,
            span,
            self.file.clone(),
            self.source.clone(),
            code,
        ));
    }

    pub(crate) fn warning(
        &mut self,
        message: impl Into<String>,
        help: impl Into<String>,
        span: Span,
        code: u32,
    ) {
        self.diagnostics.push(Diagnostic::new(
            Level::Warning,
            message,
            help,
            span,
            self.file.clone(),
            self.source.clone(),
            code,
        ));
    }

    // ── Shared small statements ────────────────────────────────────────

    fn parse_return(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // return
        let expr = if self.check_value(";") {
            None
        } else {
            self.parse_expression()
        };
        self.expect_value(";");
        Some(Stmt::new(StmtKind::Return(expr), self.span_from(start)))
    }

    fn parse_break(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // break
        self.expect_value(";");
        Some(Stmt::new(StmtKind::Break, self.span_from(start)))
    }

    fn parse_continue(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // continue
        self.expect_value(";");
        Some(Stmt::new(StmtKind::Continue, self.span_from(start)))
    }

    /// `{ stmt* }` -- the workhorse for every body in the language.
    pub(crate) fn parse_block(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.expect_value("{");
        let mut statements = Vec::new();
        while !self.check_value("}") && !self.is_eof() {
            let before = self.pos;
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            if self.pos == before {
                self.advance();
            }
        }
        self.expect_value("}");
        Some(Stmt::new(StmtKind::Block(statements), self.span_from(start)))
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        let expr = self.parse_expression()?;
        self.expect_value(";");
        Some(Stmt::new(StmtKind::Expression(expr), self.span_from(start)))
    }

    fn parse_modifier_statement(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        let modifiers = self.parse_modifier_prefix();
        self.expect_value(";");
        Some(Stmt::new(
            StmtKind::Modifier(modifiers),
            self.span_from(start),
        ))
    }
}
