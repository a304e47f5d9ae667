//! Declaration parsing: variables, functions, records, classes, and the
//! modifier prefixes they share.

use ml_common::span::Span;
use ml_common::token::TokenKind;

use crate::ast::{
    Accessor, Decl, DeclKind, Expr, ExprKind, LiteralKind, ModifierFlags, ModifierStmt, Stmt,
    StmtKind,
};

use super::Parser;

impl Parser {
    // ── Statement wrappers ─────────────────────────────────────────────

    pub(crate) fn parse_variable_statement(&mut self) -> Option<Stmt> {
        let decl = self.parse_variable_declaration(true)?;
        let span = decl.span;
        Some(Stmt::new(StmtKind::Declaration(decl), span))
    }

    pub(crate) fn parse_function_statement(&mut self) -> Option<Stmt> {
        let decl = self.parse_function_declaration()?;
        let span = decl.span;
        Some(Stmt::new(StmtKind::Declaration(decl), span))
    }

    pub(crate) fn parse_record_statement(&mut self) -> Option<Stmt> {
        let decl = self.parse_record_declaration()?;
        let span = decl.span;
        Some(Stmt::new(StmtKind::Declaration(decl), span))
    }

    pub(crate) fn parse_class_statement(&mut self) -> Option<Stmt> {
        let decl = self.parse_class_declaration()?;
        let span = decl.span;
        Some(Stmt::new(StmtKind::Declaration(decl), span))
    }

    // ── Shared pieces ──────────────────────────────────────────────────

    /// An optional accessor followed by zero or more modifiers.
    pub(crate) fn parse_modifier_prefix(&mut self) -> ModifierStmt {
        let start = self.current_span();
        let mut accessor = Accessor::Public;
        let mut flags = ModifierFlags::empty();

        if let Some(token) = self.peek() {
            if let Some(acc) = Accessor::from_keyword(&token.lexeme) {
                accessor = acc;
                self.advance();
            }
        }
        while let Some(token) = self.peek() {
            match ModifierFlags::from_keyword(&token.lexeme) {
                Some(flag) => {
                    flags.insert(flag);
                    self.advance();
                }
                None => break,
            }
        }

        let span = if flags.is_empty() && accessor == Accessor::Public {
            Span::at(start.start)
        } else {
            self.span_from(start)
        };
        ModifierStmt { accessor, flags, span }
    }

    /// A type expression: an identifier, optionally `[size?]` to make an
    /// array type. Empty brackets record the size as the literal `-1`.
    pub(crate) fn parse_type_expression(&mut self) -> Option<Expr> {
        let name = self.expect_kind(TokenKind::Identifier, "a type name")?;
        if !self.match_value("[") {
            return Some(Expr::new(
                ExprKind::Identifier { name: name.lexeme },
                name.span,
            ));
        }

        let size = if self.check_value("]") {
            Expr::new(
                ExprKind::Literal {
                    text: "-1".to_string(),
                    kind: LiteralKind::Integer,
                },
                self.current_span(),
            )
        } else {
            match self.parse_expression() {
                Some(expr) => expr,
                None => Expr::new(
                    ExprKind::Literal {
                        text: "-1".to_string(),
                        kind: LiteralKind::Integer,
                    },
                    self.current_span(),
                ),
            }
        };
        self.expect_value("]");
        Some(Expr::new(
            ExprKind::ArrayIdentifier {
                element: name.lexeme,
                size: Box::new(size),
            },
            self.span_from(name.span),
        ))
    }

    // ── Variables ──────────────────────────────────────────────────────

    /// A variable declaration: optional `let`, modifier prefix, name,
    /// optional `: type`, optional `?`, optional `= init`, and -- when
    /// `semicolon` -- a terminating `;`.
    ///
    /// A missing `:` in front of something that reads like a type is a
    /// recoverable warning; the colon is assumed.
    pub(crate) fn parse_variable_declaration(&mut self, semicolon: bool) -> Option<Decl> {
        let start = self.current_span();
        self.match_value("let");
        let mut modifiers = self.parse_modifier_prefix();

        let name = self
            .expect_kind(TokenKind::Identifier, "a variable name")
            .map(|t| t.lexeme)
            .unwrap_or_default();

        let mut ty = None;
        if self.match_value(":") {
            ty = self.parse_type_expression();
        } else if self.check_kind(TokenKind::Identifier) {
            let span = self.current_span();
            self.warning(
                "Missing ':' before type annotation",
                "insert ':' between the name and its type",
                span,
                104,
            );
            ty = self.parse_type_expression();
        }

        if self.match_value("?") {
            modifiers.flags.insert(ModifierFlags::NULLABLE);
        }

        let mut init = None;
        if self.match_value("=") {
            init = self.parse_expression();
        }

        if semicolon {
            self.expect_value(";");
        }

        Some(Decl {
            name,
            ty,
            modifiers,
            kind: DeclKind::Variable { init },
            span: self.span_from(start),
        })
    }

    // ── Functions ──────────────────────────────────────────────────────

    /// `[modifiers] fn name? (params) [: return-type] { body }`. A nameless
    /// `fn` is the constructor `init` when the Init modifier is set.
    pub(crate) fn parse_function_declaration(&mut self) -> Option<Decl> {
        let start = self.current_span();
        let mut modifiers = self.parse_modifier_prefix();
        self.expect_value("fn");

        let name = if let Some(token) = self.match_kind(TokenKind::Identifier) {
            token.lexeme
        } else if modifiers.flags.contains(ModifierFlags::INIT) {
            "init".to_string()
        } else {
            let span = self.current_span();
            self.error(
                "Expected identifier",
                "functions need a name",
                span,
                103,
            );
            String::new()
        };

        if self.match_value("?") {
            modifiers.flags.insert(ModifierFlags::NULLABLE);
        }

        self.expect_value("(");
        let mut params = Vec::new();
        if !self.check_value(")") && !self.is_eof() {
            loop {
                if let Some(param) = self.parse_variable_declaration(false) {
                    params.push(param);
                }
                if !self.match_value(",") {
                    break;
                }
            }
        }
        self.expect_value(")");

        let mut ty = None;
        if self.match_value(":") {
            ty = self.parse_type_expression();
        }

        let body = self.parse_block()?;
        Some(Decl {
            name,
            ty,
            modifiers,
            kind: DeclKind::Function {
                params,
                body: Box::new(body),
            },
            span: self.span_from(start),
        })
    }

    // ── Records ────────────────────────────────────────────────────────

    /// `rec [modifiers] Name { field; ... }` -- fields are variable
    /// declarations terminated by `;`.
    pub(crate) fn parse_record_declaration(&mut self) -> Option<Decl> {
        let start = self.current_span();
        self.expect_value("rec");
        let modifiers = self.parse_modifier_prefix();
        let name = self
            .expect_kind(TokenKind::Identifier, "a record name")
            .map(|t| t.lexeme)
            .unwrap_or_default();

        self.expect_value("{");
        let mut fields = Vec::new();
        while !self.check_value("}") && !self.is_eof() {
            let before = self.pos;
            if let Some(field) = self.parse_variable_declaration(true) {
                fields.push(field);
            }
            if self.pos == before {
                self.advance();
            }
        }
        self.expect_value("}");

        Some(Decl {
            name,
            ty: None,
            modifiers,
            kind: DeclKind::Record { fields },
            span: self.span_from(start),
        })
    }

    // ── Classes ────────────────────────────────────────────────────────

    /// `cls [modifiers] Name { members }`. A member whose accessor/modifier
    /// run is followed by `fn` is a method; anything else is a field.
    pub(crate) fn parse_class_declaration(&mut self) -> Option<Decl> {
        let start = self.current_span();
        self.expect_value("cls");
        let modifiers = self.parse_modifier_prefix();
        let name = self
            .expect_kind(TokenKind::Identifier, "a class name")
            .map(|t| t.lexeme)
            .unwrap_or_default();

        self.expect_value("{");
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.check_value("}") && !self.is_eof() {
            let before = self.pos;
            if self.next_significant_is_fn() {
                if let Some(method) = self.parse_function_declaration() {
                    methods.push(method);
                }
            } else if let Some(field) = self.parse_variable_declaration(true) {
                fields.push(field);
            }
            if self.pos == before {
                self.advance();
            }
        }
        self.expect_value("}");

        Some(Decl {
            name,
            ty: None,
            modifiers,
            kind: DeclKind::Class { fields, methods },
            span: self.span_from(start),
        })
    }
}
