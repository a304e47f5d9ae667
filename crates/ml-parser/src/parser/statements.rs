//! Control-flow statement parsing: if/elif/else, switch, while, and the
//! three for-loop shapes.

use ml_common::token::TokenKind;

use crate::ast::{Cond, CondKind, Stmt, StmtKind, SwitchCase};

use super::Parser;

impl Parser {
    /// `if cond { } (elif cond { })* (else { })?`
    ///
    /// Elif arms are collected only before `else`; an `elif` after an
    /// `else` falls back to the statement loop, which reports it.
    pub(crate) fn parse_if(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // if
        let condition = self.parse_expression();
        let then_block = Box::new(self.parse_block()?);

        let mut elifs = Vec::new();
        while self.check_value("elif") {
            let elif_start = self.current_span();
            self.advance(); // elif
            let elif_condition = self.parse_expression();
            let Some(elif_block) = self.parse_block() else {
                break;
            };
            elifs.push(Cond::new(
                CondKind::If {
                    condition: elif_condition,
                    then_block: Box::new(elif_block),
                    elifs: Vec::new(),
                    else_block: None,
                },
                self.span_from(elif_start),
            ));
        }

        let mut else_block = None;
        if self.match_value("else") {
            else_block = self.parse_block().map(Box::new);
        }

        let span = self.span_from(start);
        Some(Stmt::new(
            StmtKind::Conditional(Cond::new(
                CondKind::If {
                    condition,
                    then_block,
                    elifs,
                    else_block,
                },
                span,
            )),
            span,
        ))
    }

    /// `switch expr { (case expr { })* (default { })? }`
    ///
    /// The conditional's span ends at the last case, not the closing brace.
    pub(crate) fn parse_switch(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // switch
        let scrutinee = self.parse_expression();
        self.expect_value("{");

        let mut cases = Vec::new();
        loop {
            if self.check_value("case") {
                let case_start = self.current_span();
                self.advance();
                let value = self.parse_expression();
                let Some(body) = self.parse_block() else {
                    break;
                };
                let span = self.span_from(case_start);
                cases.push(SwitchCase { value, body, span });
            } else if self.check_value("default") {
                let case_start = self.current_span();
                self.advance();
                let Some(body) = self.parse_block() else {
                    break;
                };
                let span = self.span_from(case_start);
                cases.push(SwitchCase { value: None, body, span });
            } else {
                break;
            }
        }
        self.expect_value("}");

        let span = match cases.last() {
            Some(case) => start.merge(case.span),
            None => self.span_from(start),
        };
        Some(Stmt::new(
            StmtKind::Conditional(Cond::new(CondKind::Switch { scrutinee, cases }, span)),
            span,
        ))
    }

    /// `while cond { }`
    pub(crate) fn parse_while(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // while
        let condition = self.parse_expression();
        let body = Box::new(self.parse_block()?);
        let span = self.span_from(start);
        Some(Stmt::new(
            StmtKind::Conditional(Cond::new(CondKind::While { condition, body }, span)),
            span,
        ))
    }

    /// `for ( ... ) { }` in three shapes:
    ///
    /// 1. C-style: `for (let i: i32 = 0; i < 10; i = i + 1)` -- all three
    ///    slots filled.
    /// 2. For-each: `for (name: type in iterable)` -- declaration in the
    ///    init slot, iterable stored in the step slot.
    /// 3. Range: `for (range-expr)` -- only the condition slot.
    pub(crate) fn parse_for(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // for
        self.expect_value("(");

        let mut init = None;
        let mut condition = None;
        let mut step = None;

        if self.check_value("let") {
            // C-style; the declaration consumes its own semicolon.
            init = self.parse_variable_declaration(true).map(Box::new);
            condition = self.parse_expression();
            self.expect_value(";");
            step = self.parse_expression();
        } else if self.check_kind(TokenKind::Identifier)
            && self.look(1).is_some_and(|t| t.lexeme == ":")
        {
            // For-each: `name: type in iterable`.
            init = self.parse_variable_declaration(false).map(Box::new);
            self.expect_value("in");
            step = self.parse_expression();
        } else {
            // Range shape.
            condition = self.parse_expression();
        }
        self.expect_value(")");

        let body = Box::new(self.parse_block()?);
        let span = self.span_from(start);
        Some(Stmt::new(
            StmtKind::Conditional(Cond::new(
                CondKind::For {
                    init,
                    condition,
                    step,
                    body,
                },
                span,
            )),
            span,
        ))
    }
}
