//! Expression parsing: an explicit precedence-climbing ladder.
//!
//! Lowest to tightest: assignment (right-associative), `||`, `&&`, equality,
//! comparison (including ranges), term, factor, prefix unary, postfix
//! (call / increment / attribute / index), primary. Each left-associative
//! level loops, folding operands into Binary nodes.

use ml_common::token::TokenKind;

use crate::ast::{Expr, ExprKind, LiteralKind};

use super::Parser;

impl Parser {
    /// Parse one expression at the lowest precedence level.
    ///
    /// Returns `None` when no expression could be started; a diagnostic has
    /// been emitted and one token consumed, so callers can simply drop the
    /// fragment.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_assignment()
    }

    /// `target = value` -- right-associative.
    fn parse_assignment(&mut self) -> Option<Expr> {
        let left = self.parse_logical_or()?;
        if self.check_operator(&["="]) {
            let op = self.advance()?.lexeme;
            // Right-associative: recurse at the same level.
            if let Some(right) = self.parse_assignment() {
                let span = left.span.merge(right.span);
                return Some(Expr::new(
                    ExprKind::Binary {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    },
                    span,
                ));
            }
            // The right side failed; keep the left operand as a
            // best-effort subtree.
            return Some(left);
        }
        Some(left)
    }

    fn parse_logical_or(&mut self) -> Option<Expr> {
        self.parse_binary_level(&["||"], Parser::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> Option<Expr> {
        self.parse_binary_level(&["&&"], Parser::parse_equality)
    }

    fn parse_equality(&mut self) -> Option<Expr> {
        self.parse_binary_level(&["==", "!="], Parser::parse_comparison)
    }

    fn parse_comparison(&mut self) -> Option<Expr> {
        self.parse_binary_level(&["<", ">", "<=", ">=", "..", "..."], Parser::parse_term)
    }

    fn parse_term(&mut self) -> Option<Expr> {
        self.parse_binary_level(&["+", "-"], Parser::parse_factor)
    }

    fn parse_factor(&mut self) -> Option<Expr> {
        self.parse_binary_level(&["*", "/", "%"], Parser::parse_unary)
    }

    /// One left-associative ladder rung: fold `next (op next)*`.
    fn parse_binary_level(
        &mut self,
        ops: &[&str],
        next: fn(&mut Parser) -> Option<Expr>,
    ) -> Option<Expr> {
        let mut left = next(self)?;
        while self.check_operator(ops) {
            let op = self.advance()?.lexeme;
            match next(self) {
                Some(right) => {
                    let span = left.span.merge(right.span);
                    left = Expr::new(
                        ExprKind::Binary {
                            left: Box::new(left),
                            op,
                            right: Box::new(right),
                        },
                        span,
                    );
                }
                None => break,
            }
        }
        Some(left)
    }

    /// Prefix `!` and `-`.
    fn parse_unary(&mut self) -> Option<Expr> {
        if self.check_operator(&["!", "-"]) {
            let token = self.advance()?;
            let operand = self.parse_unary()?;
            let span = token.span.merge(operand.span);
            return Some(Expr::new(
                ExprKind::Unary {
                    op: token.lexeme,
                    operand: Box::new(operand),
                    prefix: true,
                },
                span,
            ));
        }
        self.parse_postfix()
    }

    /// Postfix loop: calls, `++`/`--`, attribute access, indexing. Builds
    /// left-associatively until nothing applies.
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.check_value("(") {
                let args = self.parse_argument_list();
                let span = self.span_from(expr.span);
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
            } else if self.check_operator(&["++", "--"]) {
                let token = self.advance()?;
                let span = expr.span.merge(token.span);
                expr = Expr::new(
                    ExprKind::Unary {
                        op: token.lexeme,
                        operand: Box::new(expr),
                        prefix: false,
                    },
                    span,
                );
            } else if self.check_value(".") {
                self.advance(); // .
                let Some(attribute) = self.parse_attribute() else {
                    break;
                };
                let span = expr.span.merge(attribute.span);
                expr = Expr::new(
                    ExprKind::Attribute {
                        object: Box::new(expr),
                        attribute: Box::new(attribute),
                    },
                    span,
                );
            } else if self.check_value("[") {
                self.advance(); // [
                let index = self.parse_expression();
                self.expect_value("]");
                let span = self.span_from(expr.span);
                let index = index?;
                expr = Expr::new(
                    ExprKind::Index {
                        array: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else {
                break;
            }
        }
        Some(expr)
    }

    /// The name after `.`: an Identifier, or a Call when arguments follow
    /// immediately.
    fn parse_attribute(&mut self) -> Option<Expr> {
        let name = self.expect_kind(TokenKind::Identifier, "an attribute name")?;
        let ident = Expr::new(ExprKind::Identifier { name: name.lexeme }, name.span);
        if self.check_value("(") {
            let args = self.parse_argument_list();
            let span = self.span_from(ident.span);
            return Some(Expr::new(
                ExprKind::Call {
                    callee: Box::new(ident),
                    args,
                },
                span,
            ));
        }
        Some(ident)
    }

    /// `( expr, ... )` -- the opening parenthesis has been checked, not
    /// consumed.
    fn parse_argument_list(&mut self) -> Vec<Expr> {
        self.advance(); // (
        let mut args = Vec::new();
        if !self.check_value(")") && !self.is_eof() {
            loop {
                match self.parse_expression() {
                    Some(arg) => args.push(arg),
                    None => break,
                }
                if !self.match_value(",") {
                    break;
                }
            }
        }
        self.expect_value(")");
        args
    }

    /// Literals, `this`, identifiers, grouping, array literals.
    ///
    /// On failure: emit "Unexpected token", advance one token, return
    /// `None`. The statement layer drops the fragment.
    fn parse_primary(&mut self) -> Option<Expr> {
        let token = self.peek()?.clone();
        match token.kind {
            TokenKind::Integer => self.literal(LiteralKind::Integer),
            TokenKind::Float => self.literal(LiteralKind::Float),
            TokenKind::Str => self.literal(LiteralKind::Str),
            TokenKind::Character => self.literal(LiteralKind::Character),
            TokenKind::Identifier => {
                self.advance();
                Some(Expr::new(
                    ExprKind::Identifier { name: token.lexeme },
                    token.span,
                ))
            }
            TokenKind::Keyword => match token.lexeme.as_str() {
                "true" | "false" => self.literal(LiteralKind::Boolean),
                "null" => self.literal(LiteralKind::Null),
                "this" => {
                    self.advance();
                    Some(Expr::new(
                        ExprKind::Identifier {
                            name: "this".to_string(),
                        },
                        token.span,
                    ))
                }
                _ => self.primary_failure(),
            },
            TokenKind::Delimiter if token.lexeme == "(" => {
                self.advance();
                let inner = self.parse_expression();
                self.expect_value(")");
                inner
            }
            TokenKind::Delimiter if token.lexeme == "[" => self.parse_array_literal(),
            _ => self.primary_failure(),
        }
    }

    fn literal(&mut self, kind: LiteralKind) -> Option<Expr> {
        let token = self.advance()?;
        Some(Expr::new(
            ExprKind::Literal {
                text: token.lexeme,
                kind,
            },
            token.span,
        ))
    }

    /// `[ expr, ... ]`.
    fn parse_array_literal(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.advance(); // [
        let mut elements = Vec::new();
        if !self.check_value("]") && !self.is_eof() {
            loop {
                match self.parse_expression() {
                    Some(element) => elements.push(element),
                    None => break,
                }
                if !self.match_value(",") {
                    break;
                }
            }
        }
        self.expect_value("]");
        Some(Expr::new(
            ExprKind::Array { elements },
            self.span_from(start),
        ))
    }

    fn primary_failure(&mut self) -> Option<Expr> {
        let (span, found) = match self.peek() {
            Some(token) => (token.span, token.lexeme.clone()),
            None => return None,
        };
        self.error(
            format!("Unexpected token '{}'", found),
            "expected an expression",
            span,
            101,
        );
        self.advance();
        None
    }
}
