use ml_common::span::Span;

use super::{Expr, ModifierStmt};

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Every statement form, declarations and conditionals included.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `return;` or `return expr;`.
    Return(Option<Expr>),
    Break,
    Continue,
    /// An expression evaluated for effect.
    Expression(Expr),
    /// `{ ... }`.
    Block(Vec<Stmt>),
    /// A bare accessor/modifier run, e.g. `pri;` -- only legal in classes.
    Modifier(ModifierStmt),
    Declaration(Decl),
    Conditional(Cond),
}

/// A declaration: the shared identifier / type / modifier fields plus a
/// variant-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub name: String,
    /// Type expression: an Identifier or ArrayIdentifier, when annotated.
    pub ty: Option<Expr>,
    pub modifiers: ModifierStmt,
    pub kind: DeclKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    /// `let name: type = init;`
    Variable { init: Option<Expr> },
    /// `fn name(params): type { body }` -- params are Variable declarations,
    /// the body is a Block statement.
    Function { params: Vec<Decl>, body: Box<Stmt> },
    /// `rec Name { fields }` -- fields are Variable declarations.
    Record { fields: Vec<Decl> },
    /// `cls Name { fields methods }`.
    Class { fields: Vec<Decl>, methods: Vec<Decl> },
}

/// A conditional (control-flow) statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Cond {
    pub kind: CondKind,
    pub span: Span,
}

impl Cond {
    pub fn new(kind: CondKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CondKind {
    /// `if cond { } elif cond { } else { }` -- elif arms are If conditionals
    /// with no arms of their own.
    If {
        condition: Option<Expr>,
        then_block: Box<Stmt>,
        elifs: Vec<Cond>,
        else_block: Option<Box<Stmt>>,
    },
    /// `switch expr { case v { } default { } }`.
    Switch {
        scrutinee: Option<Expr>,
        cases: Vec<SwitchCase>,
    },
    /// `while cond { }`.
    While {
        condition: Option<Expr>,
        body: Box<Stmt>,
    },
    /// `for (...) { }` in any of its three shapes. C-style fills all three
    /// slots; for-each stores the iterable in `step`; a range loop keeps
    /// only `condition`.
    For {
        init: Option<Box<Decl>>,
        condition: Option<Expr>,
        step: Option<Expr>,
        body: Box<Stmt>,
    },
}

/// One arm of a switch. `value` is `None` for the `default` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub value: Option<Expr>,
    pub body: Stmt,
    pub span: Span,
}
