//! Typed AST for the ML language.
//!
//! Four tagged node families: expressions, statements, declarations, and
//! conditionals. Every node carries its source span; parents own their
//! children exclusively, so moving a subtree transfers ownership and trees
//! are acyclic by construction.

mod expr;
mod stmt;
pub mod visit;

pub use expr::{Expr, ExprKind, LiteralKind};
pub use stmt::{Cond, CondKind, Decl, DeclKind, Stmt, StmtKind, SwitchCase};

use ml_common::span::Span;

/// A parsed source file: the list of top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Visibility qualifier on declarations and members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accessor {
    #[default]
    Public,
    Private,
    Protected,
}

impl Accessor {
    /// Map an accessor keyword (`pub`/`pri`/`pro`) to its value.
    pub fn from_keyword(s: &str) -> Option<Accessor> {
        match s {
            "pub" => Some(Accessor::Public),
            "pri" => Some(Accessor::Private),
            "pro" => Some(Accessor::Protected),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Accessor::Public => "pub",
            Accessor::Private => "pri",
            Accessor::Protected => "pro",
        }
    }
}

/// Bitset over the declaration modifier flags.
///
/// Set operations are explicit helper methods; the type deliberately does not
/// implement the bit operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierFlags(u8);

impl ModifierFlags {
    pub const STATIC: ModifierFlags = ModifierFlags(1 << 0);
    pub const CONSTANT: ModifierFlags = ModifierFlags(1 << 1);
    pub const ARRAY: ModifierFlags = ModifierFlags(1 << 2);
    pub const INIT: ModifierFlags = ModifierFlags(1 << 3);
    pub const NULLABLE: ModifierFlags = ModifierFlags(1 << 4);

    /// The empty set.
    pub const fn empty() -> ModifierFlags {
        ModifierFlags(0)
    }

    /// Map a modifier keyword (`static`/`const`/`init`) to its flag.
    pub fn from_keyword(s: &str) -> Option<ModifierFlags> {
        match s {
            "static" => Some(Self::STATIC),
            "const" => Some(Self::CONSTANT),
            "init" => Some(Self::INIT),
            _ => None,
        }
    }

    /// Add every flag of `other` to `self`.
    pub fn insert(&mut self, other: ModifierFlags) {
        self.0 |= other.0;
    }

    /// Whether every flag of `other` is set.
    pub fn contains(&self, other: ModifierFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// The set holding the flags of both operands.
    pub fn union(&self, other: ModifierFlags) -> ModifierFlags {
        ModifierFlags(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Syntactic carrier for an accessor plus modifier flags.
///
/// Attached to every declaration; also a statement in its own right, which
/// the analyzer only accepts inside class scopes.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierStmt {
    pub accessor: Accessor,
    pub flags: ModifierFlags,
    pub span: Span,
}

impl ModifierStmt {
    /// Public accessor, no flags.
    pub fn empty(span: Span) -> Self {
        Self {
            accessor: Accessor::Public,
            flags: ModifierFlags::empty(),
            span,
        }
    }
}
