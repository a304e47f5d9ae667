//! AST traversal.
//!
//! A [`Visitor`] gets one callback per node family; the `walk_*` free
//! functions carry the traversal skeleton, so an implementation overrides
//! only the callbacks it cares about and calls the walker to descend.

use super::{Cond, CondKind, Decl, DeclKind, Expr, ExprKind, Program, Stmt, StmtKind};

/// Per-family callbacks over the tree. Defaults descend into children.
pub trait Visitor {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_decl(&mut self, decl: &Decl) {
        walk_decl(self, decl);
    }

    fn visit_cond(&mut self, cond: &Cond) {
        walk_cond(self, cond);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }
}

impl Program {
    pub fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_program(self);
    }
}

impl Stmt {
    pub fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_stmt(self);
    }
}

impl Decl {
    pub fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_decl(self);
    }
}

impl Cond {
    pub fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_cond(self);
    }
}

impl Expr {
    pub fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_expr(self);
    }
}

pub fn walk_program<V: Visitor + ?Sized>(visitor: &mut V, program: &Program) {
    for stmt in &program.statements {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor + ?Sized>(visitor: &mut V, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Return(expr) => {
            if let Some(expr) = expr {
                visitor.visit_expr(expr);
            }
        }
        StmtKind::Break | StmtKind::Continue | StmtKind::Modifier(_) => {}
        StmtKind::Expression(expr) => visitor.visit_expr(expr),
        StmtKind::Block(stmts) => {
            for stmt in stmts {
                visitor.visit_stmt(stmt);
            }
        }
        StmtKind::Declaration(decl) => visitor.visit_decl(decl),
        StmtKind::Conditional(cond) => visitor.visit_cond(cond),
    }
}

pub fn walk_decl<V: Visitor + ?Sized>(visitor: &mut V, decl: &Decl) {
    if let Some(ty) = &decl.ty {
        visitor.visit_expr(ty);
    }
    match &decl.kind {
        DeclKind::Variable { init } => {
            if let Some(init) = init {
                visitor.visit_expr(init);
            }
        }
        DeclKind::Function { params, body } => {
            for param in params {
                visitor.visit_decl(param);
            }
            visitor.visit_stmt(body);
        }
        DeclKind::Record { fields } => {
            for field in fields {
                visitor.visit_decl(field);
            }
        }
        DeclKind::Class { fields, methods } => {
            for field in fields {
                visitor.visit_decl(field);
            }
            for method in methods {
                visitor.visit_decl(method);
            }
        }
    }
}

pub fn walk_cond<V: Visitor + ?Sized>(visitor: &mut V, cond: &Cond) {
    match &cond.kind {
        CondKind::If {
            condition,
            then_block,
            elifs,
            else_block,
        } => {
            if let Some(condition) = condition {
                visitor.visit_expr(condition);
            }
            visitor.visit_stmt(then_block);
            for elif in elifs {
                visitor.visit_cond(elif);
            }
            if let Some(else_block) = else_block {
                visitor.visit_stmt(else_block);
            }
        }
        CondKind::Switch { scrutinee, cases } => {
            if let Some(scrutinee) = scrutinee {
                visitor.visit_expr(scrutinee);
            }
            for case in cases {
                if let Some(value) = &case.value {
                    visitor.visit_expr(value);
                }
                visitor.visit_stmt(&case.body);
            }
        }
        CondKind::While { condition, body } => {
            if let Some(condition) = condition {
                visitor.visit_expr(condition);
            }
            visitor.visit_stmt(body);
        }
        CondKind::For {
            init,
            condition,
            step,
            body,
        } => {
            if let Some(init) = init {
                visitor.visit_decl(init);
            }
            if let Some(condition) = condition {
                visitor.visit_expr(condition);
            }
            if let Some(step) = step {
                visitor.visit_expr(step);
            }
            visitor.visit_stmt(body);
        }
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::Unary { operand, .. } => visitor.visit_expr(operand),
        ExprKind::Literal { .. } | ExprKind::Identifier { .. } => {}
        ExprKind::ArrayIdentifier { size, .. } => visitor.visit_expr(size),
        ExprKind::Index { array, index } => {
            visitor.visit_expr(array);
            visitor.visit_expr(index);
        }
        ExprKind::Array { elements } => {
            for element in elements {
                visitor.visit_expr(element);
            }
        }
        ExprKind::Call { callee, args } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        ExprKind::Attribute { object, attribute } => {
            visitor.visit_expr(object);
            visitor.visit_expr(attribute);
        }
    }
}
