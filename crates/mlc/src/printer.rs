//! AST tree printer.
//!
//! A [`Visitor`] implementation that renders the tree as one labelled node
//! per line with two-space indentation. Pure consumer of the AST; the
//! driver prints the result under `--debug`.

use ml_parser::ast::visit::Visitor;
use ml_parser::ast::{
    Cond, CondKind, Decl, DeclKind, Expr, ExprKind, ModifierStmt, Program, Stmt, StmtKind,
};

pub struct TreePrinter {
    out: String,
    depth: usize,
}

impl TreePrinter {
    /// Render a whole program as an indented tree.
    pub fn print(program: &Program) -> String {
        let mut printer = TreePrinter { out: String::new(), depth: 0 };
        program.accept(&mut printer);
        printer.out
    }

    fn line(&mut self, label: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(label.as_ref());
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    fn modifier_label(modifiers: &ModifierStmt) -> String {
        use ml_parser::ast::ModifierFlags;
        let mut parts = vec![modifiers.accessor.name().to_string()];
        for (flag, name) in [
            (ModifierFlags::STATIC, "static"),
            (ModifierFlags::CONSTANT, "const"),
            (ModifierFlags::ARRAY, "array"),
            (ModifierFlags::INIT, "init"),
            (ModifierFlags::NULLABLE, "nullable"),
        ] {
            if modifiers.flags.contains(flag) {
                parts.push(name.to_string());
            }
        }
        parts.join(" ")
    }
}

impl Visitor for TreePrinter {
    fn visit_program(&mut self, program: &Program) {
        self.line("Program");
        self.nested(|p| {
            for stmt in &program.statements {
                stmt.accept(p);
            }
        });
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Return(expr) => {
                self.line("Return");
                if let Some(expr) = expr {
                    self.nested(|p| expr.accept(p));
                }
            }
            StmtKind::Break => self.line("Break"),
            StmtKind::Continue => self.line("Continue"),
            StmtKind::Expression(expr) => {
                self.line("ExpressionStatement");
                self.nested(|p| expr.accept(p));
            }
            StmtKind::Block(stmts) => {
                self.line("Block");
                self.nested(|p| {
                    for stmt in stmts {
                        stmt.accept(p);
                    }
                });
            }
            StmtKind::Modifier(modifiers) => {
                self.line(format!("Modifier {}", Self::modifier_label(modifiers)));
            }
            StmtKind::Declaration(decl) => decl.accept(self),
            StmtKind::Conditional(cond) => cond.accept(self),
        }
    }

    fn visit_decl(&mut self, decl: &Decl) {
        match &decl.kind {
            DeclKind::Variable { init } => {
                self.line(format!("VariableDecl {}", decl.name));
                self.nested(|p| {
                    if let Some(ty) = &decl.ty {
                        ty.accept(p);
                    }
                    if let Some(init) = init {
                        init.accept(p);
                    }
                });
            }
            DeclKind::Function { params, body } => {
                self.line(format!("FunctionDecl {}", decl.name));
                self.nested(|p| {
                    for param in params {
                        param.accept(p);
                    }
                    if let Some(ty) = &decl.ty {
                        ty.accept(p);
                    }
                    body.accept(p);
                });
            }
            DeclKind::Record { fields } => {
                self.line(format!("RecordDecl {}", decl.name));
                self.nested(|p| {
                    for field in fields {
                        field.accept(p);
                    }
                });
            }
            DeclKind::Class { fields, methods } => {
                self.line(format!("ClassDecl {}", decl.name));
                self.nested(|p| {
                    for field in fields {
                        field.accept(p);
                    }
                    for method in methods {
                        method.accept(p);
                    }
                });
            }
        }
    }

    fn visit_cond(&mut self, cond: &Cond) {
        match &cond.kind {
            CondKind::If {
                condition,
                then_block,
                elifs,
                else_block,
            } => {
                self.line("If");
                self.nested(|p| {
                    if let Some(condition) = condition {
                        condition.accept(p);
                    }
                    then_block.accept(p);
                    for elif in elifs {
                        elif.accept(p);
                    }
                    if let Some(else_block) = else_block {
                        p.line("Else");
                        p.nested(|p| else_block.accept(p));
                    }
                });
            }
            CondKind::Switch { scrutinee, cases } => {
                self.line("Switch");
                self.nested(|p| {
                    if let Some(scrutinee) = scrutinee {
                        scrutinee.accept(p);
                    }
                    for case in cases {
                        match &case.value {
                            Some(value) => {
                                p.line("Case");
                                p.nested(|p| {
                                    value.accept(p);
                                    case.body.accept(p);
                                });
                            }
                            None => {
                                p.line("Default");
                                p.nested(|p| case.body.accept(p));
                            }
                        }
                    }
                });
            }
            CondKind::While { condition, body } => {
                self.line("While");
                self.nested(|p| {
                    if let Some(condition) = condition {
                        condition.accept(p);
                    }
                    body.accept(p);
                });
            }
            CondKind::For {
                init,
                condition,
                step,
                body,
            } => {
                self.line("For");
                self.nested(|p| {
                    if let Some(init) = init {
                        init.accept(p);
                    }
                    if let Some(condition) = condition {
                        condition.accept(p);
                    }
                    if let Some(step) = step {
                        step.accept(p);
                    }
                    body.accept(p);
                });
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Binary { left, op, right } => {
                self.line(format!("Binary {}", op));
                self.nested(|p| {
                    left.accept(p);
                    right.accept(p);
                });
            }
            ExprKind::Unary { op, operand, prefix } => {
                let position = if *prefix { "prefix" } else { "postfix" };
                self.line(format!("Unary {} ({})", op, position));
                self.nested(|p| operand.accept(p));
            }
            ExprKind::Literal { text, kind } => {
                self.line(format!("Literal {} ({:?})", text, kind));
            }
            ExprKind::Identifier { name } => {
                self.line(format!("Identifier {}", name));
            }
            ExprKind::ArrayIdentifier { element, size } => {
                self.line(format!("ArrayType {}", element));
                self.nested(|p| size.accept(p));
            }
            ExprKind::Index { array, index } => {
                self.line("Index");
                self.nested(|p| {
                    array.accept(p);
                    index.accept(p);
                });
            }
            ExprKind::Array { elements } => {
                self.line("ArrayLiteral");
                self.nested(|p| {
                    for element in elements {
                        element.accept(p);
                    }
                });
            }
            ExprKind::Call { callee, args } => {
                self.line("Call");
                self.nested(|p| {
                    callee.accept(p);
                    for arg in args {
                        arg.accept(p);
                    }
                });
            }
            ExprKind::Attribute { object, attribute } => {
                self.line("Attribute");
                self.nested(|p| {
                    object.accept(p);
                    attribute.accept(p);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_a_declaration_tree() {
        let parse = ml_parser::parse("let x: i32 = 5;", "test.ml");
        assert!(parse.diagnostics.is_empty());
        let tree = TreePrinter::print(&parse.program);
        insta::assert_snapshot!(tree, @r###"
        Program
          VariableDecl x
            Identifier i32
            Literal 5 (Integer)
        "###);
    }

    #[test]
    fn prints_nested_control_flow() {
        let parse = ml_parser::parse("while true { break; }", "test.ml");
        assert!(parse.diagnostics.is_empty());
        let tree = TreePrinter::print(&parse.program);
        insta::assert_snapshot!(tree, @r###"
        Program
          While
            Literal true (Boolean)
            Block
              Break
        "###);
    }

    #[test]
    fn prints_expression_shapes() {
        let parse = ml_parser::parse("a = b.c(1) + d[0];", "test.ml");
        let tree = TreePrinter::print(&parse.program);
        assert!(tree.contains("Binary ="));
        assert!(tree.contains("Attribute"));
        assert!(tree.contains("Call"));
        assert!(tree.contains("Index"));
    }
}
