//! The semantic analyzer: builds scopes, resolves declarations, infers
//! expression types, and verifies control-flow context.
//!
//! Analysis never mutates the AST and never aborts; diagnostics accumulate
//! and [`Analyzer::has_errors`] reports the verdict. Every scope entered is
//! exited on every path, including the error paths.

use ml_common::diagnostic::{has_errors, Diagnostic, Level};
use ml_common::span::Span;
use ml_parser::ast::{
    Cond, CondKind, Decl, DeclKind, Expr, ModifierFlags, Program, Stmt, StmtKind,
};

use crate::scope::{ScopeKind, ScopeStack};
use crate::ty::{can_assign, ClassEntity, FnEntity, RecordEntity, Ty, VarEntity};

pub struct Analyzer {
    pub(crate) scopes: ScopeStack,
    diagnostics: Vec<Diagnostic>,
    source: String,
    file: String,
}

impl Analyzer {
    pub fn new(source: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            scopes: ScopeStack::new(),
            diagnostics: Vec::new(),
            source: source.into(),
            file: file.into(),
        }
    }

    /// Analyze a whole program in the global scope. Returns true when no
    /// Error-level diagnostic was produced.
    pub fn analyze(&mut self, program: &Program) -> bool {
        for stmt in &program.statements {
            self.analyze_stmt(stmt);
        }
        !self.has_errors()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        has_errors(&self.diagnostics)
    }

    // ── Statements ─────────────────────────────────────────────────────

    fn analyze_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Return(expr) => {
                if !self.scopes.current_kind().has_flag(ScopeKind::FUNCTION) {
                    self.error(
                        "Return statement not within a function scope",
                        "return is only meaningful inside a function body",
                        stmt.span,
                        209,
                    );
                }
                if let Some(expr) = expr {
                    self.infer(expr);
                }
            }
            StmtKind::Break => {
                if !self.scopes.current_kind().has_flag(ScopeKind::LOOP) {
                    self.error(
                        "Break statement not within a loop scope",
                        "break is only meaningful inside a loop body",
                        stmt.span,
                        210,
                    );
                }
            }
            StmtKind::Continue => {
                if !self.scopes.current_kind().has_flag(ScopeKind::LOOP) {
                    self.error(
                        "Continue statement not within a loop scope",
                        "continue is only meaningful inside a loop body",
                        stmt.span,
                        211,
                    );
                }
            }
            StmtKind::Expression(expr) => {
                let before = self.diagnostics.len();
                let ty = self.infer(expr);
                if ty.is_none() && self.diagnostics.len() == before {
                    self.error(
                        "Invalid type in expression",
                        "the operand types of this expression do not combine",
                        expr.span,
                        214,
                    );
                }
            }
            StmtKind::Block(stmts) => {
                self.scopes.enter("block", ScopeKind::BLOCK);
                for stmt in stmts {
                    self.analyze_stmt(stmt);
                }
                self.scopes.exit();
            }
            StmtKind::Modifier(_) => {
                if !self.scopes.current_kind().has_flag(ScopeKind::CLASS) {
                    self.error(
                        "Modifier statement not within a class scope",
                        "bare accessor/modifier statements are only legal in class bodies",
                        stmt.span,
                        212,
                    );
                }
            }
            StmtKind::Declaration(decl) => self.analyze_decl(decl),
            StmtKind::Conditional(cond) => self.analyze_cond(cond),
        }
    }

    // ── Declarations ───────────────────────────────────────────────────

    fn analyze_decl(&mut self, decl: &Decl) {
        match &decl.kind {
            DeclKind::Variable { .. } => self.analyze_variable(decl),
            DeclKind::Function { .. } => self.analyze_function(decl),
            DeclKind::Record { .. } => self.analyze_record(decl),
            DeclKind::Class { .. } => self.analyze_class(decl),
        }
    }

    /// Resolve the declared type, register the variable, and verify the
    /// initializer flows into the declared type.
    fn analyze_variable(&mut self, decl: &Decl) {
        let DeclKind::Variable { init } = &decl.kind else {
            return;
        };

        let mut flags = decl.modifiers.flags;
        let declared = match &decl.ty {
            Some(ty_expr) => {
                let ty = self.resolve_type_expr(ty_expr, &mut flags);
                if ty.is_none() {
                    self.error(
                        format!("Invalid type '{}'", Self::type_expr_name(ty_expr)),
                        "no primitive, class, or record has this name",
                        ty_expr.span,
                        201,
                    );
                }
                ty
            }
            None => Ty::none(),
        };

        let init_ty = init.as_ref().map(|e| (self.infer(e), e.span));

        // An unannotated binding takes its initializer's type.
        let declared = if decl.ty.is_none() {
            match &init_ty {
                Some((ty, _)) => ty.clone(),
                None => declared,
            }
        } else {
            declared
        };

        self.check_redeclaration(&decl.name, decl.span);
        self.scopes.define_variable(VarEntity {
            name: decl.name.clone(),
            ty: declared.clone(),
            accessor: decl.modifiers.accessor,
            flags,
        });

        if let Some((init_ty, init_span)) = init_ty {
            if init_ty.is_none() {
                return; // already diagnosed during inference
            }
            // A nullable binding accepts null.
            if init_ty.is_null() && flags.contains(ModifierFlags::NULLABLE) {
                return;
            }
            // Integer literals infer as i64; widening is tested from the
            // declared type toward the initializer so `let x: i32 = 5;`
            // stays clean.
            if !can_assign(&init_ty, &declared) {
                self.error(
                    "Type mismatch in variable initializer",
                    format!(
                        "a value of type '{}' cannot initialize a binding of type '{}'",
                        init_ty, declared
                    ),
                    init_span,
                    203,
                );
            }
        }
    }

    /// Register the function, then analyze its body inside a Function scope
    /// with the parameters bound.
    fn analyze_function(&mut self, decl: &Decl) {
        let DeclKind::Function { params, body } = &decl.kind else {
            return;
        };

        let entity = self.build_fn_entity(decl, params);
        self.check_redeclaration(&decl.name, decl.span);
        let param_entities = entity.params.clone();
        self.scopes.define_function(entity);

        self.scopes.enter(decl.name.clone(), ScopeKind::FUNCTION);
        for (param, entity) in params.iter().zip(param_entities) {
            self.check_redeclaration(&param.name, param.span);
            self.scopes.define_variable(entity);
        }
        match &body.kind {
            StmtKind::Block(stmts) => {
                for stmt in stmts {
                    self.analyze_stmt(stmt);
                }
            }
            _ => self.analyze_stmt(body),
        }
        self.scopes.exit();
    }

    /// Records are field-only; build the entity and register it.
    fn analyze_record(&mut self, decl: &Decl) {
        let DeclKind::Record { fields } = &decl.kind else {
            return;
        };
        let field_entities = fields
            .iter()
            .map(|field| self.build_var_entity(field))
            .collect();
        self.check_redeclaration(&decl.name, decl.span);
        self.scopes.define_record(RecordEntity {
            name: decl.name.clone(),
            fields: field_entities,
        });
    }

    /// Build the class entity, register it, then analyze methods inside a
    /// Class scope where the fields and `this` are bound.
    fn analyze_class(&mut self, decl: &Decl) {
        let DeclKind::Class { fields, methods } = &decl.kind else {
            return;
        };

        let field_entities: Vec<VarEntity> = fields
            .iter()
            .map(|field| self.build_var_entity(field))
            .collect();
        let method_entities: Vec<FnEntity> = methods
            .iter()
            .map(|method| {
                let DeclKind::Function { params, .. } = &method.kind else {
                    unreachable!("class methods are function declarations");
                };
                self.build_fn_entity(method, params)
            })
            .collect();

        let entity = ClassEntity {
            name: decl.name.clone(),
            fields: field_entities.clone(),
            methods: method_entities,
        };
        let class_ty = entity.ty();
        self.check_redeclaration(&decl.name, decl.span);
        self.scopes.define_class(entity);

        self.scopes.enter(decl.name.clone(), ScopeKind::CLASS);
        for (field, entity) in fields.iter().zip(field_entities) {
            self.check_redeclaration(&field.name, field.span);
            self.scopes.define_variable(entity);
        }
        self.scopes.define_variable(VarEntity {
            name: "this".to_string(),
            ty: class_ty,
            accessor: ml_parser::ast::Accessor::Private,
            flags: ModifierFlags::empty(),
        });
        for method in methods {
            self.analyze_function(method);
        }
        self.scopes.exit();
    }

    // ── Conditionals ───────────────────────────────────────────────────

    fn analyze_cond(&mut self, cond: &Cond) {
        match &cond.kind {
            CondKind::If {
                condition,
                then_block,
                elifs,
                else_block,
            } => {
                self.check_condition(condition.as_ref());
                self.analyze_stmt(then_block);
                for elif in elifs {
                    self.analyze_cond(elif);
                }
                if let Some(else_block) = else_block {
                    self.analyze_stmt(else_block);
                }
            }
            CondKind::Switch { scrutinee, cases } => {
                // Case values are not matched against the scrutinee type in
                // this version.
                if let Some(scrutinee) = scrutinee {
                    self.infer(scrutinee);
                }
                for case in cases {
                    self.analyze_stmt(&case.body);
                }
            }
            CondKind::While { condition, body } => {
                self.check_condition(condition.as_ref());
                self.scopes.enter("while", ScopeKind::LOOP);
                self.analyze_stmt(body);
                self.scopes.exit();
            }
            CondKind::For {
                init,
                condition,
                step,
                body,
            } => {
                self.scopes.enter("for", ScopeKind::LOOP);
                if let Some(init) = init {
                    self.analyze_decl(init);
                }
                self.check_condition(condition.as_ref());
                if let Some(step) = step {
                    self.infer(step);
                }
                self.analyze_stmt(body);
                self.scopes.exit();
            }
        }
    }

    /// A condition must resolve to a truthy type (anything but none, void,
    /// null).
    fn check_condition(&mut self, condition: Option<&Expr>) {
        let Some(condition) = condition else {
            return; // the parser already reported the malformed condition
        };
        let before = self.diagnostics.len();
        let ty = self.infer(condition);
        if !ty.is_truthy() && self.diagnostics.len() == before {
            self.error(
                "Condition is not a truthy type",
                format!("a condition cannot have type '{}'", ty),
                condition.span,
                213,
            );
        }
    }

    // ── Shared helpers ─────────────────────────────────────────────────

    fn check_redeclaration(&mut self, name: &str, span: Span) {
        if !name.is_empty() && self.scopes.declared_in_current(name) {
            self.error(
                format!("Redeclaration of '{}'", name),
                "a name can only be declared once per scope",
                span,
                215,
            );
        }
    }

    /// Resolve a declaration's variable entity: declared type plus flags.
    pub(crate) fn build_var_entity(&mut self, decl: &Decl) -> VarEntity {
        let mut flags = decl.modifiers.flags;
        let ty = match &decl.ty {
            Some(ty_expr) => {
                let ty = self.resolve_type_expr(ty_expr, &mut flags);
                if ty.is_none() {
                    self.error(
                        format!("Invalid type '{}'", Self::type_expr_name(ty_expr)),
                        "no primitive, class, or record has this name",
                        ty_expr.span,
                        201,
                    );
                }
                ty
            }
            None => Ty::none(),
        };
        VarEntity {
            name: decl.name.clone(),
            ty,
            accessor: decl.modifiers.accessor,
            flags,
        }
    }

    /// Resolve a function declaration's signature entity.
    fn build_fn_entity(&mut self, decl: &Decl, params: &[Decl]) -> FnEntity {
        let mut flags = decl.modifiers.flags;
        let ret = match &decl.ty {
            Some(ty_expr) => {
                let ty = self.resolve_type_expr(ty_expr, &mut flags);
                if ty.is_none() {
                    self.error(
                        format!("Invalid type '{}'", Self::type_expr_name(ty_expr)),
                        "no primitive, class, or record has this name",
                        ty_expr.span,
                        201,
                    );
                }
                ty
            }
            None => Ty::void(),
        };
        let params = params
            .iter()
            .map(|param| self.build_var_entity(param))
            .collect();
        FnEntity {
            name: decl.name.clone(),
            ret,
            params,
            accessor: decl.modifiers.accessor,
            flags,
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
}
