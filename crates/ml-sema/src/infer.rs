//! Expression type inference.
//!
//! Direct structural inference: literals map to fixed primitives, identifiers
//! resolve through the scope chain, binary operators promote, and calls and
//! attribute accesses are verified against the entities the scopes hold.

use ml_common::span::Span;
use ml_parser::ast::{Accessor, Expr, ExprKind, LiteralKind, ModifierFlags};

use crate::analyzer::Analyzer;
use crate::scope::can_access;
use crate::ty::{promote, FnEntity, Ty, TyKind};

impl Analyzer {
    /// Infer the type of an expression, emitting diagnostics for anything
    /// unresolvable. Returns the `none` type on failure.
    pub fn infer(&mut self, expr: &Expr) -> Ty {
        match &expr.kind {
            ExprKind::Binary { left, right, .. } => {
                let left_ty = self.infer(left);
                let right_ty = self.infer(right);
                if left_ty.is_none() || right_ty.is_none() {
                    return Ty::none();
                }
                promote(&left_ty, &right_ty)
            }
            ExprKind::Unary { operand, .. } => self.infer(operand),
            ExprKind::Literal { kind, .. } => match kind {
                LiteralKind::Integer => Ty::i64(),
                LiteralKind::Float => Ty::f64(),
                LiteralKind::Str => Ty::str(),
                LiteralKind::Character => Ty::char(),
                LiteralKind::Boolean => Ty::bool(),
                LiteralKind::Null => Ty::null(),
            },
            ExprKind::Identifier { name } => self.infer_identifier(name, expr.span),
            ExprKind::ArrayIdentifier { element, .. } => match self.scopes.get_type(element) {
                Some(element_ty) => Ty::array_of(&element_ty),
                None => Ty::none(),
            },
            ExprKind::Index { array, index } => self.infer_index(array, index),
            ExprKind::Array { elements } => self.infer_array_literal(elements),
            ExprKind::Call { callee, args } => self.infer_call(callee, args, expr.span),
            ExprKind::Attribute { object, attribute } => {
                self.infer_attribute(object, attribute)
            }
        }
    }

    /// Resolution order: variable, function, class, record, primitive type.
    fn infer_identifier(&mut self, name: &str, span: Span) -> Ty {
        if let Some(var) = self.scopes.get_variable(name) {
            return var.ty.clone();
        }
        if let Some(func) = self.scopes.get_function(name) {
            return func.ty();
        }
        if let Some(class) = self.scopes.get_class(name) {
            return class.ty();
        }
        if let Some(record) = self.scopes.get_record(name) {
            return record.ty();
        }
        if let Some(ty) = self.scopes.get_type(name) {
            return ty;
        }
        self.error(
            format!("Undeclared identifier '{}'", name),
            "no declaration with this name is in scope",
            span,
            202,
        );
        Ty::none()
    }

    /// Indexing requires an array operand and an integer index. The result
    /// is the array type itself: a conservative placeholder.
    fn infer_index(&mut self, array: &Expr, index: &Expr) -> Ty {
        let array_ty = self.infer(array);
        let index_ty = self.infer(index);

        if !array_ty.is_none() && array_ty.kind != TyKind::Array {
            self.error(
                format!("Cannot index a value of type '{}'", array_ty),
                "only arrays can be indexed",
                array.span,
                216,
            );
            return Ty::none();
        }
        if !index_ty.is_none() && !index_ty.is_integer() {
            self.error(
                format!("Array index has type '{}'", index_ty),
                "array indices must be integers",
                index.span,
                217,
            );
        }
        array_ty
    }

    /// Element type comes from the first element; heterogeneous elements
    /// are not checked in this version.
    fn infer_array_literal(&mut self, elements: &[Expr]) -> Ty {
        let mut element_ty = Ty::none();
        for (i, element) in elements.iter().enumerate() {
            let ty = self.infer(element);
            if i == 0 {
                element_ty = ty;
            }
        }
        Ty::array_of(&element_ty)
    }

    /// Calls on functions check arity and per-parameter compatibility;
    /// calls on classes resolve the `init` constructor.
    fn infer_call(&mut self, callee: &Expr, args: &[Expr], span: Span) -> Ty {
        if let Some(name) = callee.identifier_name() {
            if let Some(func) = self.scopes.get_function(name) {
                let func = func.clone();
                self.check_call_args(&func, args, span);
                return func.ret;
            }
            if let Some(class) = self.scopes.get_class(name) {
                let class_ty = class.ty();
                let constructor = class.constructor().cloned();
                match constructor {
                    Some(ctor) if can_access(ctor.accessor, Accessor::Public) => {
                        self.check_call_args(&ctor, args, span);
                        return class_ty;
                    }
                    _ => {
                        self.error(
                            format!("Class '{}' has no accessible constructor", name),
                            "declare a public `init fn` to construct this class",
                            span,
                            205,
                        );
                        return Ty::none();
                    }
                }
            }
        }

        // Not a known function or class; whatever the callee is, it cannot
        // be called.
        let callee_ty = self.infer(callee);
        if !callee_ty.is_none() {
            self.error(
                format!("Cannot call a value of type '{}'", callee_ty),
                "only functions and classes can be called",
                span,
                204,
            );
        }
        Ty::none()
    }

    /// Arity plus per-parameter similarity-or-numeric compatibility.
    fn check_call_args(&mut self, func: &FnEntity, args: &[Expr], span: Span) {
        if args.len() != func.params.len() {
            self.error(
                format!("Invalid arguments to call '{}'", func.name),
                format!(
                    "expected {} argument(s), found {}",
                    func.params.len(),
                    args.len()
                ),
                span,
                204,
            );
            // Still infer the arguments so their own problems surface.
            for arg in args {
                self.infer(arg);
            }
            return;
        }
        for (param, arg) in func.params.iter().zip(args) {
            let arg_ty = self.infer(arg);
            if arg_ty.is_none() {
                continue;
            }
            let compatible = arg_ty.is_similar_to(&param.ty)
                || (arg_ty.is_numeric() && param.ty.is_numeric());
            if !compatible {
                self.error(
                    format!("Invalid arguments to call '{}'", func.name),
                    format!(
                        "parameter '{}' has type '{}', found '{}'",
                        param.name, param.ty, arg_ty
                    ),
                    arg.span,
                    204,
                );
            }
        }
    }

    /// `object.attr`: fields resolve on classes and records (public only at
    /// this layer); method calls resolve on classes with their arguments
    /// verified.
    fn infer_attribute(&mut self, object: &Expr, attribute: &Expr) -> Ty {
        let object_ty = self.infer(object);
        if object_ty.is_none() {
            return Ty::none();
        }

        // `this` inside a class scope is Private to its own members.
        let requester = match object.identifier_name() {
            Some("this") => Accessor::Private,
            _ => Accessor::Public,
        };

        match object_ty.kind {
            TyKind::Class => {
                let Some(class) = self.scopes.get_class(&object_ty.name) else {
                    return Ty::none();
                };
                match &attribute.kind {
                    ExprKind::Identifier { name } => {
                        let field = class.field(name).cloned();
                        self.resolve_member_field(&object_ty, field, name, requester, attribute.span)
                    }
                    ExprKind::Call { callee, args } => {
                        let method_name =
                            callee.identifier_name().unwrap_or_default().to_string();
                        let method = class.method(&method_name).cloned();
                        match method {
                            Some(method) => {
                                if !can_access(method.accessor, requester) {
                                    self.error(
                                        format!(
                                            "Cannot access method '{}' of '{}'",
                                            method_name, object_ty
                                        ),
                                        format!(
                                            "the method is declared '{}'",
                                            method.accessor.name()
                                        ),
                                        attribute.span,
                                        208,
                                    );
                                    return Ty::none();
                                }
                                self.check_call_args(&method, args, attribute.span);
                                method.ret
                            }
                            None => {
                                self.error(
                                    format!(
                                        "Unknown method '{}' on '{}'",
                                        method_name, object_ty
                                    ),
                                    "the class declares no such method",
                                    attribute.span,
                                    207,
                                );
                                Ty::none()
                            }
                        }
                    }
                    _ => Ty::none(),
                }
            }
            TyKind::Record => {
                let Some(record) = self.scopes.get_record(&object_ty.name) else {
                    return Ty::none();
                };
                match &attribute.kind {
                    ExprKind::Identifier { name } => {
                        let field = record.field(name).cloned();
                        self.resolve_member_field(&object_ty, field, name, requester, attribute.span)
                    }
                    ExprKind::Call { callee, .. } => {
                        let method_name = callee.identifier_name().unwrap_or_default();
                        self.error(
                            format!("Unknown method '{}' on '{}'", method_name, object_ty),
                            "records have fields only",
                            attribute.span,
                            207,
                        );
                        Ty::none()
                    }
                    _ => Ty::none(),
                }
            }
            _ => Ty::none(),
        }
    }

    fn resolve_member_field(
        &mut self,
        object_ty: &Ty,
        field: Option<crate::ty::VarEntity>,
        name: &str,
        requester: Accessor,
        span: Span,
    ) -> Ty {
        match field {
            Some(field) => {
                if !can_access(field.accessor, requester) {
                    self.error(
                        format!("Cannot access attribute '{}' of '{}'", name, object_ty),
                        format!("the field is declared '{}'", field.accessor.name()),
                        span,
                        208,
                    );
                    return Ty::none();
                }
                field.ty
            }
            None => {
                self.error(
                    format!("Unknown attribute '{}' on '{}'", name, object_ty),
                    "no field with this name is declared",
                    span,
                    206,
                );
                Ty::none()
            }
        }
    }

    // ── Type expression resolution ─────────────────────────────────────

    /// Resolve a parse-side type expression to a semantic type. Array types
    /// set the Array modifier flag on the declaring entity. Resolution and
    /// validity share one gate: a name must come back from `get_type` and
    /// pass `is_valid_type`. Returns the `none` type otherwise; the caller
    /// reports it.
    pub(crate) fn resolve_type_expr(&mut self, expr: &Expr, flags: &mut ModifierFlags) -> Ty {
        match &expr.kind {
            ExprKind::Identifier { name } => match self.scopes.get_type(name) {
                Some(ty) if self.scopes.is_valid_type(&ty) => ty,
                _ => Ty::none(),
            },
            ExprKind::ArrayIdentifier { element, .. } => {
                match self.scopes.get_type(element) {
                    Some(element_ty) if self.scopes.is_valid_type(&element_ty) => {
                        flags.insert(ModifierFlags::ARRAY);
                        Ty::array_of(&element_ty)
                    }
                    _ => Ty::none(),
                }
            }
            _ => Ty::none(),
        }
    }

    /// The display name of a type expression, for diagnostics.
    pub(crate) fn type_expr_name(expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Identifier { name } => name.clone(),
            ExprKind::ArrayIdentifier { element, .. } => format!("{}[]", element),
            _ => "<type>".to_string(),
        }
    }
}
