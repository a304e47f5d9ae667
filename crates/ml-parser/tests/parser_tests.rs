use ml_common::diagnostic::Level;
use ml_parser::ast::{
    Cond, CondKind, Decl, DeclKind, Expr, ExprKind, LiteralKind, ModifierFlags, Program, Stmt,
    StmtKind,
};
use ml_parser::{parse, Parse};

fn parse_ok(source: &str) -> Program {
    let result = parse(source, "test.ml");
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for {:?}: {:?}",
        source,
        result
            .diagnostics
            .iter()
            .map(|d| &d.message)
            .collect::<Vec<_>>()
    );
    result.program
}

fn parse_err(source: &str) -> Parse {
    let result = parse(source, "test.ml");
    assert!(
        !result.diagnostics.is_empty(),
        "expected diagnostics for {:?}",
        source
    );
    result
}

fn only_stmt(program: &Program) -> &Stmt {
    assert_eq!(program.statements.len(), 1, "expected one statement");
    &program.statements[0]
}

fn decl_of(stmt: &Stmt) -> &Decl {
    match &stmt.kind {
        StmtKind::Declaration(decl) => decl,
        other => panic!("expected declaration, got {:?}", other),
    }
}

fn cond_of(stmt: &Stmt) -> &Cond {
    match &stmt.kind {
        StmtKind::Conditional(cond) => cond,
        other => panic!("expected conditional, got {:?}", other),
    }
}

fn expr_of(stmt: &Stmt) -> &Expr {
    match &stmt.kind {
        StmtKind::Expression(expr) => expr,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

fn block_stmts(stmt: &Stmt) -> &[Stmt] {
    match &stmt.kind {
        StmtKind::Block(stmts) => stmts,
        other => panic!("expected block, got {:?}", other),
    }
}

fn ident_name(expr: &Expr) -> &str {
    expr.identifier_name()
        .unwrap_or_else(|| panic!("expected identifier, got {:?}", expr.kind))
}

// ── Declarations ────────────────────────────────────────────────────────

#[test]
fn variable_declaration_with_initializer() {
    let program = parse_ok("let x: i32 = 5;");
    let decl = decl_of(only_stmt(&program));

    assert_eq!(decl.name, "x");
    assert_eq!(ident_name(decl.ty.as_ref().unwrap()), "i32");
    match &decl.kind {
        DeclKind::Variable { init: Some(init) } => match &init.kind {
            ExprKind::Literal { text, kind } => {
                assert_eq!(text, "5");
                assert_eq!(*kind, LiteralKind::Integer);
            }
            other => panic!("expected integer literal, got {:?}", other),
        },
        other => panic!("expected initialized variable, got {:?}", other),
    }
}

#[test]
fn variable_declaration_without_initializer() {
    let program = parse_ok("let flag: bool;");
    let decl = decl_of(only_stmt(&program));
    assert_eq!(decl.name, "flag");
    assert!(matches!(decl.kind, DeclKind::Variable { init: None }));
}

#[test]
fn nullable_variable_sets_flag() {
    let program = parse_ok("let x: i32? = null;");
    let decl = decl_of(only_stmt(&program));
    assert!(decl.modifiers.flags.contains(ModifierFlags::NULLABLE));
    match &decl.kind {
        DeclKind::Variable { init: Some(init) } => {
            assert!(matches!(
                &init.kind,
                ExprKind::Literal { kind: LiteralKind::Null, .. }
            ));
        }
        other => panic!("expected initialized variable, got {:?}", other),
    }
}

#[test]
fn missing_colon_is_a_warning_and_recovers() {
    let result = parse("let x i32 = 5;", "test.ml");
    assert_eq!(result.diagnostics.len(), 1);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.level, Level::Warning);
    assert_eq!(diag.message, "Missing ':' before type annotation");

    // The declaration still carries its type.
    let decl = decl_of(only_stmt(&result.program));
    assert_eq!(ident_name(decl.ty.as_ref().unwrap()), "i32");
}

#[test]
fn sized_array_type() {
    let program = parse_ok("let buf: i32[8];");
    let decl = decl_of(only_stmt(&program));
    match &decl.ty.as_ref().unwrap().kind {
        ExprKind::ArrayIdentifier { element, size } => {
            assert_eq!(element, "i32");
            assert!(matches!(
                &size.kind,
                ExprKind::Literal { text, kind: LiteralKind::Integer } if text == "8"
            ));
        }
        other => panic!("expected array identifier, got {:?}", other),
    }
}

#[test]
fn unsized_array_type_records_minus_one() {
    let program = parse_ok("let buf: i32[];");
    let decl = decl_of(only_stmt(&program));
    match &decl.ty.as_ref().unwrap().kind {
        ExprKind::ArrayIdentifier { element, size } => {
            assert_eq!(element, "i32");
            assert!(size.is_unsized_marker());
        }
        other => panic!("expected array identifier, got {:?}", other),
    }
}

#[test]
fn function_declaration() {
    let program = parse_ok("fn add(a: i32, b: i32): i32 { return a + b; }");
    let decl = decl_of(only_stmt(&program));

    assert_eq!(decl.name, "add");
    assert_eq!(ident_name(decl.ty.as_ref().unwrap()), "i32");
    match &decl.kind {
        DeclKind::Function { params, body } => {
            assert_eq!(params.len(), 2);
            assert_eq!(params[0].name, "a");
            assert_eq!(params[1].name, "b");
            assert_eq!(ident_name(params[0].ty.as_ref().unwrap()), "i32");

            let stmts = block_stmts(body);
            assert_eq!(stmts.len(), 1);
            match &stmts[0].kind {
                StmtKind::Return(Some(expr)) => match &expr.kind {
                    ExprKind::Binary { op, .. } => assert_eq!(op, "+"),
                    other => panic!("expected binary return, got {:?}", other),
                },
                other => panic!("expected return, got {:?}", other),
            }
        }
        other => panic!("expected function, got {:?}", other),
    }
}

#[test]
fn public_function_via_accessor_prefix() {
    let program = parse_ok("pub fn run() { }");
    let decl = decl_of(only_stmt(&program));
    assert_eq!(decl.name, "run");
    assert!(matches!(decl.kind, DeclKind::Function { .. }));
}

#[test]
fn record_declaration() {
    let program = parse_ok("rec Point { x: f32; y: f32; }");
    let decl = decl_of(only_stmt(&program));
    assert_eq!(decl.name, "Point");
    match &decl.kind {
        DeclKind::Record { fields } => {
            assert_eq!(fields.len(), 2);
            assert_eq!(fields[0].name, "x");
            assert_eq!(fields[1].name, "y");
            assert_eq!(ident_name(fields[0].ty.as_ref().unwrap()), "f32");
        }
        other => panic!("expected record, got {:?}", other),
    }
}

#[test]
fn class_members_disambiguate_fields_and_methods() {
    let program = parse_ok(
        "cls Counter { count: i64; pub fn bump(): i64 { return count; } }",
    );
    let decl = decl_of(only_stmt(&program));
    assert_eq!(decl.name, "Counter");
    match &decl.kind {
        DeclKind::Class { fields, methods } => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].name, "count");
            assert_eq!(methods.len(), 1);
            assert_eq!(methods[0].name, "bump");
        }
        other => panic!("expected class, got {:?}", other),
    }
}

#[test]
fn init_modifier_names_the_constructor() {
    let program = parse_ok("cls C { pub init fn() { } }");
    let decl = decl_of(only_stmt(&program));
    match &decl.kind {
        DeclKind::Class { methods, .. } => {
            assert_eq!(methods.len(), 1);
            assert_eq!(methods[0].name, "init");
            assert!(methods[0].modifiers.flags.contains(ModifierFlags::INIT));
        }
        other => panic!("expected class, got {:?}", other),
    }
}

// ── Control flow ────────────────────────────────────────────────────────

#[test]
fn if_elif_else_chain() {
    let program = parse_ok("if a { } elif b { } elif c { } else { }");
    let cond = cond_of(only_stmt(&program));
    match &cond.kind {
        CondKind::If { condition, elifs, else_block, .. } => {
            assert_eq!(ident_name(condition.as_ref().unwrap()), "a");
            assert_eq!(elifs.len(), 2);
            assert!(else_block.is_some());
        }
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn elif_after_else_is_not_collected() {
    let result = parse_err("if a { } else { } elif b { }");
    // The dangling elif is reported by the statement loop.
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.message.contains("Unexpected token")));
}

#[test]
fn while_loop_with_break_and_continue() {
    let program = parse_ok("while true { break; continue; }");
    let cond = cond_of(only_stmt(&program));
    match &cond.kind {
        CondKind::While { condition, body } => {
            assert!(matches!(
                &condition.as_ref().unwrap().kind,
                ExprKind::Literal { kind: LiteralKind::Boolean, text } if text == "true"
            ));
            let stmts = block_stmts(body);
            assert!(matches!(stmts[0].kind, StmtKind::Break));
            assert!(matches!(stmts[1].kind, StmtKind::Continue));
        }
        other => panic!("expected while, got {:?}", other),
    }
}

#[test]
fn c_style_for_fills_all_slots() {
    let program = parse_ok("for (let i: i32 = 0; i < 10; i = i + 1) { }");
    let cond = cond_of(only_stmt(&program));
    match &cond.kind {
        CondKind::For { init, condition, step, .. } => {
            let init = init.as_ref().expect("initializer");
            assert_eq!(init.name, "i");
            assert!(matches!(
                condition.as_ref().unwrap().kind,
                ExprKind::Binary { .. }
            ));
            assert!(matches!(step.as_ref().unwrap().kind, ExprKind::Binary { .. }));
        }
        other => panic!("expected for, got {:?}", other),
    }
}

#[test]
fn for_each_stores_iterable_in_step_slot() {
    let program = parse_ok("for (item: i32 in items) { }");
    let cond = cond_of(only_stmt(&program));
    match &cond.kind {
        CondKind::For { init, condition, step, .. } => {
            assert_eq!(init.as_ref().unwrap().name, "item");
            assert!(condition.is_none());
            assert_eq!(ident_name(step.as_ref().unwrap()), "items");
        }
        other => panic!("expected for, got {:?}", other),
    }
}

#[test]
fn range_for_keeps_only_condition() {
    let program = parse_ok("for (0..10) { }");
    let cond = cond_of(only_stmt(&program));
    match &cond.kind {
        CondKind::For { init, condition, step, .. } => {
            assert!(init.is_none());
            assert!(step.is_none());
            match &condition.as_ref().unwrap().kind {
                ExprKind::Binary { op, .. } => assert_eq!(op, ".."),
                other => panic!("expected range, got {:?}", other),
            }
        }
        other => panic!("expected for, got {:?}", other),
    }
}

#[test]
fn switch_with_cases_and_default() {
    let program = parse_ok("switch x { case 1 { } case 2 { } default { } }");
    let cond = cond_of(only_stmt(&program));
    match &cond.kind {
        CondKind::Switch { scrutinee, cases } => {
            assert_eq!(ident_name(scrutinee.as_ref().unwrap()), "x");
            assert_eq!(cases.len(), 3);
            assert!(cases[0].value.is_some());
            assert!(cases[1].value.is_some());
            assert!(cases[2].value.is_none());
        }
        other => panic!("expected switch, got {:?}", other),
    }
}

#[test]
fn switch_span_ends_at_last_case() {
    let source = "switch x { case 1 { } }";
    let program = parse_ok(source);
    let stmt = only_stmt(&program);
    // The closing brace of the switch is excluded from the span.
    let rendered = &source[stmt.span.start.index as usize..stmt.span.end.index as usize];
    assert_eq!(rendered, "switch x { case 1 { }");
}

// ── Expressions ─────────────────────────────────────────────────────────

#[test]
fn precedence_ladder_shapes_arithmetic() {
    // a + b * c - d / e  =>  (-  (+ a (* b c))  (/ d e))
    let program = parse_ok("a + b * c - d / e;");
    let expr = expr_of(only_stmt(&program));

    let ExprKind::Binary { left, op, right } = &expr.kind else {
        panic!("expected binary root");
    };
    assert_eq!(op, "-");

    let ExprKind::Binary { left: a, op: plus, right: mul } = &left.kind else {
        panic!("expected + on the left");
    };
    assert_eq!(plus, "+");
    assert_eq!(ident_name(a), "a");
    let ExprKind::Binary { op: star, .. } = &mul.kind else {
        panic!("expected * under +");
    };
    assert_eq!(star, "*");

    let ExprKind::Binary { op: slash, .. } = &right.kind else {
        panic!("expected / on the right");
    };
    assert_eq!(slash, "/");
}

#[test]
fn assignment_is_right_associative() {
    let program = parse_ok("a = b = c;");
    let expr = expr_of(only_stmt(&program));
    let ExprKind::Binary { left, op, right } = &expr.kind else {
        panic!("expected assignment root");
    };
    assert_eq!(op, "=");
    assert_eq!(ident_name(left), "a");
    let ExprKind::Binary { op: inner, .. } = &right.kind else {
        panic!("expected nested assignment");
    };
    assert_eq!(inner, "=");
}

#[test]
fn logical_operators_nest_under_or() {
    let program = parse_ok("a || b && c;");
    let expr = expr_of(only_stmt(&program));
    let ExprKind::Binary { op, right, .. } = &expr.kind else {
        panic!("expected binary root");
    };
    assert_eq!(op, "||");
    let ExprKind::Binary { op: inner, .. } = &right.kind else {
        panic!("expected && under ||");
    };
    assert_eq!(inner, "&&");
}

#[test]
fn prefix_unary() {
    let program = parse_ok("!ready;");
    let expr = expr_of(only_stmt(&program));
    match &expr.kind {
        ExprKind::Unary { op, prefix, .. } => {
            assert_eq!(op, "!");
            assert!(*prefix);
        }
        other => panic!("expected unary, got {:?}", other),
    }
}

#[test]
fn postfix_increment() {
    let program = parse_ok("i++;");
    let expr = expr_of(only_stmt(&program));
    match &expr.kind {
        ExprKind::Unary { op, prefix, operand } => {
            assert_eq!(op, "++");
            assert!(!*prefix);
            assert_eq!(ident_name(operand), "i");
        }
        other => panic!("expected postfix unary, got {:?}", other),
    }
}

#[test]
fn call_with_arguments() {
    let program = parse_ok("add(1, 2);");
    let expr = expr_of(only_stmt(&program));
    match &expr.kind {
        ExprKind::Call { callee, args } => {
            assert_eq!(ident_name(callee), "add");
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn attribute_access() {
    let program = parse_ok("p.x;");
    let expr = expr_of(only_stmt(&program));
    match &expr.kind {
        ExprKind::Attribute { object, attribute } => {
            assert_eq!(ident_name(object), "p");
            assert_eq!(ident_name(attribute), "x");
        }
        other => panic!("expected attribute, got {:?}", other),
    }
}

#[test]
fn method_call_is_attribute_of_call() {
    let program = parse_ok("obj.update(1);");
    let expr = expr_of(only_stmt(&program));
    match &expr.kind {
        ExprKind::Attribute { object, attribute } => {
            assert_eq!(ident_name(object), "obj");
            match &attribute.kind {
                ExprKind::Call { callee, args } => {
                    assert_eq!(ident_name(callee), "update");
                    assert_eq!(args.len(), 1);
                }
                other => panic!("expected call attribute, got {:?}", other),
            }
        }
        other => panic!("expected attribute, got {:?}", other),
    }
}

#[test]
fn index_expression() {
    let program = parse_ok("items[0];");
    let expr = expr_of(only_stmt(&program));
    match &expr.kind {
        ExprKind::Index { array, index } => {
            assert_eq!(ident_name(array), "items");
            assert!(matches!(index.kind, ExprKind::Literal { .. }));
        }
        other => panic!("expected index, got {:?}", other),
    }
}

#[test]
fn postfix_chain_is_left_associative() {
    let program = parse_ok("grid[0].row;");
    let expr = expr_of(only_stmt(&program));
    match &expr.kind {
        ExprKind::Attribute { object, .. } => {
            assert!(matches!(object.kind, ExprKind::Index { .. }));
        }
        other => panic!("expected attribute over index, got {:?}", other),
    }
}

#[test]
fn array_literal() {
    let program = parse_ok("[1, 2, 3];");
    let expr = expr_of(only_stmt(&program));
    match &expr.kind {
        ExprKind::Array { elements } => assert_eq!(elements.len(), 3),
        other => panic!("expected array literal, got {:?}", other),
    }
}

#[test]
fn this_is_an_identifier() {
    let program = parse_ok("this.x;");
    let expr = expr_of(only_stmt(&program));
    match &expr.kind {
        ExprKind::Attribute { object, .. } => assert_eq!(ident_name(object), "this"),
        other => panic!("expected attribute, got {:?}", other),
    }
}

#[test]
fn grouping_overrides_precedence() {
    let program = parse_ok("(a + b) * c;");
    let expr = expr_of(only_stmt(&program));
    let ExprKind::Binary { op, left, .. } = &expr.kind else {
        panic!("expected binary root");
    };
    assert_eq!(op, "*");
    let ExprKind::Binary { op: inner, .. } = &left.kind else {
        panic!("expected + inside grouping");
    };
    assert_eq!(inner, "+");
}

// ── Recovery ────────────────────────────────────────────────────────────

#[test]
fn empty_source_parses_to_empty_program() {
    let program = parse_ok("");
    assert!(program.statements.is_empty());
}

#[test]
fn primary_failure_drops_fragment_and_continues() {
    // The dangling `=` fails at primary (consuming the first `;`); the
    // declaration's own expect then lands on the second `;`, so the next
    // statement parses cleanly.
    let result = parse_err("let x: i32 = ;; let y: i32 = 2;");
    // The second declaration survives.
    assert!(result.program.statements.iter().any(|s| {
        matches!(&s.kind, StmtKind::Declaration(d) if d.name == "y")
    }));
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.message.contains("Unexpected token")));
}

#[test]
fn missing_semicolon_is_reported_and_parsing_continues() {
    let result = parse_err("let x: i32 = 5 let y: i32 = 6;");
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.message == "Expected value ';'"));
}

#[test]
fn parser_never_panics_on_garbage() {
    for source in [
        "fn",
        "cls {",
        "rec R { x }",
        "if { }",
        "for (",
        "switch { case }",
        ")))(((",
        "let let let",
        "@#!$%",
    ] {
        let result = parse(source, "test.ml");
        assert!(
            !result.diagnostics.is_empty(),
            "expected diagnostics for {:?}",
            source
        );
    }
}

#[test]
fn bare_modifier_statement_parses() {
    let program = parse_ok("pri;");
    let stmt = only_stmt(&program);
    assert!(matches!(stmt.kind, StmtKind::Modifier(_)));
}

// ── Span invariants ─────────────────────────────────────────────────────

#[test]
fn node_spans_contain_child_spans() {
    let program = parse_ok("let x: i32 = 1 + 2;");
    let stmt = only_stmt(&program);
    let decl = decl_of(stmt);
    assert!(stmt.span.contains(decl.ty.as_ref().unwrap().span));
    if let DeclKind::Variable { init: Some(init) } = &decl.kind {
        assert!(stmt.span.contains(init.span));
        if let ExprKind::Binary { left, right, .. } = &init.kind {
            assert!(init.span.contains(left.span));
            assert!(init.span.contains(right.span));
            // Children ordered by span.
            assert!(left.span.end.index <= right.span.start.index);
        }
    }
}

#[test]
fn program_span_covers_all_statements() {
    let program = parse_ok("let a: i32;\nlet b: i32;");
    for stmt in &program.statements {
        assert!(program.span.contains(stmt.span));
    }
}
