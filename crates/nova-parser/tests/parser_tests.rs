//! Parser integration tests: declaration structure, the expression grammar,
//! and panic-mode recovery.

use nova_parser::ast::{Decl, Expr, ExprKind, Literal, TypeDeclKind};
use nova_parser::parse;

fn parse_ok(source: &str) -> nova_parser::Parse {
    let parse = parse(source);
    assert!(
        parse.ok(),
        "expected clean parse, got: {:?}",
        parse.diagnostics
    );
    parse
}

fn fun_body<'a>(parse: &'a nova_parser::Parse, index: usize) -> &'a Expr {
    match &parse.program.decls[index] {
        Decl::Fun(fun) => &fun.body,
        other => panic!("expected fun declaration, got {other:?}"),
    }
}

// ── Declarations ───────────────────────────────────────────────────────

#[test]
fn simple_program_declarations() {
    let source = "module demo.core\n\
                  import std.math\n\
                  let answer: Number = 42\n\
                  fun double(x: Number): Number = x\n";
    let parse = parse_ok(source);
    assert_eq!(parse.program.imports.len(), 1);
    assert_eq!(parse.program.decls.len(), 2);
    assert!(matches!(parse.program.decls[0], Decl::Let(_)));
    assert!(matches!(parse.program.decls[1], Decl::Fun(_)));
}

#[test]
fn import_with_symbol_list() {
    let source = "module m\nimport std.io { read, write }\n";
    let parse = parse_ok(source);
    let import = &parse.program.imports[0];
    let symbols: Vec<_> = import.symbols.iter().map(|t| t.text(source)).collect();
    assert_eq!(symbols, vec!["read", "write"]);
}

#[test]
fn sum_type_variants() {
    let source = "module m\ntype Option = Some(value: Number) | None\n";
    let parse = parse_ok(source);
    let Decl::Type(decl) = &parse.program.decls[0] else {
        panic!("expected type declaration");
    };
    let TypeDeclKind::Sum { variants } = &decl.kind else {
        panic!("expected sum type");
    };
    assert_eq!(variants.len(), 2);
    assert_eq!(variants[0].name.text(source), "Some");
    assert_eq!(variants[0].params.len(), 1);
    assert_eq!(variants[1].name.text(source), "None");
    assert!(variants[1].params.is_empty());
}

#[test]
fn tuple_type_fields() {
    let source = "module m\ntype Pair(a: Number, b: Number)\n";
    let parse = parse_ok(source);
    let Decl::Type(decl) = &parse.program.decls[0] else {
        panic!("expected type declaration");
    };
    let TypeDeclKind::Tuple { fields } = &decl.kind else {
        panic!("expected tuple type");
    };
    assert_eq!(fields.len(), 2);
}

#[test]
fn fun_without_annotations() {
    let source = "module m\nfun f(x) = x\n";
    let parse = parse_ok(source);
    let Decl::Fun(fun) = &parse.program.decls[0] else {
        panic!("expected fun");
    };
    assert!(fun.return_type.is_none());
    assert!(fun.params[0].type_name.is_none());
}

// ── Expressions ────────────────────────────────────────────────────────

#[test]
fn pipeline_folds_stages_left_to_right() {
    let source = "module m\nfun f(x: Number): Number = x |> inc |> add(1)\n";
    let parse = parse_ok(source);
    let ExprKind::Pipe { target, stages } = &fun_body(&parse, 0).kind else {
        panic!("expected pipe");
    };
    assert!(matches!(target.kind, ExprKind::Identifier { .. }));
    assert_eq!(stages.len(), 2);
    assert!(matches!(stages[0].kind, ExprKind::Identifier { .. }));
    assert!(matches!(stages[1].kind, ExprKind::Call { .. }));
}

#[test]
fn call_chain_nests() {
    let source = "module m\nfun f() = g(1)(2)\n";
    let parse = parse_ok(source);
    let ExprKind::Call { callee, args } = &fun_body(&parse, 0).kind else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 1);
    assert!(matches!(callee.kind, ExprKind::Call { .. }));
}

#[test]
fn labeled_arguments_preserved() {
    let source = "module m\nfun f() = g(width = 3, 4)\n";
    let parse = parse_ok(source);
    let ExprKind::Call { args, .. } = &fun_body(&parse, 0).kind else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].label.map(|t| t.text(source).to_string()), Some("width".into()));
    assert!(args[1].label.is_none());
}

#[test]
fn lambda_vs_grouping_disambiguation() {
    let source = "module m\nfun f() = (x: Number) -> x\nfun g() = (1)\n";
    let parse = parse_ok(source);
    assert!(matches!(fun_body(&parse, 0).kind, ExprKind::Lambda { .. }));
    assert!(matches!(fun_body(&parse, 1).kind, ExprKind::Paren { .. }));
}

#[test]
fn fat_arrow_lambda() {
    let source = "module m\nfun f() = (x) => x\n";
    let parse = parse_ok(source);
    assert!(matches!(fun_body(&parse, 0).kind, ExprKind::Lambda { .. }));
}

#[test]
fn empty_parens_are_unit() {
    let source = "module m\nfun f() = ()\n";
    let parse = parse_ok(source);
    assert!(matches!(
        fun_body(&parse, 0).kind,
        ExprKind::Literal(Literal::Unit)
    ));
}

#[test]
fn block_with_semicolons() {
    let source = "module m\nfun f() = { 1; 2; 3 }\n";
    let parse = parse_ok(source);
    let ExprKind::Block { exprs } = &fun_body(&parse, 0).kind else {
        panic!("expected block");
    };
    assert_eq!(exprs.len(), 3);
}

#[test]
fn block_trailing_semicolon() {
    let source = "module m\nfun f() = { 1; 2; }\n";
    let parse = parse_ok(source);
    let ExprKind::Block { exprs } = &fun_body(&parse, 0).kind else {
        panic!("expected block");
    };
    assert_eq!(exprs.len(), 2);
}

#[test]
fn match_arms_with_bindings() {
    let source = "module m\nfun f(v: Option): Number = match v { Some(value) -> value; None -> 0 }\n";
    let parse = parse_ok(source);
    let ExprKind::Match { arms, .. } = &fun_body(&parse, 0).kind else {
        panic!("expected match");
    };
    assert_eq!(arms.len(), 2);
    assert_eq!(arms[0].name.text(source), "Some");
    assert_eq!(arms[0].bindings.len(), 1);
    assert_eq!(arms[1].name.text(source), "None");
    assert!(arms[1].bindings.is_empty());
}

#[test]
fn if_else_chain() {
    let source = "module m\nfun f(a: Bool, b: Bool): Number = if a { 1 } else if b { 2 } else { 3 }\n";
    let parse = parse_ok(source);
    let ExprKind::If { else_branch, .. } = &fun_body(&parse, 0).kind else {
        panic!("expected if");
    };
    let inner = else_branch.as_ref().expect("expected else branch");
    assert!(matches!(inner.kind, ExprKind::If { .. }));
}

#[test]
fn while_expression() {
    let source = "module m\nfun spin(flag: Bool): Unit = while flag { 1 }\n";
    let parse = parse_ok(source);
    assert!(matches!(fun_body(&parse, 0).kind, ExprKind::While { .. }));
}

#[test]
fn async_await_and_effect_prefixes() {
    let source = "module m\nfun f() = async { 1 }\nfun g() = await f()\nfun h() = ! g()\n";
    let parse = parse_ok(source);
    assert!(matches!(fun_body(&parse, 0).kind, ExprKind::Async { .. }));
    assert!(matches!(fun_body(&parse, 1).kind, ExprKind::Await { .. }));
    assert!(matches!(fun_body(&parse, 2).kind, ExprKind::Effect { .. }));
}

#[test]
fn list_literal_elements() {
    let source = "module m\nlet xs = [1, 2, 3]\n";
    let parse = parse_ok(source);
    let Decl::Let(decl) = &parse.program.decls[0] else {
        panic!("expected let");
    };
    let ExprKind::Literal(Literal::List { elements }) = &decl.value.kind else {
        panic!("expected list literal");
    };
    assert_eq!(elements.len(), 3);
}

// ── Recovery ───────────────────────────────────────────────────────────

#[test]
fn recovery_continues_after_bad_declaration() {
    let source = "module m\nfun broken( = 1\nfun ok(): Number = 2\n";
    let parse = parse(source);
    assert!(parse.had_error);
    // The later well-formed declaration survives synchronization.
    let names: Vec<_> = parse
        .program
        .decls
        .iter()
        .filter_map(|d| match d {
            Decl::Fun(f) => Some(f.name.text(source)),
            _ => None,
        })
        .collect();
    assert!(names.contains(&"ok"), "decls: {names:?}");
}

#[test]
fn missing_expression_patched_with_unit() {
    let source = "module m\nlet x = ;\nlet y = 1\n";
    let parse = parse(source);
    assert!(parse.had_error);
    let Decl::Let(decl) = &parse.program.decls[0] else {
        panic!("expected let");
    };
    assert!(matches!(
        decl.value.kind,
        ExprKind::Literal(Literal::Unit)
    ));
    // The next declaration is intact.
    assert_eq!(parse.program.decls.len(), 2);
}

#[test]
fn panic_mode_suppresses_cascading_diagnostics() {
    let source = "module m\nfun broken( = = = 1\n";
    let parse = parse(source);
    assert!(parse.had_error);
    // One region of garbage produces one diagnostic, not one per token.
    assert_eq!(parse.diagnostics.len(), 1, "{:?}", parse.diagnostics);
}
