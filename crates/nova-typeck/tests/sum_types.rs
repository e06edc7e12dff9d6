//! Sum and tuple type declarations: constructor bindings, match analysis,
//! exhaustiveness warnings, and tuple schema checks.

use nova_common::diagnostic::Severity;
use nova_parser::ast::{Decl, Expr};
use nova_parser::Parse;
use nova_typeck::ty::TypeInfo;
use nova_typeck::SemanticContext;

fn check(source: &str) -> (Parse, SemanticContext) {
    let parse = nova_parser::parse(source);
    assert!(parse.ok(), "parse errors: {:?}", parse.diagnostics);
    let ctx = nova_typeck::analyze(&parse.program, source);
    (parse, ctx)
}

fn errors(ctx: &SemanticContext) -> Vec<&'static str> {
    ctx.diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .map(|d| d.message)
        .collect()
}

fn warnings(ctx: &SemanticContext) -> Vec<&'static str> {
    ctx.diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .map(|d| d.message)
        .collect()
}

fn fun_body<'a>(parse: &'a Parse, index: usize) -> &'a Expr {
    match &parse.program.decls[index] {
        Decl::Fun(fun) => &fun.body,
        other => panic!("expected fun declaration, got {other:?}"),
    }
}

#[test]
fn payload_constructor_is_a_function_to_the_type() {
    let source = "module m\ntype Option = Some(value: Number) | None\nfun s() = Some\n";
    let (parse, ctx) = check(source);
    assert!(errors(&ctx).is_empty(), "{:?}", errors(&ctx));

    let option = ctx.find_type("Option", source).expect("Option registered");
    let (some_ty, _) = ctx.lookup_expr(fun_body(&parse, 1)).unwrap();
    match ctx.type_info(some_ty) {
        Some(TypeInfo::Function { params, result, .. }) => {
            assert_eq!(params, &[ctx.number_type()]);
            assert_eq!(*result, option.type_id);
        }
        other => panic!("expected constructor function type, got {other:?}"),
    }
}

#[test]
fn nullary_constructor_is_the_type_itself() {
    let source = "module m\ntype Flag = Yes | No\nfun f(): Flag = Yes\n";
    let (parse, ctx) = check(source);
    assert!(errors(&ctx).is_empty(), "{:?}", errors(&ctx));

    let flag = ctx.find_type("Flag", source).expect("Flag registered");
    let (ty, _) = ctx.lookup_expr(fun_body(&parse, 1)).unwrap();
    assert_eq!(ty, flag.type_id);
}

#[test]
fn constructor_call_produces_the_custom_type() {
    let source = "module m\ntype Option = Some(value: Number) | None\nfun wrap(): Option = Some(42)\n";
    let (parse, ctx) = check(source);
    assert!(errors(&ctx).is_empty(), "{:?}", errors(&ctx));

    let option = ctx.find_type("Option", source).unwrap();
    let (ty, _) = ctx.lookup_expr(fun_body(&parse, 1)).unwrap();
    assert_eq!(ty, option.type_id);
}

#[test]
fn match_bindings_resolve_to_payload_types() {
    let source = "module m\n\
                  type Option = Some(value: Number) | None\n\
                  fun choose(v: Option): Number = match v { Some(value) -> value; None -> 0 }\n";
    let (parse, ctx) = check(source);
    assert!(errors(&ctx).is_empty(), "{:?}", errors(&ctx));
    assert!(warnings(&ctx).is_empty(), "{:?}", warnings(&ctx));

    // The whole match is Number because `value` resolved to Number.
    let (ty, _) = ctx.lookup_expr(fun_body(&parse, 1)).unwrap();
    assert_eq!(ty, ctx.number_type());
}

#[test]
fn non_exhaustive_match_warns() {
    let source = "module m\ntype Flag = Yes | No\nfun only_yes(f: Flag): Number = match f { Yes -> 1 }\n";
    let (parse, ctx) = check(source);
    assert!(errors(&ctx).is_empty(), "{:?}", errors(&ctx));
    assert_eq!(warnings(&ctx), vec!["match does not cover all variants"]);

    let (ty, _) = ctx.lookup_expr(fun_body(&parse, 1)).unwrap();
    assert_eq!(ty, ctx.number_type());
}

#[test]
fn exhaustive_match_does_not_warn() {
    let source = "module m\ntype Flag = Yes | No\nfun f(v: Flag): Number = match v { Yes -> 1; No -> 0 }\n";
    let (_, ctx) = check(source);
    assert!(ctx.diagnostics.is_empty(), "{:?}", ctx.diagnostics);
}

#[test]
fn duplicate_arms_do_not_error() {
    let source = "module m\ntype Flag = Yes | No\nfun f(v: Flag): Number = match v { Yes -> 1; Yes -> 2; No -> 0 }\n";
    let (_, ctx) = check(source);
    assert!(errors(&ctx).is_empty(), "{:?}", errors(&ctx));
}

#[test]
fn arm_binding_count_disagreement_is_silently_unbound() {
    let source = "module m\n\
                  type Option = Some(value: Number) | None\n\
                  fun f(v: Option): Number = match v { Some(a, b) -> 1; None -> 0 }\n";
    let (_, ctx) = check(source);
    assert!(errors(&ctx).is_empty(), "{:?}", errors(&ctx));
}

#[test]
fn match_on_non_custom_type_checks_bodies_only() {
    let source = "module m\nfun f(n: Number): Number = match n { anything -> 1 }\n";
    let (_, ctx) = check(source);
    assert!(errors(&ctx).is_empty(), "{:?}", errors(&ctx));
    assert!(warnings(&ctx).is_empty());
}

#[test]
fn duplicate_constructor_across_types_errors() {
    let source = "module m\ntype A = Thing\ntype B = Thing\n";
    let (_, ctx) = check(source);
    assert!(errors(&ctx).contains(&"symbol already defined"));
}

#[test]
fn variant_payload_may_reference_later_type() {
    let source = "module m\ntype Wrapper = Wrap(inner: Flag)\ntype Flag = Yes | No\n";
    let (_, ctx) = check(source);
    assert!(errors(&ctx).is_empty(), "{:?}", errors(&ctx));
}

#[test]
fn unknown_payload_type_name_errors() {
    let source = "module m\ntype Box = Full(inner: Mystery)\n";
    let (_, ctx) = check(source);
    assert_eq!(errors(&ctx), vec!["unknown type name"]);
}

// ── Tuple-style declarations ───────────────────────────────────────────

#[test]
fn tuple_type_without_fields_warns() {
    let source = "module m\ntype Unitish()\n";
    let (_, ctx) = check(source);
    assert_eq!(warnings(&ctx), vec!["tuple type has no fields"]);
}

#[test]
fn tuple_field_without_annotation_warns() {
    let source = "module m\ntype Pair(a, b: Number)\n";
    let (_, ctx) = check(source);
    assert_eq!(warnings(&ctx), vec!["tuple field missing type annotation"]);
}

#[test]
fn tuple_type_introduces_no_constructor() {
    let source = "module m\ntype Pair(a: Number, b: Number)\nfun f() = Pair\n";
    let (_, ctx) = check(source);
    assert_eq!(errors(&ctx), vec!["undefined identifier"]);
}

#[test]
fn reserved_ids_precede_user_types() {
    let source = "module m\ntype Flag = Yes | No\n";
    let (_, ctx) = check(source);
    let flag = ctx.find_type("Flag", source).unwrap();
    for reserved in [
        ctx.unknown_type(),
        ctx.unit_type(),
        ctx.number_type(),
        ctx.string_type(),
        ctx.bool_type(),
    ] {
        assert!(reserved.0 < flag.type_id.0);
    }
}
