//! The two-pass analyzer.
//!
//! Pass 1 registers user type declarations: every `type` gets a record and
//! a `Custom` type id up front, then variant payloads are resolved and
//! constructor bindings introduced (so a variant may reference a type
//! declared later in the file). Pass 2 pre-binds every `fun` signature --
//! enabling self- and mutual recursion -- and then analyzes declarations in
//! order, recording a `(type, effects)` pair for every expression in the
//! side table.
//!
//! The analyzer never stops at an error: unresolved pieces continue as
//! `Unknown`, which unification treats as a wildcard.

use nova_common::diagnostic::Diagnostic;
use nova_common::token::Token;
use nova_parser::ast::{
    Arg, Decl, Expr, ExprKind, FunDecl, Literal, MatchArm, Param, Program, TypeDecl, TypeDeclKind,
    Variant,
};

use crate::env::{ConstructorRef, ScopeEntry, ScopeStack};
use crate::ty::{EffectMask, TypeId, TypeInfo, TypeRecord, VariantRecord};
use crate::SemanticContext;

pub(crate) fn analyze_program(program: &Program, source: &str) -> SemanticContext {
    let mut analyzer = Analyzer {
        source,
        ctx: SemanticContext::new(),
        scopes: ScopeStack::new(),
    };
    analyzer.register_types(program);
    let fun_types = analyzer.predeclare_functions(program);
    analyzer.analyze_declarations(program, &fun_types);
    analyzer.ctx
}

struct Analyzer<'src> {
    source: &'src str,
    ctx: SemanticContext,
    scopes: ScopeStack,
}

impl<'src> Analyzer<'src> {
    fn text(&self, token: Token) -> &'src str {
        token.text(self.source)
    }

    fn error(&mut self, token: Token, message: &'static str) {
        self.ctx.diagnostics.push(Diagnostic::error(token, message));
    }

    fn warn(&mut self, token: Token, message: &'static str) {
        self.ctx
            .diagnostics
            .push(Diagnostic::warning(token, message));
    }

    /// Reconcile two type ids, treating `Unknown` as a wildcard.
    ///
    /// Returns `a` when `b` is unknown, `b` when `a` is unknown, `a` when
    /// they are equal; otherwise reports a type mismatch at `at` and
    /// returns `Unknown`.
    fn unify(&mut self, a: TypeId, b: TypeId, at: Token) -> TypeId {
        let unknown = self.ctx.unknown_type();
        if b == unknown {
            return a;
        }
        if a == unknown {
            return b;
        }
        if a == b {
            return a;
        }
        self.error(at, "type mismatch");
        unknown
    }

    /// Resolve a type annotation token, reporting unknown names.
    fn resolve_type_token(&mut self, token: Token) -> TypeId {
        let resolved = self.ctx.resolve_type_name(self.text(token), self.source);
        if resolved == self.ctx.unknown_type() {
            self.error(token, "unknown type name");
        }
        resolved
    }

    /// Resolve an optional annotation; absence is `Unknown` without a
    /// diagnostic.
    fn resolve_annotation(&mut self, token: Option<Token>) -> TypeId {
        match token {
            Some(token) => self.resolve_type_token(token),
            None => self.ctx.unknown_type(),
        }
    }

    /// The params/result/effects of a function type, if `ty` is one.
    fn fn_info(&self, ty: TypeId) -> Option<(Vec<TypeId>, TypeId, EffectMask)> {
        match self.ctx.type_info(ty) {
            Some(TypeInfo::Function {
                params,
                result,
                effects,
            }) => Some((params.clone(), *result, *effects)),
            _ => None,
        }
    }

    fn define(&mut self, name: Token, ty: TypeId, effects: EffectMask) {
        self.define_entry(
            name,
            ScopeEntry {
                name,
                ty,
                effects,
                constructor: None,
            },
        );
    }

    fn define_entry(&mut self, name: Token, entry: ScopeEntry) {
        if !self.scopes.define(self.text(name), entry) {
            self.error(name, "symbol already defined");
        }
    }

    // ── Pass 1: type registration ──────────────────────────────────────

    fn register_types(&mut self, program: &Program) {
        // Step 1: allocate a record and a Custom id for every declaration,
        // so payload resolution below sees the full type table.
        let mut decl_records = Vec::new();
        for decl in &program.decls {
            let Decl::Type(type_decl) = decl else {
                continue;
            };
            let record_id = self.ctx.records().len();
            let type_id = self.ctx.intern(TypeInfo::Custom { record: record_id });
            self.ctx.records_mut().push(TypeRecord {
                name: type_decl.name,
                type_id,
                variants: Vec::new(),
            });
            decl_records.push((type_decl, record_id));
        }

        // Step 2: resolve payloads and bind constructors.
        for (type_decl, record_id) in decl_records {
            match &type_decl.kind {
                TypeDeclKind::Sum { variants } => self.register_sum_type(record_id, variants),
                TypeDeclKind::Tuple { fields } => self.check_tuple_type(type_decl, fields),
            }
        }
    }

    fn register_sum_type(&mut self, record_id: usize, variants: &[Variant]) {
        let type_id = self.ctx.records()[record_id].type_id;
        for (variant_index, variant) in variants.iter().enumerate() {
            let params: Vec<TypeId> = variant
                .params
                .iter()
                .map(|p| self.resolve_annotation(p.type_name))
                .collect();

            // Nullary variants bind to the type itself; payload variants to
            // a fresh function type producing it.
            let constructor_ty = if params.is_empty() {
                type_id
            } else {
                self.ctx.intern(TypeInfo::Function {
                    params: params.clone(),
                    result: type_id,
                    effects: EffectMask::NONE,
                })
            };

            self.ctx.records_mut()[record_id].variants.push(VariantRecord {
                name: variant.name,
                params,
            });

            self.define_entry(
                variant.name,
                ScopeEntry {
                    name: variant.name,
                    ty: constructor_ty,
                    effects: EffectMask::NONE,
                    constructor: Some(ConstructorRef {
                        record: record_id,
                        variant: variant_index,
                    }),
                },
            );
        }
    }

    fn check_tuple_type(&mut self, decl: &TypeDecl, fields: &[Param]) {
        if fields.is_empty() {
            self.warn(decl.name, "tuple type has no fields");
        }
        for field in fields {
            match field.type_name {
                Some(_) => {
                    self.resolve_annotation(field.type_name);
                }
                None => self.warn(field.name, "tuple field missing type annotation"),
            }
        }
    }

    // ── Pass 2: declarations ───────────────────────────────────────────

    /// Intern and bind every function signature before any body is
    /// analyzed, so functions can refer to themselves and to each other.
    fn predeclare_functions(&mut self, program: &Program) -> Vec<Option<TypeId>> {
        let mut fun_types = Vec::with_capacity(program.decls.len());
        for decl in &program.decls {
            let Decl::Fun(fun) = decl else {
                fun_types.push(None);
                continue;
            };
            let params: Vec<TypeId> = fun
                .params
                .iter()
                .map(|p| self.resolve_annotation(p.type_name))
                .collect();
            let result = self.resolve_annotation(fun.return_type);
            let fn_ty = self.ctx.intern(TypeInfo::Function {
                params,
                result,
                effects: EffectMask::NONE,
            });
            self.define(fun.name, fn_ty, EffectMask::NONE);
            fun_types.push(Some(fn_ty));
        }
        fun_types
    }

    fn analyze_declarations(&mut self, program: &Program, fun_types: &[Option<TypeId>]) {
        for (index, decl) in program.decls.iter().enumerate() {
            match decl {
                Decl::Let(let_decl) => {
                    let (value_ty, effects) = self.analyze_expr(&let_decl.value);
                    let ty = match let_decl.type_name {
                        Some(annotation) => {
                            let declared = self.resolve_type_token(annotation);
                            self.unify(declared, value_ty, let_decl.value.start)
                        }
                        None => value_ty,
                    };
                    self.define(let_decl.name, ty, effects);
                }
                Decl::Fun(fun) => {
                    let fn_ty = fun_types[index].expect("function was predeclared");
                    self.analyze_fun(fun, fn_ty);
                }
                Decl::Type(_) => {}
            }
        }
    }

    fn analyze_fun(&mut self, fun: &FunDecl, fn_ty: TypeId) {
        let (param_tys, declared_result, _) =
            self.fn_info(fn_ty).expect("predeclared type is a function");

        self.scopes.push();
        for (param, ty) in fun.params.iter().zip(&param_tys) {
            self.define(param.name, *ty, EffectMask::NONE);
        }
        let (body_ty, body_effects) = self.analyze_expr(&fun.body);
        self.scopes.pop();

        // The body's type becomes the result unless an annotation was
        // given; a conflicting annotated body is a mismatch but the
        // annotation stands.
        let result = if fun.return_type.is_some() {
            self.unify(declared_result, body_ty, fun.body.start);
            declared_result
        } else {
            body_ty
        };

        if let Some(TypeInfo::Function {
            result: slot_result,
            effects: slot_effects,
            ..
        }) = self.ctx.types_mut().get_mut(fn_ty.index())
        {
            *slot_result = result;
            *slot_effects = body_effects;
        }
    }

    // ── Expressions ────────────────────────────────────────────────────

    fn analyze_expr(&mut self, expr: &Expr) -> (TypeId, EffectMask) {
        let (ty, effects) = match &expr.kind {
            ExprKind::Literal(literal) => self.analyze_literal(literal),

            ExprKind::Identifier { name } => match self.scopes.lookup(self.text(*name)) {
                Some(entry) => (entry.ty, entry.effects),
                None => {
                    self.error(*name, "undefined identifier");
                    (self.ctx.unknown_type(), EffectMask::NONE)
                }
            },

            ExprKind::Block { exprs } => {
                self.scopes.push();
                let mut ty = self.ctx.unit_type();
                let mut effects = EffectMask::NONE;
                for (i, item) in exprs.iter().enumerate() {
                    let (item_ty, item_effects) = self.analyze_expr(item);
                    effects |= item_effects;
                    if i + 1 == exprs.len() {
                        ty = item_ty;
                    }
                }
                self.scopes.pop();
                (ty, effects)
            }

            ExprKind::Lambda { params, body } => {
                let param_tys: Vec<TypeId> = params
                    .iter()
                    .map(|p| self.resolve_annotation(p.type_name))
                    .collect();
                self.scopes.push();
                for (param, ty) in params.iter().zip(&param_tys) {
                    self.define(param.name, *ty, EffectMask::NONE);
                }
                let (body_ty, body_effects) = self.analyze_expr(body);
                self.scopes.pop();
                let fn_ty = self.ctx.intern(TypeInfo::Function {
                    params: param_tys,
                    result: body_ty,
                    effects: body_effects,
                });
                // The lambda expression itself is pure; its body's effects
                // live in the interned function type.
                (fn_ty, EffectMask::NONE)
            }

            ExprKind::Call { callee, args } => self.analyze_call(expr, callee, args),

            ExprKind::Pipe { target, stages } => self.analyze_pipe(target, stages),

            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let (cond_ty, mut effects) = self.analyze_expr(condition);
                if cond_ty != self.ctx.unknown_type() && cond_ty != self.ctx.bool_type() {
                    self.error(condition.start, "if condition must be Bool");
                }
                let (then_ty, then_effects) = self.analyze_expr(then_branch);
                effects |= then_effects;
                let else_ty = match else_branch {
                    Some(else_branch) => {
                        let (else_ty, else_effects) = self.analyze_expr(else_branch);
                        effects |= else_effects;
                        else_ty
                    }
                    None => self.ctx.unit_type(),
                };
                let ty = self.unify(then_ty, else_ty, expr.start);
                (ty, effects)
            }

            ExprKind::While { condition, body } => {
                let (cond_ty, mut effects) = self.analyze_expr(condition);
                let bool_ty = self.ctx.bool_type();
                self.unify(cond_ty, bool_ty, condition.start);
                let (_, body_effects) = self.analyze_expr(body);
                effects |= body_effects;
                (self.ctx.unit_type(), effects)
            }

            ExprKind::Match { scrutinee, arms } => self.analyze_match(expr, scrutinee, arms),

            ExprKind::Async { inner } => {
                let (ty, effects) = self.analyze_expr(inner);
                (ty, effects | EffectMask::ASYNC)
            }

            ExprKind::Await { inner } => self.analyze_expr(inner),

            ExprKind::Effect { inner } => {
                let (ty, effects) = self.analyze_expr(inner);
                (ty, effects | EffectMask::IMPURE)
            }

            ExprKind::Paren { inner } => self.analyze_expr(inner),
        };

        self.ctx.record_expr(expr.id, ty, effects);
        (ty, effects)
    }

    fn analyze_literal(&mut self, literal: &Literal) -> (TypeId, EffectMask) {
        match literal {
            Literal::Number => (self.ctx.number_type(), EffectMask::NONE),
            Literal::String => (self.ctx.string_type(), EffectMask::NONE),
            Literal::Bool => (self.ctx.bool_type(), EffectMask::NONE),
            Literal::Unit => (self.ctx.unit_type(), EffectMask::NONE),
            Literal::List { elements } => {
                let mut element = self.ctx.unknown_type();
                let mut effects = EffectMask::NONE;
                for item in elements {
                    let (item_ty, item_effects) = self.analyze_expr(item);
                    element = self.unify(element, item_ty, item.start);
                    effects |= item_effects;
                }
                let ty = self.ctx.intern(TypeInfo::List { element });
                (ty, effects)
            }
        }
    }

    fn analyze_call(&mut self, expr: &Expr, callee: &Expr, args: &[Arg]) -> (TypeId, EffectMask) {
        let (callee_ty, mut effects) = self.analyze_expr(callee);

        let mut arg_tys = Vec::with_capacity(args.len());
        for arg in args {
            let (arg_ty, arg_effects) = self.analyze_expr(&arg.value);
            arg_tys.push(arg_ty);
            effects |= arg_effects;
        }

        match self.fn_info(callee_ty) {
            Some((params, result, fn_effects)) => {
                if params.len() != args.len() {
                    self.error(expr.start, "arity mismatch");
                } else {
                    for ((param, arg_ty), arg) in params.iter().zip(&arg_tys).zip(args) {
                        self.unify(*param, *arg_ty, arg.value.start);
                    }
                }
                effects |= fn_effects;
                (result, effects)
            }
            None => {
                if callee_ty != self.ctx.unknown_type() {
                    self.error(callee.start, "call of non-function");
                }
                (self.ctx.unknown_type(), effects)
            }
        }
    }

    /// `target |> s1 |> s2 ...`: thread the incoming type through each
    /// stage, unifying it with the callee's first parameter and any extra
    /// arguments with the parameters after it. Each stage node is annotated
    /// with its result type; effects accumulate across the chain.
    fn analyze_pipe(&mut self, target: &Expr, stages: &[Expr]) -> (TypeId, EffectMask) {
        let (mut current, mut effects) = self.analyze_expr(target);

        for stage in stages {
            let (callee, extras): (&Expr, &[Arg]) = match &stage.kind {
                ExprKind::Call { callee, args } => (&**callee, args.as_slice()),
                _ => (stage, &[]),
            };

            let mut extra_tys = Vec::with_capacity(extras.len());
            for arg in extras {
                let (arg_ty, arg_effects) = self.analyze_expr(&arg.value);
                extra_tys.push(arg_ty);
                effects |= arg_effects;
            }

            if !matches!(callee.kind, ExprKind::Identifier { .. }) {
                self.error(stage.start, "pipeline stage is not callable");
                current = self.ctx.unknown_type();
                self.ctx.record_expr(stage.id, current, effects);
                continue;
            }

            let (callee_ty, callee_effects) = self.analyze_expr(callee);
            effects |= callee_effects;

            match self.fn_info(callee_ty) {
                Some((params, result, fn_effects)) if !params.is_empty() => {
                    self.unify(params[0], current, stage.start);
                    for ((index, extra_ty), arg) in extra_tys.iter().enumerate().zip(extras) {
                        match params.get(index + 1) {
                            Some(param) => {
                                self.unify(*param, *extra_ty, arg.value.start);
                            }
                            None => self.error(arg.value.start, "arity mismatch"),
                        }
                    }
                    effects |= fn_effects;
                    current = result;
                }
                _ => {
                    if callee_ty != self.ctx.unknown_type() {
                        self.error(stage.start, "pipeline stage is not callable");
                    }
                    current = self.ctx.unknown_type();
                }
            }

            self.ctx.record_expr(stage.id, current, effects);
        }

        (current, effects)
    }

    fn analyze_match(
        &mut self,
        expr: &Expr,
        scrutinee: &Expr,
        arms: &[MatchArm],
    ) -> (TypeId, EffectMask) {
        let (scrutinee_ty, mut effects) = self.analyze_expr(scrutinee);

        let record_id = match self.ctx.type_info(scrutinee_ty) {
            Some(TypeInfo::Custom { record }) => Some(*record),
            _ => None,
        };
        let variants: Vec<VariantRecord> = record_id
            .map(|id| self.ctx.records()[id].variants.clone())
            .unwrap_or_default();
        let mut covered = vec![false; variants.len()];

        let mut result = self.ctx.unknown_type();
        for arm in arms {
            self.scopes.push();

            if record_id.is_some() {
                let arm_name = self.text(arm.name);
                let matched = variants
                    .iter()
                    .position(|variant| variant.name.text(self.source) == arm_name);
                if let Some(variant_index) = matched {
                    covered[variant_index] = true;
                    let payload = variants[variant_index].params.clone();
                    // Bindings whose count disagrees with the variant are
                    // silently left unbound.
                    if arm.bindings.len() == payload.len() {
                        for (binding, ty) in arm.bindings.iter().zip(payload) {
                            self.define(binding.name, ty, EffectMask::NONE);
                        }
                    }
                }
            }

            let (body_ty, body_effects) = self.analyze_expr(&arm.body);
            self.scopes.pop();
            result = self.unify(result, body_ty, arm.body.start);
            effects |= body_effects;
        }

        if record_id.is_some() && covered.iter().any(|c| !c) {
            self.warn(expr.start, "match does not cover all variants");
        }

        (result, effects)
    }
}
