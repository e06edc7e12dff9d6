//! AST-to-IR lowering.
//!
//! Lowering runs after analysis and reads the semantic context read-only:
//! expression types come from the side table, parameter annotations resolve
//! through the same name table the analyzer used. Two rewrites happen on
//! the way down: pipelines desugar into left-nested calls with the incoming
//! value as the first argument, and an `if` whose condition lowers to a
//! boolean literal is replaced by its taken branch.

use std::fmt;

use nova_common::token::Token;
use nova_parser::ast::{Decl, Expr, ExprKind, FunDecl, Literal, Program};
use nova_typeck::ty::{EffectMask, TypeId};
use nova_typeck::SemanticContext;

use crate::ir::{IrExpr, IrExprKind, IrFunction, IrMatchArm, IrParam, IrProgram};

/// Why a function could not be lowered.
#[derive(Debug)]
pub struct LowerError {
    /// Name token of the offending function.
    pub function: Token,
    pub message: &'static str,
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot lower function: {}", self.message)
    }
}

impl std::error::Error for LowerError {}

/// Lower every `fun` declaration of the program.
///
/// `let` and `type` declarations produce no IR. The first function that
/// contains an unsupported form rejects the whole program; callers that
/// prefer to skip such functions can drive [`lower_function`] themselves.
pub fn lower(
    program: &Program,
    semantics: &SemanticContext,
    source: &str,
) -> Result<IrProgram, LowerError> {
    let mut ir = IrProgram::default();
    for decl in &program.decls {
        if let Decl::Fun(fun) = decl {
            ir.functions.push(lower_function(fun, semantics, source)?);
        }
    }
    Ok(ir)
}

/// Lower a single `fun` declaration.
pub fn lower_function(
    fun: &FunDecl,
    semantics: &SemanticContext,
    source: &str,
) -> Result<IrFunction, LowerError> {
    let lowerer = Lowerer { semantics, source };

    let params = fun
        .params
        .iter()
        .map(|param| IrParam {
            name: param.name,
            ty: lowerer.resolve_type_token(param.type_name),
        })
        .collect();

    let (return_type, effects) = match semantics.lookup_expr(&fun.body) {
        Some((ty, effects)) => (ty, effects),
        None => (semantics.unknown_type(), EffectMask::NONE),
    };

    let body = lowerer.lower_expr(&fun.body).map_err(|message| LowerError {
        function: fun.name,
        message,
    })?;

    Ok(IrFunction {
        name: fun.name,
        params,
        return_type,
        effects,
        body,
    })
}

struct Lowerer<'a> {
    semantics: &'a SemanticContext,
    source: &'a str,
}

impl<'a> Lowerer<'a> {
    /// Resolve an optional annotation token the same way the analyzer did,
    /// without re-reporting its diagnostics.
    fn resolve_type_token(&self, token: Option<Token>) -> TypeId {
        match token {
            Some(token) => self
                .semantics
                .resolve_type_name(token.text(self.source), self.source),
            None => self.semantics.unknown_type(),
        }
    }

    /// The recorded type of an expression, `Unknown` when analysis skipped
    /// it.
    fn ty_of(&self, expr: &Expr) -> TypeId {
        self.semantics
            .lookup_expr(expr)
            .map(|(ty, _)| ty)
            .unwrap_or_else(|| self.semantics.unknown_type())
    }

    fn unit(&self) -> IrExpr {
        IrExpr {
            ty: self.semantics.unit_type(),
            kind: IrExprKind::Unit,
        }
    }

    fn lower_expr(&self, expr: &Expr) -> Result<IrExpr, &'static str> {
        let ty = self.ty_of(expr);
        match &expr.kind {
            ExprKind::Literal(literal) => self.lower_literal(expr, literal, ty),

            ExprKind::Identifier { name } => Ok(IrExpr {
                ty,
                kind: IrExprKind::Identifier(*name),
            }),

            ExprKind::Call { callee, args } => {
                let ExprKind::Identifier { name } = callee.kind else {
                    return Err("call target is not a plain identifier");
                };
                let mut lowered = Vec::with_capacity(args.len());
                for arg in args {
                    lowered.push(self.lower_expr(&arg.value)?);
                }
                Ok(IrExpr {
                    ty,
                    kind: IrExprKind::Call {
                        callee: name,
                        args: lowered,
                    },
                })
            }

            ExprKind::Pipe { target, stages } => self.lower_pipe(target, stages),

            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.lower_expr(condition)?;
                let then_branch = self.lower_expr(then_branch)?;
                let else_branch = match else_branch {
                    Some(expr) => self.lower_expr(expr)?,
                    None => self.unit(),
                };
                // A boolean-literal condition selects its branch at compile
                // time; no `If` survives.
                if let IrExprKind::Bool(value) = condition.kind {
                    return Ok(if value { then_branch } else { else_branch });
                }
                Ok(IrExpr {
                    ty,
                    kind: IrExprKind::If {
                        condition: Box::new(condition),
                        then_branch: Box::new(then_branch),
                        else_branch: Box::new(else_branch),
                    },
                })
            }

            ExprKind::While { condition, body } => Ok(IrExpr {
                ty,
                kind: IrExprKind::While {
                    condition: Box::new(self.lower_expr(condition)?),
                    body: Box::new(self.lower_expr(body)?),
                },
            }),

            ExprKind::Match { scrutinee, arms } => {
                let scrutinee = self.lower_expr(scrutinee)?;
                let mut lowered = Vec::with_capacity(arms.len());
                for arm in arms {
                    lowered.push(IrMatchArm {
                        constructor: arm.name,
                        bindings: arm.bindings.iter().map(|b| b.name).collect(),
                        body: self.lower_expr(&arm.body)?,
                    });
                }
                Ok(IrExpr {
                    ty,
                    kind: IrExprKind::Match {
                        scrutinee: Box::new(scrutinee),
                        arms: lowered,
                    },
                })
            }

            // The block's value is its last expression; earlier expressions
            // are discarded.
            ExprKind::Block { exprs } => match exprs.last() {
                Some(last) => self.lower_expr(last),
                None => Ok(self.unit()),
            },

            ExprKind::Paren { inner }
            | ExprKind::Async { inner }
            | ExprKind::Await { inner }
            | ExprKind::Effect { inner } => self.lower_expr(inner),

            ExprKind::Lambda { .. } => Err("lambda expressions cannot be lowered"),
        }
    }

    fn lower_literal(
        &self,
        expr: &Expr,
        literal: &Literal,
        ty: TypeId,
    ) -> Result<IrExpr, &'static str> {
        let kind = match literal {
            Literal::Number => {
                let text = expr.start.text(self.source);
                IrExprKind::Number(text.parse::<f64>().unwrap_or(0.0))
            }
            Literal::String => IrExprKind::String(expr.start.text(self.source).to_string()),
            Literal::Bool => IrExprKind::Bool(expr.start.text(self.source) == "true"),
            Literal::Unit => IrExprKind::Unit,
            Literal::List { elements } => {
                let mut lowered = Vec::with_capacity(elements.len());
                for element in elements {
                    lowered.push(self.lower_expr(element)?);
                }
                IrExprKind::List(lowered)
            }
        };
        Ok(IrExpr { ty, kind })
    }

    /// Desugar `target |> s1 |> s2` into `s2(s1(target))`, threading the
    /// current expression through as each stage's first argument.
    fn lower_pipe(&self, target: &Expr, stages: &[Expr]) -> Result<IrExpr, &'static str> {
        let mut current = self.lower_expr(target)?;
        for stage in stages {
            let (callee, extras) = match &stage.kind {
                ExprKind::Call { callee, args } => (&**callee, args.as_slice()),
                _ => (stage, &[][..]),
            };
            let ExprKind::Identifier { name } = callee.kind else {
                return Err("pipeline stage is not a plain call");
            };
            let mut args = Vec::with_capacity(1 + extras.len());
            args.push(current);
            for extra in extras {
                args.push(self.lower_expr(&extra.value)?);
            }
            current = IrExpr {
                ty: self.ty_of(stage),
                kind: IrExprKind::Call { callee: name, args },
            };
        }
        Ok(current)
    }
}
