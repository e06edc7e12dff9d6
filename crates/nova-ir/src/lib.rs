//! Nova IR: the typed lowered tree and the AST-to-IR lowering pass.
//!
//! Lowering consumes the parsed program together with the analyzer's
//! [`nova_typeck::SemanticContext`] and produces an [`IrProgram`]: one
//! [`IrFunction`] per top-level `fun`, with pipelines desugared to nested
//! calls and boolean-literal conditionals folded away. The IR owns its
//! tree; only token lexemes still alias the source buffer.

mod ir;
mod lower;

pub use ir::{IrExpr, IrExprKind, IrFunction, IrMatchArm, IrParam, IrProgram};
pub use lower::{lower, lower_function, LowerError};
