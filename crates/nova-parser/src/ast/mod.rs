//! The Nova abstract syntax tree.
//!
//! The AST is a tree of owned nodes: a [`Program`] holds the module path,
//! imports, and declarations; declarations hold expressions; expressions
//! own their children. Every expression carries its starting token and a
//! dense [`ExprId`] assigned at construction, which later stages use to key
//! per-expression side tables without touching the tree.

mod expr;
mod item;

pub use expr::{Arg, Expr, ExprId, ExprKind, Literal, MatchArm, Param};
pub use item::{Decl, FunDecl, Import, LetDecl, Program, TypeDecl, TypeDeclKind, Variant};
