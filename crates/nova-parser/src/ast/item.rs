use nova_common::token::Token;

use super::expr::{Expr, Param};

/// A parsed source file: one module, its imports, and its declarations.
#[derive(Debug)]
pub struct Program {
    /// Dotted module path from the `module` header, e.g. `demo.core`.
    pub module_path: Vec<Token>,
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
}

/// `import a.b.c` with an optional `{ name, name }` symbol list.
///
/// Imports are parsed and carried on the program but not resolved; Nova
/// compiles one file at a time.
#[derive(Debug)]
pub struct Import {
    pub path: Vec<Token>,
    pub symbols: Vec<Token>,
}

/// A top-level declaration.
#[derive(Debug)]
pub enum Decl {
    Fun(FunDecl),
    Let(LetDecl),
    Type(TypeDecl),
}

/// `fun name(params): Return = body`
#[derive(Debug)]
pub struct FunDecl {
    pub name: Token,
    pub params: Vec<Param>,
    pub return_type: Option<Token>,
    pub body: Expr,
}

/// `let name: Type = value`
#[derive(Debug)]
pub struct LetDecl {
    pub name: Token,
    pub type_name: Option<Token>,
    pub value: Expr,
}

/// `type Name = A | B(Number)` or `type Name(fields)`
#[derive(Debug)]
pub struct TypeDecl {
    pub name: Token,
    pub kind: TypeDeclKind,
}

#[derive(Debug)]
pub enum TypeDeclKind {
    /// A sum type: one or more variants separated by `|`.
    Sum { variants: Vec<Variant> },
    /// A tuple-style type: a parenthesized field list. No constructor is
    /// introduced for these; the analyzer only checks the schema.
    Tuple { fields: Vec<Param> },
}

/// One case of a sum type, with an optional payload parameter list.
#[derive(Debug)]
pub struct Variant {
    pub name: Token,
    pub params: Vec<Param>,
}
