use nova_common::token::Token;

/// Stable identity of an expression node.
///
/// Ids are dense and assigned in creation order by the parser. The semantic
/// analyzer keys its `(type, effects)` side table on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub u32);

/// An expression node. Owns its children exclusively.
#[derive(Debug)]
pub struct Expr {
    pub id: ExprId,
    /// The token the expression starts at.
    pub start: Token,
    pub kind: ExprKind,
}

/// The expression variants of the Nova language.
#[derive(Debug)]
pub enum ExprKind {
    Literal(Literal),
    Identifier {
        name: Token,
    },
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    While {
        condition: Box<Expr>,
        body: Box<Expr>,
    },
    Match {
        scrutinee: Box<Expr>,
        arms: Vec<MatchArm>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Arg>,
    },
    /// `target |> stage |> stage ...` -- stages in left-to-right order.
    Pipe {
        target: Box<Expr>,
        stages: Vec<Expr>,
    },
    /// `(params) -> body`
    Lambda {
        params: Vec<Param>,
        body: Box<Expr>,
    },
    /// `{ e; e; ... }` -- the last expression is the block's value.
    Block {
        exprs: Vec<Expr>,
    },
    /// `( inner )`
    Paren {
        inner: Box<Expr>,
    },
    /// `async { ... }`
    Async {
        inner: Box<Expr>,
    },
    /// `await expr`
    Await {
        inner: Box<Expr>,
    },
    /// `! expr` -- marks the expression impure.
    Effect {
        inner: Box<Expr>,
    },
}

/// Literal expression payloads. The literal's token is the expression's
/// start token.
#[derive(Debug)]
pub enum Literal {
    Number,
    String,
    Bool,
    Unit,
    List { elements: Vec<Expr> },
}

/// A call argument, positional or labeled (`name = value`).
///
/// Labels are preserved by the parser; the analyzer checks calls
/// positionally and ignores them.
#[derive(Debug)]
pub struct Arg {
    pub label: Option<Token>,
    pub value: Expr,
}

/// A parameter: `name` with an optional `: Type` annotation.
///
/// Used by functions, lambdas, sum-type variant payloads, tuple-type
/// fields, and match-arm bindings.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: Token,
    pub type_name: Option<Token>,
}

/// One arm of a match expression: `Name(bindings) -> body`.
#[derive(Debug)]
pub struct MatchArm {
    pub name: Token,
    pub bindings: Vec<Param>,
    pub body: Expr,
}

impl Expr {
    /// Whether this expression is the given literal kind (ignoring payload).
    pub fn is_unit_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(Literal::Unit))
    }
}
