//! Expression-level parsing, loosest binding first: `if`/`while`/`match`/
//! `async` forms, the `await`/`!` prefixes, pipelines, call chains, and
//! primaries (literals, identifiers, groupings, blocks, lists, lambdas).

use nova_common::token::{Token, TokenKind};

use super::{items, Parser};
use crate::ast::{Arg, Expr, ExprKind, Literal, MatchArm};

/// Parse one expression.
pub(crate) fn parse_expression(p: &mut Parser) -> Expr {
    let start = p.peek();
    if p.eat(TokenKind::If) {
        return parse_if(p, start);
    }
    if p.eat(TokenKind::While) {
        return parse_while(p, start);
    }
    if p.eat(TokenKind::Match) {
        return parse_match(p, start);
    }
    if p.eat(TokenKind::Async) {
        return parse_async(p, start);
    }
    if p.eat(TokenKind::Await) {
        let inner = parse_expression(p);
        return p.mk_expr(
            start,
            ExprKind::Await {
                inner: Box::new(inner),
            },
        );
    }
    if p.eat(TokenKind::Bang) {
        let inner = parse_expression(p);
        return p.mk_expr(
            start,
            ExprKind::Effect {
                inner: Box::new(inner),
            },
        );
    }
    parse_pipe(p)
}

/// `if <expr> <block> ('else' (<if-expr> | <block>))?`
fn parse_if(p: &mut Parser, start: Token) -> Expr {
    let condition = parse_expression(p);
    let then_branch = expect_block(p);
    let else_branch = if p.eat(TokenKind::Else) {
        let else_start = p.peek();
        if p.eat(TokenKind::If) {
            Some(Box::new(parse_if(p, else_start)))
        } else {
            Some(Box::new(expect_block(p)))
        }
    } else {
        None
    };
    p.mk_expr(
        start,
        ExprKind::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch,
        },
    )
}

/// `while <expr> <block>`
fn parse_while(p: &mut Parser, start: Token) -> Expr {
    let condition = parse_expression(p);
    let body = expect_block(p);
    p.mk_expr(
        start,
        ExprKind::While {
            condition: Box::new(condition),
            body: Box::new(body),
        },
    )
}

/// `match <expr> '{' (Name ('(' bindings ')')? '->' <expr> ';'?)* '}'`
fn parse_match(p: &mut Parser, start: Token) -> Expr {
    let scrutinee = parse_expression(p);
    p.expect(TokenKind::LBrace, "expected '{' after match scrutinee");
    let mut arms = Vec::new();
    while !p.check(TokenKind::RBrace) && !p.at_end() {
        let name = p.expect(TokenKind::Identifier, "expected match arm constructor");
        let mut bindings = Vec::new();
        if p.eat(TokenKind::LParen) {
            bindings = items::parse_param_list(p, TokenKind::RParen);
            p.expect(TokenKind::RParen, "expected ')' after match bindings");
        }
        expect_arrow(p, "expected '->' after match arm pattern");
        let body = parse_expression(p);
        arms.push(MatchArm {
            name,
            bindings,
            body,
        });
        p.eat(TokenKind::Semicolon);
        if p.panicking() {
            break;
        }
    }
    p.expect(TokenKind::RBrace, "expected '}' to close match");
    p.mk_expr(
        start,
        ExprKind::Match {
            scrutinee: Box::new(scrutinee),
            arms,
        },
    )
}

/// `async <block>`
fn parse_async(p: &mut Parser, start: Token) -> Expr {
    let inner = expect_block(p);
    p.mk_expr(
        start,
        ExprKind::Async {
            inner: Box::new(inner),
        },
    )
}

/// Parse a block where the grammar requires one, patching a unit literal
/// when the opening `{` is missing.
fn expect_block(p: &mut Parser) -> Expr {
    let start = p.peek();
    if p.eat(TokenKind::LBrace) {
        parse_block(p, start)
    } else {
        p.error_here("expected '{'");
        p.unit_expr(start)
    }
}

/// Body of a `{ ... }` block; the opening brace is already consumed.
fn parse_block(p: &mut Parser, start: Token) -> Expr {
    let mut exprs = Vec::new();
    if !p.check(TokenKind::RBrace) && !p.at_end() {
        loop {
            exprs.push(parse_expression(p));
            if p.panicking() {
                break;
            }
            if !p.eat(TokenKind::Semicolon) {
                break;
            }
            // Trailing `;` before the closing brace is allowed.
            if p.check(TokenKind::RBrace) || p.at_end() {
                break;
            }
        }
    }
    p.expect(TokenKind::RBrace, "expected '}' after block");
    p.mk_expr(start, ExprKind::Block { exprs })
}

/// `<call-expr> ('|>' <call-expr>)*`
fn parse_pipe(p: &mut Parser) -> Expr {
    let target = parse_call(p);
    if !p.check(TokenKind::PipeOp) {
        return target;
    }
    let start = target.start;
    let mut stages = Vec::new();
    while p.eat(TokenKind::PipeOp) {
        stages.push(parse_call(p));
        if p.panicking() {
            break;
        }
    }
    p.mk_expr(
        start,
        ExprKind::Pipe {
            target: Box::new(target),
            stages,
        },
    )
}

/// Primary followed by zero or more `(args)` applications.
fn parse_call(p: &mut Parser) -> Expr {
    let mut expr = parse_primary(p);
    while p.eat(TokenKind::LParen) {
        let args = parse_argument_list(p);
        p.expect(TokenKind::RParen, "expected ')' after arguments");
        let start = expr.start;
        expr = p.mk_expr(
            start,
            ExprKind::Call {
                callee: Box::new(expr),
                args,
            },
        );
    }
    expr
}

/// Comma-separated call arguments, each optionally labeled `name = value`.
fn parse_argument_list(p: &mut Parser) -> Vec<Arg> {
    let mut args = Vec::new();
    if p.check(TokenKind::RParen) {
        return args;
    }
    loop {
        let label = if p.check(TokenKind::Identifier) && p.peek_nth(1).kind == TokenKind::Equal {
            let name = p.advance();
            p.advance(); // '='
            Some(name)
        } else {
            None
        };
        let value = parse_expression(p);
        args.push(Arg { label, value });
        if !p.eat(TokenKind::Comma) || p.panicking() {
            break;
        }
    }
    args
}

/// Literal, identifier, grouping, block, list literal, or lambda.
fn parse_primary(p: &mut Parser) -> Expr {
    let start = p.peek();

    if p.eat(TokenKind::LBrace) {
        return parse_block(p, start);
    }

    if p.eat(TokenKind::LParen) {
        // `()` is the unit literal.
        if p.eat(TokenKind::RParen) {
            return p.mk_expr(start, ExprKind::Literal(Literal::Unit));
        }
        if lambda_ahead(p) {
            let params = items::parse_param_list(p, TokenKind::RParen);
            p.expect(TokenKind::RParen, "expected ')' after lambda parameters");
            expect_arrow(p, "expected '->' after lambda parameters");
            let body = parse_expression(p);
            return p.mk_expr(
                start,
                ExprKind::Lambda {
                    params,
                    body: Box::new(body),
                },
            );
        }
        let inner = parse_expression(p);
        p.expect(TokenKind::RParen, "expected ')' after expression");
        return p.mk_expr(
            start,
            ExprKind::Paren {
                inner: Box::new(inner),
            },
        );
    }

    if p.eat(TokenKind::LBracket) {
        let mut elements = Vec::new();
        if !p.check(TokenKind::RBracket) {
            loop {
                elements.push(parse_expression(p));
                if !p.eat(TokenKind::Comma) || p.panicking() {
                    break;
                }
            }
        }
        p.expect(TokenKind::RBracket, "expected ']' after list literal");
        return p.mk_expr(start, ExprKind::Literal(Literal::List { elements }));
    }

    match start.kind {
        TokenKind::Number => {
            p.advance();
            p.mk_expr(start, ExprKind::Literal(Literal::Number))
        }
        TokenKind::Str => {
            p.advance();
            p.mk_expr(start, ExprKind::Literal(Literal::String))
        }
        TokenKind::True | TokenKind::False => {
            p.advance();
            p.mk_expr(start, ExprKind::Literal(Literal::Bool))
        }
        TokenKind::Identifier => {
            let name = p.advance();
            p.mk_expr(start, ExprKind::Identifier { name })
        }
        _ => {
            p.error_here("expected expression");
            p.unit_expr(start)
        }
    }
}

/// Bounded look-ahead deciding lambda vs. grouping after `(`.
///
/// Inside a single pair of parens, every token must be an identifier (plain
/// or type position), a colon, or a comma, and the token after the closing
/// `)` must be `->` or `=>`.
fn lambda_ahead(p: &Parser) -> bool {
    let mut n = 0;
    loop {
        let token = p.peek_nth(n);
        match token.kind {
            TokenKind::Identifier | TokenKind::Colon | TokenKind::Comma => n += 1,
            TokenKind::RParen => {
                let after = p.peek_nth(n + 1);
                return matches!(after.kind, TokenKind::Arrow | TokenKind::FatArrow);
            }
            _ => return false,
        }
    }
}

/// Consume `->` or `=>` (they parse identically) or report `message`.
fn expect_arrow(p: &mut Parser, message: &'static str) {
    if !p.eat(TokenKind::Arrow) && !p.eat(TokenKind::FatArrow) {
        p.error_here(message);
    }
}
