//! Declaration-level parsing: the module header, imports, and the `fun`,
//! `let`, and `type` forms.

use nova_common::token::{Token, TokenKind};

use super::{expressions, Parser};
use crate::ast::{Decl, FunDecl, Import, LetDecl, Param, Program, TypeDecl, TypeDeclKind, Variant};

/// Parse `module <dotted-path>` into the program header.
pub(crate) fn parse_module_header(p: &mut Parser, program: &mut Program) {
    p.expect(TokenKind::Module, "expected 'module' at start of file");
    program.module_path = parse_dotted_path(p);
}

/// Parse a dotted identifier path: `a.b.c`.
fn parse_dotted_path(p: &mut Parser) -> Vec<Token> {
    let mut path = Vec::new();
    path.push(p.expect(TokenKind::Identifier, "expected identifier"));
    while p.eat(TokenKind::Dot) {
        path.push(p.expect(TokenKind::Identifier, "expected identifier after '.'"));
    }
    path
}

/// Parse `import <dotted-path> ('{' name (',' name)* '}')?`.
pub(crate) fn parse_import(p: &mut Parser) -> Import {
    p.expect(TokenKind::Import, "expected 'import'");
    let path = parse_dotted_path(p);
    let mut symbols = Vec::new();
    if p.eat(TokenKind::LBrace) {
        if !p.check(TokenKind::RBrace) {
            loop {
                symbols.push(p.expect(TokenKind::Identifier, "expected imported symbol name"));
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        p.expect(TokenKind::RBrace, "expected '}' after import list");
    }
    Import { path, symbols }
}

/// Parse one top-level declaration, dispatching on the leading keyword.
///
/// Returns `None` for an unexpected token (after reporting it), leaving
/// recovery to the caller's synchronize step.
pub(crate) fn parse_declaration(p: &mut Parser) -> Option<Decl> {
    if p.eat(TokenKind::Fun) {
        return Some(Decl::Fun(parse_fun_decl(p)));
    }
    if p.eat(TokenKind::Let) {
        return Some(Decl::Let(parse_let_decl(p)));
    }
    if p.eat(TokenKind::Type) {
        return Some(Decl::Type(parse_type_decl(p)));
    }
    p.error_here("expected 'fun', 'let', or 'type' declaration");
    p.advance();
    None
}

/// `fun name '(' params? ')' (':' type)? '=' expression`
fn parse_fun_decl(p: &mut Parser) -> FunDecl {
    let name = p.expect(TokenKind::Identifier, "expected function name");
    p.expect(TokenKind::LParen, "expected '(' after function name");
    let params = parse_param_list(p, TokenKind::RParen);
    p.expect(TokenKind::RParen, "expected ')' after parameters");
    let return_type = if p.eat(TokenKind::Colon) {
        Some(p.expect(TokenKind::Identifier, "expected return type"))
    } else {
        None
    };
    p.expect(TokenKind::Equal, "expected '=' before function body");
    let body = expressions::parse_expression(p);
    FunDecl {
        name,
        params,
        return_type,
        body,
    }
}

/// `let name (':' type)? '=' expression`
fn parse_let_decl(p: &mut Parser) -> LetDecl {
    let name = p.expect(TokenKind::Identifier, "expected binding name");
    let type_name = if p.eat(TokenKind::Colon) {
        Some(p.expect(TokenKind::Identifier, "expected type name"))
    } else {
        None
    };
    p.expect(TokenKind::Equal, "expected '=' in let declaration");
    let value = expressions::parse_expression(p);
    LetDecl {
        name,
        type_name,
        value,
    }
}

/// `type name '=' variant ('|' variant)*` or `type name '(' fields ')'`
fn parse_type_decl(p: &mut Parser) -> TypeDecl {
    let name = p.expect(TokenKind::Identifier, "expected type name");

    if p.eat(TokenKind::Equal) {
        let mut variants = Vec::new();
        variants.push(parse_variant(p));
        while p.eat(TokenKind::Bar) {
            variants.push(parse_variant(p));
            if p.panicking() {
                break;
            }
        }
        return TypeDecl {
            name,
            kind: TypeDeclKind::Sum { variants },
        };
    }

    if p.eat(TokenKind::LParen) {
        let fields = parse_param_list(p, TokenKind::RParen);
        p.expect(TokenKind::RParen, "expected ')' after type fields");
        return TypeDecl {
            name,
            kind: TypeDeclKind::Tuple { fields },
        };
    }

    p.error_here("expected '=' or '(' in type declaration");
    TypeDecl {
        name,
        kind: TypeDeclKind::Sum {
            variants: Vec::new(),
        },
    }
}

/// `Name ('(' params? ')')?`
fn parse_variant(p: &mut Parser) -> Variant {
    let name = p.expect(TokenKind::Identifier, "expected variant name");
    let mut params = Vec::new();
    if p.eat(TokenKind::LParen) {
        params = parse_param_list(p, TokenKind::RParen);
        p.expect(TokenKind::RParen, "expected ')' after variant payload");
    }
    Variant { name, params }
}

/// Comma-separated `name (':' type)?` entries, up to (not consuming) the
/// closing delimiter.
pub(crate) fn parse_param_list(p: &mut Parser, closing: TokenKind) -> Vec<Param> {
    let mut params = Vec::new();
    if p.check(closing) {
        return params;
    }
    loop {
        let name = p.expect(TokenKind::Identifier, "expected parameter name");
        let type_name = if p.eat(TokenKind::Colon) {
            Some(p.expect(TokenKind::Identifier, "expected type name"))
        } else {
            None
        };
        params.push(Param { name, type_name });
        if !p.eat(TokenKind::Comma) || p.panicking() {
            break;
        }
    }
    params
}
