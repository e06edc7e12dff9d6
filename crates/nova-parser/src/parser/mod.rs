//! Recursive-descent parser for Nova.
//!
//! The parser walks the token array produced by `nova-lexer` in a single
//! pass and builds the owned AST. Error handling uses panic-mode recovery:
//! the first error in a region sets `panic_mode` (suppressing follow-on
//! diagnostics), and at the top level [`Parser::synchronize`] skips tokens
//! until a likely declaration boundary before parsing resumes. The parser
//! always produces a structurally complete [`Program`]; missing children
//! are patched with unit literals at the faulty position so later stages
//! never see holes.

pub(crate) mod expressions;
pub(crate) mod items;

use nova_common::diagnostic::Diagnostic;
use nova_common::span::Span;
use nova_common::token::{Token, TokenKind};

use crate::ast::{Expr, ExprId, ExprKind, Literal, Program};

pub(crate) struct Parser {
    /// All tokens from the lexer, ending with `Eof`.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Diagnostics accumulated while parsing.
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// Whether any error diagnostic was emitted.
    pub(crate) had_error: bool,
    /// Whether we are recovering from an error and suppressing diagnostics.
    panic_mode: bool,
    /// Next expression id to hand out.
    next_expr_id: u32,
}

impl Parser {
    /// Create a parser over a token stream.
    ///
    /// The stream must end with an `Eof` token; the lexer's `Error`
    /// terminator is handled by [`crate::parse`] before construction.
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(
            matches!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof)),
            "token stream must end with Eof"
        );
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            had_error: false,
            panic_mode: false,
            next_expr_id: 0,
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    /// The current token.
    pub(crate) fn peek(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// The token `n` positions ahead (clamped to `Eof`).
    pub(crate) fn peek_nth(&self, n: usize) -> Token {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        self.tokens[idx]
    }

    /// The most recently consumed token.
    pub(crate) fn previous(&self) -> Token {
        self.tokens[self.pos.saturating_sub(1)]
    }

    /// Whether the cursor is at the `Eof` token.
    pub(crate) fn at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Whether the current token matches the given kind.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    // ── Consumption ────────────────────────────────────────────────────

    /// Consume and return the current token (never moves past `Eof`).
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    /// If the current token matches, consume it and return true.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the given kind or report `message`.
    ///
    /// On mismatch the current token is left in place and a zero-length
    /// `Error` token at the current position is returned, so callers can
    /// keep building nodes.
    pub(crate) fn expect(&mut self, kind: TokenKind, message: &'static str) -> Token {
        if self.check(kind) {
            return self.advance();
        }
        self.error_here(message);
        let at = self.peek();
        Token::new(
            TokenKind::Error,
            Span::new(at.span.start, at.span.start),
            at.line,
            at.column,
        )
    }

    // ── Error reporting and recovery ───────────────────────────────────

    /// Report an error at the current token unless already panicking.
    pub(crate) fn error_here(&mut self, message: &'static str) {
        let token = self.peek();
        self.error_at(token, message);
    }

    /// Report an error at a specific token unless already panicking.
    pub(crate) fn error_at(&mut self, token: Token, message: &'static str) {
        self.had_error = true;
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.diagnostics.push(Diagnostic::error(token, message));
    }

    /// Whether the parser is currently recovering from an error.
    pub(crate) fn panicking(&self) -> bool {
        self.panic_mode
    }

    /// Skip tokens until a likely declaration boundary, then clear
    /// `panic_mode`.
    ///
    /// Stops after a `;` or in front of a token that begins a top-level
    /// form (`fun`, `let`, `type`, `if`, `while`, `match`, `async`).
    pub(crate) fn synchronize(&mut self) {
        self.panic_mode = false;
        while !self.at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            match self.peek().kind {
                TokenKind::Fun
                | TokenKind::Let
                | TokenKind::Type
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Match
                | TokenKind::Async => return,
                _ => {}
            }
            self.advance();
        }
    }

    // ── Node construction ──────────────────────────────────────────────

    /// Build an expression node, assigning the next [`ExprId`].
    pub(crate) fn mk_expr(&mut self, start: Token, kind: ExprKind) -> Expr {
        let id = ExprId(self.next_expr_id);
        self.next_expr_id += 1;
        Expr { id, start, kind }
    }

    /// A unit literal standing in for a missing child at `at`.
    pub(crate) fn unit_expr(&mut self, at: Token) -> Expr {
        self.mk_expr(at, ExprKind::Literal(Literal::Unit))
    }

    // ── Top level ──────────────────────────────────────────────────────

    /// Parse a complete program: module header, imports, declarations.
    pub(crate) fn parse_program(&mut self) -> Program {
        let mut program = Program {
            module_path: Vec::new(),
            imports: Vec::new(),
            decls: Vec::new(),
        };

        items::parse_module_header(self, &mut program);
        if self.panicking() {
            self.synchronize();
        }

        while self.check(TokenKind::Import) {
            let import = items::parse_import(self);
            program.imports.push(import);
            if self.panicking() {
                self.synchronize();
            }
        }

        while !self.at_end() {
            if let Some(decl) = items::parse_declaration(self) {
                program.decls.push(decl);
            }
            if self.panicking() {
                self.synchronize();
            }
        }

        program
    }
}
