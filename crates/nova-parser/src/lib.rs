//! Nova parser: token stream to owned AST with error recovery.
//!
//! [`parse`] lexes the source, translates a lexical `Error` terminator into
//! a diagnostic, and runs the recursive-descent parser. The result always
//! contains a structurally complete [`ast::Program`] -- possibly with
//! unit-literal placeholders where source was missing -- so the semantic
//! analyzer and lowering can run over partially broken input.

pub mod ast;
mod parser;

use nova_common::diagnostic::Diagnostic;
use nova_common::span::Span;
use nova_common::token::{Token, TokenKind};
use nova_lexer::Lexer;

use ast::Program;

/// Result of parsing a Nova source file.
pub struct Parse {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any error-severity diagnostic was emitted.
    pub had_error: bool,
}

impl Parse {
    /// Whether parsing completed without errors.
    pub fn ok(&self) -> bool {
        !self.had_error
    }
}

/// Parse a Nova source file.
///
/// This is the main entry point for the parser. It tokenizes the source,
/// parses the token stream, and returns the program plus diagnostics.
pub fn parse(source: &str) -> Parse {
    let mut tokens = Lexer::tokenize(source);
    let mut diagnostics = Vec::new();
    let mut lexical_error = false;

    // The lexer terminates the stream at the first `Error` token. Translate
    // it into a diagnostic and cap the stream with `Eof` so the parser sees
    // a well-formed (if truncated) input.
    if let Some(&last) = tokens.last() {
        if last.kind == TokenKind::Error {
            let message = if source[last.span.start as usize..].starts_with('"') {
                "unterminated string literal"
            } else {
                "unexpected character"
            };
            diagnostics.push(Diagnostic::error(last, message));
            lexical_error = true;
            tokens.pop();
            tokens.push(Token::new(
                TokenKind::Eof,
                Span::new(last.span.end, last.span.end),
                last.line,
                last.column,
            ));
        }
    }

    let mut parser = parser::Parser::new(tokens);
    let program = parser.parse_program();

    let had_error = lexical_error || parser.had_error;
    diagnostics.extend(parser.diagnostics);

    Parse {
        program,
        diagnostics,
        had_error,
    }
}
