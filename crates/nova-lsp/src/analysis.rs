//! Document analysis for the language server.
//!
//! Bundles one run of the pipeline (lex, parse, analyze) per document and
//! answers position queries against it. All positions coming from the
//! client are 0-based; Nova tokens carry 1-based line/column.

use nova_common::diagnostic::Severity;
use nova_common::token::{Token, TokenKind};
use nova_parser::ast::{Decl, Expr, ExprKind, Literal, Program};
use nova_typeck::SemanticContext;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};

/// The cached analysis of one open document.
pub struct AnalysisResult {
    pub tokens: Vec<Token>,
    pub parse: nova_parser::Parse,
    pub semantics: SemanticContext,
    /// Parse and semantic diagnostics, converted for the client.
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the pipeline over a document and convert its diagnostics.
pub fn analyze_document(source: &str) -> AnalysisResult {
    let tokens = nova_lexer::Lexer::tokenize(source);
    let parse = nova_parser::parse(source);
    let semantics = nova_typeck::analyze(&parse.program, source);

    let diagnostics = parse
        .diagnostics
        .iter()
        .chain(semantics.diagnostics.iter())
        .map(convert_diagnostic)
        .collect();

    AnalysisResult {
        tokens,
        parse,
        semantics,
        diagnostics,
    }
}

fn convert_diagnostic(diag: &nova_common::diagnostic::Diagnostic) -> Diagnostic {
    let line = diag.token.line.saturating_sub(1);
    let column = diag.token.column.saturating_sub(1);
    let severity = match diag.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };
    Diagnostic {
        range: Range {
            start: Position::new(line, column),
            end: Position::new(line, column + diag.token.span.len()),
        },
        severity: Some(severity),
        message: diag.message.to_string(),
        ..Diagnostic::default()
    }
}

/// The rendered type of the expression at an LSP position, if any
/// expression starts exactly at the token under the cursor.
pub fn type_at_position(
    source: &str,
    analysis: &AnalysisResult,
    position: &Position,
) -> Option<String> {
    let token = find_token_at(&analysis.tokens, position.line, position.character)?;
    let expr = find_expr_for_token(&analysis.parse.program, &token)?;
    let (ty, _) = analysis.semantics.lookup_expr(expr)?;
    Some(analysis.semantics.type_name(ty, source))
}

/// Find the token covering a 0-based line/character position.
fn find_token_at(tokens: &[Token], line: u32, character: u32) -> Option<Token> {
    for token in tokens {
        if token.kind == TokenKind::Eof {
            break;
        }
        let token_line = token.line.saturating_sub(1);
        if token_line > line {
            break;
        }
        if token_line < line {
            continue;
        }
        let start_col = token.column.saturating_sub(1);
        let end_col = start_col + token.span.len();
        if character < start_col {
            break;
        }
        if character <= end_col {
            return Some(*token);
        }
    }
    None
}

/// Find the expression whose start token matches, preferring identifier
/// nodes when several expressions share the token.
fn find_expr_for_token<'a>(program: &'a Program, token: &Token) -> Option<&'a Expr> {
    let mut best: Option<&'a Expr> = None;
    for decl in &program.decls {
        let body = match decl {
            Decl::Fun(fun) => &fun.body,
            Decl::Let(decl) => &decl.value,
            Decl::Type(_) => continue,
        };
        visit(body, &mut |expr| {
            if same_token(&expr.start, token) {
                let is_identifier = matches!(expr.kind, ExprKind::Identifier { .. });
                if best.is_none() || is_identifier {
                    best = Some(expr);
                }
            }
        });
    }
    best
}

fn same_token(a: &Token, b: &Token) -> bool {
    a.line == b.line && a.column == b.column && a.span == b.span
}

fn visit<'a>(expr: &'a Expr, f: &mut impl FnMut(&'a Expr)) {
    f(expr);
    match &expr.kind {
        ExprKind::Literal(Literal::List { elements }) => {
            for e in elements {
                visit(e, f);
            }
        }
        ExprKind::Literal(_) | ExprKind::Identifier { .. } => {}
        ExprKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visit(condition, f);
            visit(then_branch, f);
            if let Some(e) = else_branch {
                visit(e, f);
            }
        }
        ExprKind::While { condition, body } => {
            visit(condition, f);
            visit(body, f);
        }
        ExprKind::Match { scrutinee, arms } => {
            visit(scrutinee, f);
            for arm in arms {
                visit(&arm.body, f);
            }
        }
        ExprKind::Call { callee, args } => {
            visit(callee, f);
            for arg in args {
                visit(&arg.value, f);
            }
        }
        ExprKind::Pipe { target, stages } => {
            visit(target, f);
            for stage in stages {
                visit(stage, f);
            }
        }
        ExprKind::Lambda { body, .. } => visit(body, f),
        ExprKind::Block { exprs } => {
            for e in exprs {
                visit(e, f);
            }
        }
        ExprKind::Paren { inner }
        | ExprKind::Async { inner }
        | ExprKind::Await { inner }
        | ExprKind::Effect { inner } => visit(inner, f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_on_identifier_reports_its_type() {
        let source = "module m\nfun f(x: Number): Number = x\n";
        let analysis = analyze_document(source);
        // `x` in the body sits on line 2 (0-based 1), column 28 (0-based 27).
        let ty = type_at_position(source, &analysis, &Position::new(1, 27));
        assert_eq!(ty.as_deref(), Some("Number"));
    }

    #[test]
    fn hover_on_custom_type_value_reports_type_name() {
        let source = "module m\ntype Flag = Yes | No\nfun f(): Flag = Yes\n";
        let analysis = analyze_document(source);
        // `Yes` in the body of f, line 3 (0-based 2), column 17 (0-based 16).
        let ty = type_at_position(source, &analysis, &Position::new(2, 16));
        assert_eq!(ty.as_deref(), Some("Flag"));
    }

    #[test]
    fn hover_misses_on_whitespace_past_tokens() {
        let source = "module m\nlet x = 1\n";
        let analysis = analyze_document(source);
        assert_eq!(type_at_position(source, &analysis, &Position::new(5, 0)), None);
    }

    #[test]
    fn diagnostics_are_converted_with_positions() {
        let source = "module m\nlet x = missing\n";
        let analysis = analyze_document(source);
        assert_eq!(analysis.diagnostics.len(), 1);
        let diag = &analysis.diagnostics[0];
        assert_eq!(diag.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diag.range.start.line, 1);
        assert_eq!(diag.range.start.character, 8);
        assert_eq!(diag.message, "undefined identifier");
    }
}
