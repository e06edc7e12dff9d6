//! Nova formatter: re-emits the token stream with brace-driven layout.
//!
//! Formatting works at token level -- no syntax tree is consulted -- but
//! the input is parsed first so files with syntax errors are refused
//! instead of silently mangled. Layout rules: `{` and `}` take their own
//! lines and bump the indent, `;` ends a line, `,` glues to the token
//! before it, and every other adjacent pair is separated by one space.

mod printer;

use nova_common::diagnostic::Diagnostic;

pub use printer::format_tokens;

/// Configuration for formatter output.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Number of spaces per indentation level. Default: 4.
    pub indent_width: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

/// Format a Nova source file.
///
/// Returns the parse diagnostics instead of output when the source does
/// not parse cleanly.
pub fn format_source(source: &str) -> Result<String, Vec<Diagnostic>> {
    format_source_with(source, &FormatConfig::default())
}

/// Like [`format_source`], with explicit configuration.
pub fn format_source_with(source: &str, config: &FormatConfig) -> Result<String, Vec<Diagnostic>> {
    let parse = nova_parser::parse(source);
    if parse.had_error {
        return Err(parse.diagnostics);
    }
    let tokens = nova_lexer::Lexer::tokenize(source);
    Ok(format_tokens(&tokens, source, config))
}
