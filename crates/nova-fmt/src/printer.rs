//! The token printer behind the formatter.

use nova_common::token::{Token, TokenKind};

use crate::FormatConfig;

/// Render a token stream with brace-based indentation.
///
/// The stream is consumed up to (and excluding) the first `Eof` or `Error`
/// token.
pub fn format_tokens(tokens: &[Token], source: &str, config: &FormatConfig) -> String {
    let mut out = String::new();
    let mut indent: usize = 0;
    let mut at_line_start = true;

    let push_indent = |out: &mut String, indent: usize| {
        for _ in 0..indent {
            for _ in 0..config.indent_width {
                out.push(' ');
            }
        }
    };

    for token in tokens {
        match token.kind {
            TokenKind::Eof | TokenKind::Error => break,

            TokenKind::RBrace => {
                indent = indent.saturating_sub(1);
                if !at_line_start {
                    out.push('\n');
                }
                push_indent(&mut out, indent);
                out.push('}');
                out.push('\n');
                at_line_start = true;
            }

            TokenKind::LBrace => {
                if !at_line_start {
                    out.push('\n');
                }
                push_indent(&mut out, indent);
                out.push('{');
                out.push('\n');
                indent += 1;
                at_line_start = true;
            }

            TokenKind::Semicolon => {
                out.push(';');
                out.push('\n');
                at_line_start = true;
            }

            // Commas attach to the token before them.
            TokenKind::Comma => {
                out.push(',');
            }

            _ => {
                if at_line_start {
                    push_indent(&mut out, indent);
                    at_line_start = false;
                } else {
                    out.push(' ');
                }
                out.push_str(token.text(source));
            }
        }
    }

    if !at_line_start {
        out.push('\n');
    }
    out
}
