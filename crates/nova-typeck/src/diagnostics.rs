//! Ariadne-based rendering for accumulated diagnostics.
//!
//! Pipeline diagnostics stay as plain `Diagnostic { token, message,
//! severity }` records; this module turns one into a labeled source report
//! for terminal output. Color is opt-in so test output stays stable.

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};
use nova_common::diagnostic::{Diagnostic, Severity};

/// Options controlling diagnostic output.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticOptions {
    pub color: bool,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Render a single diagnostic as an ariadne report over the source text.
pub fn render_diagnostic(diag: &Diagnostic, source: &str, options: &DiagnosticOptions) -> String {
    let config = Config::default().with_color(options.color);
    let source_len = source.len();

    // Clamp the token span to source bounds; synthesized zero-length tokens
    // still get a one-byte label where possible.
    let start = (diag.token.span.start as usize).min(source_len);
    let mut end = (diag.token.span.end as usize).min(source_len).max(start);
    if start == end {
        end = end.saturating_add(1).min(source_len);
    }
    let range: Range<usize> = start..end;

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };

    let report = Report::build(kind, range.clone())
        .with_message(diag.message)
        .with_config(config)
        .with_label(Label::new(range).with_message(diag.message))
        .finish();

    let mut buf = Vec::new();
    let cache = Source::from(source);
    report
        .write(cache, &mut buf)
        .expect("failed to write diagnostic");
    String::from_utf8(buf).expect("diagnostic output should be valid UTF-8")
}
