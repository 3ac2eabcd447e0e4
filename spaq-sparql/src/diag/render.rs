//! Human-readable diagnostic rendering.
//!
//! Output follows the familiar compiler layout:
//!
//! ```text
//! error[S001]: expected `{` to open the WHERE clause
//!   --> query.rq:2:7
//!    |
//!  2 | WHERE ?s ?p ?o }
//!    |       ^^ expected `{`
//!    |
//!    = help: group patterns must be enclosed in braces
//! ```

use crate::diag::{Diagnostic, Severity};
use crate::span::LineIndex;
use std::fmt::Write;

/// Render one diagnostic against its source text.
///
/// `filename` is used in the location line; `<input>` when absent.
pub fn render_diagnostic(diag: &Diagnostic, source: &str, filename: Option<&str>) -> String {
    let index = LineIndex::new(source);
    let mut out = String::new();

    let severity = match diag.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Note => "note",
    };
    let _ = writeln!(out, "{}[{}]: {}", severity, diag.code.code(), diag.message);

    let start = index.line_col(diag.span.start);
    let _ = writeln!(
        out,
        "  --> {}:{}:{}",
        filename.unwrap_or("<input>"),
        start.line,
        start.col
    );

    snippet(&mut out, source, &index, diag);

    if let Some(help) = &diag.help {
        for line in help.lines() {
            let _ = writeln!(out, "   = help: {line}");
        }
    }
    if let Some(note) = &diag.note {
        for line in note.lines() {
            let _ = writeln!(out, "   = note: {line}");
        }
    }

    out
}

fn snippet(out: &mut String, source: &str, index: &LineIndex, diag: &Diagnostic) {
    let start = index.line_col(diag.span.start);
    let end = index.line_col(diag.span.end);
    let gutter = end.line.to_string().len();

    for line_num in start.line..=end.line {
        let line_start = index.line_start(line_num).unwrap_or(0);
        let line_end = index.line_end(line_num, source);
        let text = source[line_start..line_end.min(source.len())].trim_end_matches('\n');

        let _ = writeln!(out, "{:>gutter$} |", "");
        let _ = writeln!(out, "{line_num:>gutter$} | {text}");

        let underline_from = if line_num == start.line {
            start.col as usize
        } else {
            1
        };
        let underline_to = if line_num == end.line {
            end.col as usize
        } else {
            text.len() + 1
        };
        let pad = " ".repeat(underline_from.saturating_sub(1));
        let carets = "^".repeat(underline_to.saturating_sub(underline_from).max(1));

        let label = diag
            .labels
            .iter()
            .find(|l| index.line_col(l.span.start).line == line_num)
            .map(|l| format!(" {}", l.message))
            .unwrap_or_default();

        let _ = writeln!(out, "{:>gutter$} | {pad}{carets}{label}", "");
    }

    let _ = writeln!(out, "{:>gutter$} |", "");
}

/// Render a batch of diagnostics, blank-line separated.
pub fn render_diagnostics(
    diagnostics: &[Diagnostic],
    source: &str,
    filename: Option<&str>,
) -> String {
    diagnostics
        .iter()
        .map(|d| render_diagnostic(d, source, filename))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{DiagCode, Label};
    use crate::span::SourceSpan;

    #[test]
    fn renders_header_and_location() {
        let source = "SELECT ?x WHERE { }";
        let diag = Diagnostic::error(
            DiagCode::ExpectedToken,
            "expected triple pattern",
            SourceSpan::new(18, 19),
        );
        let rendered = render_diagnostic(&diag, source, Some("query.rq"));
        assert!(rendered.contains("error[S001]: expected triple pattern"));
        assert!(rendered.contains("query.rq:1:19"));
        assert!(rendered.contains("SELECT ?x WHERE { }"));
    }

    #[test]
    fn renders_label_help_note() {
        let source = "SELECT * WHERE { VALUES ?x { 1 } }";
        let diag = Diagnostic::error(
            DiagCode::UnsupportedConstruct,
            "VALUES blocks are not supported",
            SourceSpan::new(17, 23),
        )
        .with_label(Label::new(SourceSpan::new(17, 23), "VALUES starts here"))
        .with_help("inline the bindings as FILTER constraints")
        .with_note("only the core query grammar is accepted");
        let rendered = render_diagnostic(&diag, source, None);
        assert!(rendered.contains("error[S009]"));
        assert!(rendered.contains("<input>:1:18"));
        assert!(rendered.contains("^^^^^^ VALUES starts here"));
        assert!(rendered.contains("= help: inline the bindings"));
        assert!(rendered.contains("= note: only the core"));
    }

    #[test]
    fn renders_multiline_span() {
        let source = "SELECT ?x\nWHERE {\n  ?s ?p ?o\n}";
        let diag = Diagnostic::warning(
            DiagCode::UnsupportedConstruct,
            "spanning warning",
            SourceSpan::new(10, 17),
        );
        let rendered = render_diagnostic(&diag, source, None);
        assert!(rendered.contains("warning[S009]"));
        assert!(rendered.contains("2 | WHERE {"));
    }
}
