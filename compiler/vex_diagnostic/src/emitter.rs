//! Plain-text rendering.
//!
//! ```text
//! error[E2001]: variable `q` is not initialized
//!   --> 1:5
//!    |
//!  1 | x = q + 1
//!    |     ^ read here
//!    = note: assign `q` before reading it
//! ```

use std::fmt::Write as _;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Label};

/// Render `diagnostic` against the script text it refers to.
pub fn render(diagnostic: &Diagnostic, source: &str) -> String {
    let table = LineOffsetTable::build(source);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}[{}]: {}",
        diagnostic.severity, diagnostic.code, diagnostic.message
    );

    let gutter = diagnostic
        .labels
        .iter()
        .map(|label| table.line_from_offset(label.span.start).to_string().len())
        .max()
        .unwrap_or(1);

    if let Some(primary) = diagnostic.labels.iter().find(|l| l.is_primary) {
        let (line, col) = table.offset_to_line_col(source, primary.span.start);
        let _ = writeln!(out, "{:gutter$}--> {line}:{col}", "");
    }

    for label in &diagnostic.labels {
        render_label(&mut out, &table, source, label, gutter);
    }

    for note in &diagnostic.notes {
        let _ = writeln!(out, "{:gutter$} = note: {note}", "");
    }
    out
}

/// Render without source text: header, location offsets and notes.
pub fn render_plain(diagnostic: &Diagnostic) -> String {
    let mut out = diagnostic.to_string();
    for label in &diagnostic.labels {
        let _ = write!(out, "\n  at {}: {}", label.span, label.message);
    }
    for note in &diagnostic.notes {
        let _ = write!(out, "\n  = note: {note}");
    }
    out
}

fn render_label(
    out: &mut String,
    table: &LineOffsetTable,
    source: &str,
    label: &Label,
    gutter: usize,
) {
    let (line, col) = table.offset_to_line_col(source, label.span.start);
    let text = table.line_text(source, line);
    let marker = if label.is_primary { '^' } else { '-' };
    let width = label
        .span
        .len()
        .max(1)
        .min(text.chars().count().saturating_sub(col as usize - 1).max(1) as u32) as usize;
    let pad = col as usize - 1;

    let _ = writeln!(out, "{:gutter$} |", "");
    let _ = writeln!(out, "{line:>gutter$} | {text}");
    let _ = writeln!(
        out,
        "{:gutter$} | {:pad$}{} {}",
        "",
        "",
        marker.to_string().repeat(width),
        label.message
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use pretty_assertions::assert_eq;
    use vex_ir::Span;

    #[test]
    fn test_render_primary_label() {
        let source = "x = q + 1";
        let diag = Diagnostic::error(ErrorCode::E2001)
            .with_message("variable `q` is not initialized")
            .with_label(Span::new(4, 5), "read here");
        let expected = "\
error[E2001]: variable `q` is not initialized
 --> 1:5
  |
1 | x = q + 1
  |     ^ read here
";
        assert_eq!(render(&diag, source), expected);
    }

    #[test]
    fn test_render_secondary_label_and_note() {
        let source = "switch (v) {\ncase 5: a = 1;\ncase 5: a = 2;\n}";
        let diag = Diagnostic::error(ErrorCode::E1004)
            .with_message("duplicate case value 5")
            .with_label(Span::new(33, 34), "duplicate case")
            .with_secondary_label(Span::new(18, 19), "first case with this value")
            .with_note("each case value may appear only once");
        let rendered = render(&diag, source);
        assert!(rendered.contains("--> 3:6"));
        assert!(rendered.contains("^ duplicate case"));
        assert!(rendered.contains("- first case with this value"));
        assert!(rendered.contains("= note: each case value may appear only once"));
    }

    #[test]
    fn test_render_plain_lists_offsets() {
        let diag = Diagnostic::error(ErrorCode::E3001)
            .with_message("calculations exceeded time limit")
            .with_label(Span::new(0, 5), "in this loop");
        assert_eq!(
            render_plain(&diag),
            "error[E3001]: calculations exceeded time limit\n  at 0..5: in this loop"
        );
    }
}
