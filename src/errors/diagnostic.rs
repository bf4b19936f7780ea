//! Pretty diagnostic reporting using ariadne
//!
//! Renders validator diagnostics with the offending source line highlighted.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use super::Diagnostic;

/// Char range of a 1-based line, without its line terminator.
/// Lines past the end map to an empty range at the end of the source.
pub fn line_span(source: &str, line: usize) -> Range<usize> {
    let mut start = 0;
    for (index, text) in source.split('\n').enumerate() {
        let len = text.trim_end_matches('\r').chars().count();
        if index + 1 == line {
            return start..start + len;
        }
        start += text.chars().count() + 1;
    }
    let end = source.chars().count();
    end..end
}

fn build_report(
    source: &str,
    filename: &str,
    diagnostic: &Diagnostic,
    color: bool,
) -> Report<'static, Range<usize>> {
    let span = line_span(source, diagnostic.line);

    Report::build(ReportKind::Error, span.clone())
        .with_config(Config::default().with_color(color))
        .with_code(diagnostic.code())
        .with_message(format!("{}:{}", filename, diagnostic.line))
        .with_label(
            Label::new(span)
                .with_message(&diagnostic.message)
                .with_color(Color::Red),
        )
        .finish()
}

/// Print every diagnostic with source context to stderr
pub fn print_diagnostics(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        if let Err(e) = build_report(source, filename, diagnostic, true).eprint(Source::from(source)) {
            log::error!("failed to print diagnostic report: {}", e);
        }
    }
}

/// Format a diagnostic as a string (for testing and non-terminal sinks)
pub fn format_diagnostic(source: &str, filename: &str, diagnostic: &Diagnostic) -> String {
    let mut output = Vec::new();

    if let Err(e) = build_report(source, filename, diagnostic, false).write(Source::from(source), &mut output) {
        return format!("{}:{}: {} ({})", filename, diagnostic.line, diagnostic.message, e);
    }

    String::from_utf8_lossy(&output).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DiagnosticKind, Locale};

    #[test]
    fn test_line_span() {
        let source = "line1\nlíne2\r\nline3";

        assert_eq!(line_span(source, 1), 0..5);
        assert_eq!(line_span(source, 2), 6..11);
        assert_eq!(line_span(source, 3), 13..18);
        assert_eq!(line_span(source, 9), 18..18);
    }

    #[test]
    fn test_format_diagnostic_mentions_message() {
        let source = "Algorithme T;\nDebut\n    lire (x);\nFin";
        let diagnostic = Diagnostic::new(
            3,
            "lire (x);",
            DiagnosticKind::ReadInvalidSpacing,
            Locale::French,
            None,
        );

        let rendered = format_diagnostic(source, "t.algo", &diagnostic);
        assert!(rendered.contains("read_invalid_spacing"));
        assert!(rendered.contains("entre 'lire' et '('"));
    }
}
