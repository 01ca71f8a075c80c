//! Pretty error reporting using ariadne
//!
//! Renders parser diagnostics with source context.

use std::io;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use crate::errors::ParseError;

fn build_report<'a>(
    filename: &str,
    error: &ParseError,
    config: Config,
) -> Report<'a, std::ops::Range<usize>> {
    // Spans are byte offsets
    let span = error.span.start..error.span.end;

    Report::build(ReportKind::Error, span.clone())
        .with_config(config.with_index_type(IndexType::Byte))
        .with_message(format!("Parser error in {}:{}", filename, error.position))
        .with_label(
            Label::new(span)
                .with_message(&error.message)
                .with_color(Color::Red),
        )
        .finish()
}

/// Print parse errors to stderr with source context
pub fn print_parse_errors(source: &str, filename: &str, errors: &[ParseError]) -> io::Result<()> {
    for error in errors {
        build_report(filename, error, Config::default()).eprint(Source::from(source))?;
    }
    Ok(())
}

/// Format parse errors as plain text (no colors)
pub fn format_parse_errors(source: &str, filename: &str, errors: &[ParseError]) -> String {
    let mut output = Vec::new();
    for error in errors {
        let report = build_report(filename, error, Config::default().with_color(false));
        if report.write(Source::from(source), &mut output).is_err() {
            output.extend_from_slice(error.message.as_bytes());
            output.push(b'\n');
        }
    }
    String::from_utf8_lossy(&output).into_owned()
}
