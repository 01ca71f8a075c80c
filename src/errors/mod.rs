//! Error handling for godsl
//!
//! Provides structured error types with source location tracking
//! for helpful diagnostic messages.

mod diagnostic;

use std::fmt;
use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;

pub use diagnostic::{format_parse_errors, print_parse_errors};

/// A span in the source code, represented as a byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl SourceSpan {
    /// Create a new source span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Merge two spans into one that covers both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Get the length of this span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl From<Range<usize>> for SourceSpan {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<SourceSpan> for Range<usize> {
    fn from(span: SourceSpan) -> Self {
        span.start..span.end
    }
}

/// A 1-based line/column location plus the 0-based byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single syntax error recorded by the parser
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    /// Byte range of the offending token
    pub span: SourceSpan,
    pub position: Position,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: SourceSpan, position: Position) -> Self {
        Self {
            message: message.into(),
            span,
            position,
        }
    }
}

/// The main error type for godsl operations
#[derive(Error, Debug)]
pub enum GodslError {
    #[error("{}", render_parse_errors(.0))]
    Parse(Vec<ParseError>),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("source directory {} does not exist", .0.display())]
    MissingRoot(PathBuf),

    #[error("{}: {source}", path.display())]
    Transpile {
        path: PathBuf,
        source: Box<GodslError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GodslError {
    /// Parse diagnostics carried by this error, looking through file context
    pub fn parse_errors(&self) -> &[ParseError] {
        match self {
            GodslError::Parse(errors) => errors,
            GodslError::Transpile { source, .. } => source.parse_errors(),
            _ => &[],
        }
    }

    /// Attach the path of the file being processed
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        GodslError::Transpile {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// `Parser errors:` followed by one two-space indented line per message
fn render_parse_errors(errors: &[ParseError]) -> String {
    let mut out = String::from("Parser errors:\n");
    for error in errors {
        out.push_str("  ");
        out.push_str(&error.message);
        out.push('\n');
    }
    out
}

/// Result type alias for godsl operations
pub type GodslResult<T> = Result<T, GodslError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn error(message: &str) -> ParseError {
        ParseError::new(message, SourceSpan::new(0, 1), Position::new(1, 1, 0))
    }

    #[test]
    fn test_parse_error_message_layout() {
        let err = GodslError::Parse(vec![
            error("expected next token to be IDENT, got LBRACE instead"),
            error("no prefix parse function for RBRACE found"),
        ]);
        assert_eq!(
            err.to_string(),
            "Parser errors:\n  expected next token to be IDENT, got LBRACE instead\n  no prefix parse function for RBRACE found\n"
        );
    }

    #[test]
    fn test_parse_errors_through_file_context() {
        let err = GodslError::Parse(vec![error("bad")]).in_file("src/a.godsl");
        assert_eq!(err.parse_errors().len(), 1);
        assert!(err.to_string().starts_with("src/a.godsl: Parser errors:"));
    }

    #[test]
    fn test_span_merge() {
        let span = SourceSpan::new(4, 8).merge(SourceSpan::new(2, 5));
        assert_eq!(span, SourceSpan::new(2, 8));
        assert_eq!(span.len(), 6);
        assert!(SourceSpan::new(3, 3).is_empty());
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 14, 40).to_string(), "3:14");
    }
}
