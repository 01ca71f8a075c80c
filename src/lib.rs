//! godsl - Go with exceptions, transpiled to plain Go
//!
//! This crate compiles Go source extended with `try`, `catch`, `throw` and
//! `finally` into ordinary Go that reports failures through `error` results.
//! The pipeline is lexer, Pratt parser, then the Go code generator.

pub mod analysis;
pub mod codegen;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod project;

// Re-export commonly used types
pub use codegen::{CodeGenerator, GoGenerator};
pub use errors::{GodslError, GodslResult, ParseError, SourceSpan};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Parser, Program};

/// Transpile one source file to Go.
///
/// Nothing is generated when the parser reports any error; the returned
/// [`GodslError::Parse`] lists every problem found.
pub fn transpile_file(source: &str) -> GodslResult<String> {
    let program = Parser::new(source).parse()?;
    Ok(GoGenerator::new().generate(&program))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpile_file_success() {
        let output = transpile_file("package main\n\nfunc main() {\n\tprintln(1)\n}").unwrap();
        assert_eq!(output, "package main\n\nfunc main() {\n\tprintln(1)\n}\n");
    }

    #[test]
    fn test_transpile_file_reports_parser_errors() {
        let err = transpile_file("func f( { }").unwrap_err();
        assert!(matches!(err, GodslError::Parse(ref errors) if !errors.is_empty()));
        let message = err.to_string();
        assert!(message.starts_with("Parser errors:\n  "), "{}", message);
        assert!(message.ends_with('\n'));
    }
}
