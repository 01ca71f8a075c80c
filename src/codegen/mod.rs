//! Code generation for godsl
//!
//! Lowers the parsed program to plain Go source.

mod go;

pub use go::GoGenerator;

use crate::parser::Program;

/// Trait for code generators
pub trait CodeGenerator {
    /// Generate code from the parsed program. Generation is total and never fails.
    fn generate(&mut self, program: &Program) -> String;

    /// Get the file extension for the target language
    fn file_extension(&self) -> &'static str;

    /// Get the name of the target language
    fn language_name(&self) -> &'static str;
}
