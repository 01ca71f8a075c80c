//! Parser module for godsl
//!
//! Pratt parser that turns the token stream into an AST.

mod ast;
mod parser;

pub use ast::*;
pub use parser::Parser;
