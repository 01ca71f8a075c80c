//! Lexer module for godsl
//!
//! Hand-written lexer that tokenizes source code into a stream of positioned tokens.

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Keyword, Token, TokenKind};
