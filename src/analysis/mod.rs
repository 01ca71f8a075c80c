//! Static analysis for godsl
//!
//! Syntactic queries the Go generator relies on: where errors are raised,
//! how a function's results change when it raises them, and which names a
//! block uses. No type checking is done.

mod error_flow;
mod references;
mod signature;

pub use error_flow::{ErrorUsage, needs_error_handling};
pub use references::{block_references, expr_references, stmt_references};
pub use signature::{Signature, split_results, zero_value};
