//! Error-flow analysis
//!
//! Finds `try` and `throw` statements at any nesting depth. The generator
//! uses this to decide which functions get an error result and whether the
//! file needs the `errors` and `fmt` imports.

use crate::parser::{Block, Program, Stmt, StmtKind};

/// Whether a block raises or handles errors anywhere inside it
pub fn needs_error_handling(block: &Block) -> bool {
    ErrorUsage::of_block(block).any()
}

/// Which exception constructs a piece of code uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorUsage {
    pub has_try: bool,
    pub has_throw: bool,
}

impl ErrorUsage {
    /// Usage across a whole file, including every function body
    pub fn of_program(program: &Program) -> Self {
        let mut usage = Self::default();
        usage.visit_stmts(&program.statements);
        usage
    }

    pub fn of_block(block: &Block) -> Self {
        let mut usage = Self::default();
        usage.visit_stmts(&block.statements);
        usage
    }

    pub fn any(self) -> bool {
        self.has_try || self.has_throw
    }

    fn visit_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Try(try_stmt) => {
                self.has_try = true;
                self.visit_stmts(&try_stmt.body.statements);
                for catch in &try_stmt.catches {
                    self.visit_stmts(&catch.body.statements);
                }
                if let Some(finally) = &try_stmt.finally {
                    self.visit_stmts(&finally.statements);
                }
            }
            StmtKind::Throw(_) => self.has_throw = true,
            StmtKind::Function(func) => self.visit_stmts(&func.body.statements),
            StmtKind::Block(block) => self.visit_stmts(&block.statements),
            StmtKind::If(if_stmt) => {
                self.visit_stmts(&if_stmt.consequence.statements);
                if let Some(alternative) = &if_stmt.alternative {
                    self.visit_stmts(&alternative.statements);
                }
            }
            StmtKind::For(for_stmt) => self.visit_stmts(&for_stmt.body.statements),
            StmtKind::Package(_)
            | StmtKind::Import(_)
            | StmtKind::Var(_)
            | StmtKind::Const(_)
            | StmtKind::Type(_)
            | StmtKind::Assign { .. }
            | StmtKind::Define { .. }
            | StmtKind::Return(_)
            | StmtKind::Expr(_)
            | StmtKind::IncDec { .. }
            | StmtKind::Branch { .. }
            | StmtKind::Defer(_)
            | StmtKind::Go(_)
            | StmtKind::Comment(_) => {}
        }
    }
}
