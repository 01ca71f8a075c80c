//! Identifier reference queries
//!
//! Go rejects unused local variables, so the generator asks whether a
//! block mentions a name before it binds that name.

use crate::parser::{Block, Expr, ExprKind, Stmt, StmtKind};

/// Whether any expression in the block mentions `name`
pub fn block_references(block: &Block, name: &str) -> bool {
    block
        .statements
        .iter()
        .any(|stmt| stmt_references(stmt, name))
}

pub fn stmt_references(stmt: &Stmt, name: &str) -> bool {
    let any = |exprs: &[Expr]| exprs.iter().any(|e| expr_references(e, name));

    match &stmt.kind {
        StmtKind::Package(_)
        | StmtKind::Import(_)
        | StmtKind::Type(_)
        | StmtKind::Comment(_)
        | StmtKind::Branch { .. } => false,
        StmtKind::Var(decl) | StmtKind::Const(decl) => decl
            .value
            .as_ref()
            .is_some_and(|value| expr_references(value, name)),
        StmtKind::Function(func) => block_references(&func.body, name),
        StmtKind::Assign {
            targets, values, ..
        } => any(targets) || any(values),
        // Defined names are new bindings, only the values are uses
        StmtKind::Define { values, .. } => any(values),
        StmtKind::Return(values) => any(values),
        StmtKind::Expr(expr) | StmtKind::Defer(expr) | StmtKind::Go(expr) | StmtKind::Throw(expr) => {
            expr_references(expr, name)
        }
        StmtKind::IncDec { target, .. } => expr_references(target, name),
        StmtKind::Block(block) => block_references(block, name),
        StmtKind::If(if_stmt) => {
            if_stmt
                .init
                .as_deref()
                .is_some_and(|init| stmt_references(init, name))
                || expr_references(&if_stmt.condition, name)
                || block_references(&if_stmt.consequence, name)
                || if_stmt
                    .alternative
                    .as_ref()
                    .is_some_and(|alt| block_references(alt, name))
        }
        StmtKind::For(for_stmt) => {
            for_stmt
                .init
                .as_deref()
                .is_some_and(|init| stmt_references(init, name))
                || for_stmt
                    .condition
                    .as_ref()
                    .is_some_and(|cond| expr_references(cond, name))
                || for_stmt
                    .update
                    .as_deref()
                    .is_some_and(|update| stmt_references(update, name))
                || block_references(&for_stmt.body, name)
        }
        StmtKind::Try(try_stmt) => {
            block_references(&try_stmt.body, name)
                || try_stmt
                    .catches
                    .iter()
                    .any(|catch| block_references(&catch.body, name))
                || try_stmt
                    .finally
                    .as_ref()
                    .is_some_and(|block| block_references(block, name))
        }
    }
}

pub fn expr_references(expr: &Expr, name: &str) -> bool {
    match &expr.kind {
        ExprKind::Ident(ident) => ident.name == name,
        ExprKind::Integer { .. }
        | ExprKind::Float { .. }
        | ExprKind::String(_)
        | ExprKind::RawString(_)
        | ExprKind::Char(_)
        | ExprKind::Bool(_)
        | ExprKind::Nil => false,
        ExprKind::Prefix { operand, .. } => expr_references(operand, name),
        ExprKind::Infix { left, right, .. } => {
            expr_references(left, name) || expr_references(right, name)
        }
        ExprKind::Call { function, args } => {
            expr_references(function, name) || args.iter().any(|arg| expr_references(arg, name))
        }
        // The property is a field name, not a variable
        ExprKind::Dot { left, .. } | ExprKind::TypeAssert { left, .. } => {
            expr_references(left, name)
        }
        ExprKind::Index { left, index } => {
            expr_references(left, name) || expr_references(index, name)
        }
    }
}
