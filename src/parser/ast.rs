//! Abstract Syntax Tree (AST) definitions for godsl
//!
//! These types represent the structure of a source file after parsing.
//! `Display` renders a compact canonical form with every infix and prefix
//! expression parenthesized, which makes grouping visible in tests and in
//! `godsl parse` output.

use std::fmt;

use crate::errors::SourceSpan;
use crate::lexer::{Keyword, TokenKind};

/// A complete source file
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Top-level statements in source order
    pub statements: Vec<Stmt>,
}

/// An identifier with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: SourceSpan,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A block of statements
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: SourceSpan,
}

/// A statement
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: SourceSpan,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `package name`
    Package(Ident),
    /// `import "path"` or `import ( ... )`
    Import(ImportDecl),
    /// `var name Type = value`
    Var(VarDecl),
    /// `const name Type = value`
    Const(VarDecl),
    /// `type Name ...`
    Type(TypeDecl),
    /// Function or method declaration
    Function(Function),
    /// Assignment: `a = b`, `a, b = b, a`, `x += 1`
    Assign {
        targets: Vec<Expr>,
        op: AssignOp,
        values: Vec<Expr>,
    },
    /// Short variable definition: `name := value`
    Define { names: Vec<Ident>, values: Vec<Expr> },
    /// `return a, b`
    Return(Vec<Expr>),
    /// Expression statement
    Expr(Expr),
    /// Nested block
    Block(Block),
    If(IfStmt),
    For(ForStmt),
    /// `x++` / `x--`
    IncDec { target: Expr, op: IncDecOp },
    /// `break` / `continue` with an optional label
    Branch { keyword: Keyword, label: Option<Ident> },
    /// `defer call()`
    Defer(Expr),
    /// `go call()`
    Go(Expr),
    Comment(Comment),
    Try(TryStmt),
    /// `throw value`
    Throw(Expr),
}

impl StmtKind {
    /// Short lowercase name of the statement kind
    pub fn name(&self) -> &'static str {
        match self {
            StmtKind::Package(_) => "package",
            StmtKind::Import(_) => "import",
            StmtKind::Var(_) => "var",
            StmtKind::Const(_) => "const",
            StmtKind::Type(_) => "type",
            StmtKind::Function(_) => "function",
            StmtKind::Assign { .. } => "assignment",
            StmtKind::Define { .. } => "definition",
            StmtKind::Return(_) => "return",
            StmtKind::Expr(_) => "expression",
            StmtKind::Block(_) => "block",
            StmtKind::If(_) => "if",
            StmtKind::For(_) => "for",
            StmtKind::IncDec { .. } => "inc/dec",
            StmtKind::Branch { .. } => "branch",
            StmtKind::Defer(_) => "defer",
            StmtKind::Go(_) => "go",
            StmtKind::Comment(_) => "comment",
            StmtKind::Try(_) => "try",
            StmtKind::Throw(_) => "throw",
        }
    }
}

/// An import declaration
#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub specs: Vec<ImportSpec>,
    /// Written with parentheses
    pub grouped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub alias: Option<String>,
    /// Import path without quotes
    pub path: String,
}

/// A `var` or `const` declaration
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: Ident,
    pub ty: Option<String>,
    pub value: Option<Expr>,
}

/// A `type` declaration
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: Ident,
    pub spec: TypeSpec,
}

#[derive(Debug, Clone)]
pub enum TypeSpec {
    /// `type Name struct { ... }`
    Struct(Vec<Field>),
    /// `type Name Other`
    Named(String),
}

/// A struct field; embedded fields have no name
#[derive(Debug, Clone)]
pub struct Field {
    pub name: Option<Ident>,
    pub ty: String,
    /// Tag including its quotes or backticks
    pub tag: Option<String>,
}

/// A function declaration
#[derive(Debug, Clone)]
pub struct Function {
    pub receiver: Option<Param>,
    pub name: Ident,
    pub params: Vec<Param>,
    /// Declared result type, e.g. `int` or `(int, error)`
    pub return_type: Option<String>,
    pub body: Block,
}

/// A function parameter. In `a, b int` only `b` carries the type.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: Ident,
    pub ty: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    /// Simple statement before the condition: `if v, ok := m[k]; ok`
    pub init: Option<Box<Stmt>>,
    pub condition: Expr,
    pub consequence: Block,
    /// `else` block; `else if` is stored as a block holding a single `if`
    pub alternative: Option<Block>,
}

/// `for init; condition; update { body }` with every clause optional
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub update: Option<Box<Stmt>>,
    /// Written with `;`-separated clauses, even when some are empty
    pub clauses: bool,
    pub body: Block,
}

impl ForStmt {
    /// `for k, v := range xs`: only an init clause whose value is a range expression
    pub fn is_range_clause(&self) -> bool {
        if self.condition.is_some() || self.update.is_some() {
            return false;
        }
        let Some(init) = &self.init else {
            return false;
        };
        let values = match &init.kind {
            StmtKind::Define { values, .. } | StmtKind::Assign { values, .. } => values,
            _ => return false,
        };
        matches!(
            values.as_slice(),
            [Expr {
                kind: ExprKind::Prefix {
                    op: PrefixOp::Range,
                    ..
                },
                ..
            }]
        )
    }
}

#[derive(Debug, Clone)]
pub struct Comment {
    /// Text without the `//` or `/* */` markers
    pub text: String,
    pub multiline: bool,
    /// Trails code on the same line
    pub inline: bool,
}

/// `try { } catch (e T) { } finally { }`
#[derive(Debug, Clone)]
pub struct TryStmt {
    pub body: Block,
    pub catches: Vec<CatchBlock>,
    pub finally: Option<Block>,
}

#[derive(Debug, Clone)]
pub struct CatchBlock {
    pub exception: Option<Ident>,
    /// Absent for a catch-all
    pub type_name: Option<String>,
    pub body: Block,
}

impl CatchBlock {
    pub fn is_catch_all(&self) -> bool {
        self.type_name.is_none()
    }
}

/// An expression
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: SourceSpan,
}

impl Expr {
    pub fn new(kind: ExprKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    pub fn ident(ident: Ident) -> Self {
        let span = ident.span;
        Self::new(ExprKind::Ident(ident), span)
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Ident(Ident),
    /// Integer literal; `text` keeps the source spelling (e.g. octal `0755`)
    Integer { value: i64, text: String },
    /// Float literal; `text` keeps the source spelling
    Float { value: f64, text: String },
    /// Double-quoted string, escapes kept verbatim
    String(String),
    /// Backtick string
    RawString(String),
    /// Char literal, escapes kept verbatim
    Char(String),
    Bool(bool),
    Nil,
    Prefix {
        op: PrefixOp,
        operand: Box<Expr>,
    },
    Infix {
        left: Box<Expr>,
        op: InfixOp,
        right: Box<Expr>,
    },
    Call {
        function: Box<Expr>,
        args: Vec<Expr>,
    },
    /// Member access: `left.property`
    Dot {
        left: Box<Expr>,
        property: Ident,
    },
    /// `left[index]`
    Index {
        left: Box<Expr>,
        index: Box<Expr>,
    },
    /// `left.(Type)`
    TypeAssert {
        left: Box<Expr>,
        type_name: String,
    },
}

/// Binding power of expression positions, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    LogicalOr,
    LogicalAnd,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    /// Precedence of a token in infix position
    pub fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::LParen | TokenKind::Dot | TokenKind::LBracket => Precedence::Call,
            _ => InfixOp::from_token(kind)
                .map(InfixOp::precedence)
                .unwrap_or(Precedence::Lowest),
        }
    }
}

/// Infix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    BitClear,
    Shl,
    Shr,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,
}

impl InfixOp {
    pub fn from_token(kind: TokenKind) -> Option<InfixOp> {
        let op = match kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Star => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::Percent => InfixOp::Rem,
            TokenKind::Amp => InfixOp::BitAnd,
            TokenKind::Pipe => InfixOp::BitOr,
            TokenKind::Caret => InfixOp::BitXor,
            TokenKind::AmpCaret => InfixOp::BitClear,
            TokenKind::LtLt => InfixOp::Shl,
            TokenKind::GtGt => InfixOp::Shr,
            TokenKind::EqEq => InfixOp::Eq,
            TokenKind::BangEq => InfixOp::Ne,
            TokenKind::Lt => InfixOp::Lt,
            TokenKind::LtEq => InfixOp::Le,
            TokenKind::Gt => InfixOp::Gt,
            TokenKind::GtEq => InfixOp::Ge,
            TokenKind::AmpAmp => InfixOp::And,
            TokenKind::PipePipe => InfixOp::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn precedence(self) -> Precedence {
        match self {
            InfixOp::Or => Precedence::LogicalOr,
            InfixOp::And => Precedence::LogicalAnd,
            InfixOp::Eq | InfixOp::Ne => Precedence::Equals,
            InfixOp::Lt | InfixOp::Le | InfixOp::Gt | InfixOp::Ge => Precedence::LessGreater,
            InfixOp::Add | InfixOp::Sub | InfixOp::BitOr | InfixOp::BitXor => Precedence::Sum,
            InfixOp::Mul
            | InfixOp::Div
            | InfixOp::Rem
            | InfixOp::BitAnd
            | InfixOp::BitClear
            | InfixOp::Shl
            | InfixOp::Shr => Precedence::Product,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Rem => "%",
            InfixOp::BitAnd => "&",
            InfixOp::BitOr => "|",
            InfixOp::BitXor => "^",
            InfixOp::BitClear => "&^",
            InfixOp::Shl => "<<",
            InfixOp::Shr => ">>",
            InfixOp::Eq => "==",
            InfixOp::Ne => "!=",
            InfixOp::Lt => "<",
            InfixOp::Le => "<=",
            InfixOp::Gt => ">",
            InfixOp::Ge => ">=",
            InfixOp::And => "&&",
            InfixOp::Or => "||",
        }
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Not,    // !
    Neg,    // -
    BitNot, // ^
    Addr,   // &
    Deref,  // *
    Recv,   // <-
    Range,  // range
}

impl PrefixOp {
    pub fn from_token(kind: TokenKind) -> Option<PrefixOp> {
        let op = match kind {
            TokenKind::Bang => PrefixOp::Not,
            TokenKind::Minus => PrefixOp::Neg,
            TokenKind::Caret => PrefixOp::BitNot,
            TokenKind::Amp => PrefixOp::Addr,
            TokenKind::Star => PrefixOp::Deref,
            TokenKind::LArrow => PrefixOp::Recv,
            TokenKind::Keyword(Keyword::Range) => PrefixOp::Range,
            _ => return None,
        };
        Some(op)
    }

    /// Source spelling, including the separating space after `range`
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
            PrefixOp::BitNot => "^",
            PrefixOp::Addr => "&",
            PrefixOp::Deref => "*",
            PrefixOp::Recv => "<-",
            PrefixOp::Range => "range ",
        }
    }
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    BitClear,
    Shl,
    Shr,
}

impl AssignOp {
    pub fn from_token(kind: TokenKind) -> Option<AssignOp> {
        let op = match kind {
            TokenKind::Assign => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Rem,
            TokenKind::AmpEq => AssignOp::BitAnd,
            TokenKind::PipeEq => AssignOp::BitOr,
            TokenKind::CaretEq => AssignOp::BitXor,
            TokenKind::AmpCaretEq => AssignOp::BitClear,
            TokenKind::LtLtEq => AssignOp::Shl,
            TokenKind::GtGtEq => AssignOp::Shr,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::BitClear => "&^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Inc,
    Dec,
}

impl IncDecOp {
    pub fn as_str(self) -> &'static str {
        match self {
            IncDecOp::Inc => "++",
            IncDecOp::Dec => "--",
        }
    }
}

// ==================== Display ====================

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            writeln!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            write!(f, "{{}}")
        } else {
            write!(f, "{{ {} }}", join(&self.statements, "; "))
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ty {
            Some(ty) => write!(f, "{} {}", self.name, ty),
            None => write!(f, "{}", self.name),
        }
    }
}

impl fmt::Display for ImportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} \"{}\"", alias, self.path),
            None => write!(f, "\"{}\"", self.path),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{} ", name)?;
        }
        write!(f, "{}", self.ty)?;
        if let Some(tag) = &self.tag {
            write!(f, " {}", tag)?;
        }
        Ok(())
    }
}

impl fmt::Display for CatchBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "catch ")?;
        match (&self.exception, &self.type_name) {
            (Some(name), Some(ty)) => write!(f, "({} {}) ", name, ty)?,
            (Some(name), None) => write!(f, "({}) ", name)?,
            _ => {}
        }
        write!(f, "{}", self.body)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::Package(name) => write!(f, "package {}", name),
            StmtKind::Import(decl) => {
                if decl.grouped {
                    write!(f, "import ({})", join(&decl.specs, "; "))
                } else {
                    write!(f, "import {}", join(&decl.specs, "; "))
                }
            }
            StmtKind::Var(decl) | StmtKind::Const(decl) => {
                let keyword = if matches!(self.kind, StmtKind::Var(_)) {
                    "var"
                } else {
                    "const"
                };
                write!(f, "{} {}", keyword, decl.name)?;
                if let Some(ty) = &decl.ty {
                    write!(f, " {}", ty)?;
                }
                if let Some(value) = &decl.value {
                    write!(f, " = {}", value)?;
                }
                Ok(())
            }
            StmtKind::Type(decl) => match &decl.spec {
                TypeSpec::Struct(fields) => {
                    write!(f, "type {} struct {{ {} }}", decl.name, join(fields, "; "))
                }
                TypeSpec::Named(ty) => write!(f, "type {} {}", decl.name, ty),
            },
            StmtKind::Function(func) => {
                write!(f, "func ")?;
                if let Some(receiver) = &func.receiver {
                    write!(f, "({}) ", receiver)?;
                }
                write!(f, "{}({})", func.name, join(&func.params, ", "))?;
                if let Some(ty) = &func.return_type {
                    write!(f, " {}", ty)?;
                }
                write!(f, " {}", func.body)
            }
            StmtKind::Assign {
                targets,
                op,
                values,
            } => write!(
                f,
                "{} {} {}",
                join(targets, ", "),
                op.as_str(),
                join(values, ", ")
            ),
            StmtKind::Define { names, values } => {
                write!(f, "{} := {}", join(names, ", "), join(values, ", "))
            }
            StmtKind::Return(values) => {
                if values.is_empty() {
                    write!(f, "return")
                } else {
                    write!(f, "return {}", join(values, ", "))
                }
            }
            StmtKind::Expr(expr) => write!(f, "{}", expr),
            StmtKind::Block(block) => write!(f, "{}", block),
            StmtKind::If(stmt) => {
                write!(f, "if ")?;
                if let Some(init) = &stmt.init {
                    write!(f, "{}; ", init)?;
                }
                write!(f, "{} {}", stmt.condition, stmt.consequence)?;
                if let Some(alt) = &stmt.alternative {
                    write!(f, " else {}", alt)?;
                }
                Ok(())
            }
            StmtKind::For(stmt) => {
                write!(f, "for ")?;
                if let Some(init) = &stmt.init {
                    write!(f, "{}", init)?;
                }
                write!(f, "; ")?;
                if let Some(condition) = &stmt.condition {
                    write!(f, "{}", condition)?;
                }
                write!(f, "; ")?;
                if let Some(update) = &stmt.update {
                    write!(f, "{}", update)?;
                }
                write!(f, " {}", stmt.body)
            }
            StmtKind::IncDec { target, op } => write!(f, "{}{}", target, op.as_str()),
            StmtKind::Branch { keyword, label } => match label {
                Some(label) => write!(f, "{} {}", keyword, label),
                None => write!(f, "{}", keyword),
            },
            StmtKind::Defer(call) => write!(f, "defer {}", call),
            StmtKind::Go(call) => write!(f, "go {}", call),
            StmtKind::Comment(comment) => {
                if comment.multiline {
                    write!(f, "/* {} */", comment.text)
                } else {
                    write!(f, "//{}", comment.text)
                }
            }
            StmtKind::Try(stmt) => {
                write!(f, "try {}", stmt.body)?;
                for catch in &stmt.catches {
                    write!(f, " {}", catch)?;
                }
                if let Some(finally) = &stmt.finally {
                    write!(f, " finally {}", finally)?;
                }
                Ok(())
            }
            StmtKind::Throw(value) => write!(f, "throw {}", value),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Ident(ident) => write!(f, "{}", ident),
            ExprKind::Integer { text, .. } | ExprKind::Float { text, .. } => write!(f, "{}", text),
            ExprKind::String(value) => write!(f, "\"{}\"", value),
            ExprKind::RawString(value) => write!(f, "`{}`", value),
            ExprKind::Char(value) => write!(f, "'{}'", value),
            ExprKind::Bool(value) => write!(f, "{}", value),
            ExprKind::Nil => write!(f, "nil"),
            ExprKind::Prefix { op, operand } => write!(f, "({}{})", op.as_str(), operand),
            ExprKind::Infix { left, op, right } => {
                write!(f, "({} {} {})", left, op.as_str(), right)
            }
            ExprKind::Call { function, args } => write!(f, "{}({})", function, join(args, ", ")),
            ExprKind::Dot { left, property } => write!(f, "{}.{}", left, property),
            ExprKind::Index { left, index } => write!(f, "{}[{}]", left, index),
            ExprKind::TypeAssert { left, type_name } => write!(f, "{}.({})", left, type_name),
        }
    }
}
