//! Pratt parser for godsl
//!
//! Pulls tokens from the lexer on demand with two tokens of lookahead
//! (`cur` and `peek`) and builds a [`Program`]. Syntax errors are recorded
//! and parsing continues, so a single pass reports every problem it can
//! find. A construct that fails to parse is dropped from the tree.
//!
//! Each `parse_*` method starts with `cur` on the first token of its
//! construct and leaves `cur` on the last one.

use super::ast::*;
use crate::errors::{GodslError, GodslResult, ParseError};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};

/// The parser for godsl source code
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    cur: Token,
    peek: Token,
    /// Line on which the previous token ended, 0 before the first token
    prev_line: usize,
    errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source code
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            cur,
            peek,
            prev_line: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the whole input; fails if any syntax error was recorded
    pub fn parse(self) -> GodslResult<Program> {
        let (program, errors) = self.into_parts();
        if errors.is_empty() {
            Ok(program)
        } else {
            Err(GodslError::Parse(errors))
        }
    }

    /// Parse the whole input and return the (possibly partial) tree with all diagnostics
    pub fn into_parts(mut self) -> (Program, Vec<ParseError>) {
        let program = self.parse_program();
        (program, self.errors)
    }

    /// Parse statements until EOF. Check [`Parser::errors`] before trusting the result.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }

        Program { statements }
    }

    /// Errors recorded so far
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    // ==================== Helpers ====================

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        let previous = std::mem::replace(&mut self.cur, std::mem::replace(&mut self.peek, next));
        self.prev_line = previous.end_line();
    }

    /// Comments inside parenthesized lists are dropped
    fn skip_peek_comments(&mut self) {
        while matches!(self.peek.kind, TokenKind::LineComment | TokenKind::BlockComment) {
            self.next_token();
        }
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    fn peek_is_keyword(&self, kw: Keyword) -> bool {
        self.peek.kind == TokenKind::Keyword(kw)
    }

    /// Advance if the next token has the expected kind, otherwise record an error
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    fn peek_error(&mut self, expected: TokenKind) {
        let message = format!(
            "expected next token to be {}, got {} instead",
            expected, self.peek.kind
        );
        self.errors
            .push(ParseError::new(message, self.peek.span, self.peek.position));
    }

    fn error_at_cur(&mut self, message: String) {
        self.errors
            .push(ParseError::new(message, self.cur.span, self.cur.position));
    }

    /// The next token starts on a later line than the current one ends
    fn peek_on_new_line(&self) -> bool {
        self.peek.position.line > self.cur.end_line()
    }

    fn skip_semicolon(&mut self) {
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    fn cur_ident(&self) -> Ident {
        Ident::new(self.cur.literal.clone(), self.cur.span)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.kind)
    }

    /// Tokens that can begin a type
    fn starts_type(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Ident
                | TokenKind::Star
                | TokenKind::LBracket
                | TokenKind::Ellipsis
                | TokenKind::LArrow
                | TokenKind::Keyword(
                    Keyword::Map
                        | Keyword::Chan
                        | Keyword::Interface
                        | Keyword::Struct
                        | Keyword::Func
                )
        )
    }

    // ==================== Statements ====================

    fn parse_statement(&mut self) -> Option<Stmt> {
        let start = self.cur.span;

        let kind = match self.cur.kind {
            TokenKind::Keyword(Keyword::Package) => self.parse_package()?,
            TokenKind::Keyword(Keyword::Import) => self.parse_import()?,
            TokenKind::Keyword(Keyword::Var) => StmtKind::Var(self.parse_var_decl(false)?),
            TokenKind::Keyword(Keyword::Const) => StmtKind::Const(self.parse_var_decl(true)?),
            TokenKind::Keyword(Keyword::Type) => self.parse_type_decl()?,
            TokenKind::Keyword(Keyword::Func) => self.parse_function()?,
            TokenKind::Keyword(Keyword::Return) => self.parse_return()?,
            TokenKind::Keyword(Keyword::If) => StmtKind::If(self.parse_if()?),
            TokenKind::Keyword(Keyword::For) => self.parse_for()?,
            TokenKind::Keyword(Keyword::Try) => self.parse_try()?,
            TokenKind::Keyword(Keyword::Throw) => self.parse_throw()?,
            TokenKind::Keyword(kw @ (Keyword::Break | Keyword::Continue)) => {
                self.parse_branch(kw)
            }
            TokenKind::Keyword(Keyword::Defer) => StmtKind::Defer(self.parse_call_statement()?),
            TokenKind::Keyword(Keyword::Go) => StmtKind::Go(self.parse_call_statement()?),
            TokenKind::LineComment | TokenKind::BlockComment => self.parse_comment(),
            TokenKind::LBrace => StmtKind::Block(self.parse_block()),
            TokenKind::Semicolon => return None,
            _ => {
                let kind = self.parse_simple_statement()?;
                self.skip_semicolon();
                kind
            }
        };

        Some(Stmt::new(kind, start.merge(self.cur.span)))
    }

    /// Statements allowed in `if` and `for` headers: definitions, assignments,
    /// increments and expressions. Does not consume a trailing semicolon.
    fn parse_simple_statement(&mut self) -> Option<StmtKind> {
        if self.cur_is(TokenKind::Ident) {
            if self.peek_is(TokenKind::ColonEq) || self.peek_is(TokenKind::Comma) {
                return self.parse_define_or_assign();
            }
            if self.peek_is(TokenKind::PlusPlus) || self.peek_is(TokenKind::MinusMinus) {
                let target = Expr::ident(self.cur_ident());
                return Some(self.parse_inc_dec(target));
            }
        }

        let expr = self.parse_expression(Precedence::Lowest)?;

        if let Some(op) = AssignOp::from_token(self.peek.kind) {
            self.next_token();
            self.next_token();
            let values = self.parse_expression_list()?;
            return Some(StmtKind::Assign {
                targets: vec![expr],
                op,
                values,
            });
        }

        if self.peek_is(TokenKind::PlusPlus) || self.peek_is(TokenKind::MinusMinus) {
            return Some(self.parse_inc_dec(expr));
        }

        Some(StmtKind::Expr(expr))
    }

    /// `a := 1`, `v, err := f()` or `a, b = b, a`
    fn parse_define_or_assign(&mut self) -> Option<StmtKind> {
        let mut names = vec![self.cur_ident()];
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            names.push(self.cur_ident());
        }

        if self.peek_is(TokenKind::ColonEq) {
            self.next_token();
            self.next_token();
            let values = self.parse_expression_list()?;
            return Some(StmtKind::Define { names, values });
        }

        if let Some(op) = AssignOp::from_token(self.peek.kind) {
            self.next_token();
            self.next_token();
            let values = self.parse_expression_list()?;
            let targets = names.into_iter().map(Expr::ident).collect();
            return Some(StmtKind::Assign {
                targets,
                op,
                values,
            });
        }

        self.peek_error(TokenKind::ColonEq);
        None
    }

    fn parse_inc_dec(&mut self, target: Expr) -> StmtKind {
        self.next_token();
        let op = if self.cur_is(TokenKind::PlusPlus) {
            IncDecOp::Inc
        } else {
            IncDecOp::Dec
        };
        StmtKind::IncDec { target, op }
    }

    fn parse_package(&mut self) -> Option<StmtKind> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur_ident();
        self.skip_semicolon();
        Some(StmtKind::Package(name))
    }

    fn parse_import(&mut self) -> Option<StmtKind> {
        if !self.peek_is(TokenKind::LParen) {
            let spec = self.parse_import_spec()?;
            self.skip_semicolon();
            return Some(StmtKind::Import(ImportDecl {
                specs: vec![spec],
                grouped: false,
            }));
        }

        self.next_token();
        let mut specs = Vec::new();
        loop {
            match self.peek.kind {
                TokenKind::RParen => {
                    self.next_token();
                    break;
                }
                TokenKind::Comma | TokenKind::Semicolon => self.next_token(),
                TokenKind::LineComment | TokenKind::BlockComment => self.next_token(),
                TokenKind::String | TokenKind::Ident | TokenKind::Dot => {
                    specs.push(self.parse_import_spec()?);
                }
                TokenKind::Eof => {
                    self.peek_error(TokenKind::RParen);
                    return None;
                }
                other => {
                    self.next_token();
                    self.error_at_cur(format!("unexpected {} in import list", other));
                    return None;
                }
            }
        }

        Some(StmtKind::Import(ImportDecl {
            specs,
            grouped: true,
        }))
    }

    /// `"path"`, `name "path"` or `. "path"`, starting before the spec
    fn parse_import_spec(&mut self) -> Option<ImportSpec> {
        let alias = if self.peek_is(TokenKind::Ident) || self.peek_is(TokenKind::Dot) {
            self.next_token();
            Some(self.cur.literal.clone())
        } else {
            None
        };
        if !self.expect_peek(TokenKind::String) {
            return None;
        }
        Some(ImportSpec {
            alias,
            path: self.cur.literal.clone(),
        })
    }

    /// `var x T = v`; constants require the initializer
    fn parse_var_decl(&mut self, require_value: bool) -> Option<VarDecl> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur_ident();

        let ty = if Self::starts_type(self.peek.kind) && !self.peek_on_new_line() {
            self.next_token();
            Some(self.parse_type()?)
        } else {
            None
        };

        let has_value = if require_value {
            if !self.expect_peek(TokenKind::Assign) {
                return None;
            }
            true
        } else if self.peek_is(TokenKind::Assign) {
            self.next_token();
            true
        } else {
            false
        };

        let value = if has_value {
            self.next_token();
            Some(self.parse_expression(Precedence::Lowest)?)
        } else {
            None
        };

        self.skip_semicolon();
        Some(VarDecl { name, ty, value })
    }

    fn parse_type_decl(&mut self) -> Option<StmtKind> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur_ident();

        if self.peek_is_keyword(Keyword::Struct) {
            self.next_token();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            let fields = self.parse_struct_fields()?;
            return Some(StmtKind::Type(TypeDecl {
                name,
                spec: TypeSpec::Struct(fields),
            }));
        }

        self.next_token();
        let ty = self.parse_type()?;
        self.skip_semicolon();
        Some(StmtKind::Type(TypeDecl {
            name,
            spec: TypeSpec::Named(ty),
        }))
    }

    /// Fields of a struct body, starting on `{` and ending on `}`
    fn parse_struct_fields(&mut self) -> Option<Vec<Field>> {
        let mut fields = Vec::new();
        self.next_token();

        while !self.cur_is(TokenKind::RBrace) {
            match self.cur.kind {
                TokenKind::Semicolon | TokenKind::LineComment | TokenKind::BlockComment => {}
                TokenKind::Ident | TokenKind::Star => {
                    let name = if self.cur_is(TokenKind::Ident)
                        && Self::starts_type(self.peek.kind)
                        && !self.peek_on_new_line()
                    {
                        let name = self.cur_ident();
                        self.next_token();
                        Some(name)
                    } else {
                        None
                    };
                    let ty = self.parse_type()?;
                    let tag = match self.peek.kind {
                        TokenKind::String | TokenKind::RawString if !self.peek_on_new_line() => {
                            self.next_token();
                            Some(if self.cur_is(TokenKind::RawString) {
                                format!("`{}`", self.cur.literal)
                            } else {
                                format!("\"{}\"", self.cur.literal)
                            })
                        }
                        _ => None,
                    };
                    fields.push(Field { name, ty, tag });
                }
                TokenKind::Eof => {
                    self.error_at_cur(format!(
                        "expected next token to be {}, got {} instead",
                        TokenKind::RBrace,
                        TokenKind::Eof
                    ));
                    return None;
                }
                other => {
                    self.error_at_cur(format!("unexpected {} in struct type", other));
                    return None;
                }
            }
            self.next_token();
        }

        Some(fields)
    }

    fn parse_function(&mut self) -> Option<StmtKind> {
        let receiver = if self.peek_is(TokenKind::LParen) {
            self.next_token();
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            let name = self.cur_ident();
            let ty = if Self::starts_type(self.peek.kind) {
                self.next_token();
                Some(self.parse_type()?)
            } else {
                None
            };
            if !self.expect_peek(TokenKind::RParen) {
                return None;
            }
            Some(Param { name, ty })
        } else {
            None
        };

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur_ident();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let params = self.parse_function_parameters()?;

        let return_type = if self.peek_is(TokenKind::LParen) {
            self.next_token();
            Some(format!("({})", self.parse_type_list()?.join(", ")))
        } else if Self::starts_type(self.peek.kind) {
            self.next_token();
            Some(self.parse_type()?)
        } else {
            None
        };

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block();

        Some(StmtKind::Function(Function {
            receiver,
            name,
            params,
            return_type,
            body,
        }))
    }

    /// Parameters after `(`, ending on `)`
    fn parse_function_parameters(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();

        self.skip_peek_comments();
        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(params);
        }

        loop {
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            let name = self.cur_ident();
            let ty = if Self::starts_type(self.peek.kind) {
                self.next_token();
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(Param { name, ty });

            self.skip_peek_comments();
            if !self.peek_is(TokenKind::Comma) {
                break;
            }
            self.next_token();
            self.skip_peek_comments();
            if self.peek_is(TokenKind::RParen) {
                break;
            }
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(params)
    }

    /// Statements up to the matching `}`; starts on `{`
    fn parse_block(&mut self) -> Block {
        let start = self.cur.span;
        let mut statements = Vec::new();
        self.next_token();

        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }

        Block {
            statements,
            span: start.merge(self.cur.span),
        }
    }

    fn parse_return(&mut self) -> Option<StmtKind> {
        let bare = matches!(
            self.peek.kind,
            TokenKind::Semicolon
                | TokenKind::RBrace
                | TokenKind::Eof
                | TokenKind::LineComment
                | TokenKind::BlockComment
        ) || self.peek_on_new_line();

        if bare {
            self.skip_semicolon();
            return Some(StmtKind::Return(Vec::new()));
        }

        self.next_token();
        let values = self.parse_expression_list()?;
        self.skip_semicolon();
        Some(StmtKind::Return(values))
    }

    fn parse_if(&mut self) -> Option<IfStmt> {
        self.next_token();

        let start = self.cur.span;
        let header = self.parse_simple_statement()?;
        let (init, condition) = if self.peek_is(TokenKind::Semicolon) {
            let init = Stmt::new(header, start.merge(self.cur.span));
            self.next_token();
            self.next_token();
            let condition = self.parse_expression(Precedence::Lowest)?;
            (Some(Box::new(init)), condition)
        } else if let StmtKind::Expr(condition) = header {
            (None, condition)
        } else {
            self.peek_error(TokenKind::Semicolon);
            return None;
        };

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block();

        let alternative = if self.peek_is_keyword(Keyword::Else) {
            self.next_token();
            if self.peek_is_keyword(Keyword::If) {
                self.next_token();
                let start = self.cur.span;
                let nested = self.parse_if()?;
                let span = start.merge(self.cur.span);
                Some(Block {
                    statements: vec![Stmt::new(StmtKind::If(nested), span)],
                    span,
                })
            } else {
                if !self.expect_peek(TokenKind::LBrace) {
                    return None;
                }
                Some(self.parse_block())
            }
        } else {
            None
        };

        Some(IfStmt {
            init,
            condition,
            consequence,
            alternative,
        })
    }

    fn parse_for(&mut self) -> Option<StmtKind> {
        // for { }
        if self.peek_is(TokenKind::LBrace) {
            self.next_token();
            let body = self.parse_block();
            return Some(StmtKind::For(ForStmt {
                init: None,
                condition: None,
                update: None,
                clauses: false,
                body,
            }));
        }

        self.next_token();

        let mut init = None;
        if !self.cur_is(TokenKind::Semicolon) {
            let start = self.cur.span;
            let clause = self.parse_simple_statement()?;
            let span = start.merge(self.cur.span);

            // for cond { } / for k, v := range xs { }
            if self.peek_is(TokenKind::LBrace) {
                self.next_token();
                let body = self.parse_block();
                let stmt = match clause {
                    StmtKind::Expr(condition) => ForStmt {
                        init: None,
                        condition: Some(condition),
                        update: None,
                        clauses: false,
                        body,
                    },
                    other => ForStmt {
                        init: Some(Box::new(Stmt::new(other, span))),
                        condition: None,
                        update: None,
                        clauses: false,
                        body,
                    },
                };
                return Some(StmtKind::For(stmt));
            }

            init = Some(Box::new(Stmt::new(clause, span)));
            if !self.expect_peek(TokenKind::Semicolon) {
                return None;
            }
        }

        // cur is the first `;`
        self.next_token();
        let mut condition = None;
        if !self.cur_is(TokenKind::Semicolon) {
            condition = Some(self.parse_expression(Precedence::Lowest)?);
            if !self.expect_peek(TokenKind::Semicolon) {
                return None;
            }
        }

        // cur is the second `;`
        self.next_token();
        let mut update = None;
        if !self.cur_is(TokenKind::LBrace) {
            let start = self.cur.span;
            let clause = self.parse_simple_statement()?;
            update = Some(Box::new(Stmt::new(clause, start.merge(self.cur.span))));
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
        }

        let body = self.parse_block();
        Some(StmtKind::For(ForStmt {
            init,
            condition,
            update,
            clauses: true,
            body,
        }))
    }

    fn parse_branch(&mut self, keyword: Keyword) -> StmtKind {
        let label = if self.peek_is(TokenKind::Ident) && !self.peek_on_new_line() {
            self.next_token();
            Some(self.cur_ident())
        } else {
            None
        };
        self.skip_semicolon();
        StmtKind::Branch { keyword, label }
    }

    /// Operand of `defer` and `go`
    fn parse_call_statement(&mut self) -> Option<Expr> {
        self.next_token();
        let call = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(call)
    }

    fn parse_comment(&mut self) -> StmtKind {
        let literal = self.cur.literal.as_str();
        let multiline = self.cur_is(TokenKind::BlockComment);

        let text = if multiline {
            let inner = literal.strip_prefix("/*").unwrap_or(literal);
            inner.strip_suffix("*/").unwrap_or(inner).trim().to_string()
        } else {
            literal.strip_prefix("//").unwrap_or(literal).to_string()
        };

        StmtKind::Comment(Comment {
            text,
            multiline,
            inline: self.prev_line == self.cur.position.line,
        })
    }

    fn parse_try(&mut self) -> Option<StmtKind> {
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block();

        let mut catches = Vec::new();
        while self.peek_is_keyword(Keyword::Catch) {
            self.next_token();
            if let Some(catch) = self.parse_catch_block() {
                catches.push(catch);
            }
        }

        let finally = if self.peek_is_keyword(Keyword::Finally) {
            self.next_token();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block())
        } else {
            None
        };

        Some(StmtKind::Try(TryStmt {
            body,
            catches,
            finally,
        }))
    }

    /// `catch { }`, `catch (e) { }` or `catch (e Type) { }`
    fn parse_catch_block(&mut self) -> Option<CatchBlock> {
        let mut exception = None;
        let mut type_name = None;

        if self.peek_is(TokenKind::LParen) {
            self.next_token();
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            exception = Some(self.cur_ident());
            if Self::starts_type(self.peek.kind) {
                self.next_token();
                type_name = Some(self.parse_type()?);
            }
            if !self.expect_peek(TokenKind::RParen) {
                return None;
            }
        }

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block();

        Some(CatchBlock {
            exception,
            type_name,
            body,
        })
    }

    fn parse_throw(&mut self) -> Option<StmtKind> {
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(StmtKind::Throw(value))
    }

    // ==================== Types ====================

    /// A type written as source text, starting on its first token
    fn parse_type(&mut self) -> Option<String> {
        match self.cur.kind {
            TokenKind::Ident => {
                let mut name = self.cur.literal.clone();
                if self.peek_is(TokenKind::Dot) {
                    self.next_token();
                    if !self.expect_peek(TokenKind::Ident) {
                        return None;
                    }
                    name.push('.');
                    name.push_str(&self.cur.literal);
                }
                Some(name)
            }
            TokenKind::Star => {
                self.next_token();
                Some(format!("*{}", self.parse_type()?))
            }
            TokenKind::Ellipsis => {
                self.next_token();
                Some(format!("...{}", self.parse_type()?))
            }
            TokenKind::LBracket => {
                let size = match self.peek.kind {
                    TokenKind::RBracket => String::new(),
                    TokenKind::Int | TokenKind::Ident | TokenKind::Ellipsis => {
                        self.next_token();
                        self.cur.literal.clone()
                    }
                    _ => {
                        self.peek_error(TokenKind::RBracket);
                        return None;
                    }
                };
                if !self.expect_peek(TokenKind::RBracket) {
                    return None;
                }
                self.next_token();
                Some(format!("[{}]{}", size, self.parse_type()?))
            }
            TokenKind::Keyword(Keyword::Map) => {
                if !self.expect_peek(TokenKind::LBracket) {
                    return None;
                }
                self.next_token();
                let key = self.parse_type()?;
                if !self.expect_peek(TokenKind::RBracket) {
                    return None;
                }
                self.next_token();
                let value = self.parse_type()?;
                Some(format!("map[{}]{}", key, value))
            }
            TokenKind::Keyword(Keyword::Chan) => {
                if self.peek_is(TokenKind::LArrow) {
                    self.next_token();
                    self.next_token();
                    return Some(format!("chan<- {}", self.parse_type()?));
                }
                self.next_token();
                Some(format!("chan {}", self.parse_type()?))
            }
            TokenKind::LArrow => {
                if !self.expect_peek(TokenKind::Keyword(Keyword::Chan)) {
                    return None;
                }
                self.next_token();
                Some(format!("<-chan {}", self.parse_type()?))
            }
            TokenKind::Keyword(kw @ (Keyword::Interface | Keyword::Struct)) => {
                if !self.expect_peek(TokenKind::LBrace) || !self.expect_peek(TokenKind::RBrace) {
                    return None;
                }
                Some(format!("{}{{}}", kw))
            }
            TokenKind::Keyword(Keyword::Func) => {
                if !self.expect_peek(TokenKind::LParen) {
                    return None;
                }
                let mut signature = format!("func({})", self.parse_type_list()?.join(", "));
                if self.peek_is(TokenKind::LParen) {
                    self.next_token();
                    signature.push_str(&format!(" ({})", self.parse_type_list()?.join(", ")));
                } else if Self::starts_type(self.peek.kind) && !self.peek_on_new_line() {
                    self.next_token();
                    signature.push(' ');
                    signature.push_str(&self.parse_type()?);
                }
                Some(signature)
            }
            other => {
                self.error_at_cur(format!("expected type, got {} instead", other));
                None
            }
        }
    }

    /// Comma-separated types after `(`, ending on `)`
    fn parse_type_list(&mut self) -> Option<Vec<String>> {
        let mut types = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(types);
        }

        loop {
            self.next_token();
            types.push(self.parse_type()?);
            if !self.peek_is(TokenKind::Comma) {
                break;
            }
            self.next_token();
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(types)
    }

    // ==================== Expressions ====================

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon)
            && precedence < self.peek_precedence()
            && !self.peek_on_new_line()
        {
            self.next_token();
            left = match self.cur.kind {
                TokenKind::LParen => self.parse_call(left)?,
                TokenKind::Dot => self.parse_dot(left)?,
                TokenKind::LBracket => self.parse_index(left)?,
                _ => self.parse_infix(left)?,
            };
        }

        Some(left)
    }

    /// One or more comma-separated expressions
    fn parse_expression_list(&mut self) -> Option<Vec<Expr>> {
        let mut list = vec![self.parse_expression(Precedence::Lowest)?];
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        Some(list)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        let span = self.cur.span;

        let kind = match self.cur.kind {
            TokenKind::Ident => ExprKind::Ident(self.cur_ident()),
            TokenKind::Int => return self.parse_integer_literal(),
            TokenKind::Float => return self.parse_float_literal(),
            TokenKind::String => ExprKind::String(self.cur.literal.clone()),
            TokenKind::RawString => ExprKind::RawString(self.cur.literal.clone()),
            TokenKind::Char => ExprKind::Char(self.cur.literal.clone()),
            TokenKind::Keyword(Keyword::True) => ExprKind::Bool(true),
            TokenKind::Keyword(Keyword::False) => ExprKind::Bool(false),
            TokenKind::Keyword(Keyword::Nil) => ExprKind::Nil,
            TokenKind::LParen => return self.parse_grouped(),
            kind => match PrefixOp::from_token(kind) {
                Some(op) => return self.parse_prefix_operator(op),
                None => {
                    self.error_at_cur(format!("no prefix parse function for {} found", kind));
                    return None;
                }
            },
        };

        Some(Expr::new(kind, span))
    }

    /// Integer literal; a leading `0` means octal
    fn parse_integer_literal(&mut self) -> Option<Expr> {
        let text = self.cur.literal.clone();
        let digits = text.replace('_', "");
        let parsed = match digits.get(..2) {
            Some("0x" | "0X") => i64::from_str_radix(&digits[2..], 16),
            Some("0b" | "0B") => i64::from_str_radix(&digits[2..], 2),
            Some("0o" | "0O") => i64::from_str_radix(&digits[2..], 8),
            _ if digits.len() > 1 && digits.starts_with('0') => {
                i64::from_str_radix(&digits[1..], 8)
            }
            _ => digits.parse::<i64>(),
        };

        match parsed {
            Ok(value) => Some(Expr::new(ExprKind::Integer { value, text }, self.cur.span)),
            Err(_) => {
                self.error_at_cur(format!("could not parse {:?} as integer", text));
                None
            }
        }
    }

    fn parse_float_literal(&mut self) -> Option<Expr> {
        let text = self.cur.literal.clone();
        match text.replace('_', "").parse::<f64>() {
            Ok(value) => Some(Expr::new(ExprKind::Float { value, text }, self.cur.span)),
            Err(_) => {
                self.error_at_cur(format!("could not parse {:?} as float", text));
                None
            }
        }
    }

    fn parse_grouped(&mut self) -> Option<Expr> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_prefix_operator(&mut self, op: PrefixOp) -> Option<Expr> {
        let start = self.cur.span;
        self.next_token();
        let operand = self.parse_expression(Precedence::Prefix)?;
        let span = start.merge(operand.span);
        Some(Expr::new(
            ExprKind::Prefix {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        let Some(op) = InfixOp::from_token(self.cur.kind) else {
            return Some(left);
        };
        self.next_token();
        let right = self.parse_expression(op.precedence())?;
        let span = left.span.merge(right.span);
        Some(Expr::new(
            ExprKind::Infix {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        ))
    }

    fn parse_call(&mut self, function: Expr) -> Option<Expr> {
        let args = self.parse_call_arguments()?;
        let span = function.span.merge(self.cur.span);
        Some(Expr::new(
            ExprKind::Call {
                function: Box::new(function),
                args,
            },
            span,
        ))
    }

    /// Arguments after `(`, ending on `)`; a trailing comma is allowed
    fn parse_call_arguments(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();

        self.skip_peek_comments();
        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(args);
        }

        loop {
            self.next_token();
            args.push(self.parse_expression(Precedence::Lowest)?);

            self.skip_peek_comments();
            if !self.peek_is(TokenKind::Comma) {
                break;
            }
            self.next_token();
            self.skip_peek_comments();
            if self.peek_is(TokenKind::RParen) {
                break;
            }
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(args)
    }

    /// `left.name` or the type assertion `left.(T)`
    fn parse_dot(&mut self, left: Expr) -> Option<Expr> {
        if self.peek_is(TokenKind::LParen) {
            self.next_token();
            self.next_token();
            let type_name = self.parse_type()?;
            if !self.expect_peek(TokenKind::RParen) {
                return None;
            }
            let span = left.span.merge(self.cur.span);
            return Some(Expr::new(
                ExprKind::TypeAssert {
                    left: Box::new(left),
                    type_name,
                },
                span,
            ));
        }

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let property = self.cur_ident();
        let span = left.span.merge(property.span);
        Some(Expr::new(
            ExprKind::Dot {
                left: Box::new(left),
                property,
            },
            span,
        ))
    }

    fn parse_index(&mut self, left: Expr) -> Option<Expr> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        let span = left.span.merge(self.cur.span);
        Some(Expr::new(
            ExprKind::Index {
                left: Box::new(left),
                index: Box::new(index),
            },
            span,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source).parse().unwrap()
    }

    fn errors(source: &str) -> Vec<String> {
        let (_, errors) = Parser::new(source).into_parts();
        errors.into_iter().map(|e| e.message).collect()
    }

    fn single(source: &str) -> StmtKind {
        let mut program = parse(source);
        assert_eq!(program.statements.len(), 1, "{}", program);
        program.statements.remove(0).kind
    }

    #[test]
    fn test_parse_package_and_imports() {
        let program = parse("package main\nimport \"fmt\"\nimport (\n\t\"os\"\n\tstr \"strings\"\n)");
        assert_eq!(program.statements.len(), 3);
        assert!(matches!(&program.statements[0].kind, StmtKind::Package(name) if name.name == "main"));

        let StmtKind::Import(decl) = &program.statements[2].kind else {
            panic!("expected import");
        };
        assert!(decl.grouped);
        assert_eq!(
            decl.specs,
            vec![
                ImportSpec {
                    alias: None,
                    path: "os".to_string()
                },
                ImportSpec {
                    alias: Some("str".to_string()),
                    path: "strings".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_operator_precedence() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("a + b * c", "(a + (b * c))"),
            ("a + b - c", "((a + b) - c)"),
            ("(a + b) * c", "((a + b) * c)"),
            ("a < b == c > d", "((a < b) == (c > d))"),
            ("a || b && c", "(a || (b && c))"),
            ("!f(x)", "(!f(x))"),
            ("-a.b", "(-a.b)"),
            ("a.b(c).d", "a.b(c).d"),
            ("x[i] + 1", "(x[i] + 1)"),
            ("a * b % c", "((a * b) % c)"),
            ("1 << n | mask", "((1 << n) | mask)"),
        ];

        for (source, expected) in cases {
            let kind = single(source);
            let StmtKind::Expr(expr) = kind else {
                panic!("expected expression statement for {}", source);
            };
            assert_eq!(expr.to_string(), expected, "source: {}", source);
        }
    }

    #[test]
    fn test_define_and_inc_dec() {
        let program = parse("x := 5\nx++\ny--");
        assert!(matches!(
            &program.statements[0].kind,
            StmtKind::Define { names, values } if names[0].name == "x" && values.len() == 1
        ));
        assert!(matches!(
            &program.statements[1].kind,
            StmtKind::IncDec { op: IncDecOp::Inc, .. }
        ));
        assert!(matches!(
            &program.statements[2].kind,
            StmtKind::IncDec { op: IncDecOp::Dec, .. }
        ));
    }

    #[test]
    fn test_multi_define_and_assign() {
        let program = parse("v, err := f()\na, b = b, a\nx += 2\ns.count = 1");
        assert_eq!(program.statements.len(), 4);
        assert_eq!(program.statements[0].to_string(), "v, err := f()");
        assert_eq!(program.statements[1].to_string(), "a, b = b, a");
        assert_eq!(program.statements[2].to_string(), "x += 2");
        assert_eq!(program.statements[3].to_string(), "s.count = 1");
    }

    #[test]
    fn test_var_and_const() {
        let program = parse("var x int = 5\nvar y = 2\nvar z []string\nconst Pi float64 = 3.14");
        let rendered: Vec<_> = program.statements.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "var x int = 5",
                "var y = 2",
                "var z []string",
                "const Pi float64 = 3.14"
            ]
        );
    }

    #[test]
    fn test_const_requires_value() {
        assert_eq!(
            errors("const x int"),
            vec!["expected next token to be ASSIGN, got EOF instead"]
        );
    }

    #[test]
    fn test_function_signature() {
        let StmtKind::Function(func) = single("func add(a, b int) (int, error) { return a + b, nil }")
        else {
            panic!("expected function");
        };
        assert_eq!(func.name.name, "add");
        assert_eq!(func.params.len(), 2);
        assert!(func.params[0].ty.is_none());
        assert_eq!(func.params[1].ty.as_deref(), Some("int"));
        assert_eq!(func.return_type.as_deref(), Some("(int, error)"));
        assert_eq!(func.body.statements.len(), 1);
    }

    #[test]
    fn test_method_receiver() {
        let StmtKind::Function(func) = single("func (s *Server) Start() error { return nil }") else {
            panic!("expected function");
        };
        let receiver = func.receiver.expect("receiver");
        assert_eq!(receiver.name.name, "s");
        assert_eq!(receiver.ty.as_deref(), Some("*Server"));
        assert_eq!(func.return_type.as_deref(), Some("error"));
    }

    #[test]
    fn test_comments_in_parameter_and_argument_lists() {
        let StmtKind::Function(func) = single(
            "func open(\n\t// where to read\n\tpath string, // relative\n\tmode int /* flags */,\n) {\n}",
        ) else {
            panic!("expected function");
        };
        let names: Vec<_> = func.params.iter().map(|p| p.name.name.as_str()).collect();
        assert_eq!(names, vec!["path", "mode"]);
        assert_eq!(func.params[1].ty.as_deref(), Some("int"));

        let StmtKind::Expr(call) = single("run(\n\ta, // first\n\tb, /* second */\n\t// trailing\n)") else {
            panic!("expected call");
        };
        assert_eq!(call.to_string(), "run(a, b)");
    }

    #[test]
    fn test_type_strings() {
        let program = parse(
            "var m map[string][]*pkg.T\nvar c <-chan int\nvar f func(int, string) error\nvar i interface{}\nvar a [4]byte",
        );
        let types: Vec<_> = program
            .statements
            .iter()
            .map(|s| match &s.kind {
                StmtKind::Var(decl) => decl.ty.clone().unwrap_or_default(),
                other => panic!("expected var, got {:?}", other),
            })
            .collect();
        assert_eq!(
            types,
            vec![
                "map[string][]*pkg.T",
                "<-chan int",
                "func(int, string) error",
                "interface{}",
                "[4]byte"
            ]
        );
    }

    #[test]
    fn test_struct_type_decl() {
        let StmtKind::Type(decl) =
            single("type MyError struct {\n\tCode int\n\tMsg string `json:\"msg\"`\n\tBase\n}")
        else {
            panic!("expected type declaration");
        };
        assert_eq!(decl.name.name, "MyError");
        let TypeSpec::Struct(fields) = decl.spec else {
            panic!("expected struct");
        };
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[1].tag.as_deref(), Some("`json:\"msg\"`"));
        assert!(fields[2].name.is_none());
        assert_eq!(fields[2].ty, "Base");
    }

    #[test]
    fn test_if_else_chain() {
        let StmtKind::If(stmt) = single("if x > 1 { a() } else if x < 0 { b() } else { c() }") else {
            panic!("expected if");
        };
        assert_eq!(stmt.condition.to_string(), "(x > 1)");
        let alternative = stmt.alternative.expect("else branch");
        assert_eq!(alternative.statements.len(), 1);
        let StmtKind::If(nested) = &alternative.statements[0].kind else {
            panic!("expected nested if");
        };
        assert!(nested.alternative.is_some());
    }

    #[test]
    fn test_if_with_init() {
        let StmtKind::If(stmt) = single("if v, ok := m[k]; ok { use(v) }") else {
            panic!("expected if");
        };
        assert_eq!(stmt.init.expect("init").to_string(), "v, ok := m[k]");
        assert_eq!(stmt.condition.to_string(), "ok");
    }

    #[test]
    fn test_for_forms() {
        let StmtKind::For(three) = single("for i := 0; i < 10; i++ { sum += i }") else {
            panic!("expected for");
        };
        assert!(three.init.is_some() && three.condition.is_some() && three.update.is_some());

        let StmtKind::For(infinite) = single("for { break }") else {
            panic!("expected for");
        };
        assert!(infinite.init.is_none() && infinite.condition.is_none() && infinite.update.is_none());

        let StmtKind::For(while_like) = single("for n > 0 { n-- }") else {
            panic!("expected for");
        };
        assert_eq!(while_like.condition.map(|c| c.to_string()), Some("(n > 0)".to_string()));

        let StmtKind::For(ranged) = single("for i, v := range items { total += v }") else {
            panic!("expected for");
        };
        assert!(ranged.is_range_clause());

        let StmtKind::For(sparse) = single("for ; i < 3; { i++ }") else {
            panic!("expected for");
        };
        assert!(sparse.init.is_none() && sparse.update.is_none());
        assert!(sparse.condition.is_some());
        assert!(sparse.clauses);
        assert!(three.clauses);
        assert!(!infinite.clauses);
    }

    #[test]
    fn test_try_catch_finally() {
        let source = r#"
            try {
                risky()
            } catch (e NotFound) {
                log(e)
            } catch (e) {
                panic(e)
            } finally {
                cleanup()
            }
        "#;
        let StmtKind::Try(stmt) = single(source) else {
            panic!("expected try");
        };
        assert_eq!(stmt.body.statements.len(), 1);
        assert_eq!(stmt.catches.len(), 2);
        assert_eq!(stmt.catches[0].type_name.as_deref(), Some("NotFound"));
        assert!(stmt.catches[1].is_catch_all());
        assert_eq!(stmt.catches[1].exception.as_ref().map(|e| e.name.as_str()), Some("e"));
        assert_eq!(stmt.finally.map(|b| b.statements.len()), Some(1));
    }

    #[test]
    fn test_catch_all_before_typed_is_accepted() {
        let StmtKind::Try(stmt) = single("try { } catch (e) { } catch (e MyError) { }") else {
            panic!("expected try");
        };
        assert!(stmt.catches[0].is_catch_all());
        assert!(!stmt.catches[1].is_catch_all());
    }

    #[test]
    fn test_catch_without_binding() {
        let StmtKind::Try(stmt) = single("try { f() } catch { g() }") else {
            panic!("expected try");
        };
        assert!(stmt.catches[0].exception.is_none());
        assert!(stmt.catches[0].is_catch_all());
        assert!(stmt.finally.is_none());
    }

    #[test]
    fn test_catch_pointer_type() {
        let StmtKind::Try(stmt) = single("try { } catch (e *os.PathError) { }") else {
            panic!("expected try");
        };
        assert_eq!(stmt.catches[0].type_name.as_deref(), Some("*os.PathError"));
    }

    #[test]
    fn test_throw() {
        let StmtKind::Throw(value) = single("throw \"boom\"") else {
            panic!("expected throw");
        };
        assert!(matches!(value.kind, ExprKind::String(ref s) if s == "boom"));
    }

    #[test]
    fn test_comments() {
        let program = parse("// hello\nx := 1 // trailing\n/* block\n text */");
        let comments: Vec<_> = program
            .statements
            .iter()
            .filter_map(|s| match &s.kind {
                StmtKind::Comment(c) => Some(c.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].text, " hello");
        assert!(!comments[0].inline);
        assert!(comments[1].inline);
        assert!(comments[2].multiline);
        assert_eq!(comments[2].text, "block\n text");
    }

    #[test]
    fn test_return_forms() {
        let StmtKind::Function(func) = single("func f() {\n\tif done {\n\t\treturn\n\t}\n\treturn a, b\n}")
        else {
            panic!("expected function");
        };
        let StmtKind::If(stmt) = &func.body.statements[0].kind else {
            panic!("expected if");
        };
        assert!(matches!(&stmt.consequence.statements[0].kind, StmtKind::Return(v) if v.is_empty()));
        assert!(matches!(&func.body.statements[1].kind, StmtKind::Return(v) if v.len() == 2));
    }

    #[test]
    fn test_newline_ends_expression() {
        let program = parse("x := a\n-b");
        assert_eq!(program.statements.len(), 2);
        assert_eq!(program.statements[1].to_string(), "(-b)");
    }

    #[test]
    fn test_type_assertion_and_index() {
        let program = parse("v := err.(*MyErr)\nw := m[\"k\"]");
        assert_eq!(program.statements[0].to_string(), "v := err.(*MyErr)");
        assert_eq!(program.statements[1].to_string(), "w := m[\"k\"]");
    }

    #[test]
    fn test_defer_go_branch() {
        let program = parse("defer f.Close()\ngo run(ch)\nbreak\ncontinue outer");
        let rendered: Vec<_> = program.statements.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["defer f.Close()", "go run(ch)", "break", "continue outer"]);
    }

    #[test]
    fn test_literals() {
        let program = parse("a := 0755\nb := 2.50\nc := `raw`\nd := 'x'\ne := nil\nf := true");
        let StmtKind::Define { values, .. } = &program.statements[0].kind else {
            panic!("expected define");
        };
        assert!(matches!(values[0].kind, ExprKind::Integer { value: 493, .. }));
        let rendered: Vec<_> = program.statements.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["a := 0755", "b := 2.50", "c := `raw`", "d := 'x'", "e := nil", "f := true"]
        );
    }

    #[test]
    fn test_malformed_parameter_list() {
        let errors = errors("func f( { }");
        assert!(!errors.is_empty());
        assert_eq!(errors[0], "expected next token to be IDENT, got LBRACE instead");
    }

    #[test]
    fn test_no_prefix_parse_function() {
        assert_eq!(errors("x := )"), vec!["no prefix parse function for RPAREN found"]);
        assert_eq!(errors("catch"), vec!["no prefix parse function for CATCH found"]);
    }

    #[test]
    fn test_literal_errors() {
        assert_eq!(
            errors("x := 99999999999999999999"),
            vec!["could not parse \"99999999999999999999\" as integer"]
        );
        assert_eq!(errors("x := 1e"), vec!["could not parse \"1e\" as float"]);
        assert_eq!(errors("x := 08"), vec!["could not parse \"08\" as integer"]);
    }

    #[test]
    fn test_errors_accumulate() {
        let errors = errors("x := )\ny := ]\nz := 1");
        assert_eq!(errors.len(), 2);
        assert!(errors[1].contains("RBRACKET"));
    }

    #[test]
    fn test_partial_tree_keeps_valid_statements() {
        let (program, errors) = Parser::new("x := )\ny := 2").into_parts();
        assert_eq!(errors.len(), 1);
        assert_eq!(program.statements.len(), 1);
        assert_eq!(program.statements[0].to_string(), "y := 2");
    }

    #[test]
    fn test_parse_reports_failure() {
        let result = Parser::new("func (").parse();
        assert!(matches!(result, Err(GodslError::Parse(ref errors)) if !errors.is_empty()));
    }

    #[test]
    fn test_error_positions() {
        let (_, errors) = Parser::new("x := 1\ny := )").into_parts();
        assert_eq!(errors[0].position.line, 2);
        assert_eq!(errors[0].position.column, 6);
    }
}
