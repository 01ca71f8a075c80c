//! Go code generator
//!
//! Emits Go from the AST. Ordinary Go constructs are translated one to one;
//! `try`, `catch`, `throw` and `finally` are lowered to closures returning
//! `error` and type assertions on the captured error. Functions that raise
//! or handle errors get an `error` result appended to their signature.

use super::CodeGenerator;
use crate::analysis::{ErrorUsage, Signature, block_references, needs_error_handling};
use crate::parser::{
    Block, CatchBlock, Comment, Expr, ExprKind, Function, IfStmt, ImportDecl, Precedence, Program,
    Stmt, StmtKind, TryStmt, TypeDecl, TypeSpec, VarDecl,
};

/// Imports the lowered `throw` depends on
const ERROR_IMPORTS: [&str; 2] = ["errors", "fmt"];

/// What a `return` or `throw` exits from
#[derive(Debug, Clone)]
enum ReturnContext {
    /// A declared function whose results may have been augmented
    Function(Signature),
    /// The closure wrapping a `try` body, which returns `error`
    Closure,
}

/// Go code generator
pub struct GoGenerator {
    /// Current indentation level
    indent: usize,
    /// Output buffer
    output: String,
    /// One entry per open Go scope: whether `err` is declared in it
    scopes: Vec<bool>,
    /// Innermost function or closure last
    returns: Vec<ReturnContext>,
}

impl GoGenerator {
    pub fn new() -> Self {
        Self {
            indent: 0,
            output: String::new(),
            scopes: vec![false],
            returns: Vec::new(),
        }
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push('\t');
        }
    }

    fn indent(&mut self) {
        self.indent += 1;
    }

    fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    fn push_scope(&mut self, declares_err: bool) {
        self.scopes.push(declares_err);
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn err_declared(&self) -> bool {
        self.scopes.last().copied().unwrap_or(false)
    }

    fn declare_err(&mut self) {
        if let Some(scope) = self.scopes.last_mut() {
            *scope = true;
        }
    }

    /// Statements of a block in a fresh scope, one level deeper
    fn generate_body(&mut self, block: &Block) {
        self.indent();
        self.push_scope(false);
        self.generate_block(block);
        self.pop_scope();
        self.dedent();
    }

    fn generate_block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.generate_stmt(stmt);
        }
    }

    // ==================== Top level ====================

    fn generate_program(&mut self, program: &Program) {
        // Only a lowered `throw` references `errors` and `fmt`; Go rejects unused imports
        let usage = ErrorUsage::of_program(program);
        let mut pending = if usage.has_throw {
            missing_imports(program)
        } else {
            Vec::new()
        };

        let has_package = program
            .statements
            .iter()
            .any(|stmt| matches!(stmt.kind, StmtKind::Package(_)));
        if !has_package {
            self.generate_injected_imports(&pending);
            pending.clear();
        }

        let mut prev: Option<&StmtKind> = None;
        for stmt in &program.statements {
            if self.needs_separator(prev, &stmt.kind) {
                self.output.push('\n');
            }
            self.generate_stmt(stmt);

            if matches!(stmt.kind, StmtKind::Package(_)) && !pending.is_empty() {
                self.output.push('\n');
                self.generate_injected_imports(&pending);
                pending.clear();
            }
            prev = Some(&stmt.kind);
        }
    }

    /// Blank line between top-level declarations; doc comments stay attached
    fn needs_separator(&self, prev: Option<&StmtKind>, next: &StmtKind) -> bool {
        if self.output.is_empty() {
            return false;
        }
        if let StmtKind::Comment(comment) = next
            && comment.inline
        {
            return false;
        }
        match prev {
            None => true,
            Some(StmtKind::Comment(comment)) if !comment.inline => false,
            Some(prev) => is_declaration(prev) || is_declaration(next),
        }
    }

    fn generate_injected_imports(&mut self, paths: &[&str]) {
        match paths {
            [] => {}
            [path] => self.writeln(&format!("import \"{}\"", path)),
            paths => {
                self.writeln("import (");
                self.indent();
                for path in paths {
                    self.writeln(&format!("\"{}\"", path));
                }
                self.dedent();
                self.writeln(")");
            }
        }
    }

    fn generate_import(&mut self, decl: &ImportDecl) {
        if !decl.grouped {
            for spec in &decl.specs {
                self.writeln(&format!("import {}", spec));
            }
            return;
        }

        self.writeln("import (");
        self.indent();
        for spec in &decl.specs {
            self.writeln(&spec.to_string());
        }
        self.dedent();
        self.writeln(")");
    }

    fn generate_type(&mut self, decl: &TypeDecl) {
        match &decl.spec {
            TypeSpec::Named(ty) => self.writeln(&format!("type {} {}", decl.name, ty)),
            TypeSpec::Struct(fields) if fields.is_empty() => {
                self.writeln(&format!("type {} struct{{}}", decl.name));
            }
            TypeSpec::Struct(fields) => {
                self.writeln(&format!("type {} struct {{", decl.name));
                self.indent();
                for field in fields {
                    self.writeln(&field.to_string());
                }
                self.dedent();
                self.writeln("}");
            }
        }
    }

    fn generate_function(&mut self, func: &Function) {
        let signature = Signature::resolve(
            func.return_type.as_deref(),
            needs_error_handling(&func.body),
        );

        self.write_indent();
        self.write("func ");
        if let Some(receiver) = &func.receiver {
            self.write(&format!("({}) ", receiver));
        }
        let params: Vec<String> = func.params.iter().map(ToString::to_string).collect();
        self.write(&format!("{}({})", func.name, params.join(", ")));
        if let Some(ty) = &signature.return_type {
            self.write(&format!(" {}", ty));
        }
        self.write(" {\n");

        let err_param = func.params.iter().any(|param| param.name.name == "err");
        self.indent();
        self.push_scope(err_param);
        self.returns
            .push(ReturnContext::Function(signature.clone()));

        self.generate_block(&func.body);
        if signature.synthesized && !ends_in_exit(&func.body) {
            self.writeln("return nil");
        }

        self.returns.pop();
        self.pop_scope();
        self.dedent();
        self.writeln("}");
    }

    // ==================== Statements ====================

    fn generate_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Package(name) => self.writeln(&format!("package {}", name)),
            StmtKind::Import(decl) => self.generate_import(decl),
            StmtKind::Var(decl) => {
                if decl.name.name == "err" {
                    self.declare_err();
                }
                self.writeln(&var_text("var", decl));
            }
            StmtKind::Const(decl) => self.writeln(&var_text("const", decl)),
            StmtKind::Type(decl) => self.generate_type(decl),
            StmtKind::Function(func) => self.generate_function(func),
            StmtKind::Define { names, values } => {
                let redefines_err =
                    matches!(names.as_slice(), [name] if name.name == "err") && self.err_declared();
                if redefines_err {
                    self.writeln(&format!("err = {}", expr_list(values)));
                } else {
                    if names.iter().any(|name| name.name == "err") {
                        self.declare_err();
                    }
                    self.writeln(&simple_text(stmt));
                }
            }
            StmtKind::Assign { .. } | StmtKind::IncDec { .. } | StmtKind::Expr(_) => {
                self.writeln(&simple_text(stmt));
            }
            StmtKind::Return(values) => self.generate_return(values),
            StmtKind::Block(block) => {
                self.writeln("{");
                self.generate_body(block);
                self.writeln("}");
            }
            StmtKind::If(if_stmt) => {
                self.write_indent();
                self.generate_if(if_stmt);
            }
            StmtKind::For(for_stmt) => {
                let parts = (&for_stmt.init, &for_stmt.condition, &for_stmt.update);
                let header = match parts {
                    (None, None, None) if !for_stmt.clauses => "for {".to_string(),
                    (None, Some(condition), None) if !for_stmt.clauses => {
                        format!("for {} {{", expr_text(condition))
                    }
                    (Some(init), None, None) if for_stmt.is_range_clause() => {
                        format!("for {} {{", simple_text(init))
                    }
                    (init, condition, update) => {
                        let clauses = format!(
                            "for {}; {}; {}",
                            init.as_deref().map(simple_text).unwrap_or_default(),
                            condition.as_ref().map(expr_text).unwrap_or_default(),
                            update.as_deref().map(simple_text).unwrap_or_default(),
                        );
                        format!("{} {{", clauses.trim_end())
                    }
                };
                self.writeln(&header);
                self.generate_body(&for_stmt.body);
                self.writeln("}");
            }
            StmtKind::Branch { keyword, label } => match label {
                Some(label) => self.writeln(&format!("{} {}", keyword, label)),
                None => self.writeln(keyword.as_str()),
            },
            StmtKind::Defer(call) => self.writeln(&format!("defer {}", expr_text(call))),
            StmtKind::Go(call) => self.writeln(&format!("go {}", expr_text(call))),
            StmtKind::Comment(comment) => self.generate_comment(comment),
            StmtKind::Try(try_stmt) => self.generate_try(try_stmt),
            StmtKind::Throw(value) => self.generate_throw(value),
        }
    }

    /// Writes from `if` to the closing brace; the caller positions the cursor
    fn generate_if(&mut self, if_stmt: &IfStmt) {
        self.write("if ");
        if let Some(init) = &if_stmt.init {
            self.write(&simple_text(init));
            self.write("; ");
        }
        self.write(&expr_text(&if_stmt.condition));
        self.write(" {\n");
        self.generate_body(&if_stmt.consequence);

        match &if_stmt.alternative {
            None => self.writeln("}"),
            Some(alternative) => match alternative.statements.as_slice() {
                [Stmt {
                    kind: StmtKind::If(nested),
                    ..
                }] => {
                    self.write_indent();
                    self.write("} else ");
                    self.generate_if(nested);
                }
                _ => {
                    self.writeln("} else {");
                    self.generate_body(alternative);
                    self.writeln("}");
                }
            },
        }
    }

    fn generate_return(&mut self, values: &[Expr]) {
        let rendered: Vec<String> = values.iter().map(expr_text).collect();
        let values = match self.returns.last() {
            Some(ReturnContext::Function(signature)) => signature.success_values(rendered),
            Some(ReturnContext::Closure) if rendered.is_empty() => vec!["nil".to_string()],
            _ => rendered,
        };

        if values.is_empty() {
            self.writeln("return");
        } else {
            self.writeln(&format!("return {}", values.join(", ")));
        }
    }

    fn generate_throw(&mut self, value: &Expr) {
        let error = format!("errors.New(fmt.Sprintf(\"%v\", {}))", expr_text(value));
        let values = match self.returns.last() {
            Some(ReturnContext::Function(signature)) => signature.error_values(error),
            _ => vec![error],
        };
        self.writeln(&format!("return {}", values.join(", ")));
    }

    fn generate_comment(&mut self, comment: &Comment) {
        let text = if comment.multiline {
            format!("/* {} */", comment.text)
        } else {
            format!("//{}", comment.text)
        };

        if comment.inline && self.output.ends_with('\n') {
            self.output.pop();
            self.output.push(' ');
            self.output.push_str(&text);
            self.output.push('\n');
        } else {
            self.writeln(&text);
        }
    }

    fn generate_try(&mut self, try_stmt: &TryStmt) {
        if self.err_declared() {
            self.writeln("err = func() error {");
        } else {
            self.writeln("err := func() error {");
        }

        self.indent();
        self.push_scope(false);
        self.returns.push(ReturnContext::Closure);
        self.generate_block(&try_stmt.body);
        self.writeln("return nil");
        self.returns.pop();
        self.pop_scope();
        self.dedent();
        self.writeln("}()");
        self.declare_err();

        if try_stmt.catches.is_empty() {
            self.writeln("_ = err");
        } else {
            self.writeln("if err != nil {");
            self.indent();
            self.push_scope(false);
            self.generate_catches(&try_stmt.catches);
            self.pop_scope();
            self.dedent();
            self.writeln("}");
        }

        // finally runs inline after the handlers, in the enclosing scope
        if let Some(finally) = &try_stmt.finally {
            self.generate_block(finally);
        }
    }

    /// Typed catches form an `if`/`else if` chain; the first catch-all ends it
    fn generate_catches(&mut self, catches: &[CatchBlock]) {
        let mut chain_open = false;

        for catch in catches {
            let Some(type_name) = &catch.type_name else {
                if chain_open {
                    self.writeln("} else {");
                    self.indent();
                    self.push_scope(false);
                }
                if let Some(name) = used_binding(catch)
                    && name != "err"
                {
                    self.writeln(&format!("{} := err", name));
                }
                self.generate_block(&catch.body);
                if chain_open {
                    self.pop_scope();
                    self.dedent();
                    self.writeln("}");
                }
                return;
            };

            let binding = used_binding(catch).unwrap_or("_");
            self.write_indent();
            self.write(if chain_open { "} else if " } else { "if " });
            self.write(&format!("{}, ok := err.({}); ok {{\n", binding, type_name));
            self.generate_body(&catch.body);
            chain_open = true;
        }

        if chain_open {
            self.writeln("}");
        }
    }
}

impl Default for GoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for GoGenerator {
    fn generate(&mut self, program: &Program) -> String {
        self.output.clear();
        self.indent = 0;
        self.scopes = vec![false];
        self.returns.clear();

        self.generate_program(program);

        std::mem::take(&mut self.output)
    }

    fn file_extension(&self) -> &'static str {
        "go"
    }

    fn language_name(&self) -> &'static str {
        "Go"
    }
}

fn is_declaration(kind: &StmtKind) -> bool {
    matches!(
        kind,
        StmtKind::Package(_) | StmtKind::Import(_) | StmtKind::Type(_) | StmtKind::Function(_)
    )
}

/// `errors` and `fmt` unless the file already imports them
fn missing_imports(program: &Program) -> Vec<&'static str> {
    let imported: Vec<&str> = program
        .statements
        .iter()
        .filter_map(|stmt| match &stmt.kind {
            StmtKind::Import(decl) => Some(decl),
            _ => None,
        })
        .flat_map(|decl| decl.specs.iter().map(|spec| spec.path.as_str()))
        .collect();

    ERROR_IMPORTS
        .into_iter()
        .filter(|path| !imported.contains(path))
        .collect()
}

/// Last non-comment statement is a `return` or `throw`
fn ends_in_exit(block: &Block) -> bool {
    block
        .statements
        .iter()
        .rev()
        .find(|stmt| !matches!(stmt.kind, StmtKind::Comment(_)))
        .is_some_and(|stmt| matches!(stmt.kind, StmtKind::Return(_) | StmtKind::Throw(_)))
}

/// The catch binding, if the handler body actually uses it
fn used_binding(catch: &CatchBlock) -> Option<&str> {
    catch
        .exception
        .as_ref()
        .map(|ident| ident.name.as_str())
        .filter(|name| *name != "_" && block_references(&catch.body, name))
}

fn var_text(keyword: &str, decl: &VarDecl) -> String {
    let mut text = format!("{} {}", keyword, decl.name);
    if let Some(ty) = &decl.ty {
        text.push(' ');
        text.push_str(ty);
    }
    if let Some(value) = &decl.value {
        text.push_str(" = ");
        text.push_str(&expr_text(value));
    }
    text
}

/// Statements that fit in `if` and `for` headers
fn simple_text(stmt: &Stmt) -> String {
    match &stmt.kind {
        StmtKind::Define { names, values } => {
            let names: Vec<&str> = names.iter().map(|name| name.name.as_str()).collect();
            format!("{} := {}", names.join(", "), expr_list(values))
        }
        StmtKind::Assign {
            targets,
            op,
            values,
        } => format!("{} {} {}", expr_list(targets), op.as_str(), expr_list(values)),
        StmtKind::IncDec { target, op } => format!("{}{}", expr_text(target), op.as_str()),
        StmtKind::Expr(expr) => expr_text(expr),
        // the parser only puts the kinds above in headers
        other => format!("/* unsupported {} statement */", other.name()),
    }
}

fn expr_list(exprs: &[Expr]) -> String {
    exprs.iter().map(expr_text).collect::<Vec<_>>().join(", ")
}

fn precedence_of(expr: &Expr) -> Precedence {
    match &expr.kind {
        ExprKind::Infix { op, .. } => op.precedence(),
        ExprKind::Prefix { .. } => Precedence::Prefix,
        _ => Precedence::Call,
    }
}

/// Render an operand, parenthesized when it binds looser than its position.
/// Right operands also need parentheses at equal precedence.
fn operand_text(expr: &Expr, position: Precedence, right: bool) -> String {
    let own = precedence_of(expr);
    let text = expr_text(expr);
    if own < position || (right && own == position) {
        format!("({})", text)
    } else {
        text
    }
}

fn expr_text(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Ident(ident) => ident.name.clone(),
        ExprKind::Integer { text, .. } | ExprKind::Float { text, .. } => text.clone(),
        ExprKind::String(value) => format!("\"{}\"", value),
        ExprKind::RawString(value) => format!("`{}`", value),
        ExprKind::Char(value) => format!("'{}'", value),
        ExprKind::Bool(value) => value.to_string(),
        ExprKind::Nil => "nil".to_string(),
        // `-(-a)` must not print as `--a`
        ExprKind::Prefix { op, operand } => format!(
            "{}{}",
            op.as_str(),
            operand_text(operand, Precedence::Prefix, true)
        ),
        ExprKind::Infix { left, op, right } => {
            let precedence = op.precedence();
            format!(
                "{} {} {}",
                operand_text(left, precedence, false),
                op.as_str(),
                operand_text(right, precedence, true)
            )
        }
        ExprKind::Call { function, args } => format!(
            "{}({})",
            operand_text(function, Precedence::Call, false),
            expr_list(args)
        ),
        ExprKind::Dot { left, property } => format!(
            "{}.{}",
            operand_text(left, Precedence::Call, false),
            property.name
        ),
        ExprKind::Index { left, index } => format!(
            "{}[{}]",
            operand_text(left, Precedence::Call, false),
            expr_text(index)
        ),
        ExprKind::TypeAssert { left, type_name } => format!(
            "{}.({})",
            operand_text(left, Precedence::Call, false),
            type_name
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn transpile(source: &str) -> String {
        let program = Parser::new(source).parse().unwrap();
        GoGenerator::new().generate(&program)
    }

    #[test]
    fn test_header_statement_fallback_is_visible() {
        let stmt = Stmt::new(StmtKind::Return(Vec::new()), crate::errors::SourceSpan::new(0, 6));
        assert_eq!(simple_text(&stmt), "/* unsupported return statement */");
    }

    #[test]
    fn test_pass_through_function() {
        assert_eq!(
            transpile("func add(a int, b int) int { return a + b }"),
            "func add(a int, b int) int {\n\treturn a + b\n}\n"
        );
    }

    #[test]
    fn test_signature_augmentation() {
        assert_eq!(
            transpile("func risky() int { try { } catch (e) { } return 0 }"),
            "func risky() (int, error) {\n\
             \terr := func() error {\n\
             \t\treturn nil\n\
             \t}()\n\
             \tif err != nil {\n\
             \t}\n\
             \treturn 0, nil\n\
             }\n"
        );
    }

    #[test]
    fn test_throw_lowering() {
        assert_eq!(
            transpile("func fail() {\n\tthrow \"boom\"\n}"),
            "import (\n\
             \t\"errors\"\n\
             \t\"fmt\"\n\
             )\n\
             \n\
             func fail() error {\n\
             \treturn errors.New(fmt.Sprintf(\"%v\", \"boom\"))\n\
             }\n"
        );
    }

    #[test]
    fn test_throw_returns_zero_values() {
        let output = transpile(
            "func parse(s string) (int, bool) {\n\tif s == \"\" {\n\t\tthrow \"empty\"\n\t}\n\treturn 1, true\n}",
        );
        assert!(output.contains("func parse(s string) (int, bool, error) {"), "{}", output);
        assert!(
            output.contains("\t\treturn 0, false, errors.New(fmt.Sprintf(\"%v\", \"empty\"))\n"),
            "{}",
            output
        );
        assert!(output.contains("\treturn 1, true, nil\n"), "{}", output);
    }

    #[test]
    fn test_declared_error_result_is_kept() {
        let output = transpile("func check(n int) error {\n\tif n < 0 {\n\t\tthrow n\n\t}\n\treturn nil\n}");
        assert!(output.contains("func check(n int) error {"), "{}", output);
        assert!(output.contains("\t\treturn errors.New(fmt.Sprintf(\"%v\", n))\n"), "{}", output);
        assert!(output.contains("\treturn nil\n}"), "{}", output);
    }

    #[test]
    fn test_catch_chain() {
        let source = r#"package main

func run() {
	try {
		step()
	} catch (e NotFound) {
		log(e)
	} catch (e Timeout) {
		retry()
	} catch (e) {
		panic(e)
	} finally {
		cleanup()
	}
}"#;
        assert_eq!(
            transpile(source),
            "package main\n\
             \n\
             func run() error {\n\
             \terr := func() error {\n\
             \t\tstep()\n\
             \t\treturn nil\n\
             \t}()\n\
             \tif err != nil {\n\
             \t\tif e, ok := err.(NotFound); ok {\n\
             \t\t\tlog(e)\n\
             \t\t} else if _, ok := err.(Timeout); ok {\n\
             \t\t\tretry()\n\
             \t\t} else {\n\
             \t\t\te := err\n\
             \t\t\tpanic(e)\n\
             \t\t}\n\
             \t}\n\
             \tcleanup()\n\
             \treturn nil\n\
             }\n"
        );
    }

    #[test]
    fn test_catch_all_first_ends_chain() {
        let output = transpile("func f() {\n\ttry {\n\t\ta()\n\t} catch (e) {\n\t\th()\n\t} catch (e T) {\n\t\tg()\n\t}\n}");
        assert!(output.contains("\tif err != nil {\n\t\th()\n\t}\n"), "{}", output);
        assert!(!output.contains("err.(T)"), "{}", output);
    }

    #[test]
    fn test_catch_binding_named_err() {
        let output = transpile("func f() {\n\ttry {\n\t\ta()\n\t} catch (err) {\n\t\tlog(err)\n\t}\n}");
        assert!(output.contains("\tif err != nil {\n\t\tlog(err)\n\t}\n"), "{}", output);
        assert!(!output.contains("err := err"), "{}", output);
    }

    #[test]
    fn test_err_redeclaration_becomes_assignment() {
        assert_eq!(
            transpile("func f() {\n\ttry {\n\t\ta()\n\t}\n\ttry {\n\t\tb()\n\t}\n}"),
            "func f() error {\n\
             \terr := func() error {\n\
             \t\ta()\n\
             \t\treturn nil\n\
             \t}()\n\
             \t_ = err\n\
             \terr = func() error {\n\
             \t\tb()\n\
             \t\treturn nil\n\
             \t}()\n\
             \t_ = err\n\
             \treturn nil\n\
             }\n"
        );
    }

    #[test]
    fn test_user_err_is_reused() {
        let output = transpile("func f() {\n\terr := setup()\n\ttry {\n\t\ta()\n\t} catch (e) { }\n\terr := done()\n}");
        assert!(output.contains("\terr := setup()\n\terr = func() error {"), "{}", output);
        assert!(output.contains("\terr = done()\n"), "{}", output);
    }

    #[test]
    fn test_err_parameter_is_reused() {
        let output = transpile("func wrap(err error) {\n\ttry {\n\t\ta()\n\t}\n}");
        assert!(output.contains("\terr = func() error {"), "{}", output);
    }

    #[test]
    fn test_nested_scope_redeclares_err() {
        let output = transpile("func f() {\n\ttry { }\n\tif ok {\n\t\ttry { }\n\t}\n}");
        assert!(output.contains("\t\terr := func() error {"), "{}", output);
    }

    #[test]
    fn test_returns_inside_try_closure() {
        let output = transpile("func f() int {\n\ttry {\n\t\tif bad {\n\t\t\treturn\n\t\t}\n\t\treturn failure\n\t} catch (e) {\n\t\tlog(e)\n\t}\n\treturn 1\n}");
        assert!(output.contains("\t\t\treturn nil\n"), "{}", output);
        assert!(output.contains("\t\treturn failure\n\t\treturn nil\n\t}()"), "{}", output);
        assert!(output.contains("\t\te := err\n\t\tlog(e)\n"), "{}", output);
        assert!(output.contains("\treturn 1, nil\n"), "{}", output);
    }

    #[test]
    fn test_throw_inside_try_closure() {
        let output = transpile("func f() int {\n\ttry {\n\t\tthrow \"x\"\n\t} catch (e) {\n\t}\n\treturn 1\n}");
        assert!(
            output.contains("\t\treturn errors.New(fmt.Sprintf(\"%v\", \"x\"))\n\t\treturn nil\n\t}()"),
            "{}",
            output
        );
    }

    #[test]
    fn test_imports_injected_once() {
        let output = transpile("package main\n\nimport \"fmt\"\n\nfunc f() {\n\tthrow 1\n}");
        assert_eq!(
            output,
            "package main\n\
             \n\
             import \"errors\"\n\
             \n\
             import \"fmt\"\n\
             \n\
             func f() error {\n\
             \treturn errors.New(fmt.Sprintf(\"%v\", 1))\n\
             }\n"
        );
        assert_eq!(output.matches("\"fmt\"").count(), 1);
    }

    #[test]
    fn test_no_imports_without_throw() {
        let output = transpile("package main\n\nfunc f() {\n\ttry {\n\t\ta()\n\t}\n}");
        assert!(!output.contains("import"), "{}", output);

        let output = transpile("package main\n\nfunc f() {\n\ttry {\n\t\ta()\n\t} catch (e) {\n\t\tb(e)\n\t}\n}");
        assert_eq!(
            output,
            "package main\n\
             \n\
             func f() error {\n\
             \terr := func() error {\n\
             \t\ta()\n\
             \t\treturn nil\n\
             \t}()\n\
             \tif err != nil {\n\
             \t\te := err\n\
             \t\tb(e)\n\
             \t}\n\
             \treturn nil\n\
             }\n"
        );
    }

    #[test]
    fn test_and_not_and_prefixed_literals() {
        let source = "x &^= mask\ny := a &^ b | c\nz := 0x1F + 0b101 + 0o17 + 1_000";
        assert_eq!(transpile(source), format!("{}\n", source));

        let (_, errors) = Parser::new("a := 0x1G").into_parts();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "could not parse \"0x1G\" as integer");
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(
            transpile("x := (a + b) * c\ny := a - (b - c)\nz := (a * b) + c\nw := -(-a)\nv := (*p).field"),
            "x := (a + b) * c\ny := a - (b - c)\nz := a * b + c\nw := -(-a)\nv := (*p).field\n"
        );
    }

    #[test]
    fn test_literals_preserved() {
        assert_eq!(
            transpile("a := 0755\nb := 1.50\nc := \"tab\\t\"\nd := `raw\\n`\ne := '\\n'"),
            "a := 0755\nb := 1.50\nc := \"tab\\t\"\nd := `raw\\n`\ne := '\\n'\n"
        );
    }

    #[test]
    fn test_else_if_chain() {
        let source = "if x > 1 {\n\ta()\n} else if x < 0 {\n\tb()\n} else {\n\tc()\n}";
        assert_eq!(transpile(source), format!("{}\n", source));
    }

    #[test]
    fn test_if_with_init() {
        let source = "if v, ok := m[k]; ok {\n\tuse(v)\n}";
        assert_eq!(transpile(source), format!("{}\n", source));
    }

    #[test]
    fn test_for_forms() {
        let source = "for {\n\tbreak\n}\nfor n > 0 {\n\tn--\n}\nfor i, v := range xs {\n\tuse(i, v)\n}\nfor i := 0; i < 3; i++ {\n\tcontinue\n}";
        assert_eq!(transpile(source), format!("{}\n", source));
    }

    #[test]
    fn test_for_with_empty_clauses() {
        assert_eq!(transpile("for ; i < 3; {\n\ti++\n}"), "for ; i < 3; {\n\ti++\n}\n");
        assert_eq!(transpile("for ; ; {\n\tbreak\n}"), "for ; ; {\n\tbreak\n}\n");
        assert_eq!(transpile("for i < 3 {\n\ti++\n}"), "for i < 3 {\n\ti++\n}\n");
    }

    #[test]
    fn test_struct_and_method() {
        let source = "type Point struct {\n\tX int\n\tY int `json:\"y\"`\n}\n\nfunc (p *Point) Sum() int {\n\treturn p.X + p.Y\n}";
        assert_eq!(transpile(source), format!("{}\n", source));
    }

    #[test]
    fn test_declarations() {
        let source = "package main\n\nimport (\n\t\"os\"\n\tstr \"strings\"\n)\n\nconst Limit int = 10\nvar name = \"x\"\n\ntype ID string\n\ntype Empty struct{}";
        assert_eq!(transpile(source), format!("{}\n", source));
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            transpile("// Package doc\npackage main\n\nx := 1 // note\n/* block */"),
            "// Package doc\npackage main\n\nx := 1 // note\n/* block */\n"
        );
    }

    #[test]
    fn test_defer_go_and_labels() {
        let source = "defer f.Close()\ngo worker(ch)\nfor {\n\tcontinue outer\n}";
        assert_eq!(transpile(source), format!("{}\n", source));
    }

    #[test]
    fn test_generator_is_reusable() {
        let program = Parser::new("func f() {\n\ttry { }\n}").parse().unwrap();
        let mut generator = GoGenerator::new();
        let first = generator.generate(&program);
        let second = generator.generate(&program);
        assert_eq!(first, second);
        assert!(first.starts_with("func f() error {\n\terr := "), "{}", first);
    }

    #[test]
    fn test_generator_metadata() {
        let generator = GoGenerator::default();
        assert_eq!(generator.file_extension(), "go");
        assert_eq!(generator.language_name(), "Go");
    }
}
