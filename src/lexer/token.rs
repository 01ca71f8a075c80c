//! Token definitions for godsl
//!
//! Defines all token types produced by the lexer.

use crate::errors::{Position, SourceSpan};
use std::fmt;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// Literal text. String, raw string and char literals exclude their delimiters.
    pub literal: String,
    /// Line/column/offset of the first character
    pub position: Position,
    /// Byte range of the whole lexeme, delimiters included
    pub span: SourceSpan,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        literal: impl Into<String>,
        position: Position,
        span: SourceSpan,
    ) -> Self {
        Self {
            kind,
            literal: literal.into(),
            position,
            span,
        }
    }

    /// Line on which the token ends (raw strings and block comments may span lines)
    pub fn end_line(&self) -> usize {
        self.position.line + self.literal.matches('\n').count()
    }
}

/// Go keywords plus the exception keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,

    // Literals
    True,
    False,
    Nil,

    // Exceptions
    Try,
    Catch,
    Throw,
    Finally,
}

impl Keyword {
    /// Try to parse a string as a keyword
    pub fn parse(s: &str) -> Option<Keyword> {
        match s {
            "break" => Some(Keyword::Break),
            "case" => Some(Keyword::Case),
            "chan" => Some(Keyword::Chan),
            "const" => Some(Keyword::Const),
            "continue" => Some(Keyword::Continue),
            "default" => Some(Keyword::Default),
            "defer" => Some(Keyword::Defer),
            "else" => Some(Keyword::Else),
            "fallthrough" => Some(Keyword::Fallthrough),
            "for" => Some(Keyword::For),
            "func" => Some(Keyword::Func),
            "go" => Some(Keyword::Go),
            "goto" => Some(Keyword::Goto),
            "if" => Some(Keyword::If),
            "import" => Some(Keyword::Import),
            "interface" => Some(Keyword::Interface),
            "map" => Some(Keyword::Map),
            "package" => Some(Keyword::Package),
            "range" => Some(Keyword::Range),
            "return" => Some(Keyword::Return),
            "select" => Some(Keyword::Select),
            "struct" => Some(Keyword::Struct),
            "switch" => Some(Keyword::Switch),
            "type" => Some(Keyword::Type),
            "var" => Some(Keyword::Var),

            "true" => Some(Keyword::True),
            "false" => Some(Keyword::False),
            "nil" => Some(Keyword::Nil),

            "try" => Some(Keyword::Try),
            "catch" => Some(Keyword::Catch),
            "throw" => Some(Keyword::Throw),
            "finally" => Some(Keyword::Finally),

            _ => None,
        }
    }

    /// Source spelling of the keyword
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Break => "break",
            Keyword::Case => "case",
            Keyword::Chan => "chan",
            Keyword::Const => "const",
            Keyword::Continue => "continue",
            Keyword::Default => "default",
            Keyword::Defer => "defer",
            Keyword::Else => "else",
            Keyword::Fallthrough => "fallthrough",
            Keyword::For => "for",
            Keyword::Func => "func",
            Keyword::Go => "go",
            Keyword::Goto => "goto",
            Keyword::If => "if",
            Keyword::Import => "import",
            Keyword::Interface => "interface",
            Keyword::Map => "map",
            Keyword::Package => "package",
            Keyword::Range => "range",
            Keyword::Return => "return",
            Keyword::Select => "select",
            Keyword::Struct => "struct",
            Keyword::Switch => "switch",
            Keyword::Type => "type",
            Keyword::Var => "var",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Nil => "nil",
            Keyword::Try => "try",
            Keyword::Catch => "catch",
            Keyword::Throw => "throw",
            Keyword::Finally => "finally",
        }
    }

    /// Whether this keyword belongs to the exception extension rather than Go
    pub fn is_exception_keyword(self) -> bool {
        matches!(
            self,
            Keyword::Try | Keyword::Catch | Keyword::Throw | Keyword::Finally
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    /// Identifier
    Ident,
    /// Integer literal
    Int,
    /// Float literal
    Float,
    /// Double-quoted string literal
    String,
    /// Backtick-delimited raw string literal
    RawString,
    /// Single-quoted char literal
    Char,
    /// Keyword
    Keyword(Keyword),

    // Punctuation
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `...`
    Ellipsis,

    // Operators - single character
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `!`
    Bang,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `=`
    Assign,

    // Operators - multi character
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `<<`
    LtLt,
    /// `>>`
    GtGt,
    /// `&&`
    AmpAmp,
    /// `&^`
    AmpCaret,
    /// `||`
    PipePipe,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `%=`
    PercentEq,
    /// `&=`
    AmpEq,
    /// `&^=`
    AmpCaretEq,
    /// `|=`
    PipeEq,
    /// `^=`
    CaretEq,
    /// `<<=`
    LtLtEq,
    /// `>>=`
    GtGtEq,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `:=`
    ColonEq,
    /// `->`
    Arrow,
    /// `<-`
    LArrow,

    // Comments
    /// `// ...` up to the end of the line
    LineComment,
    /// `/* ... */`
    BlockComment,

    // Special
    /// End of file
    Eof,
    /// A character no rule accepts
    Illegal,
}

impl TokenKind {
    /// Check if this is an EOF token
    pub fn is_eof(&self) -> bool {
        matches!(self, TokenKind::Eof)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Name used in diagnostics. Keywords are reported by their uppercased spelling.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::String => "STRING",
            TokenKind::RawString => "RAW_STRING",
            TokenKind::Char => "CHAR",
            TokenKind::Keyword(_) => "KEYWORD",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Colon => "COLON",
            TokenKind::Dot => "DOT",
            TokenKind::Ellipsis => "ELLIPSIS",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "ASTERISK",
            TokenKind::Slash => "SLASH",
            TokenKind::Percent => "PERCENT",
            TokenKind::Amp => "BIT_AND",
            TokenKind::Pipe => "BIT_OR",
            TokenKind::Caret => "BIT_XOR",
            TokenKind::Bang => "BANG",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Assign => "ASSIGN",
            TokenKind::EqEq => "EQ",
            TokenKind::BangEq => "NOT_EQ",
            TokenKind::LtEq => "LE",
            TokenKind::GtEq => "GE",
            TokenKind::LtLt => "SHL",
            TokenKind::GtGt => "SHR",
            TokenKind::AmpAmp => "AND",
            TokenKind::AmpCaret => "AND_NOT",
            TokenKind::PipePipe => "OR",
            TokenKind::PlusEq => "PLUS_ASSIGN",
            TokenKind::MinusEq => "MINUS_ASSIGN",
            TokenKind::StarEq => "MUL_ASSIGN",
            TokenKind::SlashEq => "DIV_ASSIGN",
            TokenKind::PercentEq => "MOD_ASSIGN",
            TokenKind::AmpEq => "AND_ASSIGN",
            TokenKind::AmpCaretEq => "AND_NOT_ASSIGN",
            TokenKind::PipeEq => "OR_ASSIGN",
            TokenKind::CaretEq => "XOR_ASSIGN",
            TokenKind::LtLtEq => "SHL_ASSIGN",
            TokenKind::GtGtEq => "SHR_ASSIGN",
            TokenKind::PlusPlus => "INCREMENT",
            TokenKind::MinusMinus => "DECREMENT",
            TokenKind::ColonEq => "DEFINE",
            TokenKind::Arrow => "FUNC_ARROW",
            TokenKind::LArrow => "ARROW",
            TokenKind::LineComment => "COMMENT",
            TokenKind::BlockComment => "BLOCK_COMMENT",
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "ILLEGAL",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "{}", kw.as_str().to_ascii_uppercase()),
            _ => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table_is_bidirectional() {
        let keywords = [
            Keyword::Break,
            Keyword::Func,
            Keyword::Interface,
            Keyword::Nil,
            Keyword::Try,
            Keyword::Catch,
            Keyword::Throw,
            Keyword::Finally,
        ];
        for kw in keywords {
            assert_eq!(Keyword::parse(kw.as_str()), Some(kw));
        }
        assert_eq!(Keyword::parse("fn"), None);
        assert_eq!(Keyword::parse("Try"), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TokenKind::LParen.to_string(), "LPAREN");
        assert_eq!(TokenKind::ColonEq.to_string(), "DEFINE");
        assert_eq!(TokenKind::Keyword(Keyword::Catch).to_string(), "CATCH");
        assert_eq!(TokenKind::Eof.to_string(), "EOF");
    }

    #[test]
    fn test_exception_keywords() {
        assert!(Keyword::Finally.is_exception_keyword());
        assert!(!Keyword::Defer.is_exception_keyword());
    }
}
