//! Hand-written lexer/scanner for godsl
//!
//! Converts source code into a stream of tokens. Comments are kept as tokens
//! and malformed input is reported through `ILLEGAL` tokens, so scanning
//! itself never fails.

use super::token::{Keyword, Token, TokenKind};
use crate::errors::{Position, SourceSpan};

/// The lexer/scanner for godsl source code
pub struct Lexer<'src> {
    /// The source code being lexed
    source: &'src str,
    /// Current byte position in the source
    pos: usize,
    /// Start position of the current token
    start: usize,
    /// Line of the character at `pos`
    line: usize,
    /// Column of the character at `pos`
    column: usize,
    /// Position recorded when the current token started
    start_position: Position,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            start: 0,
            line: 1,
            column: 1,
            start_position: Position::new(1, 1, 0),
        }
    }

    /// Get the current position
    pub fn current_position(&self) -> Position {
        Position::new(self.line, self.column, self.pos)
    }

    /// Peek at the current character without consuming it
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Peek at the next character (one ahead of current)
    fn peek_next(&self) -> Option<char> {
        self.peek_at(1)
    }

    /// Peek `n` characters ahead of the current one
    fn peek_at(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    /// Advance to the next character and return it
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Check if we've reached the end of the source
    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Get the current span (from start to current position)
    fn current_span(&self) -> SourceSpan {
        SourceSpan::new(self.start, self.pos)
    }

    /// Get the current lexeme (text from start to current position)
    fn current_lexeme(&self) -> &'src str {
        &self.source[self.start..self.pos]
    }

    /// Create a token whose literal is the whole lexeme
    fn make_token(&self, kind: TokenKind) -> Token {
        self.make_token_with(kind, self.current_lexeme())
    }

    fn make_token_with(&self, kind: TokenKind, literal: &str) -> Token {
        Token::new(kind, literal, self.start_position, self.current_span())
    }

    /// Consume the character if it matches the expected one
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.advance();
        }
    }

    /// Scan a `//` comment up to, not including, the newline
    fn scan_line_comment(&mut self) -> Token {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
        self.make_token(TokenKind::LineComment)
    }

    /// Scan a `/* */` comment; an unterminated one runs to the end of input
    fn scan_block_comment(&mut self) -> Token {
        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_next() == Some('/') {
                self.advance();
                self.advance();
                break;
            }
            self.advance();
        }
        self.make_token(TokenKind::BlockComment)
    }

    /// Scan a number. Prefixed integers (`0x`, `0b`, `0o`) take the whole
    /// alphanumeric run so a bad digit is reported by the parser.
    fn scan_number(&mut self, first: char) -> Token {
        if first == '0'
            && let Some('x' | 'X' | 'b' | 'B' | 'o' | 'O') = self.peek()
        {
            self.advance();
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                self.advance();
            }
            return self.make_token(TokenKind::Int);
        }

        let mut kind = TokenKind::Int;
        self.skip_digits();

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            kind = TokenKind::Float;
            self.advance();
            self.skip_digits();
        }

        if let Some('e' | 'E') = self.peek() {
            kind = TokenKind::Float;
            self.advance();
            if let Some('+' | '-') = self.peek() {
                self.advance();
            }
            self.skip_digits();
        }

        self.make_token(kind)
    }

    /// Decimal digits with `_` separators
    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.advance();
        }
    }

    /// Scan a quoted literal whose opening delimiter was already consumed.
    ///
    /// A backslash skips the following character without interpreting it.
    /// The literal excludes both delimiters; an unterminated literal runs to
    /// the end of input.
    fn scan_quoted(&mut self, kind: TokenKind, delimiter: char, escapes: bool) -> Token {
        let content_start = self.pos;
        let mut content_end = self.source.len();

        while let Some(c) = self.peek() {
            if c == delimiter {
                content_end = self.pos;
                self.advance();
                break;
            }
            self.advance();
            if escapes && c == '\\' {
                self.advance();
            }
        }

        let literal = &self.source[content_start..content_end];
        self.make_token_with(kind, literal)
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text = self.current_lexeme();

        if let Some(kw) = Keyword::parse(text) {
            self.make_token(TokenKind::Keyword(kw))
        } else {
            self.make_token(TokenKind::Ident)
        }
    }

    /// Pick the compound form when `=` follows, otherwise the plain operator
    fn with_assign(&mut self, plain: TokenKind, compound: TokenKind) -> Token {
        if self.match_char('=') {
            self.make_token(compound)
        } else {
            self.make_token(plain)
        }
    }

    /// Scan the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.pos;
        self.start_position = self.current_position();

        let Some(c) = self.advance() else {
            return self.make_token_with(TokenKind::Eof, "");
        };

        // Identifiers and keywords
        if c.is_ascii_alphabetic() || c == '_' {
            return self.scan_identifier();
        }

        // Numbers
        if c.is_ascii_digit() {
            return self.scan_number(c);
        }

        match c {
            '"' => self.scan_quoted(TokenKind::String, '"', true),
            '\'' => self.scan_quoted(TokenKind::Char, '\'', true),
            '`' => self.scan_quoted(TokenKind::RawString, '`', false),

            '(' => self.make_token(TokenKind::LParen),
            ')' => self.make_token(TokenKind::RParen),
            '{' => self.make_token(TokenKind::LBrace),
            '}' => self.make_token(TokenKind::RBrace),
            '[' => self.make_token(TokenKind::LBracket),
            ']' => self.make_token(TokenKind::RBracket),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),

            ':' => self.with_assign(TokenKind::Colon, TokenKind::ColonEq),

            '.' => {
                if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    self.make_token(TokenKind::Ellipsis)
                } else {
                    self.make_token(TokenKind::Dot)
                }
            }

            '+' => {
                if self.match_char('+') {
                    self.make_token(TokenKind::PlusPlus)
                } else {
                    self.with_assign(TokenKind::Plus, TokenKind::PlusEq)
                }
            }

            '-' => {
                if self.match_char('-') {
                    self.make_token(TokenKind::MinusMinus)
                } else if self.match_char('>') {
                    self.make_token(TokenKind::Arrow)
                } else {
                    self.with_assign(TokenKind::Minus, TokenKind::MinusEq)
                }
            }

            '/' => {
                if self.match_char('/') {
                    self.scan_line_comment()
                } else if self.match_char('*') {
                    self.scan_block_comment()
                } else {
                    self.with_assign(TokenKind::Slash, TokenKind::SlashEq)
                }
            }

            '*' => self.with_assign(TokenKind::Star, TokenKind::StarEq),
            '%' => self.with_assign(TokenKind::Percent, TokenKind::PercentEq),
            '^' => self.with_assign(TokenKind::Caret, TokenKind::CaretEq),
            '!' => self.with_assign(TokenKind::Bang, TokenKind::BangEq),
            '=' => self.with_assign(TokenKind::Assign, TokenKind::EqEq),

            '&' => {
                if self.match_char('&') {
                    self.make_token(TokenKind::AmpAmp)
                } else if self.match_char('^') {
                    self.with_assign(TokenKind::AmpCaret, TokenKind::AmpCaretEq)
                } else {
                    self.with_assign(TokenKind::Amp, TokenKind::AmpEq)
                }
            }

            '|' => {
                if self.match_char('|') {
                    self.make_token(TokenKind::PipePipe)
                } else {
                    self.with_assign(TokenKind::Pipe, TokenKind::PipeEq)
                }
            }

            '<' => {
                if self.match_char('<') {
                    self.with_assign(TokenKind::LtLt, TokenKind::LtLtEq)
                } else if self.match_char('-') {
                    self.make_token(TokenKind::LArrow)
                } else {
                    self.with_assign(TokenKind::Lt, TokenKind::LtEq)
                }
            }

            '>' => {
                if self.match_char('>') {
                    self.with_assign(TokenKind::GtGt, TokenKind::GtGtEq)
                } else {
                    self.with_assign(TokenKind::Gt, TokenKind::GtEq)
                }
            }

            _ => self.make_token(TokenKind::Illegal),
        }
    }

    /// Collect all tokens into a vector ending with EOF
    pub fn tokenize_all(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}
