//! Lexer token types

use buildscan_core::Location;
use std::fmt;
use std::ops::Range;

// ============================================================================
// LEXER TYPES
// ============================================================================

/// Token kinds for Kotlin-DSL build scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// Plain or backtick-quoted identifier; backticks are stripped.
    Identifier(String),
    /// String literal with escapes decoded. Interpolations (`$x`, `${x}`)
    /// are kept verbatim; `templates` holds their byte ranges in `value`
    /// (just the `$` for `$x`, the whole expression for `${x}`).
    StringLiteral {
        value: String,
        templates: Vec<Range<usize>>,
    },
    Number(String),

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    Dot,
    Comma,
    Assign,
    Colon,
    Semicolon,
    Lt,
    Gt,

    // Trivia
    Comment(String),
    Newline,

    // Special
    Eof,
}

impl TokenKind {
    /// Short human-readable description used in syntax errors.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier(name) => format!("identifier '{}'", name),
            TokenKind::StringLiteral { .. } => "string literal".to_string(),
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Comment(_) => "comment".to_string(),
            TokenKind::Newline => "newline".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("'{}'", other),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => f.write_str(name),
            TokenKind::StringLiteral { value, .. } => write!(f, "{:?}", value),
            TokenKind::Number(n) => f.write_str(n),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Assign => f.write_str("="),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::Lt => f.write_str("<"),
            TokenKind::Gt => f.write_str(">"),
            TokenKind::Comment(text) => f.write_str(text),
            TokenKind::Newline => f.write_str("\\n"),
            TokenKind::Eof => f.write_str("<eof>"),
        }
    }
}

/// Source location span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    /// Location of the first character of the span.
    pub fn location(&self) -> Location {
        Location::new(self.start, self.line, self.column)
    }
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }
}

/// A token with its kind and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Comment(_))
    }
}
