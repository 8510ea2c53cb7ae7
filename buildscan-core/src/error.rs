//! Error types for build-script extraction

use crate::{Diagnostic, Location};
use thiserror::Error;

/// Tokenizer failures. Fatal: the script cannot be tokenized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("Unterminated string literal starting at {location}")]
    UnterminatedString { location: Location },

    #[error("Unterminated block comment starting at {location}")]
    UnterminatedComment { location: Location },

    #[error("Unterminated backtick identifier starting at {location}")]
    UnterminatedIdentifier { location: Location },

    #[error("Invalid escape sequence '\\{escape}' at {location}")]
    InvalidEscape { escape: char, location: Location },

    #[error("Unexpected character '{character}' at {location}")]
    InvalidCharacter { character: char, location: Location },
}

impl LexError {
    pub fn location(&self) -> Location {
        match self {
            LexError::UnterminatedString { location }
            | LexError::UnterminatedComment { location }
            | LexError::UnterminatedIdentifier { location }
            | LexError::InvalidEscape { location, .. }
            | LexError::InvalidCharacter { location, .. } => *location,
        }
    }
}

/// Parser failures. Fatal: there is no error recovery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// An opening delimiter that is never closed, or a closing delimiter
    /// with nothing to close.
    #[error("Unmatched '{delimiter}' at {location}")]
    UnmatchedDelimiter { delimiter: char, location: Location },

    #[error("Expected {expected}, found {found} at {location}")]
    UnexpectedToken {
        expected: String,
        found: String,
        location: Location,
    },

    /// Blocks or argument lists nested more than `limit` levels deep.
    #[error("Nesting deeper than {limit} levels at {location}")]
    NestingTooDeep { limit: usize, location: Location },
}

impl SyntaxError {
    pub fn location(&self) -> Location {
        match self {
            SyntaxError::UnmatchedDelimiter { location, .. }
            | SyntaxError::UnexpectedToken { location, .. }
            | SyntaxError::NestingTooDeep { location, .. } => *location,
        }
    }
}

/// Master error type for extracting one build script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Diagnostics upgraded to a failure by strict mode.
    #[error("Strict mode rejected script with {count} diagnostic(s), first at {first}")]
    Strict { count: usize, first: Diagnostic },
}

impl ExtractError {
    pub fn location(&self) -> Location {
        match self {
            ExtractError::Lex(err) => err.location(),
            ExtractError::Syntax(err) => err.location(),
            ExtractError::Strict { first, .. } => first.location,
        }
    }

    /// Check if the script structure itself could not be understood.
    pub fn is_structural(&self) -> bool {
        matches!(self, ExtractError::Lex(_) | ExtractError::Syntax(_))
    }
}

/// Result type alias for extraction.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Malformed ignore rule. Lines are 1-based.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IgnoreRuleError {
    #[error("Unexpected format at line {line}: {rule}")]
    UnexpectedFormat { line: usize, rule: String },

    #[error("Unexpected format, empty group at line {line}: {rule}")]
    EmptyGroup { line: usize, rule: String },

    #[error("Unexpected format, empty artifact at line {line}: {rule}")]
    EmptyArtifact { line: usize, rule: String },

    #[error("Unexpected format, empty version expression at line {line}: {rule}")]
    EmptyVersion { line: usize, rule: String },

    #[error("Wildcard expression too large at line {line}: {rule}")]
    InvalidPattern { line: usize, rule: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration document: {reason}")]
    InvalidDocument { reason: String },

    #[error("Invalid ignore rule: {0}")]
    InvalidIgnoreRule(#[from] IgnoreRuleError),
}

// =============================================================================
// TESTS
// =============================================================================
