//! Parser implementation

use super::ast::*;
use crate::lexer::*;
use crate::pretty_printer::pretty_print;
use buildscan_core::{ExtractError, SyntaxError};

// ============================================================================
// PARSER
// ============================================================================

/// Maximum number of nested blocks and argument lists.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Block parser for Kotlin-DSL build scripts.
///
/// Builds a tree of [`Invocation`]s without evaluating anything. The first
/// malformed construct aborts the parse; there is no error recovery.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    depth: usize,
}

impl Parser {
    /// Create a new parser from a vector of tokens. Comments are dropped.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.is_trivia()).collect();
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let span = tokens.last().map(end_of).unwrap_or_default();
            tokens.push(Token {
                kind: TokenKind::Eof,
                span,
            });
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse the tokens into a [`Script`].
    pub fn parse(&mut self) -> Result<Script, SyntaxError> {
        let statements = self.parse_statements(None)?;
        Ok(Script { statements })
    }

    /// Parse statements until end of input, or until the `}` closing the
    /// block opened at `opener`.
    fn parse_statements(&mut self, opener: Option<Span>) -> Result<Vec<Statement>, SyntaxError> {
        let mut statements = Vec::new();

        loop {
            self.skip_separators();
            match self.current().kind {
                TokenKind::Eof => {
                    return match opener {
                        Some(span) => Err(unmatched('{', span)),
                        None => Ok(statements),
                    };
                }
                TokenKind::RBrace => {
                    return match opener {
                        Some(_) => {
                            self.advance();
                            Ok(statements)
                        }
                        None => Err(unmatched('}', self.current().span)),
                    };
                }
                TokenKind::RParen => return Err(unmatched(')', self.current().span)),
                _ => {}
            }

            statements.push(self.parse_statement(opener.is_none())?);
            self.expect_statement_end()?;
        }
    }

    /// Parse a single statement.
    fn parse_statement(&mut self, top_level: bool) -> Result<Statement, SyntaxError> {
        let span = self.current().span;

        if self.at_declaration() {
            return self.parse_declaration().map(Statement::Declaration);
        }

        let name = self.parse_name()?;

        if self.check(&TokenKind::Assign) {
            if top_level {
                return Err(self.error("invocation or block"));
            }
            self.advance();
            let value = self.parse_value()?;
            return Ok(Statement::Assignment(Assignment {
                target: name,
                value,
                span,
            }));
        }

        let invocation = self.parse_invocation(name, span, true)?;
        Ok(Statement::Invocation(invocation))
    }

    fn at_declaration(&self) -> bool {
        matches!(&self.current().kind, TokenKind::Identifier(kw) if kw == "val" || kw == "var")
            && matches!(self.peek_kind(), Some(TokenKind::Identifier(_)))
    }

    /// Parse `val name[: Type] = value`.
    fn parse_declaration(&mut self) -> Result<Declaration, SyntaxError> {
        let span = self.current().span;
        let mutable = matches!(&self.current().kind, TokenKind::Identifier(kw) if kw == "var");
        self.advance();

        let name = self.expect_identifier()?;
        let type_annotation = if self.check(&TokenKind::Colon) {
            self.advance();
            Some(self.parse_name()?)
        } else {
            None
        };
        self.expect(TokenKind::Assign)?;
        let value = self.parse_value()?;

        Ok(Declaration {
            mutable,
            name,
            type_annotation,
            value,
            span,
        })
    }

    /// Parse everything after an invocation's name.
    fn parse_invocation(
        &mut self,
        name: String,
        span: Span,
        allow_modifiers: bool,
    ) -> Result<Invocation, SyntaxError> {
        let type_arguments = if self.check(&TokenKind::Lt) {
            self.parse_type_arguments()?
        } else {
            Vec::new()
        };

        let parenthesized = self.check(&TokenKind::LParen);
        let arguments = if parenthesized {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        let body = if self.check(&TokenKind::LBrace) {
            let opener = self.current().span;
            self.advance();
            self.enter(opener)?;
            let body = self.parse_statements(Some(opener));
            self.depth -= 1;
            Some(body?)
        } else {
            None
        };

        let modifiers = if allow_modifiers {
            self.parse_modifiers()?
        } else {
            Vec::new()
        };

        Ok(Invocation {
            name,
            type_arguments,
            parenthesized,
            arguments,
            body,
            modifiers,
            span,
        })
    }

    /// Parse `<A, b.C>`.
    fn parse_type_arguments(&mut self) -> Result<Vec<String>, SyntaxError> {
        self.advance(); // <
        let mut arguments = vec![self.parse_name()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            arguments.push(self.parse_name()?);
        }
        self.expect(TokenKind::Gt)?;
        Ok(arguments)
    }

    /// Parse a parenthesized argument list. Newlines are insignificant here.
    fn parse_arguments(&mut self) -> Result<Vec<Argument>, SyntaxError> {
        let opener = self.current().span;
        self.advance(); // (
        self.enter(opener)?;
        let arguments = self.parse_argument_list(opener);
        self.depth -= 1;
        arguments
    }

    fn parse_argument_list(&mut self, opener: Span) -> Result<Vec<Argument>, SyntaxError> {
        let mut arguments = Vec::new();

        loop {
            self.skip_newlines();
            match self.current().kind {
                TokenKind::RParen => {
                    self.advance();
                    return Ok(arguments);
                }
                TokenKind::Eof | TokenKind::RBrace => return Err(unmatched('(', opener)),
                _ => {}
            }

            let is_named = matches!(self.current().kind, TokenKind::Identifier(_))
                && self.peek_kind() == Some(&TokenKind::Assign);
            let argument = if is_named {
                let name = self.expect_identifier()?;
                self.advance(); // =
                self.skip_newlines();
                Argument::Named {
                    name,
                    value: self.parse_value()?,
                }
            } else {
                Argument::Positional(self.parse_value()?)
            };
            arguments.push(argument);

            self.skip_newlines();
            match self.current().kind {
                TokenKind::Comma => self.advance(),
                TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof => {}
                _ => return Err(self.error("',' or ')'")),
            }
        }
    }

    /// Parse infix modifiers such as `version "1.0" apply false`.
    fn parse_modifiers(&mut self) -> Result<Vec<Modifier>, SyntaxError> {
        let mut modifiers = Vec::new();
        while let TokenKind::Identifier(name) = &self.current().kind {
            let name = name.clone();
            self.advance();
            let value = self.parse_value()?;
            modifiers.push(Modifier { name, value });
        }
        Ok(modifiers)
    }

    /// Parse a value: literal, reference or nested call.
    fn parse_value(&mut self) -> Result<Value, SyntaxError> {
        let span = self.current().span;
        match &self.current().kind {
            TokenKind::StringLiteral { value, templates } => {
                let literal = StringLiteral {
                    value: value.clone(),
                    templates: templates.clone(),
                };
                self.advance();
                Ok(Value::String(literal))
            }
            TokenKind::Number(n) => {
                let n = n.clone();
                self.advance();
                Ok(Value::Number(n))
            }
            TokenKind::Identifier(_) => {
                let name = self.parse_name()?;
                if self.check(&TokenKind::Lt)
                    || self.check(&TokenKind::LParen)
                    || self.check(&TokenKind::LBrace)
                {
                    Ok(Value::Call(self.parse_invocation(name, span, false)?))
                } else {
                    Ok(Value::Reference(name))
                }
            }
            _ => Err(self.error("value")),
        }
    }

    /// Parse a possibly dotted name. A newline may precede a `.` segment.
    fn parse_name(&mut self) -> Result<String, SyntaxError> {
        let mut name = self.expect_identifier()?;
        loop {
            let mut lookahead = self.pos;
            while self.tokens[lookahead].kind == TokenKind::Newline {
                lookahead += 1;
            }
            if self.tokens[lookahead].kind != TokenKind::Dot {
                break;
            }
            self.pos = lookahead + 1;
            name.push('.');
            name.push_str(&self.expect_identifier()?);
        }
        Ok(name)
    }

    fn expect_statement_end(&mut self) -> Result<(), SyntaxError> {
        match self.current().kind {
            TokenKind::Newline | TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::RBrace | TokenKind::Eof => Ok(()),
            TokenKind::RParen => Err(unmatched(')', self.current().span)),
            _ => Err(self.error("end of statement")),
        }
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos + 1).map(|t| &t.kind)
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<(), SyntaxError> {
        if self.check(&kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("'{}'", kind)))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, SyntaxError> {
        match &self.current().kind {
            TokenKind::Identifier(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            _ => Err(self.error("identifier")),
        }
    }

    /// Descend into a block or argument list opened at `opener`.
    fn enter(&mut self, opener: Span) -> Result<(), SyntaxError> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(SyntaxError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                location: opener.location(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    fn skip_separators(&mut self) {
        while self.check(&TokenKind::Newline) || self.check(&TokenKind::Semicolon) {
            self.advance();
        }
    }

    pub(crate) fn error(&self, expected: &str) -> SyntaxError {
        let token = self.current();
        SyntaxError::UnexpectedToken {
            expected: expected.to_string(),
            found: token.kind.describe(),
            location: token.span.location(),
        }
    }
}

/// Empty span just past `token`, assuming it fits on one line.
fn end_of(token: &Token) -> Span {
    let end = token.span.end;
    match token.kind {
        TokenKind::Newline => Span {
            start: end,
            end,
            line: token.span.line + 1,
            column: 1,
        },
        _ => Span {
            start: end,
            end,
            line: token.span.line,
            column: token.span.column + (end - token.span.start),
        },
    }
}

fn unmatched(delimiter: char, span: Span) -> SyntaxError {
    SyntaxError::UnmatchedDelimiter {
        delimiter,
        location: span.location(),
    }
}

// ============================================================================
// CONVENIENCE FUNCTIONS
// ============================================================================

/// Tokenize and parse a build script.
pub fn parse(source: &str) -> Result<Script, ExtractError> {
    let tokens = Lexer::new(source).tokenize()?;
    tracing::trace!(tokens = tokens.len(), "Tokenized script");
    let mut parser = Parser::new(tokens);
    let script = parser.parse()?;
    tracing::trace!(statements = script.statements.len(), "Parsed script");
    Ok(script)
}

/// Parse and pretty-print a build script (for round-trip testing).
pub fn round_trip(source: &str) -> Result<String, ExtractError> {
    let script = parse(source)?;
    Ok(pretty_print(&script))
}

// ============================================================================
// TESTS
// ============================================================================
