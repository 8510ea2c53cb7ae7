//! Lexer implementation

use super::token::*;
use buildscan_core::{LexError, Location};
use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

// ============================================================================
// LEXER IMPLEMENTATION
// ============================================================================

/// Lexer for Kotlin-DSL build scripts.
///
/// The lexer is a lazy iterator: it yields one token per call, finishes with a
/// single [`TokenKind::Eof`] token and is exhausted after the first error.
/// Cloning it forks the stream at the current position; creating a new lexer
/// over the same source restarts it.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    pos: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
            pos: 0,
            done: false,
        }
    }

    /// Tokenize the remaining source into a vector of tokens ending in `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }

    /// Get the next token from the source.
    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let start = self.location();

        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => match c {
                '\n' => self.single(TokenKind::Newline),
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '{' => self.single(TokenKind::LBrace),
                '}' => self.single(TokenKind::RBrace),
                '.' => self.single(TokenKind::Dot),
                ',' => self.single(TokenKind::Comma),
                '=' => self.single(TokenKind::Assign),
                ':' => self.single(TokenKind::Colon),
                ';' => self.single(TokenKind::Semicolon),
                '<' => self.single(TokenKind::Lt),
                '>' => self.single(TokenKind::Gt),

                '/' if self.peek_next_char() == Some('/') => self.scan_line_comment(),
                '/' if self.peek_next_char() == Some('*') => self.scan_block_comment(start)?,

                '"' => self.scan_string(start)?,
                '`' => self.scan_backtick_identifier(start)?,

                c if c.is_ascii_digit() => self.scan_number(),

                c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(),

                c => {
                    return Err(LexError::InvalidCharacter {
                        character: c,
                        location: start,
                    })
                }
            },
        };

        Ok(Token {
            kind,
            span: Span {
                start: start.offset,
                end: self.pos,
                line: start.line,
                column: start.column,
            },
        })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Scan a plain identifier.
    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;

        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        TokenKind::Identifier(self.source[start..self.pos].to_string())
    }

    /// Scan a backtick-quoted identifier such as `` `java-library` ``.
    fn scan_backtick_identifier(&mut self, location: Location) -> Result<TokenKind, LexError> {
        self.advance(); // consume opening backtick
        let start = self.pos;

        loop {
            match self.peek_char() {
                None | Some('\n') => return Err(LexError::UnterminatedIdentifier { location }),
                Some('`') => break,
                Some(_) => {
                    self.advance();
                }
            }
        }

        let name = self.source[start..self.pos].to_string();
        self.advance(); // consume closing backtick

        if name.is_empty() {
            return Err(LexError::InvalidCharacter {
                character: '`',
                location,
            });
        }
        Ok(TokenKind::Identifier(name))
    }

    /// Scan an integer or decimal literal, with an optional `L`/`f` suffix.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;

        self.skip_digits();
        if self.peek_char() == Some('.')
            && self.peek_next_char().is_some_and(|c| c.is_ascii_digit())
        {
            self.advance();
            self.skip_digits();
        }
        if matches!(self.peek_char(), Some('L' | 'f' | 'F')) {
            self.advance();
        }

        TokenKind::Number(self.source[start..self.pos].to_string())
    }

    fn skip_digits(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Scan a string literal, regular or triple-quoted.
    fn scan_string(&mut self, location: Location) -> Result<TokenKind, LexError> {
        if self.source[self.pos..].starts_with("\"\"\"") {
            return self.scan_raw_string(location);
        }

        self.advance(); // consume opening quote
        let mut value = String::new();
        let mut templates = Vec::new();

        loop {
            match self.peek_char() {
                None | Some('\n') => return Err(LexError::UnterminatedString { location }),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => self.scan_escape(&mut value, location)?,
                Some('$') => templates.extend(self.scan_template(&mut value, location)?),
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        Ok(TokenKind::StringLiteral { value, templates })
    }

    /// Scan a `"""raw"""` string: no escapes, newlines allowed.
    fn scan_raw_string(&mut self, location: Location) -> Result<TokenKind, LexError> {
        for _ in 0..3 {
            self.advance();
        }
        let mut value = String::new();
        let mut templates = Vec::new();

        loop {
            let rest = &self.source[self.pos..];
            if rest.starts_with("\"\"\"") {
                // Quotes beyond the closing three belong to the content.
                if rest.starts_with("\"\"\"\"") {
                    self.advance();
                    value.push('"');
                    continue;
                }
                for _ in 0..3 {
                    self.advance();
                }
                break;
            }
            match self.peek_char() {
                None => return Err(LexError::UnterminatedString { location }),
                Some('$') => templates.extend(self.scan_template(&mut value, location)?),
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        Ok(TokenKind::StringLiteral { value, templates })
    }

    /// Decode one escape sequence starting at the backslash.
    fn scan_escape(&mut self, value: &mut String, string_start: Location) -> Result<(), LexError> {
        let location = self.location();
        self.advance(); // consume backslash

        let decoded = match self.advance() {
            None => return Err(LexError::UnterminatedString { location: string_start }),
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('b') => '\u{8}',
            Some('\\') => '\\',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('$') => '$',
            Some('u') => self.scan_unicode_escape(location)?,
            Some(other) => {
                return Err(LexError::InvalidEscape {
                    escape: other,
                    location,
                })
            }
        };

        value.push(decoded);
        Ok(())
    }

    /// Decode the four hex digits of a `\uXXXX` escape.
    fn scan_unicode_escape(&mut self, location: Location) -> Result<char, LexError> {
        let invalid = LexError::InvalidEscape {
            escape: 'u',
            location,
        };
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .peek_char()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| invalid.clone())?;
            self.advance();
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or(invalid)
    }

    /// Copy a `$` and, for `${...}`, the whole template expression verbatim.
    /// Returns the template's range in `value` when the `$` starts one.
    fn scan_template(
        &mut self,
        value: &mut String,
        string_start: Location,
    ) -> Result<Option<Range<usize>>, LexError> {
        let start = value.len();
        self.advance();
        value.push('$');

        match self.peek_char() {
            Some('{') => {
                let mut depth = 0usize;
                loop {
                    match self.advance() {
                        None => return Err(LexError::UnterminatedString { location: string_start }),
                        Some(c) => {
                            value.push(c);
                            match c {
                                '{' => depth += 1,
                                '}' => {
                                    depth -= 1;
                                    if depth == 0 {
                                        break;
                                    }
                                }
                                _ => {}
                            }
                        }
                    }
                }
                Ok(Some(start..value.len()))
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => Ok(Some(start..start + 1)),
            _ => Ok(None),
        }
    }

    /// Scan a `// line` comment, excluding the newline.
    fn scan_line_comment(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        TokenKind::Comment(self.source[start..self.pos].to_string())
    }

    /// Scan a `/* block */` comment. Block comments nest.
    fn scan_block_comment(&mut self, location: Location) -> Result<TokenKind, LexError> {
        let start = self.pos;
        self.advance(); // /
        self.advance(); // *
        let mut depth = 1usize;

        while depth > 0 {
            match self.peek_char() {
                None => return Err(LexError::UnterminatedComment { location }),
                Some('*') if self.peek_next_char() == Some('/') => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                Some('/') if self.peek_next_char() == Some('*') => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                _ => {
                    self.advance();
                }
            }
        }

        Ok(TokenKind::Comment(self.source[start..self.pos].to_string()))
    }

    /// Skip horizontal whitespace. Newlines are tokens.
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\u{feff}' | '\u{c}') = self.peek_char() {
            self.advance();
        }
    }

    fn location(&self) -> Location {
        Location::new(self.pos, self.line, self.column)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next_char(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let (i, c) = self.chars.next()?;
        self.pos = i + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if token.kind == TokenKind::Eof => self.done = true,
            Err(_) => self.done = true,
            Ok(_) => {}
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Tokenize a whole script.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }

    fn string(value: &str) -> TokenKind {
        TokenKind::StringLiteral {
            value: value.to_string(),
            templates: Vec::new(),
        }
    }

    #[test]
    fn test_lexer_call_with_string() {
        assert_eq!(
            kinds(r#"compileOnly("g:a:1.0")"#),
            vec![
                ident("compileOnly"),
                TokenKind::LParen,
                string("g:a:1.0"),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_delimiters() {
        assert_eq!(
            kinds("{ } ( ) . , = : ; < >"),
            vec![
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Dot,
                TokenKind::Comma,
                TokenKind::Assign,
                TokenKind::Colon,
                TokenKind::Semicolon,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_backtick_identifier() {
        assert_eq!(
            kinds("plugins {\n\t`java-library`\n}"),
            vec![
                ident("plugins"),
                TokenKind::LBrace,
                TokenKind::Newline,
                ident("java-library"),
                TokenKind::Newline,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_escapes() {
        assert_eq!(
            kinds(r#""a\tb\n\"q\" \$x \u0041""#),
            vec![string("a\tb\n\"q\" $x A"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_lexer_interpolation_is_flagged_and_kept() {
        assert_eq!(
            kinds(r#""g:a:$version" "g:a:${libs.v("x")}""#),
            vec![
                TokenKind::StringLiteral {
                    value: "g:a:$version".to_string(),
                    templates: vec![4..5],
                },
                TokenKind::StringLiteral {
                    value: "g:a:${libs.v(\"x\")}".to_string(),
                    templates: vec![4..18],
                },
                TokenKind::Eof,
            ]
        );
        // A lone dollar is not an interpolation.
        assert_eq!(kinds(r#""cost: $5""#), vec![string("cost: $5"), TokenKind::Eof]);
    }

    #[test]
    fn test_lexer_escaped_dollar_is_not_a_template() {
        assert_eq!(
            kinds(r#""\${ $x""#),
            vec![
                TokenKind::StringLiteral {
                    value: "${ $x".to_string(),
                    templates: vec![3..4],
                },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_raw_string() {
        assert_eq!(
            kinds("\"\"\"line one\n\\d+ \"quoted\"\"\"\""),
            vec![string("line one\n\\d+ \"quoted\""), TokenKind::Eof]
        );
    }

    #[test]
    fn test_lexer_comments() {
        assert_eq!(
            kinds("// line\n/* outer /* inner */ still */x"),
            vec![
                TokenKind::Comment("// line".to_string()),
                TokenKind::Newline,
                TokenKind::Comment("/* outer /* inner */ still */".to_string()),
                ident("x"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_numbers() {
        assert_eq!(
            kinds("17 1.5 1_000L"),
            vec![
                TokenKind::Number("17".to_string()),
                TokenKind::Number("1.5".to_string()),
                TokenKind::Number("1_000L".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_spans() {
        let tokens = tokenize("a\n\t\"é\"(x)").unwrap();
        assert_eq!(tokens[0].span, Span { start: 0, end: 1, line: 1, column: 1 });
        assert_eq!(tokens[2].span.line, 2);
        assert_eq!(tokens[2].span.column, 2);
        // Columns count characters, offsets count bytes.
        assert_eq!(tokens[3].kind, TokenKind::LParen);
        assert_eq!(tokens[3].span.column, 5);
        assert_eq!(tokens[3].span.start, 7);
    }

    #[test]
    fn test_lexer_unterminated_string_reports_opening_quote() {
        let err = tokenize("dependencies {\n    api(\"g:a:1)\n}").unwrap_err();
        assert_eq!(
            err,
            LexError::UnterminatedString {
                location: Location::new(23, 2, 9)
            }
        );
    }

    #[test]
    fn test_lexer_unterminated_comment() {
        let err = tokenize("x /* never closed").unwrap_err();
        assert!(matches!(
            err,
            LexError::UnterminatedComment { location } if location.column == 3
        ));
    }

    #[test]
    fn test_lexer_unterminated_backtick() {
        assert!(matches!(
            tokenize("`java-library\n").unwrap_err(),
            LexError::UnterminatedIdentifier { .. }
        ));
    }

    #[test]
    fn test_lexer_invalid_escape() {
        assert!(matches!(
            tokenize(r#""\q""#).unwrap_err(),
            LexError::InvalidEscape { escape: 'q', .. }
        ));
        assert!(matches!(
            tokenize(r#""\u12G4""#).unwrap_err(),
            LexError::InvalidEscape { escape: 'u', .. }
        ));
    }

    #[test]
    fn test_lexer_error_on_invalid_char() {
        let err = tokenize("a @ b").unwrap_err();
        assert_eq!(
            err,
            LexError::InvalidCharacter {
                character: '@',
                location: Location::new(2, 1, 3)
            }
        );
    }

    #[test]
    fn test_lexer_is_lazy_and_fused() {
        let mut lexer = Lexer::new("ok @");
        assert!(matches!(lexer.next(), Some(Ok(Token { kind: TokenKind::Identifier(_), .. }))));
        let forked = lexer.clone();
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
        // The fork resumes where it was cloned.
        assert_eq!(forked.count(), 1);
    }

    #[test]
    fn test_lexer_ends_with_single_eof() {
        let mut lexer = Lexer::new("");
        assert!(matches!(lexer.next(), Some(Ok(Token { kind: TokenKind::Eof, .. }))));
        assert!(lexer.next().is_none());
    }
}
