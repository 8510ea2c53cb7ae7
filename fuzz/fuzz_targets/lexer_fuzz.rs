//! Fuzz target for the build-script lexer
//!
//! Run with: cargo +nightly fuzz run lexer_fuzz -- -max_total_time=60

#![no_main]

use buildscan_dsl::{Lexer, TokenKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        match Lexer::new(input).tokenize() {
            Ok(tokens) => {
                assert_eq!(
                    tokens.last().map(|t| &t.kind),
                    Some(&TokenKind::Eof),
                    "token stream must end with Eof"
                );
                for token in &tokens {
                    assert!(token.span.start <= token.span.end);
                    assert!(token.span.end <= input.len());
                    assert!(token.span.line >= 1);
                    assert!(token.span.column >= 1);
                }
            }
            Err(err) => {
                let location = err.location();
                assert!(location.offset <= input.len());
                assert!(location.line >= 1 && location.column >= 1);
            }
        }

        // The iterator stops after the first error or Eof.
        let mut lexer = Lexer::new(input);
        let mut seen_end = false;
        for item in lexer.by_ref() {
            assert!(!seen_end, "lexer yielded past the end");
            seen_end = match &item {
                Ok(token) => token.kind == TokenKind::Eof,
                Err(_) => true,
            };
        }
        assert!(lexer.next().is_none());
    }
});
