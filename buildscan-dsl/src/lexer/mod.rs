//! Lexer module for Kotlin-DSL build scripts

pub mod scanner;
pub mod token;

pub use scanner::*;
pub use token::*;
