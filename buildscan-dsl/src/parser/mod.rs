//! Parser module for Kotlin-DSL build scripts

pub mod ast;
pub mod parser;

pub use ast::*;
pub use parser::*;
