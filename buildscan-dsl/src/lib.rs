//! buildscan DSL - Gradle Kotlin-DSL Build Script Extractor
//!
//! This crate provides a lexer, a generic block parser and the extractors
//! that turn a `build.gradle.kts` script into a [`BuildScriptModel`] of
//! repositories and dependencies. Nothing is evaluated: the script is read
//! structurally and only literal values are understood.
//!
//! Architecture:
//! ```text
//! Script source (build.gradle.kts)
//!     ↓
//! Lexer (tokens, lazy)
//!     ↓
//! Parser (invocation tree)
//!     ↓
//! Repository / Dependency extractors
//!     ↓
//! Assembler (BuildScriptModel + diagnostics)
//!     ↓
//! Extractor (config policy: local repos, ignore rules, strict mode)
//!     ↓
//! Pretty printer (for round-trip testing)
//! ```
//!
//! [`BuildScriptModel`]: buildscan_core::BuildScriptModel

pub mod assembler;
pub mod extract;
pub mod extractor;
pub mod lexer;
pub mod parser;
pub mod pretty_printer;

// Re-export key types for convenience
pub use assembler::*;
pub use extract::{extract_dependencies, extract_repositories, Extracted};
pub use extractor::*;
pub use lexer::*;
pub use parser::*;
pub use pretty_printer::{pretty_print, print_value};

use buildscan_core::ExtractResult;

/// Extract a build script with the default, lenient configuration.
pub fn extract(source: &str) -> ExtractResult<ExtractionReport> {
    Extractor::default().extract(source)
}
