//! Extractors giving meaning to the generic invocation tree.
//!
//! Each extractor walks the child statements of one block and turns the
//! invocations it understands into typed declarations. Anything it cannot
//! interpret becomes a [`Diagnostic`] and is skipped; extraction of the
//! sibling statements always continues.

pub mod dependencies;
pub mod repositories;

pub use dependencies::extract_dependencies;
pub use repositories::extract_repositories;

use buildscan_core::{Diagnostic, DiagnosticKind, Location};

/// Declarations and diagnostics produced by an extractor, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<T> {
    pub declarations: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Extracted<T> {
    pub fn new() -> Self {
        Self {
            declarations: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Append the output of another block, keeping source order.
    pub fn extend(&mut self, other: Extracted<T>) {
        self.declarations.extend(other.declarations);
        self.diagnostics.extend(other.diagnostics);
    }

    pub(crate) fn report(&mut self, kind: DiagnosticKind, location: Location) {
        tracing::debug!(%location, diagnostic = %kind, "Skipped declaration");
        self.diagnostics.push(Diagnostic::new(kind, location));
    }
}

impl<T> Default for Extracted<T> {
    fn default() -> Self {
        Self::new()
    }
}
