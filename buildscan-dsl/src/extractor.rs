//! Extractor facade
//!
//! Applies an [`ExtractorConfig`] on top of the pure pipeline
//! (lex → parse → extract → assemble): local repositories are dropped unless
//! asked for, ignore rules remove dependencies, and strict mode turns any
//! remaining diagnostic into a failure.

use crate::assembler::{extract_model, AssembledModel};
use crate::parser::parse;
use buildscan_core::{
    BuildScriptModel, ConfigError, Diagnostic, ExtractError, ExtractResult, ExtractorConfig,
    IgnoreRules,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of extracting one build script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub model: BuildScriptModel,
    /// Ordered by source offset.
    pub diagnostics: Vec<Diagnostic>,
    /// Repositories left out of the model, whether for a diagnostic or
    /// because they point at the local file system.
    pub skipped_repositories: usize,
    /// Dependencies removed by ignore rules.
    pub ignored_dependencies: usize,
}

impl ExtractionReport {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Configured build-script extractor.
///
/// Holds no mutable state, so one extractor can serve many threads.
#[derive(Debug)]
pub struct Extractor {
    config: ExtractorConfig,
    ignore_rules: IgnoreRules,
}

impl Extractor {
    /// Build an extractor, compiling the configured ignore rules.
    pub fn new(config: ExtractorConfig) -> Result<Self, ConfigError> {
        let ignore_rules = config.ignore_rules()?;
        Ok(Self {
            config,
            ignore_rules,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract repositories and dependencies from one build script.
    pub fn extract(&self, source: &str) -> ExtractResult<ExtractionReport> {
        let script = parse(source)?;
        let AssembledModel {
            mut model,
            diagnostics,
        } = extract_model(&script);

        let mut skipped_repositories = diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.is_repository_diagnostic())
            .count();
        if !self.config.include_local_repositories {
            let before = model.repositories.len();
            model.repositories.retain(|repository| !repository.is_local());
            skipped_repositories += before - model.repositories.len();
        }

        let before = model.dependencies.len();
        model
            .dependencies
            .retain(|dependency| !self.ignore_rules.matches(&dependency.coordinate));
        let ignored_dependencies = before - model.dependencies.len();

        if self.config.strict {
            if let Some(first) = diagnostics.first() {
                tracing::warn!(
                    count = diagnostics.len(),
                    first = %first,
                    "Strict mode rejected build script"
                );
                return Err(ExtractError::Strict {
                    count: diagnostics.len(),
                    first: first.clone(),
                });
            }
        }

        tracing::debug!(
            repositories = model.repositories.len(),
            dependencies = model.dependencies.len(),
            diagnostics = diagnostics.len(),
            skipped_repositories,
            ignored_dependencies,
            "Extracted build script"
        );

        Ok(ExtractionReport {
            model,
            diagnostics,
            skipped_repositories,
            ignored_dependencies,
        })
    }

    /// Extract many independent scripts in parallel. Results are returned in
    /// input order.
    pub fn extract_batch<S>(&self, sources: &[S]) -> Vec<ExtractResult<ExtractionReport>>
    where
        S: AsRef<str> + Sync,
    {
        tracing::trace!(scripts = sources.len(), "Extracting batch");
        sources
            .par_iter()
            .map(|source| self.extract(source.as_ref()))
            .collect()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            config: ExtractorConfig::default(),
            ignore_rules: IgnoreRules::empty(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
