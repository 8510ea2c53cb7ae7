//! Model assembler
//!
//! Runs both extractors over the top-level `repositories` and `dependencies`
//! blocks of a parsed script and merges their output into one
//! [`BuildScriptModel`]. Blocks nested elsewhere (`buildscript { }`,
//! `pluginManagement { }`, `subprojects { }`) are not part of the project
//! model and are left alone.

use crate::extract::{extract_dependencies, extract_repositories, Extracted};
use crate::parser::Script;
use buildscan_core::{BuildScriptModel, DependencyDeclaration, Diagnostic, RepositoryDeclaration};
use serde::{Deserialize, Serialize};

const REPOSITORIES_BLOCK: &str = "repositories";
const DEPENDENCIES_BLOCK: &str = "dependencies";

/// A model together with every diagnostic raised while building it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledModel {
    pub model: BuildScriptModel,
    /// Ordered by source offset.
    pub diagnostics: Vec<Diagnostic>,
}

/// Merge extractor outputs. Declarations keep source order; duplicates are
/// kept as separate entries.
pub fn assemble(
    repositories: Extracted<RepositoryDeclaration>,
    dependencies: Extracted<DependencyDeclaration>,
) -> AssembledModel {
    let mut diagnostics = repositories.diagnostics;
    diagnostics.extend(dependencies.diagnostics);
    diagnostics.sort_by_key(|diagnostic| diagnostic.location.offset);

    AssembledModel {
        model: BuildScriptModel::new(repositories.declarations, dependencies.declarations),
        diagnostics,
    }
}

/// Extract the model of a parsed script. Multiple top-level blocks of the
/// same kind are concatenated in source order.
pub fn extract_model(script: &Script) -> AssembledModel {
    let mut repositories = Extracted::new();
    for block in script.blocks(REPOSITORIES_BLOCK) {
        repositories.extend(extract_repositories(block.body.as_deref().unwrap_or_default()));
    }

    let mut dependencies = Extracted::new();
    for block in script.blocks(DEPENDENCIES_BLOCK) {
        dependencies.extend(extract_dependencies(block.body.as_deref().unwrap_or_default()));
    }

    tracing::trace!(
        repositories = repositories.declarations.len(),
        dependencies = dependencies.declarations.len(),
        "Extracted blocks"
    );
    assemble(repositories, dependencies)
}

// ============================================================================
// TESTS
// ============================================================================
