//! Non-fatal findings collected while extracting a build script.
//!
//! A diagnostic never aborts extraction: the offending declaration is
//! skipped and everything else is still reported. Callers decide whether a
//! diagnostic is a soft warning or a hard failure (see strict mode in
//! [`crate::ExtractorConfig`]).

use crate::{ConfigurationKind, CoordinateError, Location, RepositoryKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Block a statement was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Repositories,
    Dependencies,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Repositories => f.write_str("repositories"),
            BlockKind::Dependencies => f.write_str("dependencies"),
        }
    }
}

/// What went wrong with a single declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Invocation inside `repositories` that is not a known repository kind.
    UnknownRepositoryKind { name: String },

    /// `maven { }` or `ivy { }` without a `url`.
    MissingRepositoryUrl { kind: RepositoryKind },

    InvalidRepositoryUrl { kind: RepositoryKind, url: String },

    EmptyRepositoryName { kind: RepositoryKind },

    /// A string value relying on interpolation, which is never resolved.
    UnsupportedDynamicValue { kind: RepositoryKind, literal: String },

    /// Invocation inside `dependencies` that is not a known configuration.
    UnknownConfiguration {
        name: String,
        replacement: Option<ConfigurationKind>,
    },

    MalformedCoordinate {
        configuration: ConfigurationKind,
        literal: String,
        reason: CoordinateError,
    },

    UnsupportedDynamicCoordinate {
        configuration: ConfigurationKind,
        literal: String,
    },

    /// Dependency given as something other than a coordinate string,
    /// e.g. `project(":core")` or a version-catalog accessor.
    UnsupportedDependencyNotation { configuration: ConfigurationKind },

    /// Assignment or declaration where only invocations are expected.
    UnsupportedStatement { block: BlockKind },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnknownRepositoryKind { name } => {
                write!(f, "unknown repository kind '{}'", name)
            }
            DiagnosticKind::MissingRepositoryUrl { kind } => {
                write!(f, "{} repository has no url", kind)
            }
            DiagnosticKind::InvalidRepositoryUrl { kind, url } => {
                write!(f, "{} repository url '{}' is not a valid URI", kind, url)
            }
            DiagnosticKind::EmptyRepositoryName { kind } => {
                write!(f, "{} repository name is empty", kind)
            }
            DiagnosticKind::UnsupportedDynamicValue { kind, literal } => {
                write!(f, "{} repository uses interpolated value \"{}\"", kind, literal)
            }
            DiagnosticKind::UnknownConfiguration { name, replacement } => match replacement {
                Some(replacement) => write!(
                    f,
                    "unknown configuration '{}' (removed in Gradle 7, use '{}')",
                    name, replacement
                ),
                None => write!(f, "unknown configuration '{}'", name),
            },
            DiagnosticKind::MalformedCoordinate {
                configuration,
                literal,
                reason,
            } => write!(
                f,
                "malformed coordinate \"{}\" in {}: {}",
                literal, configuration, reason
            ),
            DiagnosticKind::UnsupportedDynamicCoordinate {
                configuration,
                literal,
            } => write!(
                f,
                "unsupported dynamic coordinate \"{}\" in {}",
                literal, configuration
            ),
            DiagnosticKind::UnsupportedDependencyNotation { configuration } => write!(
                f,
                "{} dependency is not a group:artifact:version string",
                configuration
            ),
            DiagnosticKind::UnsupportedStatement { block } => {
                write!(f, "unsupported statement in {} block", block)
            }
        }
    }
}

/// A diagnostic with the source location of the offending statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub location: Location,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Check if the diagnostic came from the `repositories` block.
    pub fn is_repository_diagnostic(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::UnknownRepositoryKind { .. }
                | DiagnosticKind::MissingRepositoryUrl { .. }
                | DiagnosticKind::InvalidRepositoryUrl { .. }
                | DiagnosticKind::EmptyRepositoryName { .. }
                | DiagnosticKind::UnsupportedDynamicValue { .. }
                | DiagnosticKind::UnsupportedStatement {
                    block: BlockKind::Repositories
                }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_configuration_display_with_hint() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::UnknownConfiguration {
                name: "compile".to_string(),
                replacement: Some(ConfigurationKind::Implementation),
            },
            Location::new(10, 3, 5),
        );
        let msg = diagnostic.to_string();
        assert!(msg.starts_with("line 3, column 5"));
        assert!(msg.contains("'compile'"));
        assert!(msg.contains("'implementation'"));
    }

    #[test]
    fn test_malformed_coordinate_display() {
        let kind = DiagnosticKind::MalformedCoordinate {
            configuration: ConfigurationKind::Api,
            literal: "badcoordinate".to_string(),
            reason: CoordinateError::MissingSeparator,
        };
        let msg = kind.to_string();
        assert!(msg.contains("\"badcoordinate\""));
        assert!(msg.contains("api"));
        assert!(msg.contains("separators"));
    }

    #[test]
    fn test_repository_diagnostic_classification() {
        let repo = Diagnostic::new(
            DiagnosticKind::UnknownRepositoryKind {
                name: "google".to_string(),
            },
            Location::default(),
        );
        let stmt = Diagnostic::new(
            DiagnosticKind::UnsupportedStatement {
                block: BlockKind::Dependencies,
            },
            Location::default(),
        );
        assert!(repo.is_repository_diagnostic());
        assert!(!stmt.is_repository_diagnostic());
    }
}
