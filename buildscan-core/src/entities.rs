//! Entity types extracted from a build script

use crate::{ConfigurationKind, RepositoryKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Scheme, colon, then a non-empty remainder without whitespace.
static URI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]+$").expect("Invalid URI regex")
});

/// Check whether a string is a well-formed URI (`scheme:rest`).
pub fn is_well_formed_uri(value: &str) -> bool {
    URI_PATTERN.is_match(value)
}

// ============================================================================
// LOCATION
// ============================================================================

/// Position in script source.
///
/// `offset` is a 0-based byte offset; `line` and `column` are 1-based, with
/// columns counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

// ============================================================================
// COORDINATES
// ============================================================================

/// `group:artifact:version` triple identifying a dependency.
///
/// The version is opaque: anything after the second colon belongs to it,
/// further colons included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinate {
    /// Build a coordinate from its parts, rejecting empty segments.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, CoordinateError> {
        let coordinate = Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        };
        if coordinate.group.is_empty() {
            return Err(CoordinateError::EmptyGroup);
        }
        if coordinate.artifact.is_empty() {
            return Err(CoordinateError::EmptyArtifact);
        }
        if coordinate.version.is_empty() {
            return Err(CoordinateError::EmptyVersion);
        }
        Ok(coordinate)
    }

    /// Parse a `group:artifact:version` literal.
    pub fn parse(literal: &str) -> Result<Self, CoordinateError> {
        let mut parts = literal.splitn(3, ':');
        let group = parts.next().unwrap_or_default();
        let artifact = parts.next().ok_or(CoordinateError::MissingSeparator)?;
        let version = parts.next().ok_or(CoordinateError::MissingSeparator)?;
        Self::new(group, artifact, version)
    }

    /// The `group:artifact` pair, without version.
    pub fn module(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Reason a coordinate literal was rejected.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateError {
    #[error("expected group:artifact:version, found fewer than two ':' separators")]
    MissingSeparator,

    #[error("group segment is empty")]
    EmptyGroup,

    #[error("artifact segment is empty")]
    EmptyArtifact,

    #[error("version segment is empty")]
    EmptyVersion,
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// A repository from which dependency artifacts may be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepositoryDeclaration {
    MavenCentral,
    NamedMaven { name: String, url: String },
    /// `maven { }` block without a `name`.
    UnnamedMaven { url: String },
    UnnamedIvy { url: String },
    NamedIvy { name: String, url: String },
}

impl RepositoryDeclaration {
    pub fn kind(&self) -> RepositoryKind {
        match self {
            RepositoryDeclaration::MavenCentral => RepositoryKind::MavenCentral,
            RepositoryDeclaration::NamedMaven { .. } | RepositoryDeclaration::UnnamedMaven { .. } => {
                RepositoryKind::Maven
            }
            RepositoryDeclaration::UnnamedIvy { .. } | RepositoryDeclaration::NamedIvy { .. } => {
                RepositoryKind::Ivy
            }
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            RepositoryDeclaration::NamedMaven { name, .. }
            | RepositoryDeclaration::NamedIvy { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Declared URL; `None` for Maven Central.
    pub fn url(&self) -> Option<&str> {
        match self {
            RepositoryDeclaration::MavenCentral => None,
            RepositoryDeclaration::NamedMaven { url, .. }
            | RepositoryDeclaration::UnnamedMaven { url }
            | RepositoryDeclaration::UnnamedIvy { url }
            | RepositoryDeclaration::NamedIvy { url, .. } => Some(url),
        }
    }

    /// Check if the repository points at the local file system.
    pub fn is_local(&self) -> bool {
        self.url().is_some_and(|url| url.starts_with("file:"))
    }
}

impl fmt::Display for RepositoryDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.url()) {
            (Some(name), Some(url)) => write!(f, "{} '{}' ({})", self.kind(), name, url),
            (None, Some(url)) => write!(f, "{} ({})", self.kind(), url),
            _ => write!(f, "{}", self.kind()),
        }
    }
}

/// A dependency declared under a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyDeclaration {
    pub configuration: ConfigurationKind,
    pub coordinate: Coordinate,
    pub location: Location,
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.configuration, self.coordinate)
    }
}

// ============================================================================
// MODEL
// ============================================================================

/// Repositories and dependencies of one build script, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildScriptModel {
    pub repositories: Vec<RepositoryDeclaration>,
    pub dependencies: Vec<DependencyDeclaration>,
}

impl BuildScriptModel {
    pub fn new(
        repositories: Vec<RepositoryDeclaration>,
        dependencies: Vec<DependencyDeclaration>,
    ) -> Self {
        Self {
            repositories,
            dependencies,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty() && self.dependencies.is_empty()
    }

    /// Dependencies declared under one configuration.
    pub fn dependencies_for(
        &self,
        configuration: ConfigurationKind,
    ) -> impl Iterator<Item = &DependencyDeclaration> {
        self.dependencies
            .iter()
            .filter(move |dependency| dependency.configuration == configuration)
    }

    /// Repositories that are not on the local file system.
    pub fn remote_repositories(&self) -> impl Iterator<Item = &RepositoryDeclaration> {
        self.repositories.iter().filter(|repository| !repository.is_local())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_parse_guava() {
        let coordinate = Coordinate::parse("com.google.guava:guava:23.1-jre").unwrap();
        assert_eq!(coordinate.group, "com.google.guava");
        assert_eq!(coordinate.artifact, "guava");
        assert_eq!(coordinate.version, "23.1-jre");
        assert_eq!(coordinate.module(), "com.google.guava:guava");
    }

    #[test]
    fn test_coordinate_version_keeps_extra_colons() {
        let coordinate = Coordinate::parse("org.example:lib:1.0:jdk8@jar").unwrap();
        assert_eq!(coordinate.version, "1.0:jdk8@jar");
        assert_eq!(coordinate.to_string(), "org.example:lib:1.0:jdk8@jar");
    }

    #[test]
    fn test_coordinate_parse_errors() {
        assert_eq!(
            Coordinate::parse("badcoordinate"),
            Err(CoordinateError::MissingSeparator)
        );
        assert_eq!(
            Coordinate::parse("group:artifact"),
            Err(CoordinateError::MissingSeparator)
        );
        assert_eq!(Coordinate::parse(":artifact:1.0"), Err(CoordinateError::EmptyGroup));
        assert_eq!(Coordinate::parse("group::1.0"), Err(CoordinateError::EmptyArtifact));
        assert_eq!(Coordinate::parse("group:artifact:"), Err(CoordinateError::EmptyVersion));
    }

    #[test]
    fn test_is_well_formed_uri() {
        assert!(is_well_formed_uri("https://maven.google.com"));
        assert!(is_well_formed_uri("file:///home/user/.m2/repository"));
        assert!(!is_well_formed_uri("maven.google.com"));
        assert!(!is_well_formed_uri("https://exa mple.com"));
        assert!(!is_well_formed_uri(""));
        assert!(!is_well_formed_uri("1http://example.com"));
    }

    #[test]
    fn test_repository_accessors() {
        let named = RepositoryDeclaration::NamedMaven {
            name: "google".to_string(),
            url: "https://maven.google.com".to_string(),
        };
        assert_eq!(named.kind(), RepositoryKind::Maven);
        assert_eq!(named.name(), Some("google"));
        assert_eq!(named.url(), Some("https://maven.google.com"));
        assert!(!named.is_local());

        assert_eq!(RepositoryDeclaration::MavenCentral.url(), None);
        assert_eq!(RepositoryDeclaration::MavenCentral.name(), None);

        let local = RepositoryDeclaration::UnnamedIvy {
            url: "file:/opt/ivy".to_string(),
        };
        assert!(local.is_local());
        assert_eq!(local.to_string(), "ivy (file:/opt/ivy)");
    }

    #[test]
    fn test_model_queries() {
        let guava = Coordinate::parse("com.google.guava:guava:10.0").unwrap();
        let model = BuildScriptModel::new(
            vec![
                RepositoryDeclaration::MavenCentral,
                RepositoryDeclaration::UnnamedMaven {
                    url: "file:/tmp/repo".to_string(),
                },
            ],
            vec![
                DependencyDeclaration {
                    configuration: ConfigurationKind::CompileOnly,
                    coordinate: guava.clone(),
                    location: Location::default(),
                },
                DependencyDeclaration {
                    configuration: ConfigurationKind::Api,
                    coordinate: guava,
                    location: Location::new(40, 2, 1),
                },
            ],
        );
        assert_eq!(model.dependencies_for(ConfigurationKind::Api).count(), 1);
        assert_eq!(model.remote_repositories().count(), 1);
        assert!(!model.is_empty());
        assert!(BuildScriptModel::default().is_empty());
    }

    #[test]
    fn test_model_serializes_to_json() {
        let model = BuildScriptModel::new(vec![RepositoryDeclaration::MavenCentral], vec![]);
        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains("MavenCentral"));
        let back: BuildScriptModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Re-joining the parsed fields reproduces the literal exactly.
        #[test]
        fn prop_coordinate_round_trip(
            group in "[a-z][a-z0-9.\\-]{0,20}",
            artifact in "[a-z][a-z0-9\\-]{0,20}",
            version in "[0-9A-Za-z][0-9A-Za-z.:\\-]{0,15}",
        ) {
            let literal = format!("{}:{}:{}", group, artifact, version);
            let coordinate = Coordinate::parse(&literal).unwrap();
            prop_assert_eq!(&coordinate.group, &group);
            prop_assert_eq!(&coordinate.artifact, &artifact);
            prop_assert_eq!(&coordinate.version, &version);
            prop_assert_eq!(coordinate.to_string(), literal);
        }

        #[test]
        fn prop_colon_free_literal_is_rejected(literal in "[^:]{0,40}") {
            prop_assert_eq!(Coordinate::parse(&literal), Err(CoordinateError::MissingSeparator));
        }
    }
}
