//! Enum types for build-script entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CONFIGURATION KINDS
// ============================================================================

/// Dependency configuration a declaration is bound to.
///
/// The set is closed: configuration names are matched exactly as written in
/// a Kotlin-DSL script (camelCase, case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigurationKind {
    /// Annotation processors and their dependencies.
    AnnotationProcessor,
    Api,
    CompileOnly,
    /// Added in Gradle 6.7.
    CompileOnlyApi,
    Implementation,
    RuntimeOnly,
    TestAnnotationProcessor,
    TestCompileOnly,
    TestImplementation,
    TestRuntimeOnly,
}

impl ConfigurationKind {
    /// Every known configuration, in declaration order.
    pub const ALL: [ConfigurationKind; 10] = [
        ConfigurationKind::AnnotationProcessor,
        ConfigurationKind::Api,
        ConfigurationKind::CompileOnly,
        ConfigurationKind::CompileOnlyApi,
        ConfigurationKind::Implementation,
        ConfigurationKind::RuntimeOnly,
        ConfigurationKind::TestAnnotationProcessor,
        ConfigurationKind::TestCompileOnly,
        ConfigurationKind::TestImplementation,
        ConfigurationKind::TestRuntimeOnly,
    ];

    /// Name of the configuration as written in a build script.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigurationKind::AnnotationProcessor => "annotationProcessor",
            ConfigurationKind::Api => "api",
            ConfigurationKind::CompileOnly => "compileOnly",
            ConfigurationKind::CompileOnlyApi => "compileOnlyApi",
            ConfigurationKind::Implementation => "implementation",
            ConfigurationKind::RuntimeOnly => "runtimeOnly",
            ConfigurationKind::TestAnnotationProcessor => "testAnnotationProcessor",
            ConfigurationKind::TestCompileOnly => "testCompileOnly",
            ConfigurationKind::TestImplementation => "testImplementation",
            ConfigurationKind::TestRuntimeOnly => "testRuntimeOnly",
        }
    }

    /// Look up a configuration by its exact script name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }

    /// Check if the configuration only applies to the test source set.
    pub fn is_test(&self) -> bool {
        matches!(
            self,
            ConfigurationKind::TestAnnotationProcessor
                | ConfigurationKind::TestCompileOnly
                | ConfigurationKind::TestImplementation
                | ConfigurationKind::TestRuntimeOnly
        )
    }

    /// Successor of a configuration removed in Gradle 7.0.
    ///
    /// `compile`, `runtime`, `testCompile` and `testRuntime` were deprecated in
    /// Gradle 4.7; scripts still using them get this as a hint.
    pub fn legacy_replacement(name: &str) -> Option<Self> {
        match name {
            "compile" => Some(ConfigurationKind::Implementation),
            "runtime" => Some(ConfigurationKind::RuntimeOnly),
            "testCompile" => Some(ConfigurationKind::TestImplementation),
            "testRuntime" => Some(ConfigurationKind::TestRuntimeOnly),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigurationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigurationKind {
    type Err = ConfigurationKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ConfigurationKindParseError(s.to_string()))
    }
}

/// Error when parsing an unknown configuration name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationKindParseError(pub String);

impl fmt::Display for ConfigurationKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigurationKindParseError {}

// ============================================================================
// REPOSITORY KINDS
// ============================================================================

/// Discriminator for repository declarations, without their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepositoryKind {
    MavenCentral,
    Maven,
    Ivy,
}

impl RepositoryKind {
    /// Name of the repository function in a build script.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryKind::MavenCentral => "mavenCentral",
            RepositoryKind::Maven => "maven",
            RepositoryKind::Ivy => "ivy",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mavenCentral" => Some(RepositoryKind::MavenCentral),
            "maven" => Some(RepositoryKind::Maven),
            "ivy" => Some(RepositoryKind::Ivy),
            _ => None,
        }
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================
