//! buildscan Test Utilities
//!
//! Centralized test infrastructure for the buildscan workspace:
//! - Proptest generators for coordinates, repositories and whole scripts
//! - Fixture scripts with their expected models
//! - Custom assertions for extraction results

// Re-export core types for convenience
pub use buildscan_core::{
    BuildScriptModel, ConfigurationKind, Coordinate, DependencyDeclaration, Diagnostic,
    DiagnosticKind, ExtractError, ExtractResult, RepositoryDeclaration,
};

// ============================================================================
// RENDERING
// ============================================================================

/// Render a repository as it would be declared inside `repositories { }`.
pub fn render_repository(repository: &RepositoryDeclaration) -> String {
    match repository {
        RepositoryDeclaration::MavenCentral => "mavenCentral()".to_string(),
        RepositoryDeclaration::NamedMaven { name, url } => {
            format!("maven {{\n\t\tname = \"{}\"\n\t\turl = uri(\"{}\")\n\t}}", name, url)
        }
        RepositoryDeclaration::UnnamedMaven { url } => format!("maven {{ url = uri(\"{}\") }}", url),
        RepositoryDeclaration::UnnamedIvy { url } => format!("ivy {{\n\t\turl = uri(\"{}\")\n\t}}", url),
        RepositoryDeclaration::NamedIvy { name, url } => {
            format!("ivy {{ name = \"{}\"; url = uri(\"{}\") }}", name, url)
        }
    }
}

/// Render a dependency as it would be declared inside `dependencies { }`.
pub fn render_dependency(configuration: ConfigurationKind, coordinate: &Coordinate) -> String {
    format!("{}(\"{}\")", configuration, coordinate)
}

/// Render a complete script with tab indentation.
pub fn render_script(
    repositories: &[RepositoryDeclaration],
    dependencies: &[(ConfigurationKind, Coordinate)],
) -> String {
    let mut script = String::from("plugins {\n\t`java-library`\n}\n\nrepositories {\n");
    for repository in repositories {
        script.push('\t');
        script.push_str(&render_repository(repository));
        script.push('\n');
    }
    script.push_str("}\n\ndependencies {\n");
    for (configuration, coordinate) in dependencies {
        script.push('\t');
        script.push_str(&render_dependency(*configuration, coordinate));
        script.push('\n');
    }
    script.push_str("}\n");
    script
}

/// `compileOnly` → `compile-only`.
pub fn kebab_case(name: &str) -> String {
    let mut kebab = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            kebab.push('-');
            kebab.push(c.to_ascii_lowercase());
        } else {
            kebab.push(c);
        }
    }
    kebab
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating build-script model types.

    use super::*;
    use proptest::prelude::*;

    /// A generated script together with the model it declares.
    #[derive(Debug, Clone)]
    pub struct GeneratedScript {
        pub source: String,
        pub repositories: Vec<RepositoryDeclaration>,
        pub dependencies: Vec<(ConfigurationKind, Coordinate)>,
    }

    pub fn arb_configuration_kind() -> impl Strategy<Value = ConfigurationKind> {
        prop::sample::select(ConfigurationKind::ALL.to_vec())
    }

    /// Group ids: dotted lowercase segments.
    pub fn arb_group() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9]{0,8}(\\.[a-z][a-z0-9_\\-]{0,8}){0,3}"
    }

    pub fn arb_artifact() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9\\-]{0,15}"
    }

    /// Versions, including qualifiers and the occasional extra colon.
    pub fn arb_version() -> impl Strategy<Value = String> {
        prop_oneof![
            "[0-9]{1,2}(\\.[0-9]{1,3}){0,2}",
            "[0-9]{1,2}\\.[0-9]{1,2}-(jre|android|RELEASE|SNAPSHOT|rc[0-9])",
            "[0-9]{1,2}\\.[0-9]{1,2}:[a-z]{1,8}",
        ]
    }

    pub fn arb_coordinate() -> impl Strategy<Value = Coordinate> {
        (arb_group(), arb_artifact(), arb_version()).prop_map(|(group, artifact, version)| Coordinate {
            group,
            artifact,
            version,
        })
    }

    pub fn arb_url() -> impl Strategy<Value = String> {
        "https://[a-z]{3,10}\\.example\\.com(/[a-z0-9\\-]{1,8}){0,2}"
    }

    pub fn arb_repository_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9\\-]{0,15}"
    }

    pub fn arb_repository() -> impl Strategy<Value = RepositoryDeclaration> {
        prop_oneof![
            Just(RepositoryDeclaration::MavenCentral),
            (arb_repository_name(), arb_url())
                .prop_map(|(name, url)| RepositoryDeclaration::NamedMaven { name, url }),
            arb_url().prop_map(|url| RepositoryDeclaration::UnnamedMaven { url }),
            arb_url().prop_map(|url| RepositoryDeclaration::UnnamedIvy { url }),
            (arb_repository_name(), arb_url())
                .prop_map(|(name, url)| RepositoryDeclaration::NamedIvy { name, url }),
        ]
    }

    pub fn arb_dependency() -> impl Strategy<Value = (ConfigurationKind, Coordinate)> {
        (arb_configuration_kind(), arb_coordinate())
    }

    /// A well-formed script with random repositories and dependencies.
    pub fn arb_script() -> impl Strategy<Value = GeneratedScript> {
        (
            prop::collection::vec(arb_repository(), 0..6),
            prop::collection::vec(arb_dependency(), 0..12),
        )
            .prop_map(|(repositories, dependencies)| GeneratedScript {
                source: render_script(&repositories, &dependencies),
                repositories,
                dependencies,
            })
    }

    /// Literals that are never valid coordinates.
    pub fn arb_malformed_coordinate() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z]{1,12}",
            "[a-z]{1,6}:[a-z]{1,6}",
            ":[a-z]{1,6}:[0-9]",
            "[a-z]{1,6}::[0-9]",
            "[a-z]{1,6}:[a-z]{1,6}:",
        ]
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Fixture scripts and the models they declare.

    use super::*;

    /// One dependency for every configuration, plus named Maven and Ivy
    /// repositories.
    pub const ALL_CONFIGURATIONS_SCRIPT: &str =
        include_str!("../fixtures/all_configurations.gradle.kts");

    /// Maven Central, a named Maven repository, an unnamed Ivy repository and
    /// `compileOnly` dependencies with qualified versions.
    pub const MIXED_REPOSITORIES_SCRIPT: &str =
        include_str!("../fixtures/mixed_repositories.gradle.kts");

    /// A script exercising most of the supported syntax and several
    /// diagnostics.
    pub const REALISTIC_SCRIPT: &str = include_str!("../fixtures/realistic.gradle.kts");

    /// Parse a coordinate literal known to be valid.
    #[track_caller]
    pub fn coordinate(literal: &str) -> Coordinate {
        Coordinate::parse(literal).expect("fixture coordinate must be valid")
    }

    pub fn all_configurations_repositories() -> Vec<RepositoryDeclaration> {
        vec![
            RepositoryDeclaration::MavenCentral,
            RepositoryDeclaration::NamedMaven {
                name: "foo-repository-name".to_string(),
                url: "https://foo-repository-host".to_string(),
            },
            RepositoryDeclaration::NamedIvy {
                name: "bar-repository-name".to_string(),
                url: "https://bar-repository-host".to_string(),
            },
        ]
    }

    /// `foo-<configuration>-group-id:foo-<configuration>-artifact-id:foo-<configuration>-version`
    /// for every configuration, in declaration order.
    pub fn all_configurations_dependencies() -> Vec<(ConfigurationKind, Coordinate)> {
        ConfigurationKind::ALL
            .iter()
            .map(|&kind| {
                let prefix = format!("foo-{}", kebab_case(kind.as_str()));
                let coordinate = Coordinate {
                    group: format!("{}-group-id", prefix),
                    artifact: format!("{}-artifact-id", prefix),
                    version: format!("{}-version", prefix),
                };
                (kind, coordinate)
            })
            .collect()
    }

    pub fn mixed_repositories() -> Vec<RepositoryDeclaration> {
        vec![
            RepositoryDeclaration::MavenCentral,
            RepositoryDeclaration::NamedMaven {
                name: "google".to_string(),
                url: "https://maven.google.com".to_string(),
            },
            RepositoryDeclaration::UnnamedIvy {
                url: "https://ivy.example.com".to_string(),
            },
        ]
    }

    pub fn mixed_dependencies() -> Vec<(ConfigurationKind, Coordinate)> {
        [
            "com.google.android.material:material:1.0.0",
            "com.google.guava:guava:10.0",
            "com.google.guava:guava:23.1-jre",
            "com.google.guava:guava:23.1-android",
            "org.springframework:spring-core:3.0.0.RELEASE",
        ]
        .iter()
        .map(|literal| (ConfigurationKind::CompileOnly, coordinate(literal)))
        .collect()
    }

    /// Repositories of [`REALISTIC_SCRIPT`] that survive the default policy
    /// (the local Ivy repository is dropped, `mavenLocal()` is unknown).
    pub fn realistic_remote_repositories() -> Vec<RepositoryDeclaration> {
        vec![
            RepositoryDeclaration::MavenCentral,
            RepositoryDeclaration::NamedMaven {
                name: "internal".to_string(),
                url: "https://repo.example.com/releases".to_string(),
            },
            RepositoryDeclaration::UnnamedMaven {
                url: "https://jitpack.io".to_string(),
            },
        ]
    }

    pub fn realistic_dependencies() -> Vec<(ConfigurationKind, Coordinate)> {
        use ConfigurationKind::*;
        vec![
            (Api, coordinate("org.slf4j:slf4j-api:2.0.9")),
            (Implementation, coordinate("com.google.guava:guava:32.1.3-jre")),
            (Implementation, coordinate("org.apache.commons:commons-lang3:3.13.0")),
            (CompileOnly, coordinate("org.projectlombok:lombok:1.18.30")),
            (AnnotationProcessor, coordinate("org.projectlombok:lombok:1.18.30")),
            (RuntimeOnly, coordinate("org.postgresql:postgresql:42.6.0")),
            (TestImplementation, coordinate("org.assertj:assertj-core:3.24.2")),
            (
                TestRuntimeOnly,
                coordinate("org.junit.platform:junit-platform-launcher:1.10.0"),
            ),
        ]
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for extraction results.

    use super::*;

    /// Assert that a model declares exactly these dependencies, in order.
    /// Locations are not compared.
    #[track_caller]
    pub fn assert_dependencies(model: &BuildScriptModel, expected: &[(ConfigurationKind, Coordinate)]) {
        let actual: Vec<(ConfigurationKind, Coordinate)> = model
            .dependencies
            .iter()
            .map(|d| (d.configuration, d.coordinate.clone()))
            .collect();
        assert_eq!(actual, expected, "Dependencies differ");
    }

    /// Assert that no diagnostics were raised.
    #[track_caller]
    pub fn assert_no_diagnostics(diagnostics: &[Diagnostic]) {
        assert!(
            diagnostics.is_empty(),
            "Expected no diagnostics, got: {:?}",
            diagnostics
        );
    }

    /// Assert that some diagnostic satisfies the predicate.
    #[track_caller]
    pub fn assert_has_diagnostic(diagnostics: &[Diagnostic], predicate: impl Fn(&DiagnosticKind) -> bool) {
        assert!(
            diagnostics.iter().any(|d| predicate(&d.kind)),
            "No matching diagnostic in: {:?}",
            diagnostics
        );
    }

    /// Assert that diagnostics are ordered by source offset.
    #[track_caller]
    pub fn assert_diagnostics_ordered(diagnostics: &[Diagnostic]) {
        for pair in diagnostics.windows(2) {
            assert!(
                pair[0].location.offset <= pair[1].location.offset,
                "Diagnostics out of order: {} before {}",
                pair[0],
                pair[1]
            );
        }
    }

    /// Assert that a result failed because the script could not be
    /// tokenized or parsed.
    #[track_caller]
    pub fn assert_structural_error<T: std::fmt::Debug>(result: &ExtractResult<T>) {
        match result {
            Err(err) if err.is_structural() => {}
            other => panic!("Expected lex or syntax error, got: {:?}", other),
        }
    }

    /// Assert that a result was rejected by strict mode.
    #[track_caller]
    pub fn assert_strict_failure<T: std::fmt::Debug>(result: &ExtractResult<T>) {
        match result {
            Err(ExtractError::Strict { .. }) => {}
            other => panic!("Expected strict mode failure, got: {:?}", other),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
