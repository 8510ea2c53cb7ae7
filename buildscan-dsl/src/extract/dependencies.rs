//! Dependency extractor
//!
//! Every invocation in a `dependencies` block is expected to be one of the
//! known configurations with a single `"group:artifact:version"` argument,
//! or the map notation `group = ..., name = ..., version = ...`. Trailing
//! configuration blocks (`exclude(...)`, `because(...)`) are ignored.

use super::Extracted;
use crate::parser::{Argument, Invocation, Statement, StringLiteral, Value};
use buildscan_core::{
    BlockKind, ConfigurationKind, Coordinate, DependencyDeclaration, DiagnosticKind,
};

const MAP_KEYS: [&str; 3] = ["group", "name", "version"];

/// Extract dependency declarations from the statements of a `dependencies`
/// block. Duplicates are kept.
pub fn extract_dependencies(statements: &[Statement]) -> Extracted<DependencyDeclaration> {
    let mut extracted = Extracted::new();

    for statement in statements {
        let location = statement.span().location();
        let invocation = match statement {
            Statement::Invocation(invocation) => invocation,
            Statement::Assignment(_) | Statement::Declaration(_) => {
                extracted.report(
                    DiagnosticKind::UnsupportedStatement {
                        block: BlockKind::Dependencies,
                    },
                    location,
                );
                continue;
            }
        };

        let configuration = match ConfigurationKind::from_name(&invocation.name) {
            Some(configuration) => configuration,
            None => {
                extracted.report(
                    DiagnosticKind::UnknownConfiguration {
                        name: invocation.name.clone(),
                        replacement: ConfigurationKind::legacy_replacement(&invocation.name),
                    },
                    location,
                );
                continue;
            }
        };

        match dependency_coordinate(configuration, invocation) {
            Ok(coordinate) => {
                let declaration = DependencyDeclaration {
                    configuration,
                    coordinate,
                    location,
                };
                tracing::debug!(%location, dependency = %declaration, "Extracted dependency");
                extracted.declarations.push(declaration);
            }
            Err(kind) => extracted.report(kind, location),
        }
    }

    extracted
}

fn dependency_coordinate(
    configuration: ConfigurationKind,
    invocation: &Invocation,
) -> Result<Coordinate, DiagnosticKind> {
    let unsupported = || DiagnosticKind::UnsupportedDependencyNotation { configuration };

    if let Some(value) = invocation.single_argument() {
        return match value {
            Value::String(literal) => coordinate_literal(configuration, literal),
            _ => Err(unsupported()),
        };
    }

    if is_map_notation(invocation) {
        return coordinate_map(configuration, invocation).ok_or_else(unsupported)?;
    }

    Err(unsupported())
}

/// Parse `"group:artifact:version"`.
fn coordinate_literal(
    configuration: ConfigurationKind,
    literal: &StringLiteral,
) -> Result<Coordinate, DiagnosticKind> {
    if literal.is_interpolated() {
        return Err(DiagnosticKind::UnsupportedDynamicCoordinate {
            configuration,
            literal: literal.value.clone(),
        });
    }
    Coordinate::parse(&literal.value).map_err(|reason| DiagnosticKind::MalformedCoordinate {
        configuration,
        literal: literal.value.clone(),
        reason,
    })
}

/// Only named `group`, `name` and `version` arguments, with at least the
/// first two present.
fn is_map_notation(invocation: &Invocation) -> bool {
    let all_known = invocation.arguments.iter().all(|argument| {
        matches!(argument, Argument::Named { name, .. } if MAP_KEYS.contains(&name.as_str()))
    });
    all_known && invocation.named("group").is_some() && invocation.named("name").is_some()
}

/// Build a coordinate from map notation. `None` when a part is not a string
/// literal.
fn coordinate_map(
    configuration: ConfigurationKind,
    invocation: &Invocation,
) -> Option<Result<Coordinate, DiagnosticKind>> {
    let group = map_part(invocation, "group")?;
    let artifact = map_part(invocation, "name")?;
    let version = map_part(invocation, "version")?;

    let rendered = format!("{}:{}:{}", text(group), text(artifact), text(version));

    let interpolated = [group, artifact, version]
        .iter()
        .flatten()
        .any(|literal| literal.is_interpolated());
    if interpolated {
        return Some(Err(DiagnosticKind::UnsupportedDynamicCoordinate {
            configuration,
            literal: rendered,
        }));
    }

    Some(
        Coordinate::new(text(group), text(artifact), text(version)).map_err(|reason| {
            DiagnosticKind::MalformedCoordinate {
                configuration,
                literal: rendered,
                reason,
            }
        }),
    )
}

/// `Some(None)` when the key is absent, `None` when it is not a string literal.
fn map_part<'a>(invocation: &'a Invocation, key: &str) -> Option<Option<&'a StringLiteral>> {
    match invocation.named(key) {
        None => Some(None),
        Some(Value::String(literal)) => Some(Some(literal)),
        Some(_) => None,
    }
}

fn text(literal: Option<&StringLiteral>) -> &str {
    literal.map_or("", |l| l.value.as_str())
}

// ============================================================================
// TESTS
// ============================================================================
