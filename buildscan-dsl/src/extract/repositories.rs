//! Repository extractor
//!
//! Understands `mavenCentral()`, `maven { }` and `ivy { }`. The url of a
//! `maven`/`ivy` repository may be written as `url = uri("...")`,
//! `url = "..."`, `setUrl("...")`, or passed positionally or by name to the
//! call itself. Later assignments win over earlier ones.

use super::Extracted;
use crate::parser::{Argument, Invocation, Statement, Value};
use crate::pretty_printer::print_value;
use buildscan_core::{is_well_formed_uri, BlockKind, DiagnosticKind, RepositoryDeclaration, RepositoryKind};

/// Extract repository declarations from the statements of a `repositories`
/// block.
pub fn extract_repositories(statements: &[Statement]) -> Extracted<RepositoryDeclaration> {
    let mut extracted = Extracted::new();

    for statement in statements {
        let location = statement.span().location();
        let invocation = match statement {
            Statement::Invocation(invocation) => invocation,
            Statement::Assignment(_) | Statement::Declaration(_) => {
                extracted.report(
                    DiagnosticKind::UnsupportedStatement {
                        block: BlockKind::Repositories,
                    },
                    location,
                );
                continue;
            }
        };

        match repository_declaration(invocation) {
            Ok(declaration) => {
                tracing::debug!(%location, repository = %declaration, "Extracted repository");
                extracted.declarations.push(declaration);
            }
            Err(kind) => extracted.report(kind, location),
        }
    }

    extracted
}

fn repository_declaration(invocation: &Invocation) -> Result<RepositoryDeclaration, DiagnosticKind> {
    let kind = RepositoryKind::from_name(&invocation.name).ok_or_else(|| {
        DiagnosticKind::UnknownRepositoryKind {
            name: invocation.name.clone(),
        }
    })?;
    if kind == RepositoryKind::MavenCentral {
        return Ok(RepositoryDeclaration::MavenCentral);
    }

    let properties = RepositoryProperties::collect(invocation);
    let url = properties
        .url
        .ok_or(DiagnosticKind::MissingRepositoryUrl { kind })
        .and_then(|value| resolve_url(kind, value))?;
    let name = properties
        .name
        .map(|value| resolve_name(kind, value))
        .transpose()?;

    Ok(match (kind, name) {
        (RepositoryKind::MavenCentral, _) => RepositoryDeclaration::MavenCentral,
        (RepositoryKind::Maven, Some(name)) => RepositoryDeclaration::NamedMaven { name, url },
        (RepositoryKind::Maven, None) => RepositoryDeclaration::UnnamedMaven { url },
        (RepositoryKind::Ivy, Some(name)) => RepositoryDeclaration::NamedIvy { name, url },
        (RepositoryKind::Ivy, None) => RepositoryDeclaration::UnnamedIvy { url },
    })
}

/// Raw `name` and `url` values of a `maven`/`ivy` invocation.
#[derive(Default)]
struct RepositoryProperties<'a> {
    name: Option<&'a Value>,
    url: Option<&'a Value>,
}

impl<'a> RepositoryProperties<'a> {
    fn collect(invocation: &'a Invocation) -> Self {
        let mut properties = Self::default();

        for (index, argument) in invocation.arguments.iter().enumerate() {
            match argument {
                Argument::Positional(value) if index == 0 => properties.url = Some(value),
                Argument::Named { name, value } => properties.set(name, value),
                Argument::Positional(_) => {}
            }
        }

        for statement in invocation.body.iter().flatten() {
            match statement {
                Statement::Assignment(assignment) => properties.set(&assignment.target, &assignment.value),
                Statement::Invocation(call) if call.name == "setUrl" || call.name == "url" => {
                    if let Some(value) = call.single_argument() {
                        properties.url = Some(value);
                    }
                }
                // credentials { }, content { } and the like do not change the source.
                _ => {}
            }
        }

        properties
    }

    fn set(&mut self, property: &str, value: &'a Value) {
        match property {
            "name" => self.name = Some(value),
            "url" => self.url = Some(value),
            _ => {}
        }
    }
}

fn resolve_url(kind: RepositoryKind, value: &Value) -> Result<String, DiagnosticKind> {
    let literal = match value {
        Value::String(literal) => literal,
        Value::Call(call) if call.name == "uri" => match call.single_argument() {
            Some(Value::String(literal)) => literal,
            _ => {
                return Err(DiagnosticKind::UnsupportedDynamicValue {
                    kind,
                    literal: print_value(value),
                })
            }
        },
        other => {
            return Err(DiagnosticKind::UnsupportedDynamicValue {
                kind,
                literal: print_value(other),
            })
        }
    };

    if literal.is_interpolated() {
        return Err(DiagnosticKind::UnsupportedDynamicValue {
            kind,
            literal: literal.value.clone(),
        });
    }
    if !is_well_formed_uri(&literal.value) {
        return Err(DiagnosticKind::InvalidRepositoryUrl {
            kind,
            url: literal.value.clone(),
        });
    }
    Ok(literal.value.clone())
}

fn resolve_name(kind: RepositoryKind, value: &Value) -> Result<String, DiagnosticKind> {
    match value {
        Value::String(literal) if literal.is_interpolated() => Err(DiagnosticKind::UnsupportedDynamicValue {
            kind,
            literal: literal.value.clone(),
        }),
        Value::String(literal) if literal.value.is_empty() => {
            Err(DiagnosticKind::EmptyRepositoryName { kind })
        }
        Value::String(literal) => Ok(literal.value.clone()),
        other => Err(DiagnosticKind::UnsupportedDynamicValue {
            kind,
            literal: print_value(other),
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================
