//! Abstract Syntax Tree types
//!
//! The tree is deliberately generic: every call-shaped construct is an
//! [`Invocation`] and the extractors give meaning to the few names they know.

use crate::lexer::Span;
use std::ops::Range;

// ============================================================================
// AST TYPES
// ============================================================================

/// A parsed build script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub statements: Vec<Statement>,
}

impl Script {
    /// Top-level invocations with the given name that carry a block body,
    /// in source order.
    pub fn blocks<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Invocation> + 'a {
        self.statements.iter().filter_map(move |statement| match statement {
            Statement::Invocation(invocation)
                if invocation.name == name && invocation.body.is_some() =>
            {
                Some(invocation)
            }
            _ => None,
        })
    }
}

/// A statement inside a script or a block body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Invocation(Invocation),
    Assignment(Assignment),
    Declaration(Declaration),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Invocation(invocation) => invocation.span,
            Statement::Assignment(assignment) => assignment.span,
            Statement::Declaration(declaration) => declaration.span,
        }
    }
}

/// A call, a block or a bare name.
///
/// `mavenCentral()`, `repositories { }`, `implementation("g:a:v") { }`,
/// `` `java-library` `` and `id("x") version "1.0"` are all invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Dotted name, e.g. `tasks.withType`.
    pub name: String,
    /// Generic type arguments, e.g. `Test` in `withType<Test>`.
    pub type_arguments: Vec<String>,
    /// Whether an argument list was written, even an empty one.
    pub parenthesized: bool,
    pub arguments: Vec<Argument>,
    /// Trailing block.
    pub body: Option<Vec<Statement>>,
    /// Infix calls following the invocation: `version "1.0"`, `apply false`.
    pub modifiers: Vec<Modifier>,
    pub span: Span,
}

impl Invocation {
    /// Positional arguments, in order.
    pub fn positional(&self) -> impl Iterator<Item = &Value> {
        self.arguments.iter().filter_map(|argument| match argument {
            Argument::Positional(value) => Some(value),
            Argument::Named { .. } => None,
        })
    }

    /// Value of the named argument `name`, if present.
    pub fn named(&self, name: &str) -> Option<&Value> {
        self.arguments.iter().find_map(|argument| match argument {
            Argument::Named { name: n, value } if n == name => Some(value),
            _ => None,
        })
    }

    /// The single positional argument, when that is all there is.
    pub fn single_argument(&self) -> Option<&Value> {
        match self.arguments.as_slice() {
            [Argument::Positional(value)] => Some(value),
            _ => None,
        }
    }
}

/// An argument in a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Positional(Value),
    Named { name: String, value: Value },
}

/// An infix call after an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub name: String,
    pub value: Value,
}

/// `target = value` inside a block body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub target: String,
    pub value: Value,
    pub span: Span,
}

/// `val name = value` or `var name: Type = value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub mutable: bool,
    pub name: String,
    pub type_annotation: Option<String>,
    pub value: Value,
    pub span: Span,
}

/// A string literal as written in the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    pub value: String,
    /// Byte ranges of interpolations in `value`.
    pub templates: Vec<Range<usize>>,
}

impl StringLiteral {
    /// A literal without interpolations.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            templates: Vec::new(),
        }
    }

    pub fn is_interpolated(&self) -> bool {
        !self.templates.is_empty()
    }
}

/// A value in argument, assignment or modifier position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(StringLiteral),
    Number(String),
    /// Dotted reference such as `libs.guava` or `false`.
    Reference(String),
    /// Nested call such as `uri("...")` or `project(":core")`.
    Call(Invocation),
}

impl Value {
    pub fn as_string(&self) -> Option<&StringLiteral> {
        match self {
            Value::String(literal) => Some(literal),
            _ => None,
        }
    }
}

// ============================================================================
// STRUCTURAL EQUALITY
// ============================================================================

/// Compare two scripts ignoring source spans.
pub fn same_structure(a: &Script, b: &Script) -> bool {
    same_statements(&a.statements, &b.statements)
}

fn same_statements(a: &[Statement], b: &[Statement]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_statement(x, y))
}

fn same_statement(a: &Statement, b: &Statement) -> bool {
    match (a, b) {
        (Statement::Invocation(x), Statement::Invocation(y)) => same_invocation(x, y),
        (Statement::Assignment(x), Statement::Assignment(y)) => {
            x.target == y.target && same_value(&x.value, &y.value)
        }
        (Statement::Declaration(x), Statement::Declaration(y)) => {
            x.mutable == y.mutable
                && x.name == y.name
                && x.type_annotation == y.type_annotation
                && same_value(&x.value, &y.value)
        }
        _ => false,
    }
}

fn same_invocation(a: &Invocation, b: &Invocation) -> bool {
    a.name == b.name
        && a.type_arguments == b.type_arguments
        && a.parenthesized == b.parenthesized
        && a.arguments.len() == b.arguments.len()
        && a.arguments.iter().zip(&b.arguments).all(|(x, y)| match (x, y) {
            (Argument::Positional(x), Argument::Positional(y)) => same_value(x, y),
            (
                Argument::Named { name: n, value: x },
                Argument::Named { name: m, value: y },
            ) => n == m && same_value(x, y),
            _ => false,
        })
        && match (&a.body, &b.body) {
            (Some(x), Some(y)) => same_statements(x, y),
            (None, None) => true,
            _ => false,
        }
        && a.modifiers.len() == b.modifiers.len()
        && a
            .modifiers
            .iter()
            .zip(&b.modifiers)
            .all(|(x, y)| x.name == y.name && same_value(&x.value, &y.value))
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Call(x), Value::Call(y)) => same_invocation(x, y),
        (Value::Call(_), _) | (_, Value::Call(_)) => false,
        _ => a == b,
    }
}
