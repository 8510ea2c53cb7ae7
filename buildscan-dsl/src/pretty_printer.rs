//! Pretty printer for build-script trees
//!
//! Renders a [`Script`] in canonical form: tab indentation, one statement per
//! line, string literals re-escaped. Parsing the output yields a tree with the
//! same structure (spans aside).

use crate::parser::*;
use std::fmt::{self, Write};

/// Pretty-print a script back to Kotlin-DSL source.
pub fn pretty_print(script: &Script) -> String {
    script.to_string()
}

/// Render a single value as it would appear in source.
pub fn print_value(value: &Value) -> String {
    value.to_string()
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statements(f, &self.statements, 0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, 0)
    }
}

fn write_indent(f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
    for _ in 0..indent {
        f.write_char('\t')?;
    }
    Ok(())
}

fn write_statements(
    f: &mut fmt::Formatter<'_>,
    statements: &[Statement],
    indent: usize,
) -> fmt::Result {
    for statement in statements {
        write_indent(f, indent)?;
        write_statement(f, statement, indent)?;
        f.write_char('\n')?;
    }
    Ok(())
}

fn write_statement(f: &mut fmt::Formatter<'_>, statement: &Statement, indent: usize) -> fmt::Result {
    match statement {
        Statement::Invocation(invocation) => write_invocation(f, invocation, indent),
        Statement::Assignment(assignment) => {
            write_name(f, &assignment.target)?;
            f.write_str(" = ")?;
            write_value(f, &assignment.value, indent)
        }
        Statement::Declaration(declaration) => {
            f.write_str(if declaration.mutable { "var " } else { "val " })?;
            write_name(f, &declaration.name)?;
            if let Some(annotation) = &declaration.type_annotation {
                f.write_str(": ")?;
                write_name(f, annotation)?;
            }
            f.write_str(" = ")?;
            write_value(f, &declaration.value, indent)
        }
    }
}

fn write_invocation(f: &mut fmt::Formatter<'_>, invocation: &Invocation, indent: usize) -> fmt::Result {
    write_name(f, &invocation.name)?;

    if !invocation.type_arguments.is_empty() {
        f.write_char('<')?;
        for (i, argument) in invocation.type_arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_name(f, argument)?;
        }
        f.write_char('>')?;
    }

    if invocation.parenthesized {
        f.write_char('(')?;
        for (i, argument) in invocation.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match argument {
                Argument::Positional(value) => write_value(f, value, indent)?,
                Argument::Named { name, value } => {
                    write_name(f, name)?;
                    f.write_str(" = ")?;
                    write_value(f, value, indent)?;
                }
            }
        }
        f.write_char(')')?;
    }

    if let Some(body) = &invocation.body {
        f.write_str(" {\n")?;
        write_statements(f, body, indent + 1)?;
        write_indent(f, indent)?;
        f.write_char('}')?;
    }

    for modifier in &invocation.modifiers {
        f.write_char(' ')?;
        write_name(f, &modifier.name)?;
        f.write_char(' ')?;
        write_value(f, &modifier.value, indent)?;
    }

    Ok(())
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, indent: usize) -> fmt::Result {
    match value {
        Value::String(literal) => write_string(f, literal),
        Value::Number(n) => f.write_str(n),
        Value::Reference(name) => write_name(f, name),
        Value::Call(invocation) => write_invocation(f, invocation, indent),
    }
}

/// Names whose segments are not plain identifiers are backtick-quoted.
fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if name.split('.').all(is_plain_identifier) {
        f.write_str(name)
    } else {
        write!(f, "`{}`", name)
    }
}

fn is_plain_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Write a double-quoted literal. Template expressions are copied verbatim;
/// every other `$` is escaped.
fn write_string(f: &mut fmt::Formatter<'_>, literal: &StringLiteral) -> fmt::Result {
    let value = &literal.value;
    let mut templates = literal.templates.iter().peekable();
    let mut pos = 0;

    f.write_char('"')?;
    while let Some(c) = value.get(pos..).and_then(|rest| rest.chars().next()) {
        while templates.next_if(|t| t.start < pos).is_some() {}
        if let Some(template) = templates.next_if(|t| t.start == pos) {
            f.write_str(value.get(template.clone()).unwrap_or("$"))?;
            pos = template.end.max(pos + c.len_utf8());
            continue;
        }
        write_char(f, c)?;
        pos += c.len_utf8();
    }
    f.write_char('"')
}

fn write_char(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    match c {
        '$' => f.write_str("\\$"),
        '"' => f.write_str("\\\""),
        '\\' => f.write_str("\\\\"),
        '\n' => f.write_str("\\n"),
        '\t' => f.write_str("\\t"),
        '\r' => f.write_str("\\r"),
        '\u{8}' => f.write_str("\\b"),
        c if c.is_control() => write!(f, "\\u{:04x}", c as u32),
        c => f.write_char(c),
    }
}

// ============================================================================
// TESTS
// ============================================================================
