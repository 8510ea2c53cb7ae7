//! Coordinate filters and ignore rules
//!
//! Filters decide whether a dependency coordinate is kept in a report.
//! Wildcard expressions use `?` for exactly one character and `*` for any
//! run of characters, match the whole segment, and ignore case.

use crate::{Coordinate, IgnoreRuleError};
use regex::{Regex, RegexBuilder};
use std::fmt;

const COMMENT_START: char = '#';
const SEPARATOR: char = ':';

/// Predicate over dependency coordinates.
pub trait CoordinateFilter: fmt::Debug + Send + Sync {
    fn accept(&self, coordinate: &Coordinate) -> bool;
}

/// Accepts every coordinate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl CoordinateFilter for AcceptAll {
    fn accept(&self, _coordinate: &Coordinate) -> bool {
        true
    }
}

/// Rejects every coordinate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptNone;

impl CoordinateFilter for AcceptNone {
    fn accept(&self, _coordinate: &Coordinate) -> bool {
        false
    }
}

/// Compile a wildcard expression into an anchored, case-insensitive regex.
fn wildcard_pattern(expression: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::with_capacity(expression.len() + 8);
    pattern.push('^');
    let mut buf = [0u8; 4];
    for c in expression.chars() {
        match c {
            '?' => pattern.push('.'),
            '*' => pattern.push_str(".*"),
            c => pattern.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    pattern.push('$');
    RegexBuilder::new(&pattern).case_insensitive(true).build()
}

/// Matches coordinates by group, and optionally artifact and version.
#[derive(Debug, Clone)]
pub struct WildcardFilter {
    group: Regex,
    artifact: Option<Regex>,
    version: Option<Regex>,
}

impl WildcardFilter {
    pub fn new(
        group: &str,
        artifact: Option<&str>,
        version: Option<&str>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            group: wildcard_pattern(group)?,
            artifact: artifact.map(wildcard_pattern).transpose()?,
            version: version.map(wildcard_pattern).transpose()?,
        })
    }
}

impl CoordinateFilter for WildcardFilter {
    fn accept(&self, coordinate: &Coordinate) -> bool {
        self.group.is_match(&coordinate.group)
            && self
                .artifact
                .as_ref()
                .map_or(true, |artifact| artifact.is_match(&coordinate.artifact))
            && self
                .version
                .as_ref()
                .map_or(true, |version| version.is_match(&coordinate.version))
    }
}

/// How a composite combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    All,
    Any,
    None,
}

/// Combines several filters.
#[derive(Debug)]
pub struct CompositeFilter {
    mode: MatchMode,
    filters: Vec<Box<dyn CoordinateFilter>>,
}

impl CompositeFilter {
    /// Accepts when every child accepts.
    pub fn all(filters: Vec<Box<dyn CoordinateFilter>>) -> Self {
        Self {
            mode: MatchMode::All,
            filters,
        }
    }

    /// Accepts when at least one child accepts.
    pub fn any(filters: Vec<Box<dyn CoordinateFilter>>) -> Self {
        Self {
            mode: MatchMode::Any,
            filters,
        }
    }

    /// Accepts when no child accepts.
    pub fn none(filters: Vec<Box<dyn CoordinateFilter>>) -> Self {
        Self {
            mode: MatchMode::None,
            filters,
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl CoordinateFilter for CompositeFilter {
    fn accept(&self, coordinate: &Coordinate) -> bool {
        match self.mode {
            MatchMode::All => self.filters.iter().all(|f| f.accept(coordinate)),
            MatchMode::Any => self.filters.iter().any(|f| f.accept(coordinate)),
            MatchMode::None => !self.filters.iter().any(|f| f.accept(coordinate)),
        }
    }
}

// ============================================================================
// IGNORE RULES
// ============================================================================

/// Set of `group:artifact[:version]` rules removing dependencies from a report.
#[derive(Debug)]
pub struct IgnoreRules {
    rules: CompositeFilter,
}

impl IgnoreRules {
    pub fn empty() -> Self {
        Self {
            rules: CompositeFilter::any(Vec::new()),
        }
    }

    /// Parse rules from ignore-file text. `#` starts a comment; blank lines
    /// are skipped.
    pub fn parse(text: &str) -> Result<Self, IgnoreRuleError> {
        Self::from_lines(text.lines())
    }

    /// Parse one rule per item; items may carry `#` comments too.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self, IgnoreRuleError> {
        let mut filters: Vec<Box<dyn CoordinateFilter>> = Vec::new();
        for (index, raw) in lines.into_iter().enumerate() {
            let line = index + 1;
            let rule = raw.split(COMMENT_START).next().unwrap_or_default().trim();
            if rule.is_empty() {
                continue;
            }
            filters.push(Box::new(parse_rule(rule, line)?));
        }
        tracing::debug!(rules = filters.len(), "Parsed ignore rules");
        Ok(Self {
            rules: CompositeFilter::any(filters),
        })
    }

    /// Check if a coordinate is ignored by any rule.
    pub fn matches(&self, coordinate: &Coordinate) -> bool {
        self.rules.accept(coordinate)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::empty()
    }
}

fn parse_rule(rule: &str, line: usize) -> Result<WildcardFilter, IgnoreRuleError> {
    let parts: Vec<&str> = rule.split(SEPARATOR).collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(IgnoreRuleError::UnexpectedFormat {
            line,
            rule: rule.to_string(),
        });
    }
    if parts[0].is_empty() {
        return Err(IgnoreRuleError::EmptyGroup {
            line,
            rule: rule.to_string(),
        });
    }
    if parts[1].is_empty() {
        return Err(IgnoreRuleError::EmptyArtifact {
            line,
            rule: rule.to_string(),
        });
    }
    let version = parts.get(2).copied();
    if version.is_some_and(str::is_empty) {
        return Err(IgnoreRuleError::EmptyVersion {
            line,
            rule: rule.to_string(),
        });
    }
    WildcardFilter::new(parts[0], Some(parts[1]), version).map_err(|_| {
        IgnoreRuleError::InvalidPattern {
            line,
            rule: rule.to_string(),
        }
    })
}

// ============================================================================
// TESTS
// ============================================================================
