//! Configuration types

use crate::{ConfigError, IgnoreRules};
use serde::{Deserialize, Serialize};

/// Policy applied on top of the pure extraction pipeline.
///
/// The default is lenient: diagnostics stay warnings and nothing is ignored.
/// Repositories on the local file system are left out unless asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Treat any diagnostic as a failure of the whole script.
    pub strict: bool,
    /// Keep repositories whose url uses the `file:` scheme.
    pub include_local_repositories: bool,
    /// `group:artifact[:version]` wildcard rules removing dependencies.
    pub ignore: Vec<String>,
}

impl ExtractorConfig {
    /// Load a configuration from a TOML document.
    ///
    /// ```toml
    /// strict = true
    /// ignore = ["com.google.guava:guava:*-android"]
    /// ```
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(document).map_err(|e| ConfigError::InvalidDocument {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration without building anything from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ignore_rules().map(|_| ())
    }

    /// Compile the `ignore` entries into rules. Line numbers in errors refer
    /// to the 1-based position in the `ignore` list.
    pub fn ignore_rules(&self) -> Result<IgnoreRules, ConfigError> {
        Ok(IgnoreRules::from_lines(self.ignore.iter().map(String::as_str))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, IgnoreRuleError};

    #[test]
    fn test_default_is_lenient() {
        let config = ExtractorConfig::default();
        assert!(!config.strict);
        assert!(!config.include_local_repositories);
        assert!(config.ignore.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = ExtractorConfig::from_toml_str(
            r#"
strict = true
ignore = ["com.google.guava:guava:*-android", "org.springframework:*"]
"#,
        )
        .unwrap();
        assert!(config.strict);
        assert!(!config.include_local_repositories);
        let rules = config.ignore_rules().unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.matches(&Coordinate::parse("org.springframework:spring-core:3.0.0").unwrap()));
    }

    #[test]
    fn test_from_toml_rejects_unknown_fields() {
        let err = ExtractorConfig::from_toml_str("strictness = true").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDocument { .. }));
    }

    #[test]
    fn test_from_toml_rejects_bad_ignore_rule() {
        let err = ExtractorConfig::from_toml_str(r#"ignore = ["ok:rule", "broken"]"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidIgnoreRule(IgnoreRuleError::UnexpectedFormat {
                line: 2,
                rule: "broken".to_string()
            })
        );
    }
}
