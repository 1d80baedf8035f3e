//! Configuration types for treelint checks.
//!
//! The engine never parses a configuration syntax of its own; hosts hand it a
//! [`Config`] whose option values are already typed. `Config::parse` accepts
//! the TOML shape used across this workspace's tests and tooling.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::source::SourceError;
use crate::types::Severity;

/// Top-level configuration: one optional table per check, keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Per-check configurations.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,
}

impl Config {
    /// Creates an empty configuration (every check on its defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks whether a check is enabled (absent sections default to enabled).
    #[must_use]
    pub fn is_enabled(&self, check: &str) -> bool {
        self.checks
            .get(check)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a check, if configured.
    #[must_use]
    pub fn severity(&self, check: &str) -> Option<Severity> {
        self.checks.get(check).and_then(|c| c.severity)
    }

    /// Gets the raw per-check section, if present.
    #[must_use]
    pub fn check_config(&self, check: &str) -> Option<&CheckConfig> {
        self.checks.get(check)
    }
}

/// Raw configuration section for one check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Whether this check is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this check's violations.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Node-kind names to listen to, overriding the check's default set.
    #[serde(default)]
    pub tokens: Option<Vec<String>>,

    /// Check-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

/// Typed view of one check's options, bound to the check's name so coercion
/// failures surface as actionable [`ConfigError`]s.
///
/// Every accessor fails fast on a type mismatch rather than silently falling
/// back to the default; a run either starts clean or not at all.
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions<'a> {
    check: &'a str,
    config: Option<&'a CheckConfig>,
}

impl<'a> CheckOptions<'a> {
    /// Binds a check name to its (possibly absent) configuration section.
    #[must_use]
    pub fn new(check: &'a str, config: Option<&'a CheckConfig>) -> Self {
        Self { check, config }
    }

    /// Options view with no configured section: every lookup yields defaults.
    #[must_use]
    pub fn empty(check: &'a str) -> Self {
        Self {
            check,
            config: None,
        }
    }

    /// The owning check's name.
    #[must_use]
    pub fn check_name(&self) -> &'a str {
        self.check
    }

    fn raw(&self, key: &str) -> Option<&'a toml::Value> {
        self.config.and_then(|c| c.options.get(key))
    }

    fn mismatch(&self, key: &str, expected: &str, value: &toml::Value) -> ConfigError {
        ConfigError::InvalidOption {
            check: self.check.to_owned(),
            option: key.to_owned(),
            message: format!("expected {expected}, got `{value}`"),
        }
    }

    /// Boolean option with a default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if the value is not a boolean.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.raw(key) {
            None => Ok(default),
            Some(v) => v.as_bool().ok_or_else(|| self.mismatch(key, "a boolean", v)),
        }
    }

    /// Non-negative integer option with a default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if the value is not an integer
    /// or is negative.
    pub fn get_uint(&self, key: &str, default: usize) -> Result<usize, ConfigError> {
        match self.raw(key) {
            None => Ok(default),
            Some(v) => v
                .as_integer()
                .and_then(|i| usize::try_from(i).ok())
                .ok_or_else(|| self.mismatch(key, "a non-negative integer", v)),
        }
    }

    /// String option, absent when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if the value is not a string.
    pub fn get_str(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.raw(key) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(|s| Some(s.to_owned()))
                .ok_or_else(|| self.mismatch(key, "a string", v)),
        }
    }

    /// String-list option, absent when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if the value is not an array of
    /// strings.
    pub fn get_str_list(&self, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
        match self.raw(key) {
            None => Ok(None),
            Some(v) => {
                let arr = v
                    .as_array()
                    .ok_or_else(|| self.mismatch(key, "an array of strings", v))?;
                arr.iter()
                    .map(|item| {
                        item.as_str()
                            .map(str::to_owned)
                            .ok_or_else(|| self.mismatch(key, "an array of strings", v))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Some)
            }
        }
    }

    /// List of non-negative integers, absent when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if the value is not an array of
    /// non-negative integers.
    pub fn get_uint_list(&self, key: &str) -> Result<Option<Vec<usize>>, ConfigError> {
        match self.raw(key) {
            None => Ok(None),
            Some(v) => {
                let arr = v
                    .as_array()
                    .ok_or_else(|| self.mismatch(key, "an array of integers", v))?;
                arr.iter()
                    .map(|item| {
                        item.as_integer()
                            .and_then(|i| usize::try_from(i).ok())
                            .ok_or_else(|| self.mismatch(key, "an array of integers", v))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Some)
            }
        }
    }

    /// Regular-expression option, compiled here so traversal never compiles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if the value is not a string or
    /// is not a valid pattern.
    pub fn get_regex(&self, key: &str) -> Result<Option<Regex>, ConfigError> {
        match self.get_str(key)? {
            None => Ok(None),
            Some(pattern) => Regex::new(&pattern)
                .map(Some)
                .map_err(|e| ConfigError::InvalidOption {
                    check: self.check.to_owned(),
                    option: key.to_owned(),
                    message: e.to_string(),
                }),
        }
    }

    /// Like [`Self::get_regex`] but with a default pattern.
    ///
    /// # Errors
    ///
    /// As [`Self::get_regex`]. The default must be a valid pattern; a broken
    /// default is a programming error reported the same way.
    pub fn get_regex_or(&self, key: &str, default: &str) -> Result<Regex, ConfigError> {
        match self.get_regex(key)? {
            Some(re) => Ok(re),
            None => Regex::new(default).map_err(|e| ConfigError::InvalidOption {
                check: self.check.to_owned(),
                option: key.to_owned(),
                message: e.to_string(),
            }),
        }
    }
}

/// Configuration and setup errors. All are fatal before any file is walked.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading a config file.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in a config file.
    #[error("failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// An option value failed type coercion or validation.
    #[error("check `{check}`: invalid value for option `{option}`: {message}")]
    InvalidOption {
        /// Check whose option is invalid.
        check: String,
        /// Option name.
        option: String,
        /// What went wrong.
        message: String,
    },

    /// A `tokens` entry names a kind outside the closed set.
    #[error("check `{check}`: unknown token `{token}`")]
    UnknownKind {
        /// Check whose token list is invalid.
        check: String,
        /// The unrecognized token name.
        token: String,
    },

    /// The required ⊆ configured ⊆ acceptable invariant does not hold.
    #[error("check `{check}`: {detail}")]
    KindContract {
        /// Check violating the contract.
        check: String,
        /// Which inclusion failed and for which kind.
        detail: String,
    },

    /// A header spec has no non-blank line.
    #[error("check `{check}`: header `{resource}` has no non-blank lines")]
    EmptyHeader {
        /// Check whose header is empty.
        check: String,
        /// Identity of the offending header source.
        resource: String,
    },

    /// A required external resource could not be read or decoded.
    #[error("check `{check}`: {source}")]
    Resource {
        /// Check that needed the resource.
        check: String,
        /// Underlying resource error.
        source: SourceError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_per_check_tables() {
        let toml = r#"
[checks.illegal-catch]
severity = "warning"
illegalClassNames = ["Throwable"]

[checks.header]
enabled = false
"#;
        let config = Config::parse(toml).unwrap();
        assert!(config.is_enabled("illegal-catch"));
        assert!(!config.is_enabled("header"));
        assert_eq!(config.severity("illegal-catch"), Some(Severity::Warning));

        let opts = CheckOptions::new("illegal-catch", config.check_config("illegal-catch"));
        assert_eq!(
            opts.get_str_list("illegalClassNames").unwrap(),
            Some(vec!["Throwable".to_owned()])
        );
    }

    #[test]
    fn absent_sections_yield_defaults() {
        let config = Config::new();
        assert!(config.is_enabled("anything"));
        let opts = CheckOptions::empty("anything");
        assert_eq!(opts.get_uint("allowedDuplicates", 1).unwrap(), 1);
        assert_eq!(opts.get_str("headerFile").unwrap(), None);
    }

    #[test]
    fn type_mismatch_fails_fast() {
        let toml = r#"
[checks.multiple-string-literals]
allowedDuplicates = "three"
"#;
        let config = Config::parse(toml).unwrap();
        let opts = CheckOptions::new(
            "multiple-string-literals",
            config.check_config("multiple-string-literals"),
        );
        let err = opts.get_uint("allowedDuplicates", 1).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { .. }));
        assert!(err.to_string().contains("allowedDuplicates"));
    }

    #[test]
    fn bad_regex_is_a_config_error() {
        let toml = r#"
[checks.empty-catch-block]
commentFormat = "("
"#;
        let config = Config::parse(toml).unwrap();
        let opts = CheckOptions::new("empty-catch-block", config.check_config("empty-catch-block"));
        assert!(matches!(
            opts.get_regex("commentFormat"),
            Err(ConfigError::InvalidOption { .. })
        ));
    }

    #[test]
    fn tokens_round_trip() {
        let toml = r#"
[checks.illegal-type]
tokens = ["VARIABLE_DEF", "METHOD_DEF"]
"#;
        let config = Config::parse(toml).unwrap();
        let section = config.check_config("illegal-type").unwrap();
        assert_eq!(
            section.tokens.as_deref(),
            Some(&["VARIABLE_DEF".to_owned(), "METHOD_DEF".to_owned()][..])
        );
    }
}
