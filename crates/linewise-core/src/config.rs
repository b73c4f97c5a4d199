//! Configuration types for linewise.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default selector used when no file set is configured.
pub const DEFAULT_PATHS: &[&str] = &["lib/**/*.rb"];

/// Label of the implicit file set.
pub const DEFAULT_LABEL: &str = "default";

/// Top-level configuration for linewise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Severity threshold for a failing run (default: "error").
    /// Problems at or above this severity make `check` exit non-zero
    /// and `check!()` panic.
    #[serde(default = "default_fail_on")]
    pub fail_on: Severity,

    /// File sets to check, in order.
    #[serde(default, rename = "file_set")]
    pub file_sets: Vec<FileSetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fail_on: default_fail_on(),
            file_sets: vec![FileSetConfig::default()],
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// A document without any `[[file_set]]` gets the default file set.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        if config.file_sets.is_empty() {
            config.file_sets.push(FileSetConfig::default());
        }
        Ok(config)
    }

    /// Replaces the configured selectors with explicit `paths`.
    ///
    /// The first file set's style is kept and every path is walked
    /// recursively, so both files and directories may be given.
    #[must_use]
    pub fn with_paths(mut self, paths: Vec<String>, label: Option<String>) -> Self {
        let mut first = self.file_sets.into_iter().next().unwrap_or_default();
        first.paths = paths;
        first.recursive = true;
        if let Some(label) = label {
            first.label = label;
        }
        self.file_sets = vec![first];
        self
    }
}

fn default_fail_on() -> Severity {
    Severity::Error
}

/// One `[[file_set]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSetConfig {
    /// Label reported alongside this set's problems.
    #[serde(default = "default_label")]
    pub label: String,

    /// Path selectors, relative to the project root.
    #[serde(default = "default_paths")]
    pub paths: Vec<String>,

    /// Treat each selector as a directory to walk for `*.rb` files
    /// instead of a glob pattern.
    #[serde(default)]
    pub recursive: bool,

    /// Per-rule settings; `None` selects the default style.
    #[serde(default)]
    pub style: Option<BTreeMap<String, RuleSetting>>,
}

impl Default for FileSetConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            paths: default_paths(),
            recursive: false,
            style: None,
        }
    }
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_paths() -> Vec<String> {
    DEFAULT_PATHS.iter().map(ToString::to_string).collect()
}

/// Setting for a single rule inside a `style` table.
///
/// Either a bare value (`indentation_spaces = 2`) or a table carrying a
/// severity (`max_line_length = { value = 100, level = "warning" }`).
/// The string `"off"` disables the rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    /// Value with an explicit severity.
    Detailed {
        /// The rule option.
        value: toml::Value,
        /// Severity override.
        #[serde(default)]
        level: Option<Severity>,
    },
    /// Bare option value.
    Value(toml::Value),
}

impl RuleSetting {
    /// The rule option, regardless of form.
    #[must_use]
    pub fn value(&self) -> &toml::Value {
        match self {
            Self::Detailed { value, .. } | Self::Value(value) => value,
        }
    }

    /// Severity override, if one was given.
    #[must_use]
    pub fn level(&self) -> Option<Severity> {
        match self {
            Self::Detailed { level, .. } => *level,
            Self::Value(_) => None,
        }
    }

    /// Whether the rule is switched off.
    #[must_use]
    pub fn is_off(&self) -> bool {
        self.value().as_str() == Some("off")
    }

    /// Reads the option as a non-negative integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for any other value.
    pub fn as_count(&self, rule: &str) -> Result<usize, ConfigError> {
        self.value()
            .as_integer()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| ConfigError::InvalidOption {
                rule: rule.to_string(),
                message: format!("expected a non-negative integer, got `{}`", self.value()),
            })
    }

    /// Reads the option as a boolean.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for any other value.
    pub fn as_bool(&self, rule: &str) -> Result<bool, ConfigError> {
        self.value()
            .as_bool()
            .ok_or_else(|| ConfigError::InvalidOption {
                rule: rule.to_string(),
                message: format!("expected `true` or `false`, got `{}`", self.value()),
            })
    }
}

impl From<i64> for RuleSetting {
    fn from(value: i64) -> Self {
        Self::Value(toml::Value::Integer(value))
    }
}

impl From<bool> for RuleSetting {
    fn from(value: bool) -> Self {
        Self::Value(toml::Value::Boolean(value))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A rule option has the wrong type or range.
    #[error("Invalid option for rule `{rule}`: {message}")]
    InvalidOption {
        /// Rule name.
        rule: String,
        /// What is wrong with the option.
        message: String,
    },

    /// The style names a rule that does not exist.
    #[error("Unknown rule `{rule}`")]
    UnknownRule {
        /// Rule name as written.
        rule: String,
    },
}
