//! Calculator configuration

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::history::History;
use crate::core::namespace::{MathConstant, MathFunction, DEFAULT_PREFIX};
use crate::core::FAILURE_TEXT;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors from loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML syntax or type error
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON syntax or type error
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A field has an unusable value
    #[error("Invalid config value for '{field}': {message}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    /// Create a validation error
    #[must_use]
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Calculator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Maximum number of history entries kept
    pub history_capacity: usize,
    /// Storage key for the history log
    pub history_key: String,
    /// Storage key for the theme preference
    pub theme_key: String,
    /// Text shown when evaluation fails
    pub failure_text: String,
    /// Qualifying prefix of the math namespace
    pub namespace_prefix: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            history_capacity: History::DEFAULT_CAPACITY,
            history_key: "neocalc_history".to_string(),
            theme_key: "neocalc_theme".to_string(),
            failure_text: FAILURE_TEXT.to_string(),
            namespace_prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl CalculatorConfig {
    /// Largest accepted `history_capacity`
    pub const MAX_HISTORY_CAPACITY: usize = 10_000;

    /// Create default config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set history capacity
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the history storage key
    #[must_use]
    pub fn with_history_key(mut self, key: impl Into<String>) -> Self {
        self.history_key = key.into();
        self
    }

    /// Set the theme storage key
    #[must_use]
    pub fn with_theme_key(mut self, key: impl Into<String>) -> Self {
        self.theme_key = key.into();
        self
    }

    /// Set the failure text
    #[must_use]
    pub fn with_failure_text(mut self, text: impl Into<String>) -> Self {
        self.failure_text = text.into();
        self
    }

    /// Set the namespace prefix
    #[must_use]
    pub fn with_namespace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.namespace_prefix = prefix.into();
        self
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file: `.json` is read as JSON, anything else as YAML
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Check field invariants
    pub fn validate(&self) -> ConfigResult<()> {
        if self.history_capacity == 0 {
            return Err(ConfigError::invalid(
                "history_capacity",
                "must be greater than zero",
            ));
        }
        if self.history_capacity > Self::MAX_HISTORY_CAPACITY {
            return Err(ConfigError::invalid(
                "history_capacity",
                format!("must be at most {}", Self::MAX_HISTORY_CAPACITY),
            ));
        }
        if self.history_key.is_empty() {
            return Err(ConfigError::invalid("history_key", "must not be empty"));
        }
        if self.theme_key.is_empty() {
            return Err(ConfigError::invalid("theme_key", "must not be empty"));
        }
        if self.history_key == self.theme_key {
            return Err(ConfigError::invalid(
                "theme_key",
                "must differ from history_key",
            ));
        }
        if self.failure_text.is_empty() {
            return Err(ConfigError::invalid("failure_text", "must not be empty"));
        }
        validate_prefix(&self.namespace_prefix)
    }
}

fn validate_prefix(prefix: &str) -> ConfigResult<()> {
    let mut chars = prefix.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::invalid(
            "namespace_prefix",
            format!("'{prefix}' is not a plain identifier"),
        ));
    }

    let shadows_member = MathFunction::ALL.iter().any(|f| f.name() == prefix)
        || MathConstant::ALL.iter().any(|c| c.name() == prefix);
    if shadows_member {
        return Err(ConfigError::invalid(
            "namespace_prefix",
            format!("'{prefix}' collides with a namespace member"),
        ));
    }
    Ok(())
}
