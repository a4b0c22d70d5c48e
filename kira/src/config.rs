//! Engine-wide configuration.
//!
//! The configuration is handed to validator factories at contract load time,
//! so defaults such as the date format or the e-mail pattern never come from
//! process-wide state.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::utils::MergeMode;

/// Configuration for the validation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Default format for the `date` validator.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Default pattern for the `email` validator.
    #[serde(default = "default_email_regexp")]
    pub email_regexp: String,
    /// Mail servers rejected by every `email` validator.
    #[serde(default)]
    pub email_black_servers: Vec<String>,
    /// Raw-data field holding the CSRF token.
    #[serde(default = "default_csrf_field")]
    pub csrf_field: String,
    /// Separator used by `Form::errors_as_string`.
    #[serde(default = "default_error_separator")]
    pub error_separator: String,
    /// Whether `Form::load` overwrites list entries by index instead of appending.
    #[serde(default)]
    pub merge_numeric_keys_as_named: bool,
}

fn default_date_format() -> String {
    "Y-m-d H:i:s".to_string()
}

fn default_email_regexp() -> String {
    r"^[a-zA-Z0-9._%+\-]+@([a-zA-Z0-9\-]+\.)+[a-zA-Z]{2,}$".to_string()
}

fn default_csrf_field() -> String {
    "_csrf".to_string()
}

fn default_error_separator() -> String {
    "\n".to_string()
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            email_regexp: default_email_regexp(),
            email_black_servers: Vec::new(),
            csrf_field: default_csrf_field(),
            error_separator: default_error_separator(),
            merge_numeric_keys_as_named: false,
        }
    }
}

impl ValidationConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from JSON; missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the default date format.
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Sets the default e-mail pattern.
    #[must_use]
    pub fn with_email_regexp(mut self, regexp: impl Into<String>) -> Self {
        self.email_regexp = regexp.into();
        self
    }

    /// Adds a globally blacklisted mail server.
    #[must_use]
    pub fn with_black_server(mut self, server: impl Into<String>) -> Self {
        self.email_black_servers.push(server.into());
        self
    }

    /// Sets the CSRF token field name.
    #[must_use]
    pub fn with_csrf_field(mut self, field: impl Into<String>) -> Self {
        self.csrf_field = field.into();
        self
    }

    /// Sets the separator for flattened error strings.
    #[must_use]
    pub fn with_error_separator(mut self, separator: impl Into<String>) -> Self {
        self.error_separator = separator.into();
        self
    }

    /// Makes `Form::load` overwrite list entries by index.
    #[must_use]
    pub fn with_numeric_keys_as_named(mut self) -> Self {
        self.merge_numeric_keys_as_named = true;
        self
    }

    /// The merge mode `Form::load` uses by default.
    #[must_use]
    pub fn merge_mode(&self) -> MergeMode {
        if self.merge_numeric_keys_as_named {
            MergeMode::NumericAsNamed
        } else {
            MergeMode::AppendNumeric
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidationConfig::default();
        assert_eq!(config.date_format, "Y-m-d H:i:s");
        assert_eq!(config.csrf_field, "_csrf");
        assert_eq!(config.error_separator, "\n");
        assert!(config.email_black_servers.is_empty());
        assert_eq!(config.merge_mode(), MergeMode::AppendNumeric);
    }

    #[test]
    fn test_from_json_partial() {
        let config = ValidationConfig::from_json_str(
            r#"{"date_format": "d.m.Y", "email_black_servers": ["mailinator.com"]}"#,
        )
        .unwrap();
        assert_eq!(config.date_format, "d.m.Y");
        assert_eq!(config.email_black_servers, vec!["mailinator.com".to_string()]);
        assert_eq!(config.csrf_field, "_csrf");
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(ValidationConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_builder() {
        let config = ValidationConfig::new()
            .with_date_format("Y-m-d")
            .with_black_server("spam.example")
            .with_csrf_field("token")
            .with_error_separator("; ")
            .with_numeric_keys_as_named();

        assert_eq!(config.date_format, "Y-m-d");
        assert_eq!(config.email_black_servers, vec!["spam.example".to_string()]);
        assert_eq!(config.csrf_field, "token");
        assert_eq!(config.error_separator, "; ");
        assert_eq!(config.merge_mode(), MergeMode::NumericAsNamed);
    }
}
