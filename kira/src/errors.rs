//! Error types for the kira validation engine.
//!
//! Only programmer-side faults live here: malformed contracts, bad validator
//! settings, values of the wrong shape reaching a type-specific validator.
//! Bad end-user input is never an error at this level; it is reported through
//! the errors tree of a [`Form`](crate::form::Form).

use std::collections::HashMap;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = KiraError> = std::result::Result<T, E>;

/// The main error type for kira operations.
#[derive(Debug, Error)]
pub enum KiraError {
    /// Validator settings are malformed or missing a mandatory key.
    #[error("Invalid settings for validator '{validator}': {reason}")]
    InvalidSettings {
        /// The validator kind.
        validator: String,
        /// What is wrong with the settings.
        reason: String,
    },

    /// A contract references a validator kind nobody registered.
    #[error("Unknown validator kind '{name}'")]
    UnknownValidator {
        /// The unregistered tag.
        name: String,
    },

    /// An `external` validator references a check nobody registered.
    #[error("Unknown external check '{name}'")]
    UnknownExternal {
        /// The unregistered check name.
        name: String,
    },

    /// A value of the wrong shape reached a type-specific validator.
    #[error("Validator '{validator}' expects {expected}, got {found}")]
    TypeMismatch {
        /// The validator kind.
        validator: String,
        /// What the validator accepts.
        expected: String,
        /// What it actually received.
        found: String,
    },

    /// The contract tree itself is malformed.
    #[error("Invalid contract at '{path}': {reason}")]
    InvalidContract {
        /// Dotted path of the offending node.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An external check produced a result the engine cannot interpret.
    #[error("External check '{name}' returned an unrecognized result: {reason}")]
    ExternalResult {
        /// The check name.
        name: String,
        /// Description of the unexpected shape.
        reason: String,
    },

    /// An external check failed on its own.
    #[error("External check '{name}' failed: {source}")]
    External {
        /// The check name.
        name: String,
        /// The underlying failure.
        #[source]
        source: anyhow::Error,
    },

    /// A field path could not be parsed or applied.
    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath {
        /// The path as given.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KiraError {
    /// Creates an invalid settings error.
    #[must_use]
    pub fn invalid_settings(validator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSettings {
            validator: validator.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown validator error.
    #[must_use]
    pub fn unknown_validator(name: impl Into<String>) -> Self {
        Self::UnknownValidator { name: name.into() }
    }

    /// Creates an unknown external check error.
    #[must_use]
    pub fn unknown_external(name: impl Into<String>) -> Self {
        Self::UnknownExternal { name: name.into() }
    }

    /// Creates a type mismatch error, describing the offending value.
    #[must_use]
    pub fn type_mismatch(
        validator: impl Into<String>,
        expected: impl Into<String>,
        found: &serde_json::Value,
    ) -> Self {
        Self::TypeMismatch {
            validator: validator.into(),
            expected: expected.into(),
            found: describe_value(found).to_string(),
        }
    }

    /// Creates an invalid contract error.
    #[must_use]
    pub fn invalid_contract(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidContract {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an external result error.
    #[must_use]
    pub fn external_result(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExternalResult {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid path error.
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for the error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSettings { .. } => "KIRA-SETTINGS",
            Self::UnknownValidator { .. } => "KIRA-UNKNOWN-VALIDATOR",
            Self::UnknownExternal { .. } => "KIRA-UNKNOWN-EXTERNAL",
            Self::TypeMismatch { .. } => "KIRA-TYPE-MISMATCH",
            Self::InvalidContract { .. } => "KIRA-CONTRACT",
            Self::ExternalResult { .. } => "KIRA-EXTERNAL-RESULT",
            Self::External { .. } => "KIRA-EXTERNAL",
            Self::InvalidPath { .. } => "KIRA-PATH",
            Self::Serialization(_) => "KIRA-SERDE",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::json!(self.code()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Short human name of a JSON value's type, used in fault messages.
#[must_use]
pub fn describe_value(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_settings_display() {
        let err = KiraError::invalid_settings("enum", "no values given");
        assert_eq!(
            err.to_string(),
            "Invalid settings for validator 'enum': no values given"
        );
        assert_eq!(err.code(), "KIRA-SETTINGS");
    }

    #[test]
    fn test_type_mismatch_describes_value() {
        let err = KiraError::type_mismatch("length", "a string", &serde_json::json!([1, 2]));
        assert_eq!(err.to_string(), "Validator 'length' expects a string, got array");
    }

    #[test]
    fn test_to_dict() {
        let err = KiraError::unknown_validator("frobnicate");
        let dict = err.to_dict();
        assert_eq!(dict.get("code").unwrap(), "KIRA-UNKNOWN-VALIDATOR");
        assert_eq!(dict.get("message").unwrap(), "Unknown validator kind 'frobnicate'");
    }

    #[test]
    fn test_external_error_keeps_source() {
        let err = KiraError::External {
            name: "unique_login".to_string(),
            source: anyhow::anyhow!("database unavailable"),
        };
        assert!(err.to_string().contains("database unavailable"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
