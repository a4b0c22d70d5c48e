//! Validator units.
//!
//! A validator takes one value and either accepts it (possibly transformed)
//! or rejects it with a user-facing message. Settings are parsed once, when
//! the contract is loaded, into a typed struct per kind.
//!
//! Two failure channels are kept apart:
//! - `Ok(ValidatorOutcome::Rejected(..))` is bad end-user input
//! - `Err(KiraError)` is a contract mistake (wrong value shape, broken external check)

mod date;
mod email;
mod enumeration;
mod expect_id;
mod external;
mod filter_var;
mod limits;
mod messages;
mod normalize;
mod registry;
mod required;
mod typecast;

pub use date::Date;
pub use email::Email;
pub use enumeration::Enum;
pub use expect_id::ExpectId;
pub use external::{ExternalCheck, ExternalVerdict, FnExternal, JsonExternal};
pub use filter_var::FilterVar;
pub use limits::{Limits, Measure};
pub use messages::{MessageOverride, Messages};
pub use normalize::NormalizeString;
pub use registry::{BuildContext, ValidatorFactory, ValidatorRegistry};
pub use required::Required;
pub use typecast::Typecast;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::{KiraError, Result};

/// Result of running one validator on one value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatorOutcome {
    /// The value passed; carries the value to hand to the next validator.
    Accepted(Value),
    /// The value failed; carries the translated message.
    Rejected(String),
}

impl ValidatorOutcome {
    /// True for [`ValidatorOutcome::Accepted`].
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The accepted value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Accepted(v) => Some(v),
            Self::Rejected(_) => None,
        }
    }

    /// The rejection message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(m) => Some(m),
        }
    }
}

/// A single-purpose checking and transforming rule.
pub trait Validator: Send + Sync + fmt::Debug {
    /// The registry tag of this validator.
    fn kind(&self) -> &str;

    /// Checks `value`.
    ///
    /// # Errors
    ///
    /// Returns `KiraError` when the value has a shape this validator was never
    /// meant to receive, or when a delegated check fails on its own.
    fn validate(&self, value: Value) -> Result<ValidatorOutcome>;
}

/// Normalizes raw settings: `true` means defaults, `false` disables, a
/// mapping is taken as-is.
pub fn settings_map(kind: &str, settings: &Value) -> Result<Option<Map<String, Value>>> {
    match settings {
        Value::Bool(true) => Ok(Some(Map::new())),
        Value::Bool(false) => Ok(None),
        Value::Object(map) => Ok(Some(map.clone())),
        other => Err(KiraError::invalid_settings(
            kind,
            format!(
                "settings must be true, false or a mapping, got {}",
                crate::errors::describe_value(other)
            ),
        )),
    }
}

/// Deserializes a settings mapping into the typed settings of `kind`.
pub fn parse_settings<T: DeserializeOwned>(kind: &str, settings: &Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(settings.clone()))
        .map_err(|e| KiraError::invalid_settings(kind, e.to_string()))
}

/// Reads a scalar as text for validators that work on strings.
///
/// Lists, maps and null are contract faults.
pub(crate) fn scalar_text(kind: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(if *b { "1".to_string() } else { String::new() }),
        other => Err(KiraError::type_mismatch(kind, "a scalar", other)),
    }
}

/// Renders a numeric bound without a trailing `.0` for whole numbers.
pub(crate) fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}

/// Builds a built-in validator with default configuration, for unit tests.
#[cfg(test)]
pub(crate) fn build_for_test(kind: &str, settings: Value) -> Result<Box<dyn Validator>> {
    build_with_registry(&ValidatorRegistry::with_builtins(), kind, settings)
}

#[cfg(test)]
pub(crate) fn build_with_registry(
    registry: &ValidatorRegistry,
    kind: &str,
    settings: Value,
) -> Result<Box<dyn Validator>> {
    let config = crate::config::ValidationConfig::default();
    registry
        .build(kind, &settings, &config, &crate::i18n::identity())
        .map(|v| v.expect("validator enabled in test settings"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        #[serde(default)]
        max: Option<u32>,
    }

    #[test]
    fn test_settings_map() {
        assert_eq!(settings_map("x", &json!(true)).unwrap(), Some(Map::new()));
        assert_eq!(settings_map("x", &json!(false)).unwrap(), None);
        assert!(settings_map("x", &json!({"max": 3})).unwrap().is_some());
        assert!(settings_map("x", &json!("oops")).is_err());
        assert!(settings_map("x", &json!(null)).is_err());
    }

    #[test]
    fn test_parse_settings() {
        let map = settings_map("x", &json!({"max": 3})).unwrap().unwrap();
        let parsed: Sample = parse_settings("x", &map).unwrap();
        assert_eq!(parsed.max, Some(3));

        let bad = settings_map("x", &json!({"maximum": 3})).unwrap().unwrap();
        let err = parse_settings::<Sample>("x", &bad).unwrap_err();
        assert!(matches!(err, KiraError::InvalidSettings { .. }));
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text("x", &json!("a")).unwrap(), "a");
        assert_eq!(scalar_text("x", &json!(12)).unwrap(), "12");
        assert!(scalar_text("x", &json!(["a"])).is_err());
    }

    #[test]
    fn test_format_bound() {
        assert_eq!(format_bound(10.0), "10");
        assert_eq!(format_bound(2.5), "2.5");
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = ValidatorOutcome::Accepted(json!(1));
        assert!(ok.is_accepted());
        assert_eq!(ok.value(), Some(&json!(1)));
        let bad = ValidatorOutcome::Rejected("nope".into());
        assert_eq!(bad.error(), Some("nope"));
        assert_eq!(bad.value(), None);
    }
}
