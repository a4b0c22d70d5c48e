//! The `required` validator.
//!
//! Always runs first on a leaf and alone decides whether an empty value may
//! skip the rest of the chain.

use serde::Deserialize;
use serde_json::Value;

use super::{parse_settings, settings_map, MessageOverride, Messages, Validator, ValidatorOutcome};
use crate::errors::Result;
use crate::i18n::{Params, SharedTranslator};

const KIND: &str = "required";
const MESSAGES: &[(&str, &str)] = &[("required", "Field is required")];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RequiredSettings {
    #[serde(default = "default_strict")]
    strict: bool,
    #[serde(default)]
    message: Option<MessageOverride>,
}

fn default_strict() -> bool {
    true
}

/// Presence check.
///
/// | value            | strict | non-strict |
/// |------------------|--------|------------|
/// | null             | fail   | fail       |
/// | `""`, `"   "`    | fail   | pass       |
/// | `[]`, `{}`       | fail   | pass       |
/// | `[null, null]`   | pass   | pass       |
/// | `"0"`, `0`, false| pass   | pass       |
#[derive(Debug, Clone)]
pub struct Required {
    enabled: bool,
    strict: bool,
    messages: Messages,
}

impl Required {
    /// Builds from contract settings; `false` yields a disabled check.
    pub fn from_settings(settings: &Value, translator: &SharedTranslator) -> Result<Self> {
        let Some(map) = settings_map(KIND, settings)? else {
            return Self::disabled(translator);
        };
        let parsed: RequiredSettings = parse_settings(KIND, &map)?;
        Ok(Self {
            enabled: true,
            strict: parsed.strict,
            messages: Messages::new(KIND, MESSAGES, parsed.message, translator.clone())?,
        })
    }

    /// A check that is switched off: the field is optional.
    pub fn disabled(translator: &SharedTranslator) -> Result<Self> {
        Ok(Self {
            enabled: false,
            strict: true,
            messages: Messages::new(KIND, MESSAGES, None, translator.clone())?,
        })
    }

    /// True when the field must be present.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True for the strict variant.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Whether `value` counts as present under this check's mode.
    #[must_use]
    pub fn is_present(&self, value: &Value) -> bool {
        match value {
            Value::Null => false,
            _ if !self.strict => true,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(list) => !list.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Bool(_) | Value::Number(_) => true,
        }
    }

    /// The message reported for a missing value.
    #[must_use]
    pub fn message(&self) -> String {
        self.messages.render("required", &Params::new())
    }
}

impl Validator for Required {
    fn kind(&self) -> &str {
        KIND
    }

    fn validate(&self, value: Value) -> Result<ValidatorOutcome> {
        if !self.enabled || self.is_present(&value) {
            Ok(ValidatorOutcome::Accepted(value))
        } else {
            Ok(ValidatorOutcome::Rejected(self.message()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n;
    use serde_json::json;

    fn required(settings: Value) -> Required {
        Required::from_settings(&settings, &i18n::identity()).unwrap()
    }

    #[test]
    fn test_strict_truth_table() {
        let r = required(json!(true));
        assert!(r.is_enabled() && r.is_strict());
        assert!(!r.is_present(&json!(null)));
        assert!(!r.is_present(&json!("")));
        assert!(!r.is_present(&json!("   ")));
        assert!(!r.is_present(&json!([])));
        assert!(!r.is_present(&json!({})));
        assert!(r.is_present(&json!([null, null])));
        assert!(r.is_present(&json!("0")));
        assert!(r.is_present(&json!(0)));
        assert!(r.is_present(&json!(false)));
    }

    #[test]
    fn test_non_strict_truth_table() {
        let r = required(json!({"strict": false}));
        assert!(!r.is_strict());
        assert!(!r.is_present(&json!(null)));
        assert!(r.is_present(&json!("")));
        assert!(r.is_present(&json!("   ")));
        assert!(r.is_present(&json!([])));
        assert!(r.is_present(&json!({})));
        assert!(r.is_present(&json!([null, null])));
        assert!(r.is_present(&json!("0")));
    }

    #[test]
    fn test_validate_messages() {
        let r = required(json!(true));
        assert_eq!(
            r.validate(json!("")).unwrap(),
            ValidatorOutcome::Rejected("Field is required".into())
        );
        assert_eq!(r.validate(json!("x")).unwrap(), ValidatorOutcome::Accepted(json!("x")));

        let custom = required(json!({"message": "Tell us your name"}));
        assert_eq!(
            custom.validate(json!(null)).unwrap().error(),
            Some("Tell us your name")
        );
    }

    #[test]
    fn test_disabled_accepts_everything() {
        let r = required(json!(false));
        assert!(!r.is_enabled());
        assert!(r.validate(json!(null)).unwrap().is_accepted());
    }

    #[test]
    fn test_bad_settings() {
        assert!(Required::from_settings(&json!({"strickt": true}), &i18n::identity()).is_err());
        assert!(Required::from_settings(&json!(1), &i18n::identity()).is_err());
    }
}
