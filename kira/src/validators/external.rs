//! The `external` validator: delegates to application code.
//!
//! Applications register named checks on the [`ValidatorRegistry`]
//! (`register_external`); a contract references one by name through the
//! `class` setting.
//!
//! [`ValidatorRegistry`]: super::ValidatorRegistry

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use super::{parse_settings, BuildContext, MessageOverride, Messages, Validator, ValidatorOutcome};
use crate::errors::{KiraError, Result};
use crate::i18n::Params;

const KIND: &str = "external";
const MESSAGES: &[(&str, &str)] = &[("invalid", "Invalid value")];

/// What an external check decided.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalVerdict {
    /// Valid; the value is kept as is.
    Pass,
    /// Valid; the value is replaced.
    PassWith(Value),
    /// Invalid, with an optional message of the check's own.
    Fail(Option<String>),
}

impl ExternalVerdict {
    /// Reads a loosely shaped result: `true`, `false`, or a mapping with a
    /// boolean `valid` plus optional `value` and `error`.
    ///
    /// # Errors
    ///
    /// Any other shape is reported as [`KiraError::ExternalResult`].
    pub fn from_json(name: &str, result: Value) -> Result<Self> {
        match result {
            Value::Bool(true) => Ok(Self::Pass),
            Value::Bool(false) => Ok(Self::Fail(None)),
            Value::Object(mut map) => {
                let valid = match map.remove("valid") {
                    Some(Value::Bool(valid)) => valid,
                    _ => {
                        return Err(KiraError::external_result(name, "mapping result needs a boolean 'valid'"))
                    }
                };
                let value = map.remove("value");
                let error = match map.remove("error") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(message)) => Some(message),
                    Some(_) => return Err(KiraError::external_result(name, "'error' must be a string")),
                };
                if let Some(extra) = map.keys().next() {
                    return Err(KiraError::external_result(name, format!("unexpected key '{extra}'")));
                }
                Ok(match (valid, value) {
                    (true, Some(value)) => Self::PassWith(value),
                    (true, None) => Self::Pass,
                    (false, _) => Self::Fail(error),
                })
            }
            other => Err(KiraError::external_result(
                name,
                format!("expected a boolean or a mapping, got {}", crate::errors::describe_value(&other)),
            )),
        }
    }
}

/// Application-provided validation logic.
pub trait ExternalCheck: Send + Sync {
    /// Checks `value`; `options` are the contract's `options` setting, or null.
    ///
    /// An `Err` is a failure of the check itself (a lost database
    /// connection, say) and aborts validation.
    fn check(&self, value: &Value, options: &Value) -> anyhow::Result<ExternalVerdict>;
}

/// Wraps a closure as an [`ExternalCheck`].
pub struct FnExternal<F> {
    f: F,
}

impl<F> FnExternal<F>
where
    F: Fn(&Value, &Value) -> anyhow::Result<ExternalVerdict> + Send + Sync,
{
    /// Creates the wrapper.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ExternalCheck for FnExternal<F>
where
    F: Fn(&Value, &Value) -> anyhow::Result<ExternalVerdict> + Send + Sync,
{
    fn check(&self, value: &Value, options: &Value) -> anyhow::Result<ExternalVerdict> {
        (self.f)(value, options)
    }
}

/// Wraps a closure returning a loosely shaped JSON result, decoded with
/// [`ExternalVerdict::from_json`].
pub struct JsonExternal<F> {
    name: String,
    f: F,
}

impl<F> JsonExternal<F>
where
    F: Fn(&Value, &Value) -> anyhow::Result<Value> + Send + Sync,
{
    /// Creates the wrapper; `name` is used in fault reports.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> ExternalCheck for JsonExternal<F>
where
    F: Fn(&Value, &Value) -> anyhow::Result<Value> + Send + Sync,
{
    fn check(&self, value: &Value, options: &Value) -> anyhow::Result<ExternalVerdict> {
        let raw = (self.f)(value, options)?;
        Ok(ExternalVerdict::from_json(&self.name, raw)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExternalSettings {
    class: Option<String>,
    #[serde(default)]
    options: Value,
    #[serde(default)]
    message: Option<MessageOverride>,
}

/// Contract-side handle on a registered external check.
pub(crate) struct External {
    name: String,
    check: Arc<dyn ExternalCheck>,
    options: Value,
    messages: Messages,
}

impl External {
    pub(crate) fn build(settings: &Map<String, Value>, ctx: &BuildContext<'_>) -> Result<Box<dyn Validator>> {
        let parsed: ExternalSettings = parse_settings(KIND, settings)?;
        let name = parsed
            .class
            .ok_or_else(|| KiraError::invalid_settings(KIND, "'class' is required"))?;
        let check = ctx.registry.external(&name)?;
        Ok(Box::new(Self {
            name,
            check,
            options: parsed.options,
            messages: Messages::new(KIND, MESSAGES, parsed.message, ctx.translator.clone())?,
        }))
    }
}

impl fmt::Debug for External {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("External")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Validator for External {
    fn kind(&self) -> &str {
        KIND
    }

    fn validate(&self, value: Value) -> Result<ValidatorOutcome> {
        let verdict = self
            .check
            .check(&value, &self.options)
            .map_err(|source| match source.downcast::<KiraError>() {
                Ok(fault) => fault,
                Err(source) => KiraError::External {
                    name: self.name.clone(),
                    source,
                },
            })?;
        Ok(match verdict {
            ExternalVerdict::Pass => ValidatorOutcome::Accepted(value),
            ExternalVerdict::PassWith(replacement) => ValidatorOutcome::Accepted(replacement),
            ExternalVerdict::Fail(own) => {
                let message = match own {
                    Some(phrase) => self.messages.render_custom("invalid", &phrase, &Params::new()),
                    None => self.messages.render("invalid", &Params::new()),
                };
                ValidatorOutcome::Rejected(message)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{build_with_registry, ValidatorRegistry};
    use serde_json::json;

    fn registry() -> ValidatorRegistry {
        let registry = ValidatorRegistry::with_builtins();
        registry.register_external(
            "username_free",
            Arc::new(FnExternal::new(|value: &Value, options: &Value| {
                let taken = options["taken"].as_array().cloned().unwrap_or_default();
                if taken.contains(value) {
                    Ok(ExternalVerdict::Fail(Some("Username is taken".into())))
                } else {
                    Ok(ExternalVerdict::Pass)
                }
            })),
        );
        registry.register_external(
            "slugify",
            Arc::new(JsonExternal::new("slugify", |value: &Value, _: &Value| {
                let slug = value.as_str().unwrap_or_default().to_lowercase().replace(' ', "-");
                Ok(json!({"valid": true, "value": slug}))
            })),
        );
        registry.register_external(
            "broken",
            Arc::new(JsonExternal::new("broken", |_: &Value, _: &Value| Ok(json!(42)))),
        );
        registry.register_external(
            "offline",
            Arc::new(FnExternal::new(|_: &Value, _: &Value| {
                Err(anyhow::anyhow!("connection refused"))
            })),
        );
        registry
    }

    #[test]
    fn test_pass_and_fail_with_own_message() {
        let registry = registry();
        let v = build_with_registry(
            &registry,
            "external",
            json!({"class": "username_free", "options": {"taken": ["root"]}}),
        )
        .unwrap();
        assert!(v.validate(json!("alex")).unwrap().is_accepted());
        assert_eq!(v.validate(json!("root")).unwrap().error(), Some("Username is taken"));
    }

    #[test]
    fn test_override_beats_own_message() {
        let registry = registry();
        let v = build_with_registry(
            &registry,
            "external",
            json!({"class": "username_free", "options": {"taken": ["root"]}, "message": "Pick another"}),
        )
        .unwrap();
        assert_eq!(v.validate(json!("root")).unwrap().error(), Some("Pick another"));
    }

    #[test]
    fn test_replacement_value() {
        let registry = registry();
        let v = build_with_registry(&registry, "external", json!({"class": "slugify"})).unwrap();
        assert_eq!(
            v.validate(json!("Hello World")).unwrap(),
            ValidatorOutcome::Accepted(json!("hello-world"))
        );
    }

    #[test]
    fn test_faults() {
        let registry = registry();
        assert!(matches!(
            build_with_registry(&registry, "external", json!({"class": "nope"})).unwrap_err(),
            KiraError::UnknownExternal { .. }
        ));
        assert!(build_with_registry(&registry, "external", json!(true)).is_err());

        let broken = build_with_registry(&registry, "external", json!({"class": "broken"})).unwrap();
        assert!(matches!(
            broken.validate(json!("x")).unwrap_err(),
            KiraError::ExternalResult { .. }
        ));

        let offline = build_with_registry(&registry, "external", json!({"class": "offline"})).unwrap();
        let err = offline.validate(json!("x")).unwrap_err();
        assert!(matches!(err, KiraError::External { ref name, .. } if name == "offline"));
    }

    #[test]
    fn test_verdict_from_json() {
        assert_eq!(ExternalVerdict::from_json("x", json!(true)).unwrap(), ExternalVerdict::Pass);
        assert_eq!(ExternalVerdict::from_json("x", json!(false)).unwrap(), ExternalVerdict::Fail(None));
        assert_eq!(
            ExternalVerdict::from_json("x", json!({"valid": false, "error": "no"})).unwrap(),
            ExternalVerdict::Fail(Some("no".into()))
        );
        assert!(ExternalVerdict::from_json("x", json!({"valid": "yes"})).is_err());
        assert!(ExternalVerdict::from_json("x", json!({"valid": true, "extra": 1})).is_err());
        assert!(ExternalVerdict::from_json("x", json!("ok")).is_err());
    }
}
