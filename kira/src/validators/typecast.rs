//! The `typecast` validator.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{parse_settings, BuildContext, MessageOverride, Messages, Validator, ValidatorOutcome};
use crate::errors::{KiraError, Result};
use crate::i18n::params;
use crate::utils::{typecast, CastType};

const KIND: &str = "typecast";
const MESSAGES: &[(&str, &str)] = &[("invalid", "Value must be of type {type}")];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypecastSettings {
    #[serde(rename = "type")]
    target: Option<CastType>,
    #[serde(default)]
    message: Option<MessageOverride>,
}

/// Converts a scalar to `string`, `bool`, `int` or `float`.
#[derive(Debug, Clone)]
pub struct Typecast {
    target: CastType,
    messages: Messages,
}

impl Typecast {
    /// Builds from contract settings; `type` is mandatory.
    pub fn build(settings: &Map<String, Value>, ctx: &BuildContext<'_>) -> Result<Box<dyn Validator>> {
        let parsed: TypecastSettings = parse_settings(KIND, settings)?;
        let target = parsed
            .target
            .ok_or_else(|| KiraError::invalid_settings(KIND, "'type' is required"))?;
        Ok(Box::new(Self {
            target,
            messages: Messages::new(KIND, MESSAGES, parsed.message, ctx.translator.clone())?,
        }))
    }

    /// The cast target.
    #[must_use]
    pub fn target(&self) -> CastType {
        self.target
    }
}

impl Validator for Typecast {
    fn kind(&self) -> &str {
        KIND
    }

    fn validate(&self, value: Value) -> Result<ValidatorOutcome> {
        if matches!(value, Value::Array(_) | Value::Object(_)) {
            return Err(KiraError::type_mismatch(KIND, "a scalar", &value));
        }
        Ok(match typecast::cast(&value, self.target) {
            Some(converted) => ValidatorOutcome::Accepted(converted),
            None => ValidatorOutcome::Rejected(
                self.messages
                    .render("invalid", &params([("type", self.target)])),
            ),
        })
    }
}
