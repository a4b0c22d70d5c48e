//! The `expect_id` validator: a non-negative integer identifier.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{parse_settings, BuildContext, MessageOverride, Messages, Validator, ValidatorOutcome};
use crate::errors::{KiraError, Result};
use crate::i18n::Params;
use crate::utils::typecast;

const KIND: &str = "expect_id";
const MESSAGES: &[(&str, &str)] = &[("invalid", "Value must be a valid identifier")];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExpectIdSettings {
    #[serde(default)]
    message: Option<MessageOverride>,
}

/// Accepts non-negative integers and digit strings, converting to a number.
///
/// `"0034"` becomes `34`; `-7`, `"abc"` and `1.5` are rejected.
#[derive(Debug, Clone)]
pub struct ExpectId {
    messages: Messages,
}

impl ExpectId {
    /// Builds from contract settings.
    pub fn build(settings: &Map<String, Value>, ctx: &BuildContext<'_>) -> Result<Box<dyn Validator>> {
        let parsed: ExpectIdSettings = parse_settings(KIND, settings)?;
        Ok(Box::new(Self {
            messages: Messages::new(KIND, MESSAGES, parsed.message, ctx.translator.clone())?,
        }))
    }

    fn read(value: &Value) -> Result<Option<u64>> {
        match value {
            Value::String(s) => {
                let digits = s.trim();
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Ok(None);
                }
                Ok(digits.parse::<u64>().ok())
            }
            Value::Number(_) => Ok(typecast::to_int(value).and_then(|n| u64::try_from(n).ok())),
            other => Err(KiraError::type_mismatch(KIND, "a string or a number", other)),
        }
    }
}

impl Validator for ExpectId {
    fn kind(&self) -> &str {
        KIND
    }

    fn validate(&self, value: Value) -> Result<ValidatorOutcome> {
        Ok(match Self::read(&value)? {
            Some(id) => ValidatorOutcome::Accepted(Value::Number(id.into())),
            None => ValidatorOutcome::Rejected(self.messages.render("invalid", &Params::new())),
        })
    }
}
