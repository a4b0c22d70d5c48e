//! The `enum` validator: the value must be one of a fixed set.

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{parse_settings, BuildContext, MessageOverride, Messages, Validator, ValidatorOutcome};
use crate::errors::{KiraError, Result};
use crate::i18n::params;

const KIND: &str = "enum";
const MESSAGES: &[(&str, &str)] = &[("not_allowed", "Value must be one of: {values}")];

/// Allowed values, given either as a list or as a `a|b|c` string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AllowedValues {
    Joined(String),
    List(Vec<Value>),
}

impl AllowedValues {
    fn into_strings(self) -> Result<Vec<String>> {
        match self {
            Self::Joined(joined) => Ok(joined.split('|').map(str::to_string).collect()),
            Self::List(list) => list
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    Value::Number(n) => Ok(n.to_string()),
                    other => Err(KiraError::invalid_settings(
                        KIND,
                        format!(
                            "allowed values must be strings or numbers, got {}",
                            crate::errors::describe_value(&other)
                        ),
                    )),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnumSettings {
    #[serde(default)]
    values: Option<AllowedValues>,
    #[serde(default)]
    insensitive: bool,
    #[serde(default)]
    message: Option<MessageOverride>,
}

/// Membership check against a fixed list of values.
#[derive(Debug, Clone)]
pub struct Enum {
    values: Vec<String>,
    matcher: Regex,
    messages: Messages,
}

impl Enum {
    /// Builds from contract settings.
    pub fn build(settings: &Map<String, Value>, ctx: &BuildContext<'_>) -> Result<Box<dyn Validator>> {
        let parsed: EnumSettings = parse_settings(KIND, settings)?;
        let values = parsed
            .values
            .ok_or_else(|| KiraError::invalid_settings(KIND, "'values' is required"))?
            .into_strings()?;
        if values.is_empty() || values.iter().all(String::is_empty) {
            return Err(KiraError::invalid_settings(KIND, "'values' must not be empty"));
        }

        let alternatives: Vec<String> = values.iter().map(|v| regex::escape(v)).collect();
        let matcher = RegexBuilder::new(&format!("^(?:{})$", alternatives.join("|")))
            .case_insensitive(parsed.insensitive)
            .build()
            .map_err(|e| KiraError::invalid_settings(KIND, e.to_string()))?;

        Ok(Box::new(Self {
            values,
            matcher,
            messages: Messages::new(KIND, MESSAGES, parsed.message, ctx.translator.clone())?,
        }))
    }

    /// The allowed values, in contract order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Validator for Enum {
    fn kind(&self) -> &str {
        KIND
    }

    fn validate(&self, value: Value) -> Result<ValidatorOutcome> {
        let text = match &value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => return Err(KiraError::type_mismatch(KIND, "a string or a number", other)),
        };
        if self.matcher.is_match(&text) {
            return Ok(ValidatorOutcome::Accepted(value));
        }
        let message = self
            .messages
            .render("not_allowed", &params([("values", self.values.join(", "))]));
        Ok(ValidatorOutcome::Rejected(message))
    }
}
