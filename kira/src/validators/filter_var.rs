//! The `filter_var` validator.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{parse_settings, BuildContext, MessageOverride, Messages, Validator, ValidatorOutcome};
use crate::errors::{KiraError, Result};
use crate::i18n::params;
use crate::utils::FilterSpec;

const KIND: &str = "filter_var";
const MESSAGES: &[(&str, &str)] = &[("invalid", "Value does not pass the {filter} filter")];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FilterVarSettings {
    filter: Option<String>,
    #[serde(default)]
    options: Map<String, Value>,
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default)]
    message: Option<MessageOverride>,
}

/// Runs a named format filter; int, float and bool filters also convert.
#[derive(Debug, Clone)]
pub struct FilterVar {
    name: String,
    spec: FilterSpec,
    messages: Messages,
}

impl FilterVar {
    /// Builds from contract settings; `filter` is mandatory.
    pub fn build(settings: &Map<String, Value>, ctx: &BuildContext<'_>) -> Result<Box<dyn Validator>> {
        let parsed: FilterVarSettings = parse_settings(KIND, settings)?;
        let name = parsed
            .filter
            .ok_or_else(|| KiraError::invalid_settings(KIND, "'filter' is required"))?;
        let spec = FilterSpec::build(&name, &parsed.options, &parsed.flags)?;
        Ok(Box::new(Self {
            name,
            spec,
            messages: Messages::new(KIND, MESSAGES, parsed.message, ctx.translator.clone())?,
        }))
    }
}

impl Validator for FilterVar {
    fn kind(&self) -> &str {
        KIND
    }

    fn validate(&self, value: Value) -> Result<ValidatorOutcome> {
        if matches!(value, Value::Array(_) | Value::Object(_)) {
            return Err(KiraError::type_mismatch(KIND, "a scalar", &value));
        }
        Ok(match self.spec.apply(&value) {
            Some(filtered) => ValidatorOutcome::Accepted(filtered),
            None => ValidatorOutcome::Rejected(
                self.messages
                    .render("invalid", &params([("filter", &self.name)])),
            ),
        })
    }
}
