//! Range checks: `limits`, `length` and `bounds`.
//!
//! `length` measures strings, `bounds` compares numbers, `limits` picks one
//! of the two by looking at the value.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{format_bound, parse_settings, BuildContext, MessageOverride, Messages, Validator, ValidatorOutcome};
use crate::errors::{KiraError, Result};
use crate::i18n::Params;
use crate::utils::typecast;

const MESSAGES: &[(&str, &str)] = &[
    ("too_short", "Value is too short (minimum is {min} characters)"),
    ("too_long", "Value is too long (maximum is {max} characters)"),
    ("too_small", "Value must be at least {min}"),
    ("too_big", "Value must be at most {max}"),
    ("not_numeric", "Value must be a number"),
];

/// What a range check measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Strings by length, numbers by value.
    Auto,
    /// String length in characters.
    Length,
    /// Numeric value; numeric strings are accepted.
    Number,
}

impl Measure {
    fn kind(self) -> &'static str {
        match self {
            Self::Auto => "limits",
            Self::Length => "length",
            Self::Number => "bounds",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LimitsSettings {
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    message: Option<MessageOverride>,
}

/// Inclusive `[min, max]` check.
#[derive(Debug, Clone)]
pub struct Limits {
    measure: Measure,
    min: Option<f64>,
    max: Option<f64>,
    messages: Messages,
}

impl Limits {
    /// Builds a range check from contract settings.
    pub fn build(
        measure: Measure,
        settings: &Map<String, Value>,
        ctx: &BuildContext<'_>,
    ) -> Result<Box<dyn Validator>> {
        let kind = measure.kind();
        let parsed: LimitsSettings = parse_settings(kind, settings)?;
        if parsed.min.is_none() && parsed.max.is_none() {
            return Err(KiraError::invalid_settings(kind, "at least one of 'min' or 'max' is required"));
        }
        if let (Some(min), Some(max)) = (parsed.min, parsed.max) {
            if min > max {
                return Err(KiraError::invalid_settings(
                    kind,
                    format!("'min' ({min}) is greater than 'max' ({max})"),
                ));
            }
        }
        Ok(Box::new(Self {
            measure,
            min: parsed.min,
            max: parsed.max,
            messages: Messages::new(kind, MESSAGES, parsed.message, ctx.translator.clone())?,
        }))
    }

    fn check_length(&self, text: &str) -> Option<String> {
        let length = text.chars().count() as f64;
        if self.min.is_some_and(|min| length < min) {
            return Some(self.render("too_short"));
        }
        if self.max.is_some_and(|max| length > max) {
            return Some(self.render("too_long"));
        }
        None
    }

    fn check_number(&self, number: f64) -> Option<String> {
        if self.min.is_some_and(|min| number < min) {
            return Some(self.render("too_small"));
        }
        if self.max.is_some_and(|max| number > max) {
            return Some(self.render("too_big"));
        }
        None
    }

    fn render(&self, cause: &str) -> String {
        let mut p = Params::new();
        if let Some(min) = self.min {
            p.insert("min".to_string(), format_bound(min));
        }
        if let Some(max) = self.max {
            p.insert("max".to_string(), format_bound(max));
        }
        self.messages.render(cause, &p)
    }
}

impl Validator for Limits {
    fn kind(&self) -> &str {
        self.measure.kind()
    }

    fn validate(&self, value: Value) -> Result<ValidatorOutcome> {
        let failure = match (self.measure, &value) {
            (Measure::Auto | Measure::Length, Value::String(s)) => self.check_length(s),
            (Measure::Auto, Value::Number(n)) => self.check_number(n.as_f64().unwrap_or_default()),
            (Measure::Number, Value::Number(n)) => self.check_number(n.as_f64().unwrap_or_default()),
            (Measure::Number, Value::String(s)) => match typecast::parse_float(s.trim()) {
                Some(number) => self.check_number(number),
                None => Some(self.messages.render("not_numeric", &Params::new())),
            },
            (Measure::Auto, other) => {
                return Err(KiraError::type_mismatch(self.kind(), "a string or a number", other))
            }
            (Measure::Length, other) => {
                return Err(KiraError::type_mismatch(self.kind(), "a string", other))
            }
            (Measure::Number, other) => {
                return Err(KiraError::type_mismatch(self.kind(), "a number", other))
            }
        };
        Ok(match failure {
            Some(message) => ValidatorOutcome::Rejected(message),
            None => ValidatorOutcome::Accepted(value),
        })
    }
}
