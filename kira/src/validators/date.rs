//! The `date` validator.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{parse_settings, scalar_text, BuildContext, MessageOverride, Messages, Validator, ValidatorOutcome};
use crate::errors::Result;
use crate::i18n::params;
use crate::utils::DateFormat;

const KIND: &str = "date";
const MESSAGES: &[(&str, &str)] = &[("invalid", "Date must match the format {format}")];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DateSettings {
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    message: Option<MessageOverride>,
}

/// Accepts strings that are a real date in the configured format.
#[derive(Debug, Clone)]
pub struct Date {
    format: DateFormat,
    messages: Messages,
}

impl Date {
    /// Builds from contract settings; the format defaults to the engine's.
    pub fn build(settings: &Map<String, Value>, ctx: &BuildContext<'_>) -> Result<Box<dyn Validator>> {
        let parsed: DateSettings = parse_settings(KIND, settings)?;
        let format = DateFormat::parse(parsed.format.as_deref().unwrap_or(&ctx.config.date_format))?;
        Ok(Box::new(Self {
            format,
            messages: Messages::new(KIND, MESSAGES, parsed.message, ctx.translator.clone())?,
        }))
    }
}

impl Validator for Date {
    fn kind(&self) -> &str {
        KIND
    }

    fn validate(&self, value: Value) -> Result<ValidatorOutcome> {
        let text = scalar_text(KIND, &value)?;
        if self.format.matches(&text) {
            Ok(ValidatorOutcome::Accepted(value))
        } else {
            let message = self
                .messages
                .render("invalid", &params([("format", self.format.source())]));
            Ok(ValidatorOutcome::Rejected(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::build_for_test;
    use serde_json::json;

    #[test]
    fn test_calendar_dates() {
        let v = build_for_test("date", json!({"format": "Y-m-d"})).unwrap();
        assert!(v.validate(json!("2012-02-28")).unwrap().is_accepted());
        assert!(v.validate(json!("2012-02-29")).unwrap().is_accepted());
        assert_eq!(
            v.validate(json!("2012-02-30")).unwrap().error(),
            Some("Date must match the format Y-m-d")
        );
        assert!(!v.validate(json!("28/02/2012")).unwrap().is_accepted());
    }

    #[test]
    fn test_default_format_from_config() {
        let v = build_for_test("date", json!(true)).unwrap();
        assert!(v.validate(json!("2020-01-31 23:59:00")).unwrap().is_accepted());
        assert!(!v.validate(json!("2020-01-31")).unwrap().is_accepted());
    }

    #[test]
    fn test_faults() {
        assert!(build_for_test("date", json!({"format": "Q"})).is_err());
        let v = build_for_test("date", json!({"format": "Y-m-d"})).unwrap();
        assert!(v.validate(json!(["2020-01-01"])).is_err());
        // scalars are read as text
        assert!(!v.validate(json!(20_200_101)).unwrap().is_accepted());
    }
}
