//! The `normalize_string` validator.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{parse_settings, scalar_text, BuildContext, Validator, ValidatorOutcome};
use crate::errors::Result;
use crate::utils::strings::{self, QuoteMode};

const KIND: &str = "normalize_string";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NormalizeSettings {
    #[serde(default)]
    keep_line_breaks: bool,
    #[serde(default)]
    strip_tags: bool,
    #[serde(default)]
    ent_flags: QuoteMode,
}

/// Cleans free text: optional tag stripping, whitespace collapse, HTML
/// escaping. Never rejects.
///
/// The transformation is idempotent: normalizing a normalized string returns
/// it unchanged.
#[derive(Debug, Clone)]
pub struct NormalizeString {
    keep_line_breaks: bool,
    strip_tags: bool,
    quotes: QuoteMode,
}

impl NormalizeString {
    /// Builds from contract settings.
    pub fn build(settings: &Map<String, Value>, _ctx: &BuildContext<'_>) -> Result<Box<dyn Validator>> {
        let parsed: NormalizeSettings = parse_settings(KIND, settings)?;
        Ok(Box::new(Self {
            keep_line_breaks: parsed.keep_line_breaks,
            strip_tags: parsed.strip_tags,
            quotes: parsed.ent_flags,
        }))
    }

    /// Applies the cleanup to one string.
    #[must_use]
    pub fn normalize(&self, input: &str) -> String {
        let text = if self.strip_tags {
            strings::strip_tags(input)
        } else {
            input.to_string()
        };
        let collapsed = if self.keep_line_breaks {
            strings::collapse_keeping_lines(&text)
        } else {
            strings::collapse_whitespace(&text)
        };
        strings::escape_html(&collapsed, self.quotes)
    }
}

impl Validator for NormalizeString {
    fn kind(&self) -> &str {
        KIND
    }

    fn validate(&self, value: Value) -> Result<ValidatorOutcome> {
        let text = scalar_text(KIND, &value)?;
        Ok(ValidatorOutcome::Accepted(Value::String(self.normalize(&text))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::build_for_test;
    use serde_json::json;

    fn normalized(settings: Value, input: &str) -> Value {
        let v = build_for_test("normalize_string", settings).unwrap();
        v.validate(json!(input)).unwrap().value().cloned().unwrap()
    }

    #[test]
    fn test_collapse_and_escape() {
        assert_eq!(
            normalized(json!(true), "  Tom  & \"Jerry\"\n  <b>cat</b> "),
            json!("Tom &amp; &quot;Jerry&quot; &lt;b&gt;cat&lt;/b&gt;")
        );
    }

    #[test]
    fn test_strip_tags_and_keep_lines() {
        assert_eq!(
            normalized(
                json!({"strip_tags": true, "keep_line_breaks": true}),
                "<p>line   one</p>\r\n\r\n\r\n<p>line two</p>"
            ),
            json!("line one\n\nline two")
        );
    }

    #[test]
    fn test_quote_modes() {
        assert_eq!(
            normalized(json!({"ent_flags": "no_quotes"}), "it's \"fine\""),
            json!("it's \"fine\"")
        );
        assert_eq!(
            normalized(json!({"ent_flags": "compat"}), "it's \"fine\""),
            json!("it's &quot;fine&quot;")
        );
        assert_eq!(normalized(json!(true), "it's"), json!("it&#039;s"));
    }

    #[test]
    fn test_idempotent() {
        let v = build_for_test("normalize_string", json!({"strip_tags": true})).unwrap();
        for input in ["  a <i>b</i> & c's \"d\"  ", "x &amp; y", "plain", "<>&\"'"] {
            let once = v.validate(json!(input)).unwrap().value().cloned().unwrap();
            let twice = v.validate(once.clone()).unwrap().value().cloned().unwrap();
            assert_eq!(once, twice, "input {input:?}");
        }
    }

    #[test]
    fn test_scalars_and_faults() {
        let v = build_for_test("normalize_string", json!(true)).unwrap();
        assert_eq!(v.validate(json!(12)).unwrap(), ValidatorOutcome::Accepted(json!("12")));
        assert!(v.validate(json!(["a"])).is_err());
        assert!(build_for_test("normalize_string", json!({"trim": true})).is_err());
    }
}
