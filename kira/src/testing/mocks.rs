//! Mock collaborators for testing.

use parking_lot::Mutex;
use serde_json::Value;

use crate::i18n::{substitute, Params, Translator};
use crate::validators::{ExternalCheck, ExternalVerdict};

/// A translator that records every phrase it is asked for and returns it
/// untranslated, with placeholders filled in.
#[derive(Debug, Default)]
pub struct RecordingTranslator {
    calls: Mutex<Vec<(String, Params)>>,
}

impl RecordingTranslator {
    /// Creates a new recording translator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Phrases requested so far, in call order.
    #[must_use]
    pub fn phrases(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(phrase, _)| phrase.clone()).collect()
    }

    /// Phrases and their parameters, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Params)> {
        self.calls.lock().clone()
    }

    /// Number of translations performed.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Translator for RecordingTranslator {
    fn translate(&self, phrase: &str, params: &Params) -> String {
        self.calls.lock().push((phrase.to_string(), params.clone()));
        substitute(phrase, params)
    }
}

/// An external check returning a fixed verdict and recording its inputs.
#[derive(Debug)]
pub struct RecordingExternal {
    verdict: Mutex<ExternalVerdict>,
    seen: Mutex<Vec<(Value, Value)>>,
}

impl RecordingExternal {
    /// Creates a check that always answers `verdict`.
    #[must_use]
    pub fn new(verdict: ExternalVerdict) -> Self {
        Self {
            verdict: Mutex::new(verdict),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// A check that accepts everything.
    #[must_use]
    pub fn passing() -> Self {
        Self::new(ExternalVerdict::Pass)
    }

    /// A check that rejects everything with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(ExternalVerdict::Fail(Some(message.into())))
    }

    /// Changes the verdict for later calls.
    pub fn set_verdict(&self, verdict: ExternalVerdict) {
        *self.verdict.lock() = verdict;
    }

    /// Values checked so far.
    #[must_use]
    pub fn seen_values(&self) -> Vec<Value> {
        self.seen.lock().iter().map(|(value, _)| value.clone()).collect()
    }

    /// Options received with each call.
    #[must_use]
    pub fn seen_options(&self) -> Vec<Value> {
        self.seen.lock().iter().map(|(_, options)| options.clone()).collect()
    }
}

impl ExternalCheck for RecordingExternal {
    fn check(&self, value: &Value, options: &Value) -> anyhow::Result<ExternalVerdict> {
        self.seen.lock().push((value.clone(), options.clone()));
        Ok(self.verdict.lock().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::params;
    use serde_json::json;

    #[test]
    fn test_recording_translator() {
        let translator = RecordingTranslator::new();
        assert_eq!(translator.translate("Hi {name}", &params([("name", "Ann")])), "Hi Ann");
        assert_eq!(translator.phrases(), vec!["Hi {name}".to_string()]);
        assert_eq!(translator.calls()[0].1.get("name"), Some(&"Ann".to_string()));
        assert_eq!(translator.call_count(), 1);
    }

    #[test]
    fn test_recording_external() {
        let check = RecordingExternal::failing("taken");
        let verdict = check.check(&json!("root"), &json!({"table": "users"})).unwrap();
        assert_eq!(verdict, ExternalVerdict::Fail(Some("taken".into())));
        check.set_verdict(ExternalVerdict::Pass);
        assert_eq!(check.check(&json!("alex"), &Value::Null).unwrap(), ExternalVerdict::Pass);
        assert_eq!(check.seen_values(), vec![json!("root"), json!("alex")]);
        assert_eq!(check.seen_options()[0], json!({"table": "users"}));
    }
}
