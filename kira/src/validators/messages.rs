//! Message libraries and caller overrides.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{KiraError, Result};
use crate::i18n::{Params, SharedTranslator};

/// A caller-supplied replacement for a validator's default messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageOverride {
    /// One phrase for every failure cause.
    Single(String),
    /// One phrase per failure cause.
    PerCause(HashMap<String, String>),
}

/// Resolves the phrase for a failure cause and runs it through the translator.
///
/// Lookup order: override for the cause, then the validator's default phrase.
#[derive(Clone)]
pub struct Messages {
    kind: &'static str,
    library: &'static [(&'static str, &'static str)],
    overrides: Option<MessageOverride>,
    translator: SharedTranslator,
}

impl Messages {
    /// Creates a message resolver.
    ///
    /// # Errors
    ///
    /// Fails when a per-cause override names a cause the library does not have.
    pub fn new(
        kind: &'static str,
        library: &'static [(&'static str, &'static str)],
        overrides: Option<MessageOverride>,
        translator: SharedTranslator,
    ) -> Result<Self> {
        if let Some(MessageOverride::PerCause(map)) = &overrides {
            if let Some(unknown) = map.keys().find(|k| !library.iter().any(|(c, _)| *c == k.as_str())) {
                let known: Vec<&str> = library.iter().map(|(c, _)| *c).collect();
                return Err(KiraError::invalid_settings(
                    kind,
                    format!(
                        "message override for unknown cause '{unknown}' (known: {})",
                        known.join(", ")
                    ),
                ));
            }
        }
        Ok(Self {
            kind,
            library,
            overrides,
            translator,
        })
    }

    /// The translated phrase for `cause`.
    #[must_use]
    pub fn render(&self, cause: &str, params: &Params) -> String {
        let phrase = self
            .override_for(cause)
            .or_else(|| {
                self.library
                    .iter()
                    .find(|(c, _)| *c == cause)
                    .map(|(_, phrase)| *phrase)
            })
            .unwrap_or("Invalid value");
        self.translator.translate(phrase, params)
    }

    /// Translates an arbitrary phrase, unless an override for `cause` exists.
    #[must_use]
    pub fn render_custom(&self, cause: &str, phrase: &str, params: &Params) -> String {
        let phrase = self.override_for(cause).unwrap_or(phrase);
        self.translator.translate(phrase, params)
    }

    fn override_for(&self, cause: &str) -> Option<&str> {
        match &self.overrides {
            Some(MessageOverride::Single(phrase)) => Some(phrase.as_str()),
            Some(MessageOverride::PerCause(map)) => map.get(cause).map(String::as_str),
            None => None,
        }
    }
}

impl std::fmt::Debug for Messages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Messages")
            .field("kind", &self.kind)
            .field("causes", &self.library.len())
            .field("overrides", &self.overrides)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{self, params, CatalogTranslator};
    use std::sync::Arc;

    const LIBRARY: &[(&str, &str)] = &[
        ("invalid", "Invalid e-mail address"),
        ("blacklisted", "Addresses at {server} are not accepted"),
    ];

    #[test]
    fn test_default_phrases() {
        let m = Messages::new("email", LIBRARY, None, i18n::identity()).unwrap();
        assert_eq!(m.render("invalid", &Params::new()), "Invalid e-mail address");
        assert_eq!(
            m.render("blacklisted", &params([("server", "spam.example")])),
            "Addresses at spam.example are not accepted"
        );
        assert_eq!(m.render("unknown", &Params::new()), "Invalid value");
    }

    #[test]
    fn test_single_override() {
        let m = Messages::new(
            "email",
            LIBRARY,
            Some(MessageOverride::Single("Bad mail".into())),
            i18n::identity(),
        )
        .unwrap();
        assert_eq!(m.render("invalid", &Params::new()), "Bad mail");
        assert_eq!(m.render("blacklisted", &Params::new()), "Bad mail");
    }

    #[test]
    fn test_per_cause_override() {
        let overrides = MessageOverride::PerCause(HashMap::from([(
            "blacklisted".to_string(),
            "No throwaway mail".to_string(),
        )]));
        let m = Messages::new("email", LIBRARY, Some(overrides), i18n::identity()).unwrap();
        assert_eq!(m.render("blacklisted", &Params::new()), "No throwaway mail");
        assert_eq!(m.render("invalid", &Params::new()), "Invalid e-mail address");
    }

    #[test]
    fn test_unknown_cause_is_a_fault() {
        let overrides =
            MessageOverride::PerCause(HashMap::from([("typo".to_string(), "x".to_string())]));
        assert!(Messages::new("email", LIBRARY, Some(overrides), i18n::identity()).is_err());
    }

    #[test]
    fn test_goes_through_translator() {
        let translator = Arc::new(
            CatalogTranslator::new().with_phrase("Invalid e-mail address", "Adresse invalide"),
        );
        let m = Messages::new("email", LIBRARY, None, translator).unwrap();
        assert_eq!(m.render("invalid", &Params::new()), "Adresse invalide");
    }

    #[test]
    fn test_override_deserializes_both_shapes() {
        let single: MessageOverride = serde_json::from_value(serde_json::json!("x")).unwrap();
        assert_eq!(single, MessageOverride::Single("x".into()));
        let map: MessageOverride =
            serde_json::from_value(serde_json::json!({"invalid": "y"})).unwrap();
        assert!(matches!(map, MessageOverride::PerCause(_)));
    }
}
