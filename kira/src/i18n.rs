//! Translation hook for user-facing messages.
//!
//! The engine never localizes anything itself: every phrase it shows to an
//! end user goes through a [`Translator`] injected at contract load time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Substitution parameters for a phrase, e.g. `{"max": "10"}`.
pub type Params = HashMap<String, String>;

/// Turns a phrase plus parameters into the string shown to the user.
pub trait Translator: Send + Sync {
    /// Translates `phrase`, substituting `{name}` placeholders from `params`.
    fn translate(&self, phrase: &str, params: &Params) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str, &Params) -> String + Send + Sync,
{
    fn translate(&self, phrase: &str, params: &Params) -> String {
        self(phrase, params)
    }
}

/// Shared handle to a translator.
pub type SharedTranslator = Arc<dyn Translator>;

/// Leaves phrases untranslated and only fills in placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, phrase: &str, params: &Params) -> String {
        substitute(phrase, params)
    }
}

/// Looks phrases up in an in-memory catalog, falling back to the phrase itself.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    phrases: HashMap<String, String>,
}

impl CatalogTranslator {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a translation.
    #[must_use]
    pub fn with_phrase(mut self, phrase: impl Into<String>, translation: impl Into<String>) -> Self {
        self.phrases.insert(phrase.into(), translation.into());
        self
    }

    /// Returns the number of known phrases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, phrase: &str, params: &Params) -> String {
        let template = self.phrases.get(phrase).map_or(phrase, String::as_str);
        substitute(template, params)
    }
}

/// Replaces every `{name}` in `template` with `params[name]`.
///
/// Unknown placeholders are left as they are.
#[must_use]
pub fn substitute(template: &str, params: &Params) -> String {
    if params.is_empty() || !template.contains('{') {
        return template.to_string();
    }
    let mut out = template.to_string();
    for (key, value) in params {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

/// Builds a [`Params`] map from `(name, value)` pairs.
#[must_use]
pub fn params<I, K, V>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: fmt::Display,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}

/// Default shared translator.
#[must_use]
pub fn identity() -> SharedTranslator {
    Arc::new(IdentityTranslator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute() {
        let p = params([("min", 2), ("max", 10)]);
        assert_eq!(
            substitute("between {min} and {max}", &p),
            "between 2 and 10"
        );
        assert_eq!(substitute("no placeholders", &p), "no placeholders");
        assert_eq!(substitute("{unknown} stays", &p), "{unknown} stays");
    }

    #[test]
    fn test_identity_translator() {
        let t = IdentityTranslator;
        assert_eq!(t.translate("Hello {name}", &params([("name", "Kira")])), "Hello Kira");
    }

    #[test]
    fn test_catalog_translator() {
        let t = CatalogTranslator::new().with_phrase("Field is required", "Поле обязательно");
        assert_eq!(t.len(), 1);
        assert_eq!(t.translate("Field is required", &Params::new()), "Поле обязательно");
        assert_eq!(t.translate("Other", &Params::new()), "Other");
    }

    #[test]
    fn test_closure_translator() {
        let t = |phrase: &str, _: &Params| phrase.to_uppercase();
        assert_eq!(Translator::translate(&t, "abc", &Params::new()), "ABC");
    }
}
