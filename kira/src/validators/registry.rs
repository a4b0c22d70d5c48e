//! Registry mapping validator tags to factories.

use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use super::{
    external::External, settings_map, Date, Email, Enum, ExpectId, ExternalCheck, FilterVar,
    Limits, Measure, NormalizeString, Typecast, Validator,
};
use crate::config::ValidationConfig;
use crate::errors::{KiraError, Result};
use crate::i18n::SharedTranslator;

/// Everything a factory may consult while building a validator.
pub struct BuildContext<'a> {
    /// Engine configuration.
    pub config: &'a ValidationConfig,
    /// Translator for user-facing messages.
    pub translator: &'a SharedTranslator,
    /// The registry doing the build, for nested lookups (external checks).
    pub registry: &'a ValidatorRegistry,
}

/// Factory function type for creating validators from a settings mapping.
pub type ValidatorFactory =
    Arc<dyn Fn(&Map<String, Value>, &BuildContext<'_>) -> Result<Box<dyn Validator>> + Send + Sync>;

/// Registry for validator factories and named external checks.
pub struct ValidatorRegistry {
    factories: RwLock<HashMap<String, ValidatorFactory>>,
    externals: RwLock<HashMap<String, Arc<dyn ExternalCheck>>>,
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ValidatorRegistry {
    /// Creates a registry with no validator kinds at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
            externals: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry holding every built-in kind.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::empty();
        registry.register_fn("limits", |s, ctx| Limits::build(Measure::Auto, s, ctx));
        registry.register_fn("length", |s, ctx| Limits::build(Measure::Length, s, ctx));
        registry.register_fn("bounds", |s, ctx| Limits::build(Measure::Number, s, ctx));
        registry.register_fn("enum", Enum::build);
        registry.register_fn("email", Email::build);
        registry.register_fn("date", Date::build);
        registry.register_fn("expect_id", ExpectId::build);
        registry.register_fn("typecast", Typecast::build);
        registry.register_fn("filter_var", FilterVar::build);
        registry.register_fn("external", External::build);
        registry.register_fn("normalize_string", NormalizeString::build);
        registry
    }

    /// Registers (or replaces) a validator kind.
    pub fn register(&self, kind: impl Into<String>, factory: ValidatorFactory) {
        self.factories.write().insert(kind.into(), factory);
    }

    /// Registers a validator kind from a plain function or closure.
    pub fn register_fn<F>(&self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&Map<String, Value>, &BuildContext<'_>) -> Result<Box<dyn Validator>>
            + Send
            + Sync
            + 'static,
    {
        self.register(kind, Arc::new(factory));
    }

    /// Registers (or replaces) a named external check.
    pub fn register_external(&self, name: impl Into<String>, check: Arc<dyn ExternalCheck>) {
        self.externals.write().insert(name.into(), check);
    }

    /// Checks if a validator kind is registered.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.read().contains_key(kind)
    }

    /// Lists registered kinds, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.factories.read().keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Looks up an external check.
    pub fn external(&self, name: &str) -> Result<Arc<dyn ExternalCheck>> {
        self.externals
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| KiraError::unknown_external(name))
    }

    /// Builds a validator of `kind` from raw contract settings.
    ///
    /// Returns `Ok(None)` when the settings are `false`, i.e. the validator is
    /// switched off in the contract.
    pub fn build(
        &self,
        kind: &str,
        settings: &Value,
        config: &ValidationConfig,
        translator: &SharedTranslator,
    ) -> Result<Option<Box<dyn Validator>>> {
        let factory = self
            .factories
            .read()
            .get(kind)
            .cloned()
            .ok_or_else(|| KiraError::unknown_validator(kind))?;

        let Some(settings) = settings_map(kind, settings)? else {
            return Ok(None);
        };

        let ctx = BuildContext {
            config,
            translator,
            registry: self,
        };
        factory(&settings, &ctx).map(Some)
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("kinds", &self.kinds())
            .field("external_count", &self.externals.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n;
    use crate::validators::{ExternalVerdict, FnExternal, ValidatorOutcome};
    use serde_json::json;

    #[derive(Debug)]
    struct Upper;

    impl Validator for Upper {
        fn kind(&self) -> &str {
            "upper"
        }

        fn validate(&self, value: Value) -> Result<ValidatorOutcome> {
            Ok(ValidatorOutcome::Accepted(json!(value
                .as_str()
                .unwrap_or_default()
                .to_uppercase())))
        }
    }

    fn build(registry: &ValidatorRegistry, kind: &str, settings: Value) -> Result<Option<Box<dyn Validator>>> {
        registry.build(kind, &settings, &ValidationConfig::default(), &i18n::identity())
    }

    #[test]
    fn test_builtins_registered() {
        let registry = ValidatorRegistry::with_builtins();
        for kind in [
            "limits", "length", "bounds", "enum", "email", "date", "expect_id", "typecast",
            "filter_var", "external", "normalize_string",
        ] {
            assert!(registry.contains(kind), "missing {kind}");
        }
        assert!(!registry.contains("required"));
    }

    #[test]
    fn test_unknown_kind_is_a_fault() {
        let registry = ValidatorRegistry::with_builtins();
        let err = build(&registry, "frobnicate", json!(true)).unwrap_err();
        assert!(matches!(err, KiraError::UnknownValidator { ref name } if name == "frobnicate"));
    }

    #[test]
    fn test_false_disables() {
        let registry = ValidatorRegistry::with_builtins();
        assert!(build(&registry, "expect_id", json!(false)).unwrap().is_none());
        // still unknown even when disabled
        assert!(build(&registry, "frobnicate", json!(false)).is_err());
    }

    #[test]
    fn test_custom_kind() {
        let registry = ValidatorRegistry::empty();
        registry.register_fn("upper", |_, _| Ok(Box::new(Upper)));
        let v = build(&registry, "upper", json!(true)).unwrap().unwrap();
        assert_eq!(v.validate(json!("abc")).unwrap(), ValidatorOutcome::Accepted(json!("ABC")));
        assert_eq!(registry.kinds(), vec!["upper".to_string()]);
    }

    #[test]
    fn test_externals() {
        let registry = ValidatorRegistry::with_builtins();
        assert!(registry.external("unique").is_err());
        registry.register_external(
            "unique",
            Arc::new(FnExternal::new(|_: &Value, _: &Value| Ok(ExternalVerdict::Pass))),
        );
        assert!(registry.external("unique").is_ok());
    }
}
