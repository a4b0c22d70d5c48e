//! Test fixtures for contract and form testing.

use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::ValidationConfig;
use crate::contract::{Contract, ContractLoader};
use crate::errors::Result;
use crate::form::{CsrfVerifier, Form};
use crate::i18n::SharedTranslator;
use crate::observability::ValidationEmitter;
use crate::validators::{ExternalCheck, ValidatorRegistry};

/// A sign-up contract touching most built-in validators.
#[must_use]
pub fn signup_contract() -> Value {
    json!({
        "name": {"validators": {"required": true, "length": {"min": 2, "max": 40}}},
        "email": {"validators": {"required": true, "email": true}},
        "age": {"validators": {"typecast": {"type": "int"}, "bounds": {"min": 18, "max": 130}}},
        "color": {"validators": {"enum": {"values": ["red", "green", "blue"], "insensitive": true}}},
        "birthday": {"validators": {"date": {"format": "Y-m-d"}}},
        "tags": {"validators": {"length": {"max": 10}}, "expect_array": true},
        "address": {
            "city": {"validators": {"required": true}},
            "zip": {"validators": {"filter_var": {"filter": "int"}}}
        }
    })
}

/// Input that passes [`signup_contract`].
#[must_use]
pub fn signup_input() -> Value {
    json!({
        "name": "Alex",
        "email": "alex@example.com",
        "age": "30",
        "color": "red",
        "birthday": "1994-06-01",
        "tags": ["rust", "forms"],
        "address": {"city": "Lisbon", "zip": "1100"}
    })
}

/// Builder for a [`Form`] under test.
#[derive(Default)]
pub struct FormFixture {
    contract: Value,
    data: Vec<Value>,
    registry: Option<Arc<ValidatorRegistry>>,
    config: Option<ValidationConfig>,
    translator: Option<SharedTranslator>,
    csrf: Option<Arc<dyn CsrfVerifier>>,
    emitter: Option<Arc<dyn ValidationEmitter>>,
}

impl FormFixture {
    /// Creates a fixture for `contract`.
    #[must_use]
    pub fn new(contract: Value) -> Self {
        Self {
            contract,
            ..Self::default()
        }
    }

    /// A fixture for [`signup_contract`] loaded with [`signup_input`].
    #[must_use]
    pub fn signup() -> Self {
        Self::new(signup_contract()).with_data(signup_input())
    }

    /// Queues data to load before the form is returned.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data.push(data);
        self
    }

    /// Uses `config` when loading the contract.
    #[must_use]
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses `translator` when loading the contract.
    #[must_use]
    pub fn with_translator(mut self, translator: SharedTranslator) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Uses `registry` when loading the contract.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<ValidatorRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Registers `check` under `name` in a fresh built-in registry.
    #[must_use]
    pub fn with_external(mut self, name: impl Into<String>, check: Arc<dyn ExternalCheck>) -> Self {
        let registry = self
            .registry
            .take()
            .unwrap_or_else(|| Arc::new(ValidatorRegistry::with_builtins()));
        registry.register_external(name, check);
        self.registry = Some(registry);
        self
    }

    /// Attaches a CSRF verifier to the form.
    #[must_use]
    pub fn with_csrf(mut self, verifier: Arc<dyn CsrfVerifier>) -> Self {
        self.csrf = Some(verifier);
        self
    }

    /// Attaches an emitter to the form.
    #[must_use]
    pub fn with_emitter(mut self, emitter: Arc<dyn ValidationEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Loads the contract.
    ///
    /// # Errors
    ///
    /// Returns the loader's error for a malformed contract.
    pub fn contract(&self) -> Result<Contract> {
        let mut loader = ContractLoader::new();
        if let Some(registry) = &self.registry {
            loader = loader.with_registry(Arc::clone(registry));
        }
        if let Some(config) = &self.config {
            loader = loader.with_config(config.clone());
        }
        if let Some(translator) = &self.translator {
            loader = loader.with_translator(Arc::clone(translator));
        }
        loader.load(&self.contract)
    }

    /// Builds the form with the queued data loaded, not yet validated.
    ///
    /// # Errors
    ///
    /// Returns the loader's error for a malformed contract.
    pub fn build(&self) -> Result<Form> {
        let mut form = Form::new(Arc::new(self.contract()?));
        if let Some(csrf) = &self.csrf {
            form = form.with_csrf(Arc::clone(csrf));
        }
        if let Some(emitter) = &self.emitter {
            form = form.with_emitter(Arc::clone(emitter));
        }
        for data in &self.data {
            form.load(data.clone());
        }
        Ok(form)
    }
}

impl std::fmt::Debug for FormFixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormFixture")
            .field("contract", &self.contract)
            .field("data", &self.data)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
