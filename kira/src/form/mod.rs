//! The form facade.
//!
//! A [`Form`] owns the raw input of one submission together with the values
//! and errors produced by validating it against a shared [`Contract`].
//!
//! ```rust
//! use kira::contract::Contract;
//! use kira::form::Form;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let contract = Contract::from_value(&json!({
//!     "name": {"validators": {"required": true, "length": {"max": 20}}}
//! }))
//! .unwrap();
//!
//! let mut form = Form::new(Arc::new(contract));
//! form.load(json!({"name": "Alex"}));
//! assert!(form.validate().unwrap());
//! assert_eq!(form.values(), &json!({"name": "Alex"}));
//! ```

mod csrf;

pub use csrf::{CsrfVerifier, StaticTokenVerifier};
#[cfg(test)]
pub use csrf::MockCsrfVerifier;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

use crate::contract::{Contract, Rejection};
use crate::errors::{KiraError, Result};
use crate::i18n::Params;
use crate::observability::{NoOpValidationEmitter, ValidationEmitter, ValidationSummary, ValidationTimer};
use crate::utils::{self, FieldPath, MergeMode};

const CSRF_KIND: &str = "csrf";
const CSRF_MESSAGE: &str = "The form has expired, please submit it again";

/// Key under which [`Form::add_error`] files messages aimed at a branch, so
/// the errors of its fields stay in place.
pub const BRANCH_ERRORS_KEY: &str = "_errors";

/// One form submission bound to a contract.
pub struct Form {
    contract: Arc<Contract>,
    raw: Value,
    values: Value,
    errors: Value,
    valid: Option<bool>,
    csrf: Option<Arc<dyn CsrfVerifier>>,
    emitter: Arc<dyn ValidationEmitter>,
}

impl Form {
    /// Creates an empty form.
    #[must_use]
    pub fn new(contract: Arc<Contract>) -> Self {
        Self {
            contract,
            raw: Value::Object(Map::new()),
            values: Value::Object(Map::new()),
            errors: Value::Object(Map::new()),
            valid: None,
            csrf: None,
            emitter: Arc::new(NoOpValidationEmitter),
        }
    }

    /// Enables CSRF verification on every [`Form::validate`].
    #[must_use]
    pub fn with_csrf(mut self, verifier: Arc<dyn CsrfVerifier>) -> Self {
        self.csrf = Some(verifier);
        self
    }

    /// Reports rejections and run summaries to `emitter`.
    #[must_use]
    pub fn with_emitter(mut self, emitter: Arc<dyn ValidationEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    /// The contract this form validates against.
    #[must_use]
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Merges `data` into the raw input using the configured list mode.
    pub fn load(&mut self, data: Value) -> &mut Self {
        let mode = self.contract.config().merge_mode();
        self.load_with(data, mode)
    }

    /// Merges `data` into the raw input.
    ///
    /// Mappings merge key by key and scalars overwrite. Lists are appended
    /// to, unless `mode` is [`MergeMode::NumericAsNamed`].
    pub fn load_with(&mut self, data: Value, mode: MergeMode) -> &mut Self {
        utils::merge(&mut self.raw, data, mode);
        self
    }

    /// Validates the raw input, replacing values and errors.
    ///
    /// Returns the overall result; user-input problems are in
    /// [`Form::errors`]. A contract fault aborts the run and leaves the
    /// previous state untouched.
    pub fn validate(&mut self) -> Result<bool> {
        let timer = ValidationTimer::start();
        let mut outcome = self
            .contract
            .evaluate(&self.raw)
            .inspect_err(|e| warn!(error = %e, code = e.code(), "validation aborted"))?;

        let csrf_checked = self.csrf.is_some();
        if let Some(rejection) = self.check_csrf() {
            FieldPath::root()
                .key(self.contract.config().csrf_field.as_str())
                .insert(&mut outcome.errors, Value::Array(vec![Value::String(rejection.message.clone())]));
            outcome.rejections.push(rejection);
        }

        for rejection in &outcome.rejections {
            self.emitter.on_field_rejected(rejection);
        }
        let valid = outcome.is_valid();
        self.emitter.on_form_validated(&ValidationSummary {
            valid,
            fields: self.contract.root().leaf_count(),
            rejections: outcome.rejections.len(),
            csrf_checked,
            duration_ms: timer.elapsed_ms(),
        });

        self.values = outcome.values;
        self.errors = outcome.errors;
        self.valid = Some(valid);
        Ok(valid)
    }

    fn check_csrf(&self) -> Option<Rejection> {
        let verifier = self.csrf.as_ref()?;
        let field = &self.contract.config().csrf_field;
        let token = self.raw.get(field).and_then(Value::as_str);
        if token.is_some_and(|t| verifier.verify(t)) {
            return None;
        }
        Some(Rejection {
            path: FieldPath::root().key(field.as_str()),
            validator: CSRF_KIND.to_string(),
            message: self.contract.translator().translate(CSRF_MESSAGE, &Params::new()),
        })
    }

    /// Result of the last [`Form::validate`]; `None` before the first run.
    #[must_use]
    pub fn is_valid(&self) -> Option<bool> {
        self.valid
    }

    /// The whole raw input.
    #[must_use]
    pub fn raw_data(&self) -> &Value {
        &self.raw
    }

    /// Raw input at `path`.
    #[must_use]
    pub fn raw_data_at(&self, path: impl Into<FieldPath>) -> Option<&Value> {
        path.into().lookup(&self.raw)
    }

    /// All validated values.
    #[must_use]
    pub fn values(&self) -> &Value {
        &self.values
    }

    /// Validated value at `path`.
    #[must_use]
    pub fn value_at(&self, path: impl Into<FieldPath>) -> Option<&Value> {
        path.into().lookup(&self.values)
    }

    /// Deserializes the value at `path`; `Ok(None)` when there is none.
    pub fn value_as<T: DeserializeOwned>(&self, path: impl Into<FieldPath>) -> Result<Option<T>> {
        self.value_at(path)
            .map(|value| serde_json::from_value(value.clone()).map_err(KiraError::from))
            .transpose()
    }

    /// Deserializes all values, typically into a struct mirroring the contract.
    pub fn values_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.values.clone())?)
    }

    /// Overrides a validated value.
    pub fn set_value(&mut self, path: impl Into<FieldPath>, value: Value) {
        path.into().insert(&mut self.values, value);
    }

    /// The whole errors tree.
    #[must_use]
    pub fn errors(&self) -> &Value {
        &self.errors
    }

    /// Errors at `path`.
    #[must_use]
    pub fn errors_at(&self, path: impl Into<FieldPath>) -> Option<&Value> {
        path.into().lookup(&self.errors)
    }

    /// True if any message is recorded, including ones added after validation.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        utils::has_messages(&self.errors)
    }

    /// Every message, in tree order, joined by the configured separator.
    #[must_use]
    pub fn errors_as_string(&self) -> String {
        utils::flatten_messages(&self.errors).join(&self.contract.config().error_separator)
    }

    /// Records an application-level error such as "username already taken".
    ///
    /// When `path` names a branch, the message goes under
    /// [`BRANCH_ERRORS_KEY`] inside it. [`Form::is_valid`] is not changed.
    pub fn add_error(&mut self, path: impl Into<FieldPath>, message: impl Into<String>) {
        let slot = match path.into().ensure(&mut self.errors) {
            Value::Object(children) => children
                .entry(BRANCH_ERRORS_KEY)
                .or_insert_with(|| Value::Array(Vec::new())),
            other => other,
        };
        let message = Value::String(message.into());
        match slot {
            Value::Array(messages) => messages.push(message),
            other => *other = Value::Array(vec![message]),
        }
    }

    /// Records several errors given as a nested mapping of messages, e.g.
    /// `{"address": {"zip": "Unknown zip code"}}`.
    ///
    /// # Errors
    ///
    /// Fails when a leaf is neither a string nor a list of strings.
    pub fn add_errors(&mut self, errors: Value) -> Result<()> {
        self.add_errors_at(&FieldPath::root(), errors)
    }

    fn add_errors_at(&mut self, path: &FieldPath, errors: Value) -> Result<()> {
        match errors {
            Value::String(message) => {
                self.add_error(path, message);
                Ok(())
            }
            Value::Array(items) if items.iter().all(Value::is_string) => {
                for item in items {
                    self.add_errors_at(path, item)?;
                }
                Ok(())
            }
            Value::Object(map) => {
                for (key, nested) in map {
                    self.add_errors_at(&path.clone().key(key), nested)?;
                }
                Ok(())
            }
            other => Err(KiraError::invalid_path(
                path.to_string(),
                format!(
                    "expected a message or a mapping of messages, got {}",
                    crate::errors::describe_value(&other)
                ),
            )),
        }
    }

    /// Clears raw input, values, errors and the validity flag.
    pub fn reset(&mut self) {
        self.raw = Value::Object(Map::new());
        self.values = Value::Object(Map::new());
        self.errors = Value::Object(Map::new());
        self.valid = None;
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("raw", &self.raw)
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("valid", &self.valid)
            .field("csrf", &self.csrf.is_some())
            .finish_non_exhaustive()
    }
}
