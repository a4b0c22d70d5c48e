//! # Kira
//!
//! Contract-driven validation of submitted form data.
//!
//! A contract is a nested JSON document mirroring the shape of the expected
//! input. Each leaf names an ordered chain of validators; the engine walks the
//! contract against the raw data and produces a values tree and an errors
//! tree of the same shape.
//!
//! - **Contracts**: loaded once, checked up front, shared between requests
//! - **Validators**: required, limits, enum, email, date, ids, casts, filters,
//!   external checks and text normalization
//! - **Forms**: raw data merging, CSRF checks, application errors and typed
//!   access to validated values
//! - **Observability**: `tracing` logs plus pluggable validation emitters
//!
//! ## Quick Start
//!
//! ```rust
//! use kira::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let contract = ContractLoader::new()
//!     .load(&json!({
//!         "email": {"validators": {"required": true, "email": true}},
//!         "age": {"validators": {"expect_id": true, "bounds": {"min": 18}}}
//!     }))
//!     .unwrap();
//!
//! let mut form = Form::new(Arc::new(contract));
//! form.load(json!({"email": "ann@example.com", "age": "16"}));
//!
//! assert!(!form.validate().unwrap());
//! assert_eq!(form.errors_at("age"), Some(&json!(["Value must be at least 18"])));
//! assert_eq!(form.value_at("email"), Some(&json!("ann@example.com")));
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod contract;
pub mod errors;
pub mod form;
pub mod i18n;
pub mod observability;
pub mod testing;
pub mod utils;
pub mod validators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ValidationConfig;
    pub use crate::contract::{Contract, ContractLoader, ContractNode, Rejection, WalkOutcome};
    pub use crate::errors::{KiraError, Result};
    pub use crate::form::{CsrfVerifier, Form, StaticTokenVerifier};
    pub use crate::i18n::{CatalogTranslator, IdentityTranslator, SharedTranslator, Translator};
    pub use crate::observability::{
        CollectingValidationEmitter, LoggingValidationEmitter, NoOpValidationEmitter,
        ValidationEmitter,
    };
    pub use crate::utils::{FieldPath, MergeMode};
    pub use crate::validators::{
        ExternalCheck, ExternalVerdict, FnExternal, JsonExternal, Validator, ValidatorOutcome,
        ValidatorRegistry,
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_prelude_round_trip() {
        let contract = ContractLoader::new()
            .load(&json!({"name": {"validators": {"required": true}}}))
            .unwrap();
        let mut form = Form::new(Arc::new(contract));
        form.load(json!({"name": "Ann"}));
        assert!(form.validate().unwrap());
    }
}
