//! Form contracts.
//!
//! A contract is a nested mapping describing the fields of a form. Each node
//! is one of:
//! - null or empty: the raw value is copied through unvalidated
//! - a mapping with a `validators` key: a leaf, checked by its validators
//! - any other mapping: a branch of nested fields
//!
//! Contracts are loaded once by a [`ContractLoader`]; every validator kind is
//! resolved and its settings parsed at that point, so a loaded [`Contract`]
//! can be shared across threads and reused for many forms.

mod chain;
mod loader;
mod node;
mod walker;

pub use chain::{ChainOutcome, ValidatorChain};
pub use loader::ContractLoader;
pub use node::{ContractNode, LeafRule};
pub use walker::{Rejection, WalkOutcome};

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::config::ValidationConfig;
use crate::errors::Result;
use crate::i18n::SharedTranslator;
use crate::utils::FieldPath;

/// A loaded, immutable contract.
pub struct Contract {
    root: ContractNode,
    config: Arc<ValidationConfig>,
    translator: SharedTranslator,
}

impl Contract {
    /// Loads a contract with the default [`ContractLoader`].
    ///
    /// # Errors
    ///
    /// See [`ContractLoader::load`].
    pub fn from_value(contract: &Value) -> Result<Self> {
        ContractLoader::new().load(contract)
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &ContractNode {
        &self.root
    }

    /// Configuration the contract was loaded with.
    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Translator the contract was loaded with.
    #[must_use]
    pub fn translator(&self) -> &SharedTranslator {
        &self.translator
    }

    /// Validates `raw` against the whole contract.
    ///
    /// User-input problems end up in the returned errors tree; only contract
    /// faults are returned as `Err`. Every field is checked even after a
    /// rejection.
    pub fn evaluate(&self, raw: &Value) -> Result<WalkOutcome> {
        let outcome = walker::walk(&self.root, raw, &FieldPath::root())?;
        debug!(
            rejections = outcome.rejections.len(),
            valid = outcome.is_valid(),
            "contract evaluated"
        );
        Ok(outcome)
    }
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
