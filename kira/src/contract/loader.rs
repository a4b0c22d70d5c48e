//! Turns a raw contract description into a [`Contract`].

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{Contract, ContractNode, LeafRule, ValidatorChain};
use crate::config::ValidationConfig;
use crate::errors::{describe_value, KiraError, Result};
use crate::i18n::{self, SharedTranslator};
use crate::utils::FieldPath;
use crate::validators::{Required, ValidatorRegistry};

const VALIDATORS: &str = "validators";
const EXPECT_ARRAY: &str = "expect_array";
const REQUIRED: &str = "required";

/// Builds contracts against a validator registry, a configuration and a
/// translator.
///
/// ```rust
/// use kira::contract::ContractLoader;
/// use serde_json::json;
///
/// let contract = ContractLoader::new()
///     .load(&json!({"name": {"validators": {"required": true, "length": {"max": 20}}}}))
///     .unwrap();
/// assert_eq!(contract.root().leaf_count(), 1);
/// ```
#[derive(Clone)]
pub struct ContractLoader {
    registry: Arc<ValidatorRegistry>,
    config: Arc<ValidationConfig>,
    translator: SharedTranslator,
}

impl Default for ContractLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractLoader {
    /// A loader with the built-in validators, default configuration and no
    /// translation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ValidatorRegistry::with_builtins()),
            config: Arc::new(ValidationConfig::default()),
            translator: i18n::identity(),
        }
    }

    /// Uses `registry` to resolve validator kinds and external checks.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<ValidatorRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Uses `config` for validator defaults and form behaviour.
    #[must_use]
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Routes every message through `translator`.
    #[must_use]
    pub fn with_translator(mut self, translator: SharedTranslator) -> Self {
        self.translator = translator;
        self
    }

    /// The registry in use.
    #[must_use]
    pub fn registry(&self) -> &Arc<ValidatorRegistry> {
        &self.registry
    }

    /// Loads a contract.
    ///
    /// # Errors
    ///
    /// Fails on malformed nodes, unknown validator kinds or invalid settings.
    pub fn load(&self, contract: &Value) -> Result<Contract> {
        let root = self.node(contract, &FieldPath::root())?;
        debug!(leaves = root.leaf_count(), "contract loaded");
        Ok(Contract {
            root,
            config: Arc::clone(&self.config),
            translator: self.translator.clone(),
        })
    }

    /// Loads a contract from JSON text.
    ///
    /// # Errors
    ///
    /// Fails on invalid JSON, then as [`ContractLoader::load`].
    pub fn load_str(&self, json: &str) -> Result<Contract> {
        let value: Value = serde_json::from_str(json)?;
        self.load(&value)
    }

    fn node(&self, raw: &Value, path: &FieldPath) -> Result<ContractNode> {
        match raw {
            Value::Null => Ok(ContractNode::PassThrough),
            Value::Array(list) if list.is_empty() => Ok(ContractNode::PassThrough),
            Value::Object(map) if map.is_empty() => Ok(ContractNode::PassThrough),
            Value::Object(map) if map.contains_key(VALIDATORS) => {
                self.leaf(map, path).map(ContractNode::Leaf)
            }
            Value::Object(map) => map
                .iter()
                .map(|(key, child)| Ok((key.clone(), self.node(child, &path.clone().key(key))?)))
                .collect::<Result<Vec<_>>>()
                .map(ContractNode::Branch),
            other => Err(KiraError::invalid_contract(
                display_path(path),
                format!("expected a mapping or null, got {}", describe_value(other)),
            )),
        }
    }

    fn leaf(&self, node: &Map<String, Value>, path: &FieldPath) -> Result<LeafRule> {
        if let Some(extra) = node.keys().find(|k| *k != VALIDATORS && *k != EXPECT_ARRAY) {
            return Err(KiraError::invalid_contract(
                display_path(path),
                format!("unexpected key '{extra}' next to '{VALIDATORS}'"),
            ));
        }
        let validators = match &node[VALIDATORS] {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => {
                return Err(KiraError::invalid_contract(
                    display_path(path),
                    format!("'{VALIDATORS}' must be a mapping, got {}", describe_value(other)),
                ))
            }
        };

        let beside = node.get(EXPECT_ARRAY).map(|v| flag(v, path)).transpose()?;
        let inside = validators.get(EXPECT_ARRAY).map(|v| flag(v, path)).transpose()?;
        let expect_array = match (beside, inside) {
            (Some(_), Some(_)) => {
                return Err(KiraError::invalid_contract(
                    display_path(path),
                    format!("'{EXPECT_ARRAY}' is given both inside and next to '{VALIDATORS}'"),
                ))
            }
            (flag, None) | (None, flag) => flag.unwrap_or(false),
        };

        let required = match validators.get(REQUIRED) {
            Some(settings) => Required::from_settings(settings, &self.translator),
            None => Required::disabled(&self.translator),
        }
        .inspect_err(|e| warn!(field = %path, error = %e, "invalid required settings"))?;

        let mut chain = ValidatorChain::new();
        for (kind, settings) in &validators {
            if kind == REQUIRED || kind == EXPECT_ARRAY {
                continue;
            }
            let built = self
                .registry
                .build(kind, settings, &self.config, &self.translator)
                .inspect_err(|e| warn!(field = %path, validator = %kind, error = %e, "invalid validator"))?;
            if let Some(validator) = built {
                chain.push(validator);
            }
        }

        LeafRule::new(required, chain, expect_array, &self.translator)
    }
}

impl std::fmt::Debug for ContractLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractLoader")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn flag(value: &Value, path: &FieldPath) -> Result<bool> {
    value.as_bool().ok_or_else(|| {
        KiraError::invalid_contract(
            display_path(path),
            format!("'{EXPECT_ARRAY}' must be a boolean, got {}", describe_value(value)),
        )
    })
}

fn display_path(path: &FieldPath) -> String {
    if path.is_root() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}
