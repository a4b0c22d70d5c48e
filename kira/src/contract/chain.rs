//! Ordered validator execution for one field.

use serde_json::Value;
use tracing::trace;

use crate::errors::Result;
use crate::validators::{Validator, ValidatorOutcome};

/// Result of running a chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome {
    /// Every validator accepted; carries the last transformed value.
    Passed(Value),
    /// A validator rejected and the chain stopped there.
    Failed {
        /// The value as the failing validator received it.
        value: Value,
        /// Kind of the failing validator.
        validator: String,
        /// Its message.
        message: String,
    },
}

/// Validators of one field, run in order.
///
/// Each validator receives the value accepted by the previous one; the first
/// rejection ends the run.
#[derive(Debug, Default)]
pub struct ValidatorChain {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a validator.
    pub fn push(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    /// Appends a validator, builder style.
    #[must_use]
    pub fn with(mut self, validator: Box<dyn Validator>) -> Self {
        self.push(validator);
        self
    }

    /// Number of validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// True when the chain has no validators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Kinds of the validators, in run order.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        self.validators.iter().map(|v| v.kind()).collect()
    }

    /// Runs the chain on `value`.
    ///
    /// # Errors
    ///
    /// Propagates the first contract fault raised by a validator.
    pub fn run(&self, value: Value) -> Result<ChainOutcome> {
        let mut current = value;
        for validator in &self.validators {
            match validator.validate(current.clone())? {
                ValidatorOutcome::Accepted(next) => current = next,
                ValidatorOutcome::Rejected(message) => {
                    trace!(validator = validator.kind(), %message, "validator rejected value");
                    return Ok(ChainOutcome::Failed {
                        value: current,
                        validator: validator.kind().to_string(),
                        message,
                    });
                }
            }
        }
        Ok(ChainOutcome::Passed(current))
    }
}
