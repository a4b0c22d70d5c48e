//! Loaded contract nodes.

use super::ValidatorChain;
use crate::errors::Result;
use crate::i18n::SharedTranslator;
use crate::validators::{Messages, Required};

const SHAPE_KIND: &str = "expect_array";
const SHAPE_MESSAGES: &[(&str, &str)] = &[
    ("not_a_list", "Value must be a list"),
    ("unexpected_list", "Value must not be a list"),
];

/// One node of a loaded contract.
#[derive(Debug)]
pub enum ContractNode {
    /// No rules: the raw value is copied into the values tree untouched.
    PassThrough,
    /// Nested fields, in contract order.
    Branch(Vec<(String, ContractNode)>),
    /// A validated field.
    Leaf(LeafRule),
}

impl ContractNode {
    /// Number of leaves below (and including) this node.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::PassThrough => 0,
            Self::Leaf(_) => 1,
            Self::Branch(children) => children.iter().map(|(_, child)| child.leaf_count()).sum(),
        }
    }

    /// The child named `key`, for branches.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Branch(children) => children.iter().find(|(k, _)| k == key).map(|(_, child)| child),
            _ => None,
        }
    }
}

/// Rules of one field: the presence check, the validator chain and the
/// list flag.
#[derive(Debug)]
pub struct LeafRule {
    required: Required,
    chain: ValidatorChain,
    expect_array: bool,
    shape_messages: Messages,
}

impl LeafRule {
    /// Creates a leaf rule.
    pub fn new(
        required: Required,
        chain: ValidatorChain,
        expect_array: bool,
        translator: &SharedTranslator,
    ) -> Result<Self> {
        Ok(Self {
            required,
            chain,
            expect_array,
            shape_messages: Messages::new(SHAPE_KIND, SHAPE_MESSAGES, None, translator.clone())?,
        })
    }

    /// The presence check; always evaluated before the chain.
    #[must_use]
    pub fn required(&self) -> &Required {
        &self.required
    }

    /// The validators after `required`, in contract order.
    #[must_use]
    pub fn chain(&self) -> &ValidatorChain {
        &self.chain
    }

    /// True when the field takes a list (or keyed map) of values, each
    /// validated on its own.
    #[must_use]
    pub fn expect_array(&self) -> bool {
        self.expect_array
    }

    pub(crate) fn shape_message(&self, cause: &str) -> String {
        self.shape_messages.render(cause, &crate::i18n::Params::new())
    }

    pub(crate) fn shape_kind() -> &'static str {
        SHAPE_KIND
    }
}
