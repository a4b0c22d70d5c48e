//! Recursive evaluation of a contract against raw input.
//!
//! Every call returns the value and error subtrees for its node; parents
//! assemble them into their own mappings.

use serde_json::{Map, Value};

use super::{ChainOutcome, ContractNode, LeafRule};
use crate::errors::Result;
use crate::utils::{is_collection, is_loosely_empty, FieldPath, PathSegment};

static NULL: Value = Value::Null;

/// A user-facing rejection recorded during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Field (or list element) that was rejected.
    pub path: FieldPath,
    /// Kind of the rejecting check (`required`, `expect_array`, a validator kind).
    pub validator: String,
    /// The translated message.
    pub message: String,
}

/// Values and errors for one contract node.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkOutcome {
    /// Validated values, shaped like the contract.
    pub values: Value,
    /// Error lists, shaped like the values.
    pub errors: Value,
    /// Every rejection, in contract order.
    pub rejections: Vec<Rejection>,
}

impl WalkOutcome {
    /// True when nothing was rejected.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.rejections.is_empty()
    }

    fn clean(value: Value) -> Self {
        Self {
            values: value,
            errors: Value::Array(Vec::new()),
            rejections: Vec::new(),
        }
    }

    fn rejected(value: Value, path: &FieldPath, validator: &str, message: String) -> Self {
        Self {
            values: value,
            errors: Value::Array(vec![Value::String(message.clone())]),
            rejections: vec![Rejection {
                path: path.clone(),
                validator: validator.to_string(),
                message,
            }],
        }
    }
}

pub(crate) fn walk(node: &ContractNode, raw: &Value, path: &FieldPath) -> Result<WalkOutcome> {
    match node {
        ContractNode::PassThrough => Ok(WalkOutcome::clean(raw.clone())),
        ContractNode::Branch(children) => walk_branch(children, raw, path),
        ContractNode::Leaf(rule) => walk_leaf(rule, raw, path),
    }
}

fn walk_branch(children: &[(String, ContractNode)], raw: &Value, path: &FieldPath) -> Result<WalkOutcome> {
    let mut values = Map::new();
    let mut errors = Map::new();
    let mut rejections = Vec::new();
    for (key, child) in children {
        let sub = walk(child, child_of(raw, key), &path.child(PathSegment::Key(key.clone())))?;
        values.insert(key.clone(), sub.values);
        errors.insert(key.clone(), sub.errors);
        rejections.extend(sub.rejections);
    }
    Ok(WalkOutcome {
        values: Value::Object(values),
        errors: Value::Object(errors),
        rejections,
    })
}

fn walk_leaf(rule: &LeafRule, raw: &Value, path: &FieldPath) -> Result<WalkOutcome> {
    // Empty input is settled by `required` alone, whatever the list flag says.
    // A non-empty list is present, so elements only go through the chain.
    if is_loosely_empty(raw) {
        return check_value(rule, raw.clone(), path);
    }
    match (rule.expect_array(), raw) {
        (true, Value::Array(items)) => {
            let mut values = Vec::with_capacity(items.len());
            let mut errors = Vec::with_capacity(items.len());
            let mut rejections = Vec::new();
            for (index, item) in items.iter().enumerate() {
                let sub = check_element(rule, item.clone(), &path.child(PathSegment::Index(index)))?;
                values.push(sub.values);
                errors.push(sub.errors);
                rejections.extend(sub.rejections);
            }
            Ok(WalkOutcome {
                values: Value::Array(values),
                errors: Value::Array(errors),
                rejections,
            })
        }
        (true, Value::Object(items)) => {
            let mut values = Map::new();
            let mut errors = Map::new();
            let mut rejections = Vec::new();
            for (key, item) in items {
                let sub = check_element(rule, item.clone(), &path.child(PathSegment::Key(key.clone())))?;
                values.insert(key.clone(), sub.values);
                errors.insert(key.clone(), sub.errors);
                rejections.extend(sub.rejections);
            }
            Ok(WalkOutcome {
                values: Value::Object(values),
                errors: Value::Object(errors),
                rejections,
            })
        }
        (true, _) => Ok(WalkOutcome::rejected(
            Value::Null,
            path,
            LeafRule::shape_kind(),
            rule.shape_message("not_a_list"),
        )),
        (false, Value::Array(_) | Value::Object(_)) => Ok(unexpected_list(rule, path)),
        (false, _) => check_value(rule, raw.clone(), path),
    }
}

/// Presence check, then the chain.
fn check_value(rule: &LeafRule, value: Value, path: &FieldPath) -> Result<WalkOutcome> {
    let required = rule.required();
    if required.is_enabled() && !required.is_present(&value) {
        return Ok(WalkOutcome::rejected(value, path, "required", required.message()));
    }
    run_chain(rule, value, path)
}

/// One element of a list leaf. Elements are scalars; a nested list is
/// rejected like a list sent to a scalar leaf.
fn check_element(rule: &LeafRule, item: Value, path: &FieldPath) -> Result<WalkOutcome> {
    if is_collection(&item) && !is_loosely_empty(&item) {
        return Ok(unexpected_list(rule, path));
    }
    run_chain(rule, item, path)
}

fn unexpected_list(rule: &LeafRule, path: &FieldPath) -> WalkOutcome {
    WalkOutcome::rejected(
        Value::Null,
        path,
        LeafRule::shape_kind(),
        rule.shape_message("unexpected_list"),
    )
}

/// Runs the chain unless the value is empty.
fn run_chain(rule: &LeafRule, value: Value, path: &FieldPath) -> Result<WalkOutcome> {
    if is_loosely_empty(&value) {
        return Ok(WalkOutcome::clean(value));
    }
    Ok(match rule.chain().run(value)? {
        ChainOutcome::Passed(value) => WalkOutcome::clean(value),
        ChainOutcome::Failed { value, validator, message } => {
            WalkOutcome::rejected(value, path, &validator, message)
        }
    })
}

fn child_of<'a>(raw: &'a Value, key: &str) -> &'a Value {
    match raw {
        Value::Object(map) => map.get(key),
        Value::Array(list) => key.parse::<usize>().ok().and_then(|index| list.get(index)),
        _ => None,
    }
    .unwrap_or(&NULL)
}
