//! Helpers for nested value trees: emptiness, merging, flattening.

use serde_json::Value;

/// How [`merge`] treats list entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// Incoming list entries are appended to the existing list.
    #[default]
    AppendNumeric,
    /// Incoming list entries overwrite (and recursively merge into) the
    /// entry at the same index.
    NumericAsNamed,
}

/// Loose emptiness used to decide whether a field can skip validation.
///
/// Null, `""`, `[]` and `{}` are empty. `"0"`, `0`, `false` and whitespace
/// are not: they are answers the user actually typed.
#[must_use]
pub fn is_loosely_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(list) => list.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// True for lists and keyed maps, the shapes a form can submit for
/// multi-valued fields.
#[must_use]
pub fn is_collection(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Recursively merges `incoming` into `target`.
///
/// Objects merge key by key, scalars overwrite, lists follow `mode`.
pub fn merge(target: &mut Value, incoming: Value, mode: MergeMode) {
    match (target, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => merge(slot, value, mode),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(existing), Value::Array(incoming)) => match mode {
            MergeMode::AppendNumeric => existing.extend(incoming),
            MergeMode::NumericAsNamed => {
                for (index, value) in incoming.into_iter().enumerate() {
                    match existing.get_mut(index) {
                        Some(slot) => merge(slot, value, mode),
                        None => existing.push(value),
                    }
                }
            }
        },
        (slot, value) => *slot = value,
    }
}

/// Collects every message in an errors tree, depth first, in tree order.
#[must_use]
pub fn flatten_messages(errors: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_messages(errors, &mut out);
    out
}

fn collect_messages(node: &Value, out: &mut Vec<String>) {
    match node {
        Value::String(message) => out.push(message.clone()),
        Value::Array(items) => items.iter().for_each(|item| collect_messages(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_messages(item, out)),
        _ => {}
    }
}

/// True if any leaf of an errors tree carries a message.
#[must_use]
pub fn has_messages(errors: &Value) -> bool {
    match errors {
        Value::String(_) => true,
        Value::Array(items) => items.iter().any(has_messages),
        Value::Object(map) => map.values().any(has_messages),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_is_loosely_empty() {
        assert!(is_loosely_empty(&json!(null)));
        assert!(is_loosely_empty(&json!("")));
        assert!(is_loosely_empty(&json!([])));
        assert!(is_loosely_empty(&json!({})));
        assert!(!is_loosely_empty(&json!("0")));
        assert!(!is_loosely_empty(&json!(0)));
        assert!(!is_loosely_empty(&json!(false)));
        assert!(!is_loosely_empty(&json!("  ")));
        assert!(!is_loosely_empty(&json!([null])));
    }

    #[test]
    fn test_merge_objects_recursively() {
        let mut target = json!({"user": {"name": "a", "age": 1}, "x": 1});
        merge(&mut target, json!({"user": {"name": "b"}, "y": 2}), MergeMode::AppendNumeric);
        assert_eq!(target, json!({"user": {"name": "b", "age": 1}, "x": 1, "y": 2}));
    }

    #[test]
    fn test_merge_lists_append() {
        let mut target = json!({"tags": ["a", "b"]});
        merge(&mut target, json!({"tags": ["c"]}), MergeMode::AppendNumeric);
        assert_eq!(target, json!({"tags": ["a", "b", "c"]}));
    }

    #[test]
    fn test_merge_lists_by_index() {
        let mut target = json!({"tags": ["a", "b"]});
        merge(&mut target, json!({"tags": ["c"]}), MergeMode::NumericAsNamed);
        assert_eq!(target, json!({"tags": ["c", "b"]}));

        merge(&mut target, json!({"tags": ["d", "e", "f"]}), MergeMode::NumericAsNamed);
        assert_eq!(target, json!({"tags": ["d", "e", "f"]}));
    }

    #[test]
    fn test_merge_scalar_overwrites_shape() {
        let mut target = json!({"a": {"b": 1}});
        merge(&mut target, json!({"a": "flat"}), MergeMode::AppendNumeric);
        assert_eq!(target, json!({"a": "flat"}));

        let mut root = Value::Null;
        merge(&mut root, json!({"k": 1}), MergeMode::AppendNumeric);
        assert_eq!(root, json!({"k": 1}));
    }

    #[test]
    fn test_flatten_and_has_messages() {
        let errors = json!({
            "name": [],
            "tags": [[], ["too long"]],
            "address": {"city": ["required"]}
        });
        assert_eq!(flatten_messages(&errors), vec!["too long", "required"]);
        assert!(has_messages(&errors));
        assert!(!has_messages(&json!({"name": [], "tags": [[], []]})));
    }
}
