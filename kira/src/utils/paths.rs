//! Field paths into nested value trees.

use serde_json::{Map, Value};
use std::fmt;

use crate::errors::{KiraError, Result};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named key.
    Key(String),
    /// A list position.
    Index(usize),
}

impl PathSegment {
    fn as_key(&self) -> String {
        match self {
            Self::Key(k) => k.clone(),
            Self::Index(i) => i.to_string(),
        }
    }

    fn as_index(&self) -> Option<usize> {
        match self {
            Self::Key(k) => k.parse().ok(),
            Self::Index(i) => Some(*i),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{k}"),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Address of a node inside a raw, values or errors tree.
///
/// Numeric segments index lists and also match object keys with the same text,
/// so `tags.1` works whether `tags` is a list or a keyed map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path, addressing the root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a dotted path such as `address.lines.0`.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Ok(Self::root());
        }
        let segments = path
            .split('.')
            .map(|part| {
                if part.is_empty() {
                    return Err(KiraError::invalid_path(path, "empty segment"));
                }
                Ok(part
                    .parse::<usize>()
                    .map_or_else(|_| PathSegment::Key(part.to_string()), PathSegment::Index))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }

    /// Appends a named key.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Appends a list index.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    /// Returns a new path extended by one segment.
    #[must_use]
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// The segments of this path.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// True for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Looks the path up in `tree`.
    #[must_use]
    pub fn lookup<'a>(&self, tree: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(tree, |node, segment| match node {
                Value::Object(map) => map.get(&segment.as_key()),
                Value::Array(list) => segment.as_index().and_then(|i| list.get(i)),
                _ => None,
            })
    }

    /// Mutable lookup, creating intermediate objects where nodes are missing.
    ///
    /// Scalars standing in the way are replaced by objects. Indexing past the
    /// end of a list pads it with nulls.
    pub fn ensure<'a>(&self, tree: &'a mut Value) -> &'a mut Value {
        let mut node = tree;
        for segment in &self.segments {
            node = match (node, segment.as_index()) {
                (Value::Array(list), Some(index)) => {
                    if list.len() <= index {
                        list.resize(index + 1, Value::Null);
                    }
                    &mut list[index]
                }
                (other, _) => {
                    if !other.is_object() {
                        *other = Value::Object(Map::new());
                    }
                    &mut other[segment.as_key().as_str()]
                }
            };
        }
        node
    }

    /// Writes `value` at this path, creating intermediate nodes.
    pub fn insert(&self, tree: &mut Value, value: Value) {
        *self.ensure(tree) = value;
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl From<&str> for FieldPath {
    /// Splits on dots without validation; empty segments are kept as empty keys.
    fn from(path: &str) -> Self {
        Self::parse(path).unwrap_or_else(|_| Self {
            segments: path.split('.').map(|p| PathSegment::Key(p.to_string())).collect(),
        })
    }
}

impl From<&[&str]> for FieldPath {
    fn from(parts: &[&str]) -> Self {
        Self {
            segments: parts
                .iter()
                .map(|p| {
                    p.parse::<usize>()
                        .map_or_else(|_| PathSegment::Key((*p).to_string()), PathSegment::Index)
                })
                .collect(),
        }
    }
}

impl From<Vec<PathSegment>> for FieldPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(path: &FieldPath) -> Self {
        path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse() {
        let path = FieldPath::parse("tags.1.name").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Key("tags".to_string()),
                PathSegment::Index(1),
                PathSegment::Key("name".to_string()),
            ]
        );
        assert_eq!(path.to_string(), "tags.1.name");
        assert!(FieldPath::parse("").unwrap().is_root());
        assert!(FieldPath::parse("a..b").is_err());
    }

    #[test]
    fn test_lookup_list_and_object() {
        let tree = json!({"tags": ["ok", "toolong"], "map": {"0": "zero"}});
        assert_eq!(FieldPath::from("tags.1").lookup(&tree), Some(&json!("toolong")));
        assert_eq!(FieldPath::from("map.0").lookup(&tree), Some(&json!("zero")));
        assert_eq!(FieldPath::from("tags.5").lookup(&tree), None);
        assert_eq!(FieldPath::from("tags.x").lookup(&tree), None);
        assert_eq!(FieldPath::root().lookup(&tree), Some(&tree));
    }

    #[test]
    fn test_insert_creates_intermediates() {
        let mut tree = json!({"name": "x"});
        FieldPath::from("address.city").insert(&mut tree, json!("Kyiv"));
        assert_eq!(tree, json!({"name": "x", "address": {"city": "Kyiv"}}));

        FieldPath::from("name.first").insert(&mut tree, json!("A"));
        assert_eq!(tree["name"], json!({"first": "A"}));
    }

    #[test]
    fn test_insert_pads_lists() {
        let mut tree = json!({"tags": ["a"]});
        FieldPath::from("tags.2").insert(&mut tree, json!("c"));
        assert_eq!(tree, json!({"tags": ["a", null, "c"]}));
    }

    #[test]
    fn test_builder_and_slices() {
        let built = FieldPath::root().key("tags").index(1);
        let sliced = FieldPath::from(&["tags", "1"][..]);
        assert_eq!(built, sliced);
        assert_eq!(built.child(PathSegment::Key("x".into())).to_string(), "tags.1.x");
    }
}
