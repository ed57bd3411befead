//! The configuration document: an ordered JSON tree threaded by value through
//! every pre-processing phase.

use std::fmt;

use serde_json::Value;

use crate::address::{Address, Segment};
use crate::constants::COMMENT_KEY;
use crate::error::Result;

/// Ordered JSON document. Operations never mutate a document in place from
/// the caller's point of view: they clone, change the copy and return it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Wraps an already parsed JSON value.
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parses a document from JSON text.
    ///
    /// # Arguments
    /// * `content` - JSON text of the whole document
    ///
    /// # Returns
    /// * `Result<Document>` - The document, keys in source order
    ///
    /// # Errors
    /// * `Error::JsonError` if the text is not valid JSON
    pub fn parse(content: &str) -> Result<Self> {
        Ok(Self { root: serde_json::from_str(content)? })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Pretty printed JSON text, keys in document order.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Reads the node at `address`. The comment field is never visible.
    ///
    /// # Arguments
    /// * `address` - Concrete address of the node
    ///
    /// # Returns
    /// * `Option<&Value>` - The node, or `None` if nothing lives there
    pub fn get(&self, address: &Address) -> Option<&Value> {
        let mut current = &self.root;
        for segment in address.segments() {
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) if key != COMMENT_KEY => map.get(key)?,
                (Segment::Index(index), Value::Array(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub(crate) fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    /// Copy of the document with every comment field removed.
    pub fn strip_comments(&self) -> Self {
        Self { root: strip_comments(&self.root) }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

/// Deep copy of `value` without comment fields at any depth.
pub fn strip_comments(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| key.as_str() != COMMENT_KEY)
                .map(|(key, value)| (key.clone(), strip_comments(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_comments).collect()),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_by_address() {
        let doc = Document::new(json!({"a": [{"b": 1}], "_comment_": "x"}));
        let address = Address::root().child_key("a").child_index(0).child_key("b");
        assert_eq!(doc.get(&address), Some(&json!(1)));
        assert_eq!(doc.get(&Address::root().child_key("_comment_")), None);
        assert_eq!(doc.get(&Address::root().child_key("a").child_index(3)), None);
    }

    #[test]
    fn test_strip_comments_keeps_order() {
        let doc = Document::parse(r#"{"z": 1, "_comment_": "c", "a": {"_comment_": "d", "k": [ {"_comment_": 1} ]}}"#)
            .unwrap();
        let stripped = doc.strip_comments();
        assert_eq!(stripped.to_string(), r#"{"z":1,"a":{"k":[{}]}}"#);
    }
}
