//! Writes values into a document, creating missing intermediate nodes.

use log::{debug, trace};
use serde_json::{Map, Value};

use crate::address::{compose_address, Address, RelativeAddress, Segment};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::matcher::find_paths;

/// Sets `value` at `relative` below every node matched by `target_pattern`.
///
/// Missing intermediate nodes are created as empty mappings; so are nodes
/// holding `null` or an empty sequence. Non-empty containers are never
/// replaced. The leaf itself is overwritten, whole subtrees included.
///
/// # Errors
/// * `Error::MalformedQuery` if `target_pattern` cannot be parsed
/// * `Error::NodeCreation` if a node must be created below a scalar or past
///   the end of a sequence
pub fn set_value(
    doc: &Document,
    target_pattern: &str,
    relative: &RelativeAddress,
    value: &Value,
) -> Result<Document> {
    set_value_at(doc, &find_paths(doc, target_pattern, None, true)?, relative, value)
}

/// Like [`set_value`], for bases that are already concrete. Writes for
/// earlier bases are visible to later ones.
///
/// # Arguments
/// * `doc` - Source document, left untouched
/// * `bases` - Concrete addresses `relative` is resolved against
/// * `relative` - Target below each base
/// * `value` - Value written at every target
///
/// # Returns
/// * `Result<Document>` - The updated copy of `doc`
pub fn set_value_at(
    doc: &Document,
    bases: &[Address],
    relative: &RelativeAddress,
    value: &Value,
) -> Result<Document> {
    let mut working = doc.clone();
    for base in bases {
        let target = compose_address(base, relative);
        debug!("Put node target {} base {} relative {}", target, base, relative);
        set_at(&mut working, &target, value.clone())?;
    }
    Ok(working)
}

/// Sets `value` at the concrete `target` of `doc`, creating intermediates.
pub fn set_at(doc: &mut Document, target: &Address, value: Value) -> Result<()> {
    let Some((leaf, intermediates)) = target.segments().split_last() else {
        *doc.root_mut() = value;
        return Ok(());
    };

    let mut current = doc.root_mut();
    let mut walked = Address::root();
    for segment in intermediates {
        current = step_into(current, segment, &walked)?;
        walked = walked.child(segment.clone());
    }

    trace!("Set at target {} value {}", target, value);
    match leaf {
        Segment::Key(key) => match current {
            Value::Object(map) => {
                map.insert(key.clone(), value);
                Ok(())
            }
            _ => Err(creation_error(leaf, &walked, "parent is not a mapping")),
        },
        Segment::Index(index) => match current {
            Value::Array(items) if *index < items.len() => {
                items[*index] = value;
                Ok(())
            }
            Value::Array(items) => {
                Err(creation_error(leaf, &walked, &format!("index out of range (length {})", items.len())))
            }
            _ => Err(creation_error(leaf, &walked, "parent is not a sequence")),
        },
    }
}

fn needs_container(node: &Value) -> bool {
    match node {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn step_into<'a>(node: &'a mut Value, segment: &Segment, parent: &Address) -> Result<&'a mut Value> {
    let child = match segment {
        Segment::Key(key) => {
            let Value::Object(map) = node else {
                return Err(creation_error(segment, parent, "parent is not a mapping"));
            };
            map.entry(key.clone()).or_insert(Value::Null)
        }
        Segment::Index(index) => {
            let Value::Array(items) = node else {
                return Err(creation_error(segment, parent, "parent is not a sequence"));
            };
            let len = items.len();
            items
                .get_mut(*index)
                .ok_or_else(|| creation_error(segment, parent, &format!("index out of range (length {len})")))?
        }
    };

    if needs_container(child) {
        debug!("Put node {} at {}", segment, parent);
        *child = Value::Object(Map::new());
    }
    Ok(child)
}

fn creation_error(segment: &Segment, parent: &Address, reason: &str) -> Error {
    Error::NodeCreation {
        segment: segment.to_string(),
        parent: parent.canonical(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn relative(s: &str) -> RelativeAddress {
        RelativeAddress::parse(s).unwrap()
    }

    #[test]
    fn test_creates_intermediate_mappings() {
        let doc = Document::new(json!({"a": {}}));
        let result = set_value(&doc, "$.a", &relative("@.b.c.d"), &json!(1)).unwrap();
        assert_eq!(result.root(), &json!({"a": {"b": {"c": {"d": 1}}}}));
        assert_eq!(doc.root(), &json!({"a": {}}));
    }

    #[test]
    fn test_replaces_null_and_empty_sequences() {
        let doc = Document::new(json!({"a": {"b": [], "c": null}}));
        let result = set_value(&doc, "$.a", &relative("@.b.x"), &json!("v")).unwrap();
        let result = set_value(&result, "$.a", &relative("@.c.y"), &json!("w")).unwrap();
        assert_eq!(result.root(), &json!({"a": {"b": {"x": "v"}, "c": {"y": "w"}}}));
    }

    #[test]
    fn test_keeps_non_empty_containers() {
        let doc = Document::new(json!({"a": {"b": {"keep": true}, "list": [{"n": 1}]}}));
        let result = set_value(&doc, "$.a", &relative("@.b.new"), &json!(2)).unwrap();
        let result = set_value(&result, "$.a", &relative("@.list[0].m"), &json!(3)).unwrap();
        assert_eq!(
            result.root(),
            &json!({"a": {"b": {"keep": true, "new": 2}, "list": [{"n": 1, "m": 3}]}})
        );
    }

    #[test]
    fn test_leaf_replaces_subtree_in_place() {
        let doc = Document::new(json!({"a": {"first": 1, "b": {"deep": {"x": 1}}, "last": 2}}));
        let result = set_value(&doc, "$.a", &relative("@.b"), &json!("flat")).unwrap();
        assert_eq!(result.to_string(), r#"{"a":{"first":1,"b":"flat","last":2}}"#);
    }

    #[test]
    fn test_every_match_is_written() {
        let doc = Document::new(json!({"targets": [{}, {"x": 0}]}));
        let result = set_value(&doc, "$.targets[*]", &relative("@x"), &json!("$.source")).unwrap();
        assert_eq!(result.root(), &json!({"targets": [{"x": "$.source"}, {"x": "$.source"}]}));
    }

    #[test]
    fn test_missing_target_is_tolerated() {
        let doc = Document::new(json!({"a": 1}));
        let result = set_value(&doc, "$.missing[*]", &relative("@.x"), &json!(1)).unwrap();
        assert_eq!(result, doc);
    }

    #[test]
    fn test_concrete_bases_with_bracket_keys() {
        let doc = Document::new(json!({"items": {"a][b": {}, "c": {"x": 0}}}));
        let bases = vec![
            Address::root().child_key("items").child_key("a][b"),
            Address::root().child_key("items").child_key("c"),
        ];
        let result = set_value_at(&doc, &bases, &relative("@.x"), &json!("$.v")).unwrap();
        assert_eq!(result.root(), &json!({"items": {"a][b": {"x": "$.v"}, "c": {"x": "$.v"}}}));

        let result = set_value(&doc, "$.items.*", &relative("@y"), &json!(1)).unwrap();
        assert_eq!(result.root()["items"]["a][b"], json!({"y": 1}));
    }

    #[test]
    fn test_cannot_create_below_scalar() {
        let doc = Document::new(json!({"a": "text"}));
        let err = set_value(&doc, "$.a", &relative("@.b.c"), &json!(1)).unwrap_err();
        assert!(matches!(err, Error::NodeCreation { .. }));
    }

    #[test]
    fn test_cannot_create_past_sequence_end() {
        let doc = Document::new(json!({"a": [{"n": 1}]}));
        let err = set_value(&doc, "$.a", &relative("@[3].b"), &json!(1)).unwrap_err();
        assert!(matches!(err, Error::NodeCreation { .. }));
    }
}
