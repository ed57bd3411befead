//! Known substitutions: fixed `${key}` values derived from project settings,
//! applied to collected replacement values.

use indexmap::IndexMap;
use serde_json::Value;

use crate::document::{strip_comments, Document};
use crate::error::Result;
use crate::matcher::match_values;

/// Builds the known-substitution map of `doc`.
///
/// Top-level scalar fields come first, keyed by name. Then the scalar leaves
/// of every node matched by `sources` are added, keyed by their path below
/// that node joined with `.` (`code.group`, `apps.0`). Later keys win.
pub fn known_substitutions(doc: &Document, sources: &[String]) -> Result<IndexMap<String, String>> {
    let mut known = IndexMap::new();

    if let Value::Object(fields) = strip_comments(doc.root()) {
        for (key, value) in fields {
            if let Some(text) = scalar_text(&value) {
                known.insert(key, text);
            }
        }
    }

    for source in sources {
        for found in match_values(doc, source, None, false)? {
            flatten(&found.value, "", &mut known);
        }
    }

    Ok(known)
}

fn flatten(value: &Value, prefix: &str, out: &mut IndexMap<String, String>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten(child, &join(key), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(child, &join(&index.to_string()), out);
            }
        }
        scalar => {
            if let (false, Some(text)) = (prefix.is_empty(), scalar_text(scalar)) {
                out.insert(prefix.to_string(), text);
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
