//! Collect patterns: gather scattered values into the replacement map.

use indexmap::IndexMap;
use log::{debug, trace};
use serde_json::Value;

use crate::address::RelativeAddress;
use crate::copy::expand_copy_patterns;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::matcher::{first_value, match_values};
use crate::mutator::set_value_at;
use crate::substitution::Substitutor;

/// Builds the replacement map at `replace_map_address`.
///
/// 1. The definitions under `section` are expanded like copy patterns, which
///    usually injects source patterns into the replacement map.
/// 2. The first node matched by `replace_map_address` is read as a mapping of
///    replacer key to source pattern. Further matches are ignored.
/// 3. For every entry, the non-empty string values matched by its pattern are
///    concatenated in document order, `${key}` references to `known` are
///    substituted, and the result replaces the pattern.
///
/// A document without a replacement map is returned after step 1.
///
/// # Errors
/// * `Error::InvalidDefinition` if the replacement map is not a mapping of
///   strings
pub fn resolve_collect_patterns(
    doc: &Document,
    section: &str,
    replace_map_address: &str,
    known: &IndexMap<String, String>,
) -> Result<Document> {
    let mut current = expand_copy_patterns(doc, section)?;

    let Some(replace_map) = first_value(&current, replace_map_address, true)? else {
        return Ok(current);
    };
    let Value::Object(entries) = replace_map.value else {
        return Err(Error::InvalidDefinition {
            path: replace_map.path.canonical(),
            reason: "replacement map must be a mapping".to_string(),
        });
    };

    let map_path = replace_map.path;
    let substitutor = Substitutor::dollar(known);
    for (replacer_key, source) in entries {
        let Value::String(source_pattern) = source else {
            return Err(Error::InvalidDefinition {
                path: map_path.child_key(replacer_key).canonical(),
                reason: "replacement map entries must be query strings".to_string(),
            });
        };
        trace!("Replacer {} at {} collects {}", replacer_key, map_path, source_pattern);

        let collected = collect_strings(&current, &source_pattern)?;
        let replaced = substitutor.replace(&collected);
        trace!("Replacer {} resolved to {}", replacer_key, replaced);

        current = set_value_at(
            &current,
            std::slice::from_ref(&map_path),
            &RelativeAddress::child(&replacer_key),
            &Value::String(replaced),
        )?;
    }

    Ok(current)
}

/// Concatenates, without separator, every non-empty string matched by
/// `pattern`.
fn collect_strings(doc: &Document, pattern: &str) -> Result<String> {
    let mut collected = String::new();
    for found in match_values(doc, pattern, None, false)? {
        match found.value {
            Value::String(s) => collected.push_str(&s),
            other => debug!("Skipping non-string value {} at {}", other, found.path),
        }
    }
    Ok(collected)
}

/// The resolved replacement map, as produced by [`resolve_collect_patterns`].
/// Non-string entries are skipped.
pub fn read_replacement_map(doc: &Document, replace_map_address: &str) -> Result<IndexMap<String, String>> {
    let Some(found) = first_value(doc, replace_map_address, false)? else {
        return Ok(IndexMap::new());
    };

    Ok(found
        .value
        .as_object()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(key, value)| value.as_str().map(|s| (key.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default())
}
