//! Copy patterns: inject unresolved path expressions into every node matched
//! by a definition's base pattern.

use log::trace;
use serde_json::Value;

use crate::address::RelativeAddress;
use crate::definition::load_definitions;
use crate::document::Document;
use crate::error::Result;
use crate::matcher::find_paths;
use crate::mutator::set_value_at;

/// Applies every definition found under `section`, in declaration order.
///
/// Each target attribute receives the literal source pattern string, not the
/// value it points at. Base patterns are re-evaluated for every attribute, so
/// fields injected by earlier definitions can be matched by later ones.
pub fn expand_copy_patterns(doc: &Document, section: &str) -> Result<Document> {
    let mut current = doc.clone();

    for definition in load_definitions(doc, section)? {
        let Some(base_pattern) = definition.base_json_path.as_deref() else {
            continue;
        };

        for (attribute, source_pattern) in &definition.target_attributes {
            let relative = RelativeAddress::from_attribute(attribute)?;
            let bases = find_paths(&current, base_pattern, None, definition.warn_missing_paths)?;
            trace!(
                "expand_copy_patterns - base {} attribute {} {} matches",
                base_pattern,
                attribute,
                bases.len()
            );

            current = set_value_at(&current, &bases, &relative, &Value::String(source_pattern.clone()))?;
        }
    }

    Ok(current)
}
