//! Template definitions declared in the configuration document.

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Deserialize;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::matcher::{match_paths, match_values};

/// A rule pairing a base address pattern with attributes to write below every
/// node it matches.
///
/// ```json
/// {
///   "baseJsonPath": "$.options.properties[*]",
///   "warnMissingPaths": true,
///   "targetAttributes": { "@.label-text": "$.meta.label" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Definition {
    #[serde(rename = "baseJsonPath")]
    pub base_json_path: Option<String>,

    #[serde(rename = "warnMissingPaths")]
    pub warn_missing_paths: bool,

    /// Attribute name (or relative address) to source address pattern.
    #[serde(rename = "targetAttributes")]
    pub target_attributes: IndexMap<String, String>,
}

impl Definition {
    /// A definition without a base pattern cannot be evaluated.
    pub fn is_valid(&self) -> bool {
        self.base_json_path.is_some()
    }
}

/// Whether the document declares template definitions under `root` at all.
pub fn templates_available(doc: &Document, root: &str) -> Result<bool> {
    let outcome = match_paths(doc, root, None, false)?;
    if outcome.is_empty() {
        debug!("Template definitions not used");
        return Ok(false);
    }
    Ok(true)
}

/// Reads every immediate child of `section` as a [`Definition`].
///
/// Unknown fields are ignored. Definitions without `baseJsonPath` are dropped
/// with a warning.
///
/// # Errors
/// * `Error::InvalidDefinition` if a child cannot be deserialized
pub fn load_definitions(doc: &Document, section: &str) -> Result<Vec<Definition>> {
    let mut definitions = Vec::new();
    for found in match_values(doc, &format!("{section}.*"), None, true)? {
        let definition: Definition =
            serde_json::from_value(found.value).map_err(|e| Error::InvalidDefinition {
                path: found.path.canonical(),
                reason: e.to_string(),
            })?;

        if definition.is_valid() {
            definitions.push(definition);
        } else {
            warn!("Skipping definition at {} without baseJsonPath", found.path.canonical());
        }
    }
    Ok(definitions)
}
