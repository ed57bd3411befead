//! Pre-processing options.
//! This module provides the reserved addresses used by the pipeline and loads
//! overrides from JSON or YAML option files.

use crate::constants::{
    COLLECT_PATTERNS, COPY_PATTERNS, PLACEHOLDER_PATTERNS, PROJECT_SETTINGS, REPLACE_VALUE_MAP,
    TEMPLATE_DEFINITIONS,
};
use crate::error::{Error, Result};
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// Addresses of the reserved sections. Every field is optional in option
/// files; missing fields keep their default.
///
/// ```yaml
/// replaceValueMap: "$.options.replacements"
/// substitutionSources:
///   - "$['project-settings']"
///   - "$.component"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    pub template_definitions: String,
    pub copy_patterns: String,
    pub placeholder_patterns: String,
    pub collect_patterns: String,
    pub replace_value_map: String,
    pub substitution_sources: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            template_definitions: TEMPLATE_DEFINITIONS.to_string(),
            copy_patterns: COPY_PATTERNS.to_string(),
            placeholder_patterns: PLACEHOLDER_PATTERNS.to_string(),
            collect_patterns: COLLECT_PATTERNS.to_string(),
            replace_value_map: REPLACE_VALUE_MAP.to_string(),
            substitution_sources: vec![PROJECT_SETTINGS.to_string()],
        }
    }
}

/// Loads options from a JSON or YAML file.
///
/// # Errors
/// * `Error::ConfigError` if the file does not exist or cannot be parsed
pub fn load_options<P: AsRef<Path>>(options_file: P) -> Result<Options> {
    let options_file = options_file.as_ref();
    if !options_file.is_file() {
        return Err(Error::ConfigError(format!(
            "Invalid options path: {}",
            options_file.display()
        )));
    }

    debug!("Loading options from {}", options_file.display());
    parse_options(&std::fs::read_to_string(options_file).map_err(Error::IoError)?)
}

/// Parses options content, trying JSON first and YAML second.
pub fn parse_options(content: &str) -> Result<Options> {
    match serde_json::from_str(content) {
        Ok(options) => Ok(options),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid options format: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = parse_options("{}").unwrap();
        assert_eq!(options, Options::default());
        assert_eq!(options.replace_value_map, "$.['options'].['replaceValueMap']");
    }

    #[test]
    fn test_yaml_overrides() {
        let options = parse_options("replaceValueMap: $.out\nsubstitutionSources: []\n").unwrap();
        assert_eq!(options.replace_value_map, "$.out");
        assert!(options.substitution_sources.is_empty());
        assert_eq!(options.copy_patterns, COPY_PATTERNS);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(parse_options("replaceMap: x"), Err(Error::ConfigError(_))));
    }
}
