//! Placeholder tokens `@{...}`: relative references from a node to its
//! siblings, substituted in place.
//!
//! Example: with `$.field.label = "Title"` and
//! `$.field.html = "<p>@{label}: ${model.@{.name}}</p>"`, the `html` value
//! becomes `<p>Title: ${model.textfield}</p>` once `$.field.name` is read.

use indexmap::IndexMap;
use log::{trace, warn};
use regex::Regex;
use serde_json::Value;

use crate::address::{compose_address, RelativeAddress, RELATIVE_MARKER};
use crate::constants::PLACEHOLDER_PATTERNS;
use crate::document::{strip_comments, Document};
use crate::error::{Error, Result};
use crate::matcher::{first_value, match_values, PathValue};
use crate::mutator::set_value_at;
use crate::substitution::Substitutor;

const TOKEN_PATTERN: &str = r"@\{([^}]*)\}";

/// A `@{identifier}` occurrence inside serialized node text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderToken {
    /// Full token text, e.g. `@{.label}`.
    pub text: String,
    /// Text between the braces, e.g. `.label`.
    pub identifier: String,
}

impl PlaceholderToken {
    /// The identifier as an address relative to the token's parent node.
    pub fn relative_address(&self) -> Result<RelativeAddress> {
        RelativeAddress::parse(&format!("{RELATIVE_MARKER}{}", self.identifier))
    }
}

#[derive(Debug, Clone)]
pub struct PlaceholderResolver {
    token_pattern: Regex,
}

impl Default for PlaceholderResolver {
    fn default() -> Self {
        PlaceholderResolver::new()
    }
}

impl PlaceholderResolver {
    pub fn new() -> Self {
        Self { token_pattern: Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex") }
    }

    /// All tokens in `text`, in order, duplicates included.
    pub fn find_tokens(&self, text: &str) -> Vec<PlaceholderToken> {
        self.token_pattern
            .captures_iter(text)
            .map(|caps| PlaceholderToken { text: caps[0].to_string(), identifier: caps[1].to_string() })
            .collect()
    }

    /// Resolves placeholders in every node selected by the query stored at
    /// `pointer`. Only the first match of `pointer` is used; a document
    /// without it is returned unchanged.
    ///
    /// # Errors
    /// * `Error::InvalidDefinition` if the pointer does not hold a string
    /// * any fatal error raised while matching or writing nodes
    pub fn resolve(&self, doc: &Document, pointer: &str) -> Result<Document> {
        let Some(PathValue { path, value }) = first_value(doc, pointer, false)? else {
            return Ok(doc.clone());
        };
        let Value::String(finder) = value else {
            return Err(Error::InvalidDefinition {
                path: path.canonical(),
                reason: "placeholder pointer must hold a query string".to_string(),
            });
        };

        let mut current = doc.clone();
        for node in match_values(doc, &finder, None, true)? {
            current = self.resolve_node(&current, &node)?;
        }
        Ok(current)
    }

    fn resolve_node(&self, doc: &Document, node: &PathValue) -> Result<Document> {
        let text = serde_json::to_string(&node.value)?;
        trace!("Template value {} at {}", text, node.path);

        let parent = node.path.parent();
        let mut resolved = IndexMap::new();
        for token in self.find_tokens(&text) {
            if resolved.contains_key(&token.identifier) {
                continue;
            }

            let target = compose_address(&parent, &token.relative_address()?);
            match doc.get(&target) {
                Some(found) => {
                    let found = strip_comments(found);
                    trace!("Put token {} with value {}", token.text, found);
                    resolved.insert(token.identifier, render(&found));
                }
                None => warn!(
                    "Placeholder {} at {} is unresolved: nothing at {}",
                    token.text,
                    node.path.canonical(),
                    target.canonical()
                ),
            }
        }

        let substituted = Substitutor::at(&resolved).replace(&text);
        match serde_json::from_str::<Value>(&substituted) {
            Ok(value) => set_value_at(doc, std::slice::from_ref(&node.path), &RelativeAddress::current(), &value),
            Err(e) => {
                warn!(
                    "Substituted template at {} is not valid JSON, left unresolved: {}",
                    node.path.canonical(),
                    e
                );
                Ok(doc.clone())
            }
        }
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolves placeholders using the reserved `placeholder-patterns` pointer.
pub fn resolve_placeholders(doc: &Document) -> Result<Document> {
    PlaceholderResolver::new().resolve(doc, PLACEHOLDER_PATTERNS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_tokens_keeps_order_and_duplicates() {
        let tokens = PlaceholderResolver::new().find_tokens("@{a}@{.b} and @{a}");
        let identifiers: Vec<_> = tokens.iter().map(|t| t.identifier.as_str()).collect();
        assert_eq!(identifiers, vec!["a", ".b", "a"]);
        assert_eq!(tokens[1].text, "@{.b}");
    }

    #[test]
    fn test_non_string_values_are_rendered_as_json() {
        let doc = Document::new(json!({
            "template-definitions": {"placeholder-patterns": {"jsonPath": "$.a.text"}},
            "a": {"text": "max @{limit}", "limit": 5}
        }));
        let result = resolve_placeholders(&doc).unwrap();
        assert_eq!(result.root()["a"]["text"], json!("max 5"));
    }

    #[test_log::test]
    fn test_invalid_substitution_leaves_node_and_continues() {
        let doc = Document::new(json!({
            "template-definitions": {"placeholder-patterns": {"jsonPath": "$.fields[*].html"}},
            "fields": [
                {"html": "<p>@{quote}</p>", "quote": "say \"hi"},
                {"html": "<p>@{label}</p>", "label": "Title"}
            ]
        }));

        let result = resolve_placeholders(&doc).unwrap();
        assert_eq!(result.root()["fields"][0]["html"], json!("<p>@{quote}</p>"));
        assert_eq!(result.root()["fields"][1]["html"], json!("<p>Title</p>"));
    }

    #[test]
    fn test_sibling_keys_with_bracket_characters() {
        let doc = Document::new(json!({
            "template-definitions": {"placeholder-patterns": {"jsonPath": "$.*.text"}},
            "a][b": {"text": "@{x][y}-@{.['n']}", "x][y": "X", "n": 1}
        }));

        let result = resolve_placeholders(&doc).unwrap();
        assert_eq!(result.root()["a][b"]["text"], json!("X-1"));
    }

    #[test]
    fn test_pointer_must_be_a_string() {
        let doc = Document::new(json!({
            "template-definitions": {"placeholder-patterns": {"jsonPath": 3}}
        }));
        assert!(matches!(resolve_placeholders(&doc), Err(Error::InvalidDefinition { .. })));
    }

    #[test]
    fn test_without_pointer_document_is_unchanged() {
        let doc = Document::new(json!({"a": "@{b}"}));
        assert_eq!(resolve_placeholders(&doc).unwrap(), doc);
    }
}
