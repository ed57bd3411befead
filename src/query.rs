//! Query patterns as written in configuration files, compiled with
//! `serde_json_path`.
//!
//! Configuration files use the dot notation of the Jayway engine, where a
//! dotted name runs up to the next `.` or `[` and may contain `-` or `:`
//! (`$.options.label-text`, `$.a.jcr:title`). Such names are rewritten as
//! bracketed names, and the normalized `.[` form is folded back to `[`,
//! before the pattern is parsed as an RFC 9535 JSONPath.

use log::trace;
use serde_json_path::{JsonPath, NormalizedPath, PathElement};

use crate::address::{Address, Segment, RELATIVE_MARKER, ROOT_MARKER};
use crate::constants::QUERY_HINT_URL;
use crate::error::{Error, Result};

/// Parses `pattern`.
///
/// # Arguments
/// * `pattern` - Normalized query pattern
///
/// # Returns
/// * `Result<JsonPath>` - The compiled query
///
/// # Errors
/// * `Error::MalformedQuery` with a link to an online evaluator if the
///   pattern cannot be parsed
pub fn compile(pattern: &str) -> Result<JsonPath> {
    let translated = to_rfc9535(pattern);
    trace!("compile - pattern {} translated {}", pattern, translated);

    JsonPath::parse(&translated).map_err(|e| {
        let encoded: String = url::form_urlencoded::byte_serialize(pattern.as_bytes()).collect();
        Error::MalformedQuery {
            pattern: pattern.to_string(),
            reason: e.to_string(),
            hint: format!("{QUERY_HINT_URL}{encoded}"),
        }
    })
}

/// Converts a match location into a typed address.
pub fn to_address(location: &NormalizedPath<'_>) -> Address {
    Address::from_segments(
        location
            .iter()
            .map(|element| match element {
                PathElement::Name(name) => Segment::Key(name.to_string()),
                PathElement::Index(index) => Segment::Index(*index),
            })
            .collect(),
    )
}

/// Rewrites dotted names that are not RFC 9535 shorthands as bracketed names
/// and drops the `.` of `.[`. Quoted text and numbers are copied as is.
fn to_rfc9535(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut quote: Option<char> = None;
    // Whether the last token continues a `$` or `@` path, per bracket level.
    let mut in_path = false;
    let mut nesting: Vec<bool> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(open) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.get(i + 1) {
                    out.push(*escaped);
                    i += 1;
                }
            } else if c == open {
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                out.push(c);
                i += 1;
            }
            ROOT_MARKER | RELATIVE_MARKER => {
                in_path = true;
                out.push(c);
                i += 1;
            }
            '.' if in_path => {
                let descendant = chars.get(i + 1) == Some(&'.');
                let start = if descendant { i + 2 } else { i + 1 };
                if descendant {
                    out.push_str("..");
                }

                if chars.get(start) == Some(&'[') {
                    i = start;
                    continue;
                }

                let end = chars[start..]
                    .iter()
                    .position(|c| ends_dotted_name(*c))
                    .map_or(chars.len(), |offset| start + offset);
                let name: String = chars[start..end].iter().collect();
                if name == "*" || is_shorthand(&name) || name.is_empty() {
                    if !descendant {
                        out.push('.');
                    }
                    out.push_str(&name);
                } else {
                    out.push_str(&format!("['{}']", name.replace('\\', "\\\\").replace('\'', "\\'")));
                }
                i = end;
            }
            '[' | '(' => {
                nesting.push(in_path);
                in_path = false;
                out.push(c);
                i += 1;
            }
            ']' | ')' => {
                in_path = nesting.pop().unwrap_or(false);
                out.push(c);
                i += 1;
            }
            _ => {
                in_path = false;
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

fn ends_dotted_name(c: char) -> bool {
    c.is_whitespace()
        || matches!(c, '.' | '[' | ']' | '(' | ')' | ',' | '=' | '!' | '<' | '>' | '&' | '|')
}

/// RFC 9535 member-name-shorthand.
fn is_shorthand(name: &str) -> bool {
    let mut chars = name.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || !c.is_ascii());
    first_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii())
}
