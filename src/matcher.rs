//! Query adapter: matches patterns against a document and reports the
//! concrete addresses and values found.

use log::{debug, trace, warn};
use serde_json::Value;

use crate::address::{normalize, Address};
use crate::document::{strip_comments, Document};
use crate::error::{Error, Result};
use crate::query::{compile, to_address};

/// Optional predicate restricting which matched addresses are kept.
pub type PathFilter<'f> = &'f dyn Fn(&Address) -> bool;

/// A matched node: its concrete address and its comment-free value.
#[derive(Debug, Clone, PartialEq)]
pub struct PathValue {
    pub path: Address,
    pub value: Value,
}

/// Result of matching a pattern. An empty match is not an error; the caller
/// decides whether it deserves a warning.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Found(Vec<Address>),
    EmptyWithWarning,
    EmptyQuiet,
}

impl MatchOutcome {
    pub fn is_empty(&self) -> bool {
        !matches!(self, MatchOutcome::Found(paths) if !paths.is_empty())
    }

    /// Logs an empty outcome at warn or debug level and returns the matched
    /// addresses.
    pub fn report(self, pattern: &str) -> Vec<Address> {
        match self {
            MatchOutcome::Found(paths) => paths,
            MatchOutcome::EmptyWithWarning => {
                warn!("No node matches '{}'", pattern);
                Vec::new()
            }
            MatchOutcome::EmptyQuiet => {
                debug!("No node matches '{}'", pattern);
                Vec::new()
            }
        }
    }
}

/// Evaluates `pattern` against the comment-free document and returns the
/// matched addresses in document order.
///
/// # Errors
/// * `Error::MalformedQuery` if the pattern cannot be parsed
pub fn match_paths(
    doc: &Document,
    pattern: &str,
    filter: Option<PathFilter<'_>>,
    warn_on_empty: bool,
) -> Result<MatchOutcome> {
    let normalized = normalize(pattern);
    trace!("match_paths - pattern {}", normalized);

    let query = compile(&normalized)?;
    let visible = strip_comments(doc.root());
    let paths: Vec<Address> = query
        .query_located(&visible)
        .into_iter()
        .map(|node| to_address(node.location()))
        .filter(|address| filter.map_or(true, |keep| keep(address)))
        .collect();

    if !paths.is_empty() {
        Ok(MatchOutcome::Found(paths))
    } else if warn_on_empty {
        Ok(MatchOutcome::EmptyWithWarning)
    } else {
        Ok(MatchOutcome::EmptyQuiet)
    }
}

/// [`match_paths`] with the empty outcome already reported.
pub fn find_paths(
    doc: &Document,
    pattern: &str,
    filter: Option<PathFilter<'_>>,
    warn_on_empty: bool,
) -> Result<Vec<Address>> {
    Ok(match_paths(doc, pattern, filter, warn_on_empty)?.report(pattern))
}

/// Evaluates `pattern` and re-reads the value at every matched address.
///
/// # Errors
/// * `Error::MalformedQuery` if the pattern cannot be parsed
/// * `Error::LookupInconsistency` if a matched address cannot be read back
pub fn match_values(
    doc: &Document,
    pattern: &str,
    filter: Option<PathFilter<'_>>,
    warn_on_empty: bool,
) -> Result<Vec<PathValue>> {
    values_at(doc, find_paths(doc, pattern, filter, warn_on_empty)?)
}

/// Reads the comment-free value at each address of `paths`.
///
/// # Errors
/// * `Error::LookupInconsistency` if an address names no node of `doc`
pub fn values_at(doc: &Document, paths: Vec<Address>) -> Result<Vec<PathValue>> {
    paths
        .into_iter()
        .map(|path| {
            trace!("values_at - address {}", path);
            let value = doc
                .get(&path)
                .map(strip_comments)
                .ok_or_else(|| Error::LookupInconsistency { address: path.canonical() })?;
            Ok(PathValue { path, value })
        })
        .collect()
}

/// First value matched by `pattern`, if any. Further matches are ignored.
pub fn first_value(doc: &Document, pattern: &str, warn_on_empty: bool) -> Result<Option<PathValue>> {
    Ok(match_values(doc, pattern, None, warn_on_empty)?.into_iter().next())
}
