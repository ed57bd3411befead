//! Addresses into a configuration document.
//!
//! Query patterns are plain strings handled by [`crate::query`]. Once a pattern
//! has been matched, every hit is a concrete [`Address`]: a list of object keys
//! and array indexes starting at the root. Relative addresses (`@...`) are
//! typed too, and [`compose_address`] appends their segments to a base.

use std::fmt;

use log::trace;

use crate::error::{Error, Result};

/// Marker that starts every absolute address.
pub const ROOT_MARKER: char = '$';

/// Marker that starts every relative address.
pub const RELATIVE_MARKER: char = '@';

/// Upper bound on rewrite passes; real inputs settle after one or two.
const MAX_NORMALIZE_PASSES: usize = 16;

/// A single step of a concrete address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "['{}']", escape_key(key)),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Concrete address naming exactly one node of a document.
///
/// Renders as `$['items'][0]`; [`Address::canonical`] gives the normalized
/// `$.['items'].[0]` form used in messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address {
    segments: Vec<Segment>,
}

impl Address {
    /// The document root, `$`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds an address from root-relative segments, outermost first.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parses a concrete address such as `$.a.b`, `$['a'][0]` or the
    /// canonical `$.['a'].[0]`.
    ///
    /// # Arguments
    /// * `address` - Address text starting with the root marker
    ///
    /// # Returns
    /// * `Result<Address>` - The typed address
    ///
    /// # Errors
    /// * `Error::InvalidAddress` if the text does not start with `$` or uses
    ///   wildcards, filters or slices
    pub fn parse(address: &str) -> Result<Self> {
        let normalized = normalize(address);
        let rest = normalized.strip_prefix(ROOT_MARKER).ok_or_else(|| Error::InvalidAddress {
            address: address.to_string(),
            reason: format!("address must start with {ROOT_MARKER}"),
        })?;
        Ok(Self { segments: parse_segments(rest, address)? })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Address with the last segment removed. The root is its own parent.
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    /// Address of a direct child.
    ///
    /// # Arguments
    /// * `segment` - Key or index of the child
    ///
    /// # Returns
    /// * `Address` - A new address; `self` is unchanged
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn child_key<S: Into<String>>(&self, key: S) -> Self {
        self.child(Segment::Key(key.into()))
    }

    pub fn child_index(&self, index: usize) -> Self {
        self.child(Segment::Index(index))
    }

    /// Normalized text of the address.
    pub fn canonical(&self) -> String {
        normalize(&self.to_string())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ROOT_MARKER}")?;
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Concrete address relative to some base, written with the `@` marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelativeAddress {
    segments: Vec<Segment>,
}

impl RelativeAddress {
    /// The base itself, `@`.
    pub fn current() -> Self {
        Self::default()
    }

    /// A single child key of the base, `@['key']`.
    pub fn child(key: &str) -> Self {
        Self { segments: vec![Segment::Key(key.to_string())] }
    }

    /// Parses `@`, `@.a.b`, `@['a']`, `@[0]` or the shorthand `@name`.
    ///
    /// # Arguments
    /// * `relative` - Address text starting with the relative marker
    ///
    /// # Errors
    /// * `Error::InvalidAddress` if the marker is missing or the remainder is
    ///   not a concrete path
    pub fn parse(relative: &str) -> Result<Self> {
        let rest = relative.strip_prefix(RELATIVE_MARKER).ok_or_else(|| Error::InvalidAddress {
            address: relative.to_string(),
            reason: format!("relative address must start with {RELATIVE_MARKER}"),
        })?;

        if rest.is_empty() || rest.starts_with('.') || rest.starts_with('[') {
            Ok(Self { segments: parse_segments(rest, relative)? })
        } else {
            Ok(Self::child(rest))
        }
    }

    /// Target attribute names are relative addresses when they start with `@`
    /// and plain child keys otherwise.
    pub fn from_attribute(name: &str) -> Result<Self> {
        if name.starts_with(RELATIVE_MARKER) {
            Self::parse(name)
        } else {
            Ok(Self::child(name))
        }
    }

    fn continuation(&self) -> String {
        self.segments.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for RelativeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{RELATIVE_MARKER}{}", self.continuation())
    }
}

/// Rewrites alternate address syntaxes into one canonical form.
///
/// - a whole address wrapped as `['...']` is unwrapped,
/// - `.['$` becomes `['$` unless it follows `$` or `]`,
/// - `$[` becomes `$.[`,
/// - adjacent bracket groups `][` are separated as `].[`.
///
/// Quoted keys are copied untouched. The rules are applied until nothing
/// changes, so the result is a fixed point.
///
/// # Arguments
/// * `address` - Address or query pattern text
///
/// # Returns
/// * `String` - The normalized text
pub fn normalize(address: &str) -> String {
    let mut current = address.trim().to_string();
    for _ in 0..MAX_NORMALIZE_PASSES {
        let next = normalize_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    trace!("normalize - address {} normalized {}", address, current);
    current
}

fn normalize_once(address: &str) -> String {
    let unwrapped = if address.len() >= 4 && address.starts_with("['") && address.ends_with("']") {
        &address[2..address.len() - 2]
    } else {
        address
    };

    let chars: Vec<char> = unwrapped.chars().collect();
    let mut out = String::with_capacity(unwrapped.len() + 4);
    let mut quote: Option<char> = None;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if let Some(open) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = next {
                    out.push(escaped);
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
            }
            '.' if chars[i + 1..].starts_with(&['[', '\'', ROOT_MARKER])
                && !matches!(out.chars().last(), Some(']') | Some(ROOT_MARKER)) => {}
            ROOT_MARKER | ']' if next == Some('[') => {
                out.push(c);
                out.push('.');
            }
            _ => out.push(c),
        }
        i += 1;
    }
    out
}

/// Resolves `relative` against the absolute `base`, returning the canonical
/// composed address.
///
/// # Arguments
/// * `base` - Absolute address or pattern text
/// * `relative` - Address relative to `base`
///
/// # Returns
/// * `Result<String>` - Normalized composed text
///
/// # Errors
/// * `Error::InvalidAddress` if `base` does not start with the root marker
pub fn compose(base: &str, relative: &RelativeAddress) -> Result<String> {
    let normalized_base = normalize(base);
    if !normalized_base.starts_with(ROOT_MARKER) {
        return Err(Error::InvalidAddress {
            address: base.to_string(),
            reason: format!("base address must start with {ROOT_MARKER} or \"['{ROOT_MARKER}']\""),
        });
    }

    let composed = normalize(&format!("{normalized_base}{}", relative.continuation()));
    trace!("compose - base {} relative {} composed {}", normalized_base, relative, composed);
    Ok(composed)
}

/// Like [`compose`], for a concrete base: the relative segments are appended
/// to the base segments.
pub fn compose_address(base: &Address, relative: &RelativeAddress) -> Address {
    let mut segments = base.segments.clone();
    segments.extend(relative.segments.iter().cloned());
    Address { segments }
}

/// Parses the segments following a root or relative marker.
fn parse_segments(text: &str, original: &str) -> Result<Vec<Segment>> {
    let invalid = |reason: &str| Error::InvalidAddress {
        address: original.to_string(),
        reason: reason.to_string(),
    };

    let chars: Vec<char> = text.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '.' if chars.get(i + 1) == Some(&'[') => i += 1,
            '.' => {
                let start = i + 1;
                let end = chars[start..]
                    .iter()
                    .position(|c| matches!(c, '.' | '['))
                    .map_or(chars.len(), |offset| start + offset);
                let key: String = chars[start..end].iter().collect();
                match key.as_str() {
                    "" => return Err(invalid("empty key after '.'")),
                    "*" => return Err(invalid("expected a concrete address without wildcards")),
                    _ => segments.push(Segment::Key(key)),
                }
                i = end;
            }
            '[' => {
                let (segment, next) = parse_bracket(&chars, i + 1).ok_or_else(|| {
                    invalid("expected a quoted key or an index between brackets")
                })?;
                segments.push(segment);
                i = next;
            }
            _ => return Err(invalid("expected '.' or '['")),
        }
    }
    Ok(segments)
}

/// Reads `'key']`, `"key"]` or `0]` starting at `start`.
fn parse_bracket(chars: &[char], start: usize) -> Option<(Segment, usize)> {
    let mut i = start;
    match *chars.get(i)? {
        quote @ ('\'' | '"') => {
            let mut key = String::new();
            i += 1;
            loop {
                match *chars.get(i)? {
                    '\\' => {
                        key.push(*chars.get(i + 1)?);
                        i += 2;
                    }
                    c if c == quote => {
                        i += 1;
                        break;
                    }
                    c => {
                        key.push(c);
                        i += 1;
                    }
                }
            }
            (chars.get(i) == Some(&']')).then_some((Segment::Key(key), i + 1))
        }
        _ => {
            let end = start + chars[start..].iter().position(|c| *c == ']')?;
            let index = chars[start..end].iter().collect::<String>().trim().parse().ok()?;
            Some((Segment::Index(index), end + 1))
        }
    }
}

fn escape_key(key: &str) -> String {
    key.replace('\\', "\\\\").replace('\'', "\\'")
}
