//! Literal string substitution of delimited keys, e.g. `${key}` or `@{key}`.

use indexmap::IndexMap;
use regex::{Captures, Regex};

/// Single-pass substitutor: values introduced by a replacement are never
/// expanded again, and unknown keys are left verbatim.
#[derive(Debug, Clone)]
pub struct Substitutor<'m> {
    values: &'m IndexMap<String, String>,
    pattern: Regex,
}

impl<'m> Substitutor<'m> {
    pub fn new(values: &'m IndexMap<String, String>, prefix: &str, suffix: &str) -> Self {
        let pattern = Regex::new(&format!(
            "(?s){}(.*?){}",
            regex::escape(prefix),
            regex::escape(suffix)
        ))
        .expect("escaped delimiters form a valid regex");
        Self { values, pattern }
    }

    /// `${key}` substitution.
    pub fn dollar(values: &'m IndexMap<String, String>) -> Self {
        Self::new(values, "${", "}")
    }

    /// `@{key}` substitution.
    pub fn at(values: &'m IndexMap<String, String>) -> Self {
        Self::new(values, "@{", "}")
    }

    pub fn replace(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures| match self.values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Replaces every occurrence of each map key by its value. Longer keys are
/// applied first so a key that prefixes another cannot shadow it; keys of equal
/// length keep map order. This is how generated templates consume the resolved
/// replacement map.
pub fn apply_replacement_map(text: &str, map: &IndexMap<String, String>) -> String {
    let mut entries: Vec<_> = map.iter().filter(|(key, _)| !key.is_empty()).collect();
    entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));
    entries
        .into_iter()
        .fold(text.to_string(), |acc, (key, value)| acc.replace(key.as_str(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_dollar_substitution() {
        let values = map(&[("name", "hero"), ("group", "Site")]);
        let substitutor = Substitutor::dollar(&values);
        assert_eq!(substitutor.replace("${name}-${group}-${missing}"), "hero-Site-${missing}");
    }

    #[test]
    fn test_single_pass() {
        let values = map(&[("a", "@{b}"), ("b", "never")]);
        assert_eq!(Substitutor::at(&values).replace("x @{a} y"), "x @{b} y");
    }

    #[test]
    fn test_repeated_tokens() {
        let values = map(&[(".label", "Title")]);
        assert_eq!(Substitutor::at(&values).replace("@{.label}/@{.label}"), "Title/Title");
    }

    #[test]
    fn test_apply_replacement_map() {
        let values = map(&[("%%title%%", "<h1>Hi</h1>"), ("", "ignored")]);
        assert_eq!(apply_replacement_map("<div>%%title%%</div>", &values), "<div><h1>Hi</h1></div>");
    }

    #[test]
    fn test_longest_key_first() {
        let values = map(&[("%%t%%", "short"), ("%%t%%-x", "long")]);
        assert_eq!(apply_replacement_map("%%t%%-x %%t%%", &values), "long short");
    }
}
