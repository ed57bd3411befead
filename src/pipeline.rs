//! Orchestrates the pre-processing phases over one configuration document.
//!
//! - before: copy patterns, then placeholder resolution
//! - after: collect patterns, producing the replacement map
//!
//! Documents without template definitions pass through both phases untouched.

use indexmap::IndexMap;
use log::{debug, trace};

use crate::collect::{read_replacement_map, resolve_collect_patterns};
use crate::config::Options;
use crate::copy::expand_copy_patterns;
use crate::definition::templates_available;
use crate::document::Document;
use crate::error::Result;
use crate::placeholder::PlaceholderResolver;
use crate::settings::known_substitutions;

/// Output of a full pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    /// Document after the before phase.
    pub intermediate: Document,
    /// Document after the after phase.
    pub output: Document,
    /// The resolved replacement map found in `output`.
    pub replacement_map: IndexMap<String, String>,
}

/// Runs the pre-processing phases with one set of reserved addresses.
///
/// ```
/// use confweave::pipeline::Pipeline;
///
/// let processed = Pipeline::default()
///     .process(r#"{"a": 1}"#, &Default::default())
///     .unwrap();
/// assert!(processed.replacement_map.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: Options,
    placeholders: PlaceholderResolver,
}

impl Pipeline {
    /// Creates a pipeline reading the reserved sections named by `options`.
    pub fn new(options: Options) -> Self {
        Self { options, placeholders: PlaceholderResolver::new() }
    }

    fn templates_available(&self, doc: &Document) -> Result<bool> {
        templates_available(doc, &self.options.template_definitions)
    }

    /// Copies template patterns into the document and resolves placeholders.
    ///
    /// # Arguments
    /// * `doc` - Input document
    ///
    /// # Returns
    /// * `Result<Document>` - The intermediate document, or a copy of `doc`
    ///   when it declares no template definitions
    pub fn before(&self, doc: &Document) -> Result<Document> {
        if !self.templates_available(doc)? {
            return Ok(doc.clone());
        }

        let copied = expand_copy_patterns(doc, &self.options.copy_patterns)?;
        self.placeholders.resolve(&copied, &self.options.placeholder_patterns)
    }

    /// Resolves collect patterns into the replacement map.
    ///
    /// # Arguments
    /// * `doc` - Output of [`Pipeline::before`]
    /// * `known` - `${key}` substitutions applied to collected values
    ///
    /// # Returns
    /// * `Result<Document>` - The final document
    pub fn after(&self, doc: &Document, known: &IndexMap<String, String>) -> Result<Document> {
        if !self.templates_available(doc)? {
            return Ok(doc.clone());
        }

        let resolved = resolve_collect_patterns(
            doc,
            &self.options.collect_patterns,
            &self.options.replace_value_map,
            known,
        )?;
        trace!("Data-config templating used: \n{}", doc);
        Ok(resolved)
    }

    /// Known substitutions of `doc`, with `overrides` applied last.
    pub fn known_substitutions(
        &self,
        doc: &Document,
        overrides: &IndexMap<String, String>,
    ) -> Result<IndexMap<String, String>> {
        let mut known = known_substitutions(doc, &self.options.substitution_sources)?;
        known.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(known)
    }

    /// The resolved replacement map of `doc`; empty when there is none.
    pub fn replacement_map(&self, doc: &Document) -> Result<IndexMap<String, String>> {
        read_replacement_map(doc, &self.options.replace_value_map)
    }

    /// Runs both phases over JSON text. Known substitutions are taken from the
    /// input document as it was before any template processing.
    ///
    /// # Arguments
    /// * `content` - JSON text of the configuration document
    /// * `overrides` - Known substitutions that win over derived ones
    ///
    /// # Returns
    /// * `Result<Processed>` - Intermediate and final documents plus the
    ///   replacement map
    ///
    /// # Errors
    /// * any fatal error of the phases; nothing is returned partially
    pub fn process(&self, content: &str, overrides: &IndexMap<String, String>) -> Result<Processed> {
        let input = Document::parse(content)?;
        let known = self.known_substitutions(&input, overrides)?;
        debug!("{} known substitutions", known.len());

        let intermediate = self.before(&input)?;
        let output = self.after(&intermediate, &known)?;
        let replacement_map = self.replacement_map(&output)?;

        Ok(Processed { intermediate, output, replacement_map })
    }
}
