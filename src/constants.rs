//! Reserved section names and addresses of the configuration document.

/// Root of all template definitions.
pub const TEMPLATE_DEFINITIONS: &str = "$['template-definitions']";

/// Definitions applied before generation: fields copied into matched nodes.
pub const COPY_PATTERNS: &str = "$['template-definitions']['copy-patterns']";

/// Pointer field whose value is a query locating placeholder-bearing nodes.
pub const PLACEHOLDER_PATTERNS: &str = "$['template-definitions']['placeholder-patterns'].jsonPath";

/// Definitions applied after the copy phase to build the replacement map.
pub const COLLECT_PATTERNS: &str = "$['template-definitions']['collect-patterns']";

/// Conventional location of the replacement map.
pub const REPLACE_VALUE_MAP: &str = "$.['options'].['replaceValueMap']";

/// Section whose scalar leaves become known substitutions.
pub const PROJECT_SETTINGS: &str = "$['project-settings']";

/// Reserved comment field, invisible to every query.
pub const COMMENT_KEY: &str = "_comment_";

/// Online evaluator suggested when a query cannot be parsed.
pub const QUERY_HINT_URL: &str = "http://jsonpath.herokuapp.com/?path=";
