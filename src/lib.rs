//! confweave pre-processes JSON configuration documents that declare template
//! definitions. It copies path expressions into matched nodes, resolves
//! `@{...}` placeholders between siblings and collects scattered values into a
//! replacement map consumed by downstream generators.

/// Typed absolute and relative node addresses
pub mod address;

/// Command-line interface module for the confweave application
pub mod cli;

/// Collect patterns and replacement map resolution
pub mod collect;

/// Reserved section addresses, overridable from JSON or YAML option files
pub mod config;

/// Reserved section names and addresses
pub mod constants;

/// Copy patterns: path expressions injected into matched nodes
pub mod copy;

/// Template definitions read from the document
pub mod definition;

/// The ordered JSON document threaded through every phase
pub mod document;

/// Error types and handling for the confweave application
pub mod error;

/// Pattern matching returning located matches
pub mod matcher;

/// Value insertion with intermediate node creation
pub mod mutator;

/// Before and after phase orchestration
pub mod pipeline;

/// Sibling references `@{...}` inside node values
pub mod placeholder;

/// Query patterns in configuration file notation, compiled with serde_json_path
pub mod query;

/// File based flow behind the command line
pub mod runner;

/// Known `${key}` substitutions derived from project settings
pub mod settings;

/// Delimited key substitution
pub mod substitution;
