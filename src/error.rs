//! Error handling for confweave.
//! Defines the umbrella error type and result alias used throughout the crate.

use std::io;
use thiserror::Error;

/// Fatal errors raised while pre-processing a configuration document.
///
/// Recoverable conditions (a query matching nothing, a placeholder substitution
/// producing unparsable text) are never represented here: they are logged and
/// processing continues.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur while parsing or serializing JSON documents
    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    /// Represents errors that occur while parsing YAML option files
    #[error("YAML error: {0}.")]
    YamlError(#[from] serde_yaml::Error),

    /// An address does not start with the expected root or relative marker.
    #[error("Invalid address '{address}': {reason}.")]
    InvalidAddress { address: String, reason: String },

    /// A query pattern cannot be parsed by the query engine.
    #[error("Malformed query '{pattern}': {reason}. Test your query with {hint}")]
    MalformedQuery { pattern: String, reason: String, hint: String },

    /// A value lookup failed at an address that was previously matched.
    #[error("Read value error on address '{address}': the matched node disappeared.")]
    LookupInconsistency { address: String },

    /// An intermediate node could not be created while setting a value.
    #[error("Error creating node {segment} at {parent}: {reason}.")]
    NodeCreation { segment: String, parent: String, reason: String },

    /// A template definition or reserved section has an unusable shape.
    #[error("Invalid definition at '{path}': {reason}.")]
    InvalidDefinition { path: String, reason: String },

    /// Represents errors in the driver's configuration or command-line input
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Refuses to overwrite an existing output file without --force.
    #[error("Output file '{output_file}' already exists. Use --force to overwrite it.")]
    OutputExistsError { output_file: String },
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Logs the error, prints it to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    log::error!("Pre-processing aborted, no output written.");
    eprintln!("{err}");
    std::process::exit(1);
}
