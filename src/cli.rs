//! Command-line interface implementation for confweave.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for confweave.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "confweave: expands template definitions inside JSON configuration documents",
    long_about = None
)]
pub struct Args {
    /// Path to the JSON configuration document
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Directory where the processed document is written
    #[arg(value_name = "OUTPUT_DIR", default_value = "target")]
    pub output_dir: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    pub force: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// JSON or YAML file overriding the reserved section addresses
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Address of the replacement map, overriding the options file
    #[arg(long, value_name = "ADDRESS")]
    pub replace_map: Option<String>,

    /// Known substitution applied to collected values, may be repeated
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Also write the document as it was after the copy and placeholder phase
    #[arg(long)]
    pub intermediate: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

const USAGE_TEMPLATE: &str = "{about-section}\n{usage-heading} {usage}\n\n{all-args}\n{after-help}\n";

/// Prints the full usage text to stdout, the way a missing CONFIG argument
/// is reported.
pub fn print_usage() -> std::io::Result<()> {
    Args::command().help_template(USAGE_TEMPLATE).print_help()
}

/// Parses the process arguments.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status 1 after printing usage when CONFIG is missing
/// * Through clap for every other argument error, `--help` and `--version`
pub fn get_args() -> Args {
    let err = match Args::try_parse() {
        Ok(args) => return args,
        Err(err) => err,
    };

    if err.kind() != ErrorKind::MissingRequiredArgument {
        err.exit();
    }
    if let Err(io) = print_usage() {
        eprintln!("{io}");
    }
    std::process::exit(1);
}
