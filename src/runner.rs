//! Command-line flow: read the configuration file, run the pipeline and write
//! the processed document.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};

use crate::cli::Args;
use crate::config::{load_options, Options};
use crate::error::{Error, Result};
use crate::pipeline::Pipeline;

/// Ensures an output file is safe to write to.
///
/// # Arguments
/// * `output_file` - Target file path
/// * `force` - Whether to overwrite an existing file
///
/// # Errors
/// * Returns `Error::OutputExistsError` if the file exists and force is false
pub fn get_output_file<P: AsRef<Path>>(output_file: P, force: bool) -> Result<PathBuf> {
    let output_file = output_file.as_ref();
    if output_file.exists() && !force {
        return Err(Error::OutputExistsError {
            output_file: output_file.display().to_string(),
        });
    }
    Ok(output_file.to_path_buf())
}

fn write_file<P: AsRef<Path>>(content: &str, dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        std::fs::create_dir_all(parent).map_err(Error::IoError)?;
    }
    std::fs::write(dest_path, content).map_err(Error::IoError)
}

fn read_config(config: &Path) -> Result<String> {
    if !config.is_file() {
        return Err(Error::ConfigError(format!(
            "Configuration file not found: {}",
            config.display()
        )));
    }

    let content = std::fs::read_to_string(config).map_err(Error::IoError)?;
    if content.trim().is_empty() {
        return Err(Error::ConfigError(format!(
            "Configuration file is empty: {}",
            config.display()
        )));
    }
    Ok(content)
}

fn resolve_options(args: &Args) -> Result<Options> {
    let mut options = match &args.options {
        Some(path) => load_options(path)?,
        None => Options::default(),
    };
    if let Some(address) = &args.replace_map {
        options.replace_value_map = address.clone();
    }
    Ok(options)
}

/// Main application logic execution.
///
/// # Returns
/// * `Result<PathBuf>` - Path of the written document
///
/// # Flow
/// 1. Reads the configuration document and the options
/// 2. Runs the before and after phases
/// 3. Checks every output path before writing any of them
/// 4. Writes the processed document, and the intermediate one if requested
pub fn run(args: &Args) -> Result<PathBuf> {
    let content = read_config(&args.config)?;
    let options = resolve_options(args)?;
    debug!("Using options {:?}", options);

    let overrides: IndexMap<String, String> = args.set.iter().cloned().collect();
    let processed = Pipeline::new(options).process(&content, &overrides)?;

    let file_name = args.config.file_name().ok_or_else(|| {
        Error::ConfigError(format!("Invalid configuration path: {}", args.config.display()))
    })?;
    let output_file = get_output_file(args.output_dir.join(file_name), args.force)?;

    let intermediate_file = if args.intermediate {
        let stem = args.config.file_stem().unwrap_or(file_name).to_string_lossy();
        let path = args.output_dir.join(format!("{stem}.intermediate.json"));
        Some(get_output_file(path, args.force)?)
    } else {
        None
    };

    if let Some(path) = &intermediate_file {
        write_file(&processed.intermediate.to_json_string()?, path)?;
        println!("Intermediate: '{}'", path.display());
    }
    write_file(&processed.output.to_json_string()?, &output_file)?;
    info!("{} replacement map entries resolved", processed.replacement_map.len());

    println!("Processed: '{}'", output_file.display());
    Ok(output_file)
}
