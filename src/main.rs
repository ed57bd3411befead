//! confweave's main application entry point.
//! Parses the command line, configures logging and hands over to the runner.

use confweave::{cli::get_args, error::default_error_handler, runner::run};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(err) = run(&args) {
        default_error_handler(err);
    }
}
