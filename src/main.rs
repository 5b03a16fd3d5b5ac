mod args;
mod case;
mod classify;
mod cleaner;
mod encoding;
mod error;
mod mover;
mod replacer;
mod rewriter;
mod scanner;

use anyhow::Result;
use std::process;
use tracing_subscriber::EnvFilter;

/// Main entry point of the application
/// Parses arguments, sets up logging and runs the replacement over every path
fn main() -> Result<()> {
    let args = args::parse();
    init_logging(args.verbose);

    // Execute the program
    match scanner::scan_and_replace(&args) {
        Ok(0) => Ok(()),
        Ok(_) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Diagnostics go to stderr; RUST_LOG takes precedence over --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
