//! townctl CLI Binary
//!
//! Command-line interface for agent town addressing and settings compliance.

use clap::Parser;
use std::process;
use townctl::logging::init_logging;
use townctl::tooling::cli::{Cli, CliContext};

fn main() {
    let cli = Cli::parse();

    // Create CLI context
    let context = match CliContext::new(cli.town.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading town configuration: {}", e);
            process::exit(1);
        }
    };

    let mut logging = context.config().logging.clone();
    logging.apply_env();
    logging.apply_overrides(&cli.log_overrides());
    if let Err(e) = init_logging(&logging) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    context.install_default_registry();

    // Execute command
    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
