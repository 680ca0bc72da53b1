//! `paneweave` CLI - Command-line inspector for persisted workspaces
//!
//! Provides commands for listing stored sessions, printing a session's pane
//! tree, migrating legacy snapshots in place and deleting sessions.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;
use paneweave_core::{TracingConfig, TracingLevel, TracingOutput, init_tracing};

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        let config = TracingConfig::new()
            .with_level(TracingLevel::from_verbosity(cli.verbose))
            .with_output(TracingOutput::Stderr);
        if let Err(e) = init_tracing(&config) {
            eprintln!("Warning: failed to initialize logging: {e}");
        }
    }

    let paths = util::StorePaths {
        store: cli.store.as_deref(),
        config: cli.config.as_deref(),
    };
    let result = commands::dispatch(&paths, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
