//! dystruct CLI - build and inspect run-time struct layouts.

mod cli;
mod commands;
mod common;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG wins; otherwise WARN, or DEBUG with --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Command::Demo => commands::demo::run(),
        Command::Kinds => commands::kinds::run(),
        Command::Layout(args) => commands::layout::run(args),
        Command::Hash(args) => commands::hash::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => common::error::render_and_exit(e),
    }
}
