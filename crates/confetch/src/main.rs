//! confetch CLI - Confluence page exporter.
//!
//! Provides commands for:
//! - `fetch`: export a page and its full comment tree as JSON
//! - `config set` / `config show`: manage stored credentials

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigCommand, FetchArgs};
use output::Output;

/// confetch - Confluence page and comment-tree exporter.
#[derive(Parser)]
#[command(name = "confetch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a page and its comments as a normalized JSON document.
    Fetch(FetchArgs),
    /// Manage stored credentials.
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Fetch(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr; stdout is reserved for the JSON document.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Fetch(args) => args.execute(),
        Commands::Config(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
