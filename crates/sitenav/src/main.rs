//! sitenav CLI - Site navigation tree builder.
//!
//! Provides commands for:
//! - `roots`: Print the navigation tree of a site
//! - `page`: Print the navigation subtree rooted at a named page

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{PageArgs, RootsArgs};
use output::Output;

/// sitenav - Site navigation tree builder.
#[derive(Parser)]
#[command(name = "sitenav", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the navigation tree of a site.
    Roots(RootsArgs),
    /// Build the navigation subtree of a named page.
    Page(PageArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Roots(args) => args.common.verbose,
        Commands::Page(args) => args.common.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Roots(args) => args.execute(&output),
        Commands::Page(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
