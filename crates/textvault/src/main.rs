//! Textvault CLI - encoding-aware text processing and archival
//!
//! This is the main entry point for the textvault command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Run(args) => commands::run::run(args, config).await,
        Commands::Seed => commands::seed::run(config),
        Commands::Process(args) => commands::process::run(args, config),
        Commands::Collect(args) => commands::collect::run(args, config),
        Commands::Validate(args) => commands::validate::run(args, config),
        Commands::Backup(args) => commands::backup::run(args, config).await,
        Commands::Restore(args) => commands::restore::run(args, config).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
