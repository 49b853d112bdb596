mod cli;
mod config;
mod error;
mod filter;
mod handler;
mod linker;
mod model;
mod providers;
mod server;
mod transition;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use cli::Command;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("info"))
                .context("failed to parse log filter")?,
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::parse_args(&args)?;

    if command == Command::Help {
        cli::print_help();
        return Ok(());
    }

    // Resolved once; nothing below reads the environment again.
    let config = config::load_config()?;

    match command {
        Command::Serve { bind } => cli::run_serve(&config, bind).await,
        Command::Handle(args) => cli::run_handle(&config, args).await,
        Command::Help => Ok(()),
    }
}
