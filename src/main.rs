//! defect-rca CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::path::Path;

use defect_rca::cli::{self, Cli, Commands};
use defect_rca::domain::models::{Config, LoggingConfig};
use defect_rca::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        cli::handle_error(err, json);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init(args) => {
            let _logger = init_logger(&LoggingConfig::default());
            cli::commands::init::execute(&args, cli.json)
        }
        Commands::Resolve(args) => {
            let (config, _logger) = load(cli.config.as_deref())?;
            cli::commands::resolve::execute(args, config, cli.json).await
        }
        Commands::Cases(args) => {
            let (config, _logger) = load(cli.config.as_deref())?;
            cli::commands::cases::execute(&args, &config, cli.json)
        }
    }
}

/// Load configuration, then install logging as it configures.
fn load(path: Option<&Path>) -> Result<(Config, Option<LoggerImpl>)> {
    let config = cli::load_config(path)?;
    let logger = init_logger(&config.logging);
    Ok((config, logger))
}

/// Install the global subscriber; failure only costs log output.
fn init_logger(config: &LoggingConfig) -> Option<LoggerImpl> {
    match LoggerImpl::init(config) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("warning: logging disabled: {err:#}");
            None
        }
    }
}
