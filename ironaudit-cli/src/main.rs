//! ironaudit CLI -- audits Kubernetes manifests for weakened container isolation.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use ironaudit_core::config::IronauditConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `config` reports load errors itself
    let config = match IronauditConfig::load_or_default(&cli.config).await {
        Ok(config) => config,
        Err(_) if matches!(cli.command, Commands::Config(_)) => IronauditConfig::default(),
        Err(e) => return Err(e.into()),
    };

    let general = logging::effective_general(&config.general, cli.log_level.as_deref())
        .map_err(|e| CliError::Config(e.to_string()))?;
    logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;

    tracing::debug!(config = %cli.config.display(), "ironaudit starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Mountds(args) => commands::mountds::execute(args, &config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
