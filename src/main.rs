//! ProjectGPT CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use projectgpt::cli::{commands, handle_error, Cli, Commands};
use projectgpt::infrastructure::config::ConfigLoader;
use projectgpt::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json_mode);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Listing options needs neither configuration nor an API key
    if matches!(cli.command, Commands::Options) {
        commands::options::execute(cli.json);
        return Ok(());
    }

    let config =
        ConfigLoader::load_with(cli.config.as_deref()).context("Failed to load configuration")?;
    let _logger = LoggerImpl::init(&config.logging)?;

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, &config).await,
        Commands::Generate(args) => commands::generate::execute(args, &config, cli.json).await,
        Commands::Options => Ok(()),
    }
}
