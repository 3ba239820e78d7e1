mod cli;
mod commands;
mod error;
mod logging;
mod render;

use std::process::ExitCode;

use clap::Parser;
use kanri_api::CatalogClient;
use kanri_core::{App, AppConfig, Runtime};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    // Config commands must work even when the file itself is broken.
    if let Command::Config(cmd) = cli.command {
        return commands::config_command(cmd, &config_path);
    }

    let mut config = AppConfig::load(Some(&config_path))?;
    if let Some(base_url) = cli.base_url {
        config.server.base_url = base_url;
    }
    let _guard = logging::init(&config.log);

    tracing::debug!(base_url = %config.server.base_url, "connecting");
    let client = CatalogClient::new(&config.server.base_url)?;
    let mut rt = Runtime::new(client, App::new(&config));
    commands::run(&mut rt, cli.command, &config, &config_path).await
}
