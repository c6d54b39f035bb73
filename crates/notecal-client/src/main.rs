//! notecal CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use notecal_client::cli::{Cli, Command, ConfigAction};
use notecal_client::commands;
use notecal_client::config::ClientConfig;
use notecal_client::error::ClientResult;
use notecal_client::format::OutputFormatter;
use notecal_client::store::FileStore;
use notecal_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = match cli.command {
        Command::Watch { .. } => TracingConfig::watch(cli.debug),
        _ => TracingConfig::cli(cli.debug),
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };
    let data_dir = config.data_dir(cli.data_dir.as_deref());
    tracing::debug!(data_dir = %data_dir.display(), "Using data directory");

    let mut store = FileStore::new(data_dir);
    let formatter = OutputFormatter::new(config.display.clone());

    match cli.command {
        Command::Import { file } => commands::import::run(&file, &mut store, config.expansion),
        Command::Upcoming { json, limit } => {
            commands::schedule::upcoming(&mut store, &formatter, json, limit)
        }
        Command::Active { json } => commands::schedule::active(&store, &formatter, json),
        Command::Watch { interval } => {
            let secs = interval.unwrap_or(config.watch.interval_secs);
            commands::watch::run(&mut store, Duration::from_secs(secs)).await
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Path => commands::config::path(&config, cli.data_dir.as_deref()),
        },
    }
}
