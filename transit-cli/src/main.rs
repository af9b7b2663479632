//! Command-line client for the transit library.

use anyhow::{Context, Result};
use clap::Parser;

use transit_cli::commands::{Cli, Command, execute, load_config};
use transit_client::{TransitClient, TransitRunner};
use transit_common::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.transit)?;
    init_tracing(&config.logging).context("initializing tracing")?;

    tracing::info!(
        library = %config.library.path.display(),
        command = ?cli.command,
        session = cli.command.needs_session(),
        "Starting transit"
    );

    match cli.command {
        Command::Run => {
            let runner = TransitRunner::from_config("feeder", config)?;
            let stats = runner.run().await?;
            tracing::info!(
                cycles = stats.cycles,
                success_rate = stats.success_rate(),
                "Feeder stopped"
            );
        }
        command => {
            let client = TransitClient::load(&config.library.path)?;
            // Native calls block.
            tokio::task::spawn_blocking(move || {
                let stdout = std::io::stdout();
                execute(&command, &client, &config, &mut stdout.lock())
            })
            .await??;
        }
    }

    Ok(())
}
