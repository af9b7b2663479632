//! Subcommands and their execution against any [`TransitServices`].

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use transit_client::{TransitArgs, TransitConfig, TransitServices, load_payload};
use transit_common::{Inventory, MonitoredResource, ResourcesWithMetrics, encode_pretty};

#[derive(Parser, Debug)]
#[command(name = "transit", about = "Client for the transit library", version)]
pub struct Cli {
    #[command(flatten)]
    pub transit: TransitArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect with the configured credentials.
    Connect,

    /// Send a ResourcesWithMetrics JSON document.
    SendMetrics {
        /// Path to the JSON document.
        file: PathBuf,
    },

    /// Print the metric descriptors known to the pipeline.
    ListMetrics,

    /// Synchronize an Inventory JSON document.
    SyncInventory {
        /// Path to the JSON document.
        file: PathBuf,
    },

    /// Round-trip a MonitoredResource JSON document through the library.
    TestResource {
        /// Path to the JSON document.
        file: PathBuf,
    },

    /// Disconnect from the pipeline.
    Disconnect,

    /// Run the feeder loop until Ctrl+C.
    Run,
}

impl Command {
    /// Whether the command runs inside its own connect/disconnect pair.
    pub fn needs_session(&self) -> bool {
        matches!(
            self,
            Command::SendMetrics { .. }
                | Command::ListMetrics
                | Command::SyncInventory { .. }
                | Command::TestResource { .. }
        )
    }
}

/// Load the configuration named on the command line, with overrides applied.
pub fn load_config(args: &TransitArgs) -> Result<TransitConfig> {
    args.load_config()
        .with_context(|| format!("loading configuration from {}", args.config.display()))
}

/// Execute a one-shot command, writing its output to `out`.
///
/// Payloads without a context get a fresh one from the agent settings.
pub fn execute<S, W>(command: &Command, client: &S, config: &TransitConfig, out: &mut W) -> Result<()>
where
    S: TransitServices,
    W: Write,
{
    match command {
        Command::Connect => {
            client.connect(&config.credentials)?;
            writeln!(out, "connected as {}", config.credentials.user)?;
        }
        Command::Disconnect => {
            client.disconnect()?;
            writeln!(out, "disconnected")?;
        }
        Command::Run => bail!("`run` is driven by the feeder runner"),
        command => {
            client.connect(&config.credentials)?;
            let result = execute_in_session(command, client, config, out);
            if let Err(e) = client.disconnect() {
                tracing::warn!(error = %e, "Error disconnecting from transit");
            }
            result?;
        }
    }
    Ok(())
}

fn execute_in_session<S, W>(command: &Command, client: &S, config: &TransitConfig, out: &mut W) -> Result<()>
where
    S: TransitServices,
    W: Write,
{
    match command {
        Command::SendMetrics { file } => {
            let mut payload: ResourcesWithMetrics = load_payload(file)?;
            if payload.context.is_none() {
                payload.context = Some(config.agent.context());
            }
            client.send_resources_with_metrics(&payload)?;
            writeln!(out, "sent {} resource(s)", payload.resources.len())?;
        }
        Command::ListMetrics => {
            let metrics = client.list_metrics()?;
            writeln!(out, "{}", encode_pretty(&metrics)?)?;
        }
        Command::SyncInventory { file } => {
            let mut payload: Inventory = load_payload(file)?;
            if payload.context.is_none() {
                payload.context = Some(config.agent.context());
            }
            client.synchronize_inventory(&payload)?;
            writeln!(
                out,
                "synchronized {} resource(s), {} group(s)",
                payload.resources.len(),
                payload.groups.len()
            )?;
        }
        Command::TestResource { file } => {
            let resource: MonitoredResource = load_payload(file)?;
            let echoed = client.test_monitored_resource(&resource)?;
            writeln!(out, "{}", encode_pretty(&echoed)?)?;
        }
        other => bail!("{:?} does not run inside a session", other),
    }
    Ok(())
}
