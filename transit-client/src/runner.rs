//! Feeder loop: push inventory and metrics documents on a timer.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tokio::signal;

use transit_common::{Inventory, ResourcesWithMetrics};

use crate::backend::TransitBackend;
use crate::client::TransitClient;
use crate::config::TransitConfig;
use crate::error::{Result, TransitError};
use crate::native::NativeLibrary;
use crate::payload::load_payload;
use crate::services::TransitServices;

/// Runner that manages the lifecycle of a feeder.
///
/// Handles:
/// - Connecting with the configured credentials
/// - Inventory synchronization every `inventory_every` cycles
/// - Metrics delivery every cycle
/// - Graceful shutdown on Ctrl+C, always ending with `Disconnect`
///
/// Native calls block, so they run on tokio's blocking pool.
///
/// # Example
///
/// ```ignore
/// use transit_client::{TransitConfig, TransitRunner};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = TransitConfig::load("transit.json5")?;
///     let runner = TransitRunner::from_config("feeder", config)?;
///     let stats = runner.run().await?;
///     println!("{} deliveries failed", stats.failed);
///     Ok(())
/// }
/// ```
pub struct TransitRunner<B> {
    /// Runner name for logging.
    name: String,
    /// The loaded configuration.
    config: TransitConfig,
    /// Shared client.
    client: Arc<TransitClient<B>>,
}

impl TransitRunner<NativeLibrary> {
    /// Load the configured library and build a runner around it.
    pub fn from_config(name: impl Into<String>, config: TransitConfig) -> Result<Self> {
        let backend = NativeLibrary::load(&config.library.path)?;
        let runner = Self::new(name, config, backend);
        tracing::debug!(
            runner = %runner.name,
            library = %runner.client.backend().path().display(),
            "Runner created"
        );
        Ok(runner)
    }
}

impl<B: TransitBackend + 'static> TransitRunner<B> {
    pub fn new(name: impl Into<String>, config: TransitConfig, backend: B) -> Self {
        Self {
            name: name.into(),
            config,
            client: Arc::new(TransitClient::new(backend)),
        }
    }

    /// Get the runner name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &TransitConfig {
        &self.config
    }

    /// Get a clone of the client.
    pub fn client(&self) -> Arc<TransitClient<B>> {
        self.client.clone()
    }

    /// Run a blocking client call off the async executor.
    async fn call<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&TransitClient<B>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.client.clone();
        tokio::task::spawn_blocking(move || f(&client))
            .await
            .map_err(|e| TransitError::worker(e.to_string()))?
    }

    /// Run until Ctrl+C is received (or `max_cycles` is reached).
    pub async fn run(self) -> Result<RunStats> {
        self.run_until(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `shutdown` resolves (or `max_cycles` is reached).
    ///
    /// The configuration is validated again before connecting. A failed
    /// `Connect` aborts the run.
    /// Failed deliveries are logged and counted; the loop keeps going.
    /// `Disconnect` is always attempted once connected, and its failure is
    /// only logged.
    pub async fn run_until<S>(self, shutdown: S) -> Result<RunStats>
    where
        S: Future<Output = ()>,
    {
        self.config.validate()?;

        let credentials = self.config.credentials.clone();
        self.call(move |client| client.connect(&credentials)).await?;

        let feeder = self.config.feeder.clone();
        tracing::info!(
            runner = %self.name,
            interval_secs = feeder.interval_secs,
            inventory_every = feeder.inventory_every,
            "Connected to transit. Press Ctrl+C to stop."
        );

        tokio::pin!(shutdown);
        let mut stats = RunStats::default();
        let limit_reached = |cycles: u64| feeder.max_cycles.is_some_and(|max| cycles >= max);

        while !limit_reached(stats.cycles) {
            self.cycle(stats.cycles, &mut stats).await;
            stats.cycles += 1;

            if limit_reached(stats.cycles) {
                break;
            }

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(runner = %self.name, "Received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(feeder.interval()) => {}
            }
        }

        if limit_reached(stats.cycles) {
            tracing::info!(runner = %self.name, cycles = stats.cycles, "Reached max cycles");
        }

        if let Err(e) = self.call(|client| client.disconnect()).await {
            tracing::warn!(error = %e, "Error disconnecting from transit");
        }

        tracing::info!(
            runner = %self.name,
            delivered = stats.delivered(),
            failed = stats.failed,
            "Goodbye!"
        );

        Ok(stats)
    }

    async fn cycle(&self, cycle: u64, stats: &mut RunStats) {
        let feeder = &self.config.feeder;

        if cycle % feeder.inventory_every == 0 {
            if let Some(ref path) = feeder.inventory_file {
                match self.send_inventory(path).await {
                    Ok(()) => stats.inventory_sent += 1,
                    Err(e) => {
                        stats.failed += 1;
                        tracing::warn!(cycle, error = %e, "Failed to synchronize inventory");
                    }
                }
            }
        }

        if let Some(ref path) = feeder.metrics_file {
            match self.send_metrics(path).await {
                Ok(()) => stats.metrics_sent += 1,
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(cycle, error = %e, "Failed to send metrics");
                }
            }
        }
    }

    async fn send_inventory(&self, path: &Path) -> Result<()> {
        let inventory: Inventory = load_payload(path)?;
        let inventory = inventory.with_context(self.config.agent.context());
        tracing::info!(resources = inventory.resources.len(), "Synchronizing inventory");
        self.call(move |client| client.synchronize_inventory(&inventory))
            .await
    }

    async fn send_metrics(&self, path: &Path) -> Result<()> {
        let metrics: ResourcesWithMetrics = load_payload(path)?;
        let metrics = metrics.with_context(self.config.agent.context());
        tracing::info!(resources = metrics.resources.len(), "Sending metrics");
        self.call(move |client| client.send_resources_with_metrics(&metrics))
            .await
    }
}

/// Statistics from a feeder run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Completed cycles.
    pub cycles: u64,
    /// Successful inventory synchronizations.
    pub inventory_sent: u64,
    /// Successful metric deliveries.
    pub metrics_sent: u64,
    /// Failed deliveries of either kind.
    pub failed: u64,
}

impl RunStats {
    /// Successful deliveries of either kind.
    pub fn delivered(&self) -> u64 {
        self.inventory_sent + self.metrics_sent
    }

    /// Success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        let total = self.delivered() + self.failed;
        if total == 0 {
            100.0
        } else {
            (self.delivered() as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Operation;
    use crate::mock::MockBackend;
    use std::path::PathBuf;

    fn write_payloads(dir: &Path) -> (PathBuf, PathBuf) {
        let metrics = dir.join("metrics.json");
        let inventory = dir.join("inventory.json");
        std::fs::write(
            &metrics,
            r#"{"resources":[{"name":"h1","type":"host","status":"HOST_UP","lastCheckTime":"1"}]}"#,
        )
        .unwrap();
        std::fs::write(&inventory, r#"{"resources":[{"name":"h1","type":"host"}]}"#).unwrap();
        (metrics, inventory)
    }

    fn config(metrics: PathBuf, inventory: PathBuf, max_cycles: u64, every: u64) -> TransitConfig {
        let mut config =
            TransitConfig::parse(r#"{ credentials: { user: "u", password: "p" } }"#).unwrap();
        config.feeder.metrics_file = Some(metrics);
        config.feeder.inventory_file = Some(inventory);
        config.feeder.max_cycles = Some(max_cycles);
        config.feeder.inventory_every = every;
        config.feeder.interval_secs = 1;
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let (metrics, inventory) = write_payloads(dir.path());
        let backend = Arc::new(MockBackend::new());

        let runner = TransitRunner::new("test", config(metrics, inventory, 3, 2), backend.clone());
        let stats = runner.run_until(std::future::pending()).await.unwrap();

        assert_eq!(
            backend.operations(),
            vec![
                Operation::Connect,
                Operation::SynchronizeInventory,
                Operation::SendResourcesWithMetrics,
                Operation::SendResourcesWithMetrics,
                Operation::SynchronizeInventory,
                Operation::SendResourcesWithMetrics,
                Operation::Disconnect,
            ]
        );
        assert_eq!(stats.cycles, 3);
        assert_eq!(stats.inventory_sent, 2);
        assert_eq!(stats.metrics_sent, 3);
        assert_eq!(stats.failed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_max_cycles_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (metrics, inventory) = write_payloads(dir.path());
        let backend = Arc::new(MockBackend::new());

        let runner = TransitRunner::new("test", config(metrics, inventory, 0, 1), backend.clone());
        let stats = runner.run_until(std::future::pending()).await.unwrap();

        assert_eq!(stats, RunStats::default());
        assert_eq!(
            backend.operations(),
            vec![Operation::Connect, Operation::Disconnect]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_config_rejected_before_connect() {
        let dir = tempfile::tempdir().unwrap();
        let (metrics, inventory) = write_payloads(dir.path());
        let backend = Arc::new(MockBackend::new());

        let mut config = config(metrics, inventory, 2, 1);
        config.feeder.inventory_every = 0;

        let runner = TransitRunner::new("test", config, backend.clone());
        let result = runner.run_until(std::future::pending()).await;

        assert!(matches!(result, Err(TransitError::ConfigValidation(_))));
        assert!(backend.operations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_payloads_are_stamped() {
        let dir = tempfile::tempdir().unwrap();
        let (metrics, inventory) = write_payloads(dir.path());
        let backend = Arc::new(MockBackend::new());

        let runner = TransitRunner::new("test", config(metrics, inventory, 1, 1), backend.clone());
        runner.run_until(std::future::pending()).await.unwrap();

        let sent = backend
            .calls()
            .into_iter()
            .find(|c| c.operation == Operation::SendResourcesWithMetrics)
            .and_then(|c| c.payload)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&sent).unwrap();
        assert_eq!(value["context"]["appType"], "VEMA");
        assert!(value["context"]["traceToken"].is_string());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_counted_and_loop_continues() {
        let dir = tempfile::tempdir().unwrap();
        let (metrics, inventory) = write_payloads(dir.path());
        let backend = Arc::new(
            MockBackend::new()
                .with_failure(Operation::SendResourcesWithMetrics, "nats: timeout")
                .with_failure(Operation::Disconnect, "already closed"),
        );

        let runner = TransitRunner::new("test", config(metrics, inventory, 2, 10), backend.clone());
        let stats = runner.run_until(std::future::pending()).await.unwrap();

        assert_eq!(stats.cycles, 2);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.inventory_sent, 1);
        assert_eq!(backend.operations().last(), Some(&Operation::Disconnect));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let (metrics, inventory) = write_payloads(dir.path());
        let backend = Arc::new(MockBackend::new().with_failure(Operation::Connect, "bad password"));

        let runner = TransitRunner::new("test", config(metrics, inventory, 2, 1), backend.clone());
        let result = runner.run_until(std::future::pending()).await;

        assert!(matches!(result, Err(TransitError::Native { .. })));
        assert_eq!(backend.operations(), vec![Operation::Connect]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_signal_stops_loop() {
        let dir = tempfile::tempdir().unwrap();
        let (metrics, inventory) = write_payloads(dir.path());
        let backend = Arc::new(MockBackend::new());

        let mut config = config(metrics, inventory, 1, 1);
        config.feeder.max_cycles = None;

        let runner = TransitRunner::new("test", config, backend.clone());
        let stats = runner.run_until(async {}).await.unwrap();

        assert_eq!(stats.cycles, 1);
        assert_eq!(backend.operations().last(), Some(&Operation::Disconnect));
    }

    #[test]
    fn test_run_stats() {
        let mut stats = RunStats::default();
        assert_eq!(stats.delivered(), 0);
        assert_eq!(stats.success_rate(), 100.0);

        stats.inventory_sent = 2;
        stats.metrics_sent = 6;
        stats.failed = 2;
        assert_eq!(stats.delivered(), 8);
        assert_eq!(stats.success_rate(), 80.0);
    }
}
