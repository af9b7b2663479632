//! Transit Common Library
//!
//! Shared types and utilities for talking to the transit pipeline:
//!
//! - [`resource`] - Monitored resources, services and time series
//! - [`inventory`] - Inventory resources and groups
//! - [`metric`] - Metric descriptors returned by `ListMetrics`
//! - [`context`] - Tracer context stamped into payloads
//! - [`serialization`] - JSON encoding that omits absent fields
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types

pub mod config;
pub mod context;
pub mod credentials;
pub mod error;
pub mod inventory;
pub mod metric;
pub mod resource;
pub mod serialization;
pub mod timestamp;

// Re-export commonly used types at the crate root
pub use config::{AgentConfig, LogFormat, LoggingConfig, load_config, parse_config};
pub use context::TracerContext;
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use inventory::{
    GroupType, Inventory, InventoryResource, InventoryService, MonitoredResourceRef, ResourceGroup,
};
pub use metric::MetricDescriptor;
pub use resource::{
    MetricSampleType, MonitoredResource, MonitoredService, MonitoredStatus, ResourceType,
    ResourcesWithMetrics, ThresholdValue, TimeInterval, TimeSeries, TypedValue, ValueType,
};
pub use serialization::{decode, decode_list, encode, encode_pretty};
pub use timestamp::MillisecondTimestamp;

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
