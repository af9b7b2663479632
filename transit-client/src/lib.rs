//! Transit Client
//!
//! Typed access to the native transit library, which delivers monitoring
//! data (inventory and metrics) into the transit pipeline.
//!
//! # Overview
//!
//! This crate provides:
//! - [`TransitServices`] - the typed operations (connect, send metrics, list
//!   metrics, synchronize inventory, disconnect, test resource)
//! - [`TransitBackend`] - the raw JSON-in/JSON-out contract of the library
//! - [`NativeLibrary`] - the `libloading` binding to the shared object
//! - [`TransitClient`] - JSON marshaling on top of any backend
//! - [`TransitRunner`] - a feeder loop that pushes payload files on a timer
//! - [`TransitConfig`] and [`TransitArgs`] - configuration and CLI options
//!
//! # Example
//!
//! ```ignore
//! use transit_client::{TransitClient, TransitServices};
//! use transit_common::Credentials;
//!
//! let client = TransitClient::load("/usr/lib/libtransit.so")?;
//! client.connect(&Credentials::new("admin", "secret"))?;
//! for metric in client.list_metrics()? {
//!     println!("{}", metric.label());
//! }
//! client.disconnect()?;
//! ```

mod args;
mod backend;
mod client;
mod config;
mod error;
mod native;
mod payload;
mod runner;
mod services;

#[cfg(any(test, feature = "test-utils"))]
mod mock;

pub use args::TransitArgs;
pub use backend::{Operation, TransitBackend};
pub use client::TransitClient;
pub use config::{FeederConfig, LibraryConfig, TransitConfig};
pub use error::{Result, TransitError};
pub use native::{ERROR_LEN, NativeLibrary};
pub use payload::load_payload;
pub use runner::{RunStats, TransitRunner};
pub use services::TransitServices;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockBackend, RecordedCall};

// Re-export commonly used types from transit-common
pub use transit_common::{
    AgentConfig, Credentials, Inventory, LoggingConfig, MetricDescriptor, MonitoredResource,
    ResourcesWithMetrics,
};
