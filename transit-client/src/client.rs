//! JSON marshaling facade over a [`TransitBackend`].

use std::path::Path;

use transit_common::{
    Credentials, Inventory, MetricDescriptor, MonitoredResource, ResourcesWithMetrics, decode,
    decode_list, encode,
};

use crate::backend::{Operation, TransitBackend};
use crate::error::Result;
use crate::native::NativeLibrary;
use crate::services::TransitServices;

/// Client that encodes DTOs, calls the backend and decodes the answers.
///
/// `TransitClient<NativeLibrary>` is the production client; tests plug in
/// [`MockBackend`](crate::MockBackend).
#[derive(Debug, Clone)]
pub struct TransitClient<B> {
    backend: B,
}

impl TransitClient<NativeLibrary> {
    /// Load the library at `path` and wrap it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(NativeLibrary::load(path)?))
    }
}

impl<B: TransitBackend> TransitClient<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Get a reference to the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn logged<T>(operation: Operation, result: Result<T>) -> Result<T> {
        if let Err(ref e) = result {
            tracing::warn!(%operation, error = %e, "Transit call failed");
        }
        result
    }
}

impl<B: TransitBackend> TransitServices for TransitClient<B> {
    fn connect(&self, credentials: &Credentials) -> Result<()> {
        let json = encode(credentials)?;
        tracing::debug!(user = %credentials.user, "Connecting to transit");
        Self::logged(Operation::Connect, self.backend.connect(&json))
    }

    fn send_resources_with_metrics(&self, resources: &ResourcesWithMetrics) -> Result<()> {
        let json = encode(resources)?;
        tracing::debug!(
            resources = resources.resources.len(),
            bytes = json.len(),
            "Sending resources with metrics"
        );
        Self::logged(
            Operation::SendResourcesWithMetrics,
            self.backend.send_resources_with_metrics(&json),
        )
    }

    fn list_metrics(&self) -> Result<Vec<MetricDescriptor>> {
        let json = Self::logged(Operation::ListMetrics, self.backend.list_metrics())?;
        let metrics: Vec<MetricDescriptor> =
            Self::logged(Operation::ListMetrics, decode_list(&json).map_err(Into::into))?;
        tracing::debug!(count = metrics.len(), "Listed metrics");
        Ok(metrics)
    }

    fn synchronize_inventory(&self, inventory: &Inventory) -> Result<()> {
        let json = encode(inventory)?;
        tracing::debug!(
            resources = inventory.resources.len(),
            groups = inventory.groups.len(),
            "Synchronizing inventory"
        );
        Self::logged(
            Operation::SynchronizeInventory,
            self.backend.synchronize_inventory(&json),
        )
    }

    fn disconnect(&self) -> Result<()> {
        tracing::debug!("Disconnecting from transit");
        Self::logged(Operation::Disconnect, self.backend.disconnect())
    }

    fn test_monitored_resource(&self, resource: &MonitoredResource) -> Result<MonitoredResource> {
        let json = encode(resource)?;
        let echoed = Self::logged(
            Operation::TestMonitoredResource,
            self.backend.test_monitored_resource(&json),
        )?;
        Self::logged(Operation::TestMonitoredResource, decode(&echoed).map_err(Into::into))
    }
}
