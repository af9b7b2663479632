//! Typed transit operations.

use transit_common::{Credentials, Inventory, MetricDescriptor, MonitoredResource, ResourcesWithMetrics};

use crate::error::Result;

/// Operations exposed by the transit pipeline.
///
/// Each call maps one-to-one onto a library function; nothing is cached,
/// batched or retried.
pub trait TransitServices {
    /// Authenticate and open the transport. Must precede the other calls.
    fn connect(&self, credentials: &Credentials) -> Result<()>;

    /// Hand a batch of monitored resources and their metrics to the transport.
    fn send_resources_with_metrics(&self, resources: &ResourcesWithMetrics) -> Result<()>;

    /// Metric descriptors known to the pipeline.
    fn list_metrics(&self) -> Result<Vec<MetricDescriptor>>;

    /// Replace the remote inventory.
    fn synchronize_inventory(&self, inventory: &Inventory) -> Result<()>;

    /// Close the transport.
    fn disconnect(&self) -> Result<()>;

    /// Round-trip a resource through the library; the echo comes back with
    /// its status set to `SERVICE_PENDING`.
    fn test_monitored_resource(&self, resource: &MonitoredResource) -> Result<MonitoredResource>;
}
