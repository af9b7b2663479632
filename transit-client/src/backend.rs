//! Raw string-level contract of the transit library.

use std::fmt;

use crate::error::Result;

/// Exported functions of the transit library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Connect,
    Disconnect,
    SendResourcesWithMetrics,
    ListMetrics,
    SynchronizeInventory,
    TestMonitoredResource,
}

impl Operation {
    /// Exported symbol name.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Connect => "Connect",
            Operation::Disconnect => "Disconnect",
            Operation::SendResourcesWithMetrics => "SendResourcesWithMetrics",
            Operation::ListMetrics => "ListMetrics",
            Operation::SynchronizeInventory => "SynchronizeInventory",
            Operation::TestMonitoredResource => "TestMonitoredResource",
        }
    }

    pub const ALL: [Operation; 6] = [
        Operation::Connect,
        Operation::Disconnect,
        Operation::SendResourcesWithMetrics,
        Operation::ListMetrics,
        Operation::SynchronizeInventory,
        Operation::TestMonitoredResource,
    ];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One method per exported function, each taking and returning JSON text.
///
/// Implementations report library failures as [`TransitError::Native`]
/// carrying the library's error message.
///
/// [`TransitError::Native`]: crate::TransitError::Native
pub trait TransitBackend: Send + Sync {
    fn connect(&self, credentials_json: &str) -> Result<()>;

    fn disconnect(&self) -> Result<()>;

    fn send_resources_with_metrics(&self, resources_json: &str) -> Result<()>;

    fn list_metrics(&self) -> Result<String>;

    fn synchronize_inventory(&self, inventory_json: &str) -> Result<()>;

    fn test_monitored_resource(&self, resource_json: &str) -> Result<String>;
}

impl<B: TransitBackend + ?Sized> TransitBackend for std::sync::Arc<B> {
    fn connect(&self, credentials_json: &str) -> Result<()> {
        (**self).connect(credentials_json)
    }

    fn disconnect(&self) -> Result<()> {
        (**self).disconnect()
    }

    fn send_resources_with_metrics(&self, resources_json: &str) -> Result<()> {
        (**self).send_resources_with_metrics(resources_json)
    }

    fn list_metrics(&self) -> Result<String> {
        (**self).list_metrics()
    }

    fn synchronize_inventory(&self, inventory_json: &str) -> Result<()> {
        (**self).synchronize_inventory(inventory_json)
    }

    fn test_monitored_resource(&self, resource_json: &str) -> Result<String> {
        (**self).test_monitored_resource(resource_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_names() {
        assert_eq!(Operation::ListMetrics.symbol(), "ListMetrics");
        assert_eq!(
            Operation::SendResourcesWithMetrics.to_string(),
            "SendResourcesWithMetrics"
        );
        assert_eq!(Operation::ALL.len(), 6);
    }
}
