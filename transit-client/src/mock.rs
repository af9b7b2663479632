//! In-memory [`TransitBackend`] for tests.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::backend::{Operation, TransitBackend};
use crate::error::{Result, TransitError};

/// A call seen by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub operation: Operation,
    /// JSON argument, for operations that take one.
    pub payload: Option<String>,
}

/// Scriptable backend that records every call.
///
/// By default every operation succeeds, `ListMetrics` returns `[]` and
/// `TestMonitoredResource` echoes its input with the status forced to
/// `SERVICE_PENDING`.
#[derive(Debug)]
pub struct MockBackend {
    calls: Mutex<Vec<RecordedCall>>,
    failures: Mutex<HashMap<Operation, String>>,
    list_metrics_json: Mutex<String>,
    echo_json: Mutex<Option<String>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            list_metrics_json: Mutex::new("[]".to_string()),
            echo_json: Mutex::new(None),
        }
    }

    /// Make `operation` fail with `message`.
    pub fn with_failure(self, operation: Operation, message: impl Into<String>) -> Self {
        self.fail(operation, message);
        self
    }

    /// Document returned by `ListMetrics`.
    pub fn with_list_metrics(self, json: impl Into<String>) -> Self {
        *self.list_metrics_json.lock() = json.into();
        self
    }

    /// Fixed document returned by `TestMonitoredResource` instead of the echo.
    pub fn with_echo(self, json: impl Into<String>) -> Self {
        *self.echo_json.lock() = Some(json.into());
        self
    }

    /// Make `operation` fail from now on.
    pub fn fail(&self, operation: Operation, message: impl Into<String>) {
        self.failures.lock().insert(operation, message.into());
    }

    /// Let `operation` succeed again.
    pub fn recover(&self, operation: Operation) {
        self.failures.lock().remove(&operation);
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Operations called so far, in order.
    pub fn operations(&self) -> Vec<Operation> {
        self.calls.lock().iter().map(|c| c.operation).collect()
    }

    fn record(&self, operation: Operation, payload: Option<&str>) -> Result<()> {
        self.calls.lock().push(RecordedCall {
            operation,
            payload: payload.map(str::to_owned),
        });

        match self.failures.lock().get(&operation) {
            Some(message) => Err(TransitError::native(operation.symbol(), message.clone())),
            None => Ok(()),
        }
    }
}

impl TransitBackend for MockBackend {
    fn connect(&self, credentials_json: &str) -> Result<()> {
        self.record(Operation::Connect, Some(credentials_json))
    }

    fn disconnect(&self) -> Result<()> {
        self.record(Operation::Disconnect, None)
    }

    fn send_resources_with_metrics(&self, resources_json: &str) -> Result<()> {
        self.record(Operation::SendResourcesWithMetrics, Some(resources_json))
    }

    fn list_metrics(&self) -> Result<String> {
        self.record(Operation::ListMetrics, None)?;
        Ok(self.list_metrics_json.lock().clone())
    }

    fn synchronize_inventory(&self, inventory_json: &str) -> Result<()> {
        self.record(Operation::SynchronizeInventory, Some(inventory_json))
    }

    fn test_monitored_resource(&self, resource_json: &str) -> Result<String> {
        self.record(Operation::TestMonitoredResource, Some(resource_json))?;

        if let Some(json) = self.echo_json.lock().clone() {
            return Ok(json);
        }

        let mut value: serde_json::Value = serde_json::from_str(resource_json)
            .map_err(|e| TransitError::native(Operation::TestMonitoredResource.symbol(), e.to_string()))?;
        if let Some(object) = value.as_object_mut() {
            object.insert("status".to_string(), "SERVICE_PENDING".into());
        }
        Ok(value.to_string())
    }
}
