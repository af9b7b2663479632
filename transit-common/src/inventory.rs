//! Inventory payloads for `SynchronizeInventory`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::context::TracerContext;
use crate::resource::{ResourceType, TypedValue};

/// A service declared in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryService {
    pub name: String,

    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, TypedValue>,
}

impl InventoryService {
    pub fn new(name: impl Into<String>, resource_type: ResourceType, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type,
            owner: Some(owner.into()),
            category: None,
            description: None,
            properties: HashMap::new(),
        }
    }
}

/// A resource declared in the inventory, with its services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryResource {
    pub name: String,

    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, TypedValue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<InventoryService>,
}

impl InventoryResource {
    pub fn new(name: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            name: name.into(),
            resource_type,
            owner: None,
            category: None,
            description: None,
            device: None,
            properties: HashMap::new(),
            services: Vec::new(),
        }
    }

    /// Add a service owned by this resource.
    pub fn with_service(mut self, name: impl Into<String>, resource_type: ResourceType) -> Self {
        let service = InventoryService::new(name, resource_type, self.name.clone());
        self.services.push(service);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupType {
    HostGroup,
    ServiceGroup,
    CustomGroup,
}

/// Reference to a resource by name, used inside groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredResourceRef {
    pub name: String,

    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    pub group_name: String,

    #[serde(rename = "type")]
    pub group_type: GroupType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<MonitoredResourceRef>,
}

impl ResourceGroup {
    pub fn new(group_name: impl Into<String>, group_type: GroupType) -> Self {
        Self {
            group_name: group_name.into(),
            group_type,
            description: None,
            resources: Vec::new(),
        }
    }

    pub fn with_member(mut self, name: impl Into<String>, resource_type: ResourceType) -> Self {
        self.resources.push(MonitoredResourceRef {
            name: name.into(),
            resource_type,
            owner: None,
        });
        self
    }
}

/// Payload of `SynchronizeInventory`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<TracerContext>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<InventoryResource>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ResourceGroup>,
}

impl Inventory {
    pub fn new(resources: Vec<InventoryResource>) -> Self {
        Self {
            context: None,
            resources,
            groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: ResourceGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_context(mut self, context: TracerContext) -> Self {
        self.context = Some(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_services_inherit_owner() {
        let resource = InventoryResource::new("host01", ResourceType::Host)
            .with_service("disk.free", ResourceType::NetworkDevice)
            .with_service("mem.used", ResourceType::NetworkDevice);

        assert_eq!(resource.services.len(), 2);
        assert_eq!(resource.services[1].owner.as_deref(), Some("host01"));
    }

    #[test]
    fn test_inventory_json_shape() {
        let inventory = Inventory::new(vec![InventoryResource::new("host01", ResourceType::Host)])
            .with_group(
                ResourceGroup::new("Servers", GroupType::HostGroup).with_member("host01", ResourceType::Host),
            );

        let json = serde_json::to_value(&inventory).unwrap();
        assert_eq!(json["resources"][0]["type"], "host");
        assert_eq!(json["groups"][0]["groupName"], "Servers");
        assert_eq!(json["groups"][0]["type"], "HostGroup");
        assert!(json.get("context").is_none());
    }
}
