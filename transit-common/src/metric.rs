use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::resource::{ThresholdValue, ValueType};

/// Description of a metric the transit pipeline knows about, as returned by
/// `ListMetrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDescriptor {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub descriptor_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_kind: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thresholds: Vec<ThresholdValue>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

impl MetricDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            descriptor_type: None,
            unit: None,
            value_type: None,
            compute_type: None,
            metric_kind: None,
            thresholds: Vec::new(),
            labels: HashMap::new(),
        }
    }

    /// Human-facing name, falling back to `name`.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}
