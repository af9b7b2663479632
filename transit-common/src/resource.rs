//! Monitored resources, services and their time series.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::TracerContext;
use crate::timestamp::MillisecondTimestamp;

/// Kind of monitored entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    Host,
    Hypervisor,
    Instance,
    VirtualMachine,
    CloudApp,
    CloudFunction,
    LoadBalancer,
    Storage,
    Network,
    NetworkDevice,
    Service,
}

impl ResourceType {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Host => "host",
            ResourceType::Hypervisor => "hypervisor",
            ResourceType::Instance => "instance",
            ResourceType::VirtualMachine => "virtual-machine",
            ResourceType::CloudApp => "cloud-app",
            ResourceType::CloudFunction => "cloud-function",
            ResourceType::LoadBalancer => "load-balancer",
            ResourceType::Storage => "storage",
            ResourceType::Network => "network",
            ResourceType::NetworkDevice => "network-device",
            ResourceType::Service => "service",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host and service states understood by the transit pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitoredStatus {
    HostUp,
    HostDown,
    HostUnreachable,
    HostScheduledDown,
    HostUnscheduledDown,
    HostPending,
    ServiceOk,
    ServiceWarning,
    ServiceUnscheduledCritical,
    ServicePending,
    ServiceScheduledCritical,
    ServiceUnknown,
}

/// Discriminator for [`TypedValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    IntegerType,
    DoubleType,
    StringType,
    BooleanType,
    TimeType,
    UnspecifiedType,
}

/// A value tagged with its type; only the field matching `value_type` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedValue {
    pub value_type: ValueType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer_value: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_value: Option<MillisecondTimestamp>,
}

impl TypedValue {
    fn empty(value_type: ValueType) -> Self {
        Self {
            value_type,
            bool_value: None,
            double_value: None,
            integer_value: None,
            string_value: None,
            time_value: None,
        }
    }

    pub fn integer(v: i64) -> Self {
        Self {
            integer_value: Some(v),
            ..Self::empty(ValueType::IntegerType)
        }
    }

    pub fn double(v: f64) -> Self {
        Self {
            double_value: Some(v),
            ..Self::empty(ValueType::DoubleType)
        }
    }

    pub fn string(v: impl Into<String>) -> Self {
        Self {
            string_value: Some(v.into()),
            ..Self::empty(ValueType::StringType)
        }
    }

    pub fn boolean(v: bool) -> Self {
        Self {
            bool_value: Some(v),
            ..Self::empty(ValueType::BooleanType)
        }
    }

    pub fn time(v: MillisecondTimestamp) -> Self {
        Self {
            time_value: Some(v),
            ..Self::empty(ValueType::TimeType)
        }
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        TypedValue::integer(v)
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        TypedValue::double(v)
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        TypedValue::string(v)
    }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self {
        TypedValue::string(v)
    }
}

impl From<bool> for TypedValue {
    fn from(v: bool) -> Self {
        TypedValue::boolean(v)
    }
}

/// Role of a sample within a time series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricSampleType {
    #[default]
    Value,
    Critical,
    Warning,
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    pub end_time: MillisecondTimestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<MillisecondTimestamp>,
}

impl TimeInterval {
    /// A zero-length interval ending at `at`.
    pub fn instant(at: MillisecondTimestamp) -> Self {
        Self {
            end_time: at,
            start_time: Some(at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdValue {
    pub sample_type: MetricSampleType,
    pub label: String,
    pub value: TypedValue,
}

/// One measurement of a named metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub metric_name: String,

    #[serde(default)]
    pub sample_type: MetricSampleType,

    pub interval: TimeInterval,

    pub value: TypedValue,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thresholds: Vec<ThresholdValue>,
}

impl TimeSeries {
    /// A `Value` sample taken now.
    pub fn new(metric_name: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        Self {
            metric_name: metric_name.into(),
            sample_type: MetricSampleType::Value,
            interval: TimeInterval::instant(MillisecondTimestamp::now()),
            value: value.into(),
            tags: HashMap::new(),
            unit: None,
            thresholds: Vec::new(),
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Attach warning and critical thresholds.
    pub fn with_thresholds(mut self, warning: impl Into<TypedValue>, critical: impl Into<TypedValue>) -> Self {
        let label = &self.metric_name;
        self.thresholds = vec![
            ThresholdValue {
                sample_type: MetricSampleType::Warning,
                label: format!("{}_wn", label),
                value: warning.into(),
            },
            ThresholdValue {
                sample_type: MetricSampleType::Critical,
                label: format!("{}_cr", label),
                value: critical.into(),
            },
        ];
        self
    }
}

/// A service hanging off a monitored resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredService {
    pub name: String,

    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    pub status: MonitoredStatus,

    pub last_check_time: MillisecondTimestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_check_time: Option<MillisecondTimestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_plug_in_output: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, TypedValue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<TimeSeries>,
}

impl MonitoredService {
    pub fn new(name: impl Into<String>, owner: impl Into<String>, status: MonitoredStatus) -> Self {
        Self {
            name: name.into(),
            resource_type: ResourceType::Service,
            owner: Some(owner.into()),
            status,
            last_check_time: MillisecondTimestamp::now(),
            next_check_time: None,
            last_plug_in_output: None,
            properties: HashMap::new(),
            metrics: Vec::new(),
        }
    }

    pub fn with_metric(mut self, metric: TimeSeries) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.last_plug_in_output = Some(output.into());
        self
    }
}

/// A host (or similar) with its services and their metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredResource {
    pub name: String,

    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    pub status: MonitoredStatus,

    pub last_check_time: MillisecondTimestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_check_time: Option<MillisecondTimestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_plug_in_output: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, TypedValue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<MonitoredService>,
}

impl MonitoredResource {
    /// Create a resource checked now.
    pub fn new(name: impl Into<String>, resource_type: ResourceType, status: MonitoredStatus) -> Self {
        Self {
            name: name.into(),
            resource_type,
            owner: None,
            status,
            last_check_time: MillisecondTimestamp::now(),
            next_check_time: None,
            last_plug_in_output: None,
            properties: HashMap::new(),
            services: Vec::new(),
        }
    }

    pub fn with_service(mut self, service: MonitoredService) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Total number of time series across all services.
    pub fn metric_count(&self) -> usize {
        self.services.iter().map(|s| s.metrics.len()).sum()
    }
}

/// Payload of `SendResourcesWithMetrics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesWithMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<TracerContext>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<MonitoredResource>,
}

impl ResourcesWithMetrics {
    pub fn new(resources: Vec<MonitoredResource>) -> Self {
        Self {
            context: None,
            resources,
        }
    }

    pub fn with_context(mut self, context: TracerContext) -> Self {
        self.context = Some(context);
        self
    }
}
