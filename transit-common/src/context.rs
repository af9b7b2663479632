use serde::{Deserialize, Serialize};

use crate::timestamp::MillisecondTimestamp;

/// Tracing header attached to every metrics and inventory payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracerContext {
    /// Application type of the sending agent (e.g. "VEMA").
    pub app_type: String,

    /// Identifier of the sending agent.
    pub agent_id: String,

    /// Unique token for this delivery.
    pub trace_token: String,

    /// When the payload was stamped.
    pub time_stamp: MillisecondTimestamp,

    /// Agent version.
    pub version: String,
}

impl TracerContext {
    /// Create a context with a fresh trace token and the current time.
    pub fn new(
        app_type: impl Into<String>,
        agent_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            app_type: app_type.into(),
            agent_id: agent_id.into(),
            trace_token: uuid::Uuid::new_v4().to_string(),
            time_stamp: MillisecondTimestamp::now(),
            version: version.into(),
        }
    }
}
