use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::context::TracerContext;
use crate::error::{Error, Result};

/// Identity of the agent stamped into every payload's [`TracerContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Application type (default: "VEMA").
    #[serde(default = "default_app_type")]
    pub app_type: String,

    /// Agent identifier (default: the local hostname).
    #[serde(default = "default_agent_id")]
    pub agent_id: String,

    /// Agent version (default: this crate's version).
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_app_type() -> String {
    "VEMA".to_string()
}

fn default_agent_id() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "transit-agent".to_string())
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            app_type: default_app_type(),
            agent_id: default_agent_id(),
            version: default_version(),
        }
    }
}

impl AgentConfig {
    /// A fresh tracer context for this agent.
    pub fn context(&self) -> TracerContext {
        TracerContext::new(&self.app_type, &self.agent_id, &self.version)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Common logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Read and parse a JSON5 configuration file.
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_config(&content)
}

/// Parse a JSON5 configuration document.
pub fn parse_config<T: DeserializeOwned>(content: &str) -> Result<T> {
    json5::from_str(content).map_err(|e| Error::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default)]
        agent: AgentConfig,
        #[serde(default)]
        logging: LoggingConfig,
    }

    #[test]
    fn test_parse_agent_and_logging() {
        let json5 = r#"
        {
            agent: {
                app_type: "NAGIOS",
                agent_id: "agent-7",
            },
            logging: {
                level: "debug",
                format: "json",
            },
        }
        "#;

        let config: Sample = parse_config(json5).unwrap();

        assert_eq!(config.agent.app_type, "NAGIOS");
        assert_eq!(config.agent.agent_id, "agent-7");
        assert_eq!(config.agent.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_default_config() {
        let config: Sample = parse_config("{}").unwrap();

        assert_eq!(config.agent.app_type, "VEMA");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_agent_context() {
        let agent = AgentConfig {
            app_type: "VEMA".to_string(),
            agent_id: "a1".to_string(),
            version: "2.0".to_string(),
        };
        let ctx = agent.context();

        assert_eq!(ctx.agent_id, "a1");
        assert_eq!(ctx.version, "2.0");
    }

    #[test]
    fn test_load_missing_file() {
        let result: Result<Sample> = load_config("/nonexistent/transit.json5");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_parse_error_is_config() {
        let result: Result<Sample> = parse_config("{ agent: ");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
