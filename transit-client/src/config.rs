//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use transit_common::{AgentConfig, Credentials, LoggingConfig, load_config, parse_config};

use crate::error::{Result, TransitError};
use crate::native::NativeLibrary;

/// Complete client configuration, loaded from JSON5.
///
/// ```json5
/// {
///     library: { path: "/usr/lib/libtransit.so" },
///     credentials: { user: "admin", password: "secret" },
///     agent: { app_type: "VEMA", agent_id: "agent-1" },
///     feeder: { interval_secs: 60, metrics_file: "metrics.json" },
///     logging: { level: "info", format: "text" },
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitConfig {
    /// Shared library location.
    #[serde(default)]
    pub library: LibraryConfig,

    /// Account passed to `Connect`.
    pub credentials: Credentials,

    /// Identity stamped into payload contexts.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Feeder loop settings.
    #[serde(default)]
    pub feeder: FeederConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Path to the shared object (default: platform name of "transit",
    /// resolved through the loader's search path).
    #[serde(default = "default_library_path")]
    pub path: PathBuf,
}

fn default_library_path() -> PathBuf {
    NativeLibrary::default_path()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: default_library_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeederConfig {
    /// Seconds between metric cycles (default: 60).
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Re-send inventory every N metric cycles (default: 10).
    #[serde(default = "default_inventory_every")]
    pub inventory_every: u64,

    /// JSON file holding a `ResourcesWithMetrics` document.
    #[serde(default)]
    pub metrics_file: Option<PathBuf>,

    /// JSON file holding an `Inventory` document.
    #[serde(default)]
    pub inventory_file: Option<PathBuf>,

    /// Stop after this many cycles instead of waiting for Ctrl+C.
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

fn default_interval() -> u64 {
    60
}

fn default_inventory_every() -> u64 {
    10
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            inventory_every: default_inventory_every(),
            metrics_file: None,
            inventory_file: None,
            max_cycles: None,
        }
    }
}

impl FeederConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl TransitConfig {
    /// Load configuration from a file path.
    ///
    /// Relative feeder file paths are resolved against the config file's
    /// directory. Calls [`validate`](Self::validate) after loading.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TransitError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let mut config: Self = load_config(path).map_err(parse_error)?;
        config.validate()?;

        if let Some(base) = path.parent() {
            config.feeder.metrics_file = config.feeder.metrics_file.map(|f| base.join(f));
            config.feeder.inventory_file = config.feeder.inventory_file.map(|f| base.join(f));
        }

        Ok(config)
    }

    /// Parse and validate a JSON5 document.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = parse_config(content).map_err(parse_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.credentials.user.trim().is_empty() {
            return Err(TransitError::validation("credentials.user must not be empty"));
        }
        if self.feeder.interval_secs == 0 {
            return Err(TransitError::validation("feeder.interval_secs must be greater than 0"));
        }
        if self.feeder.inventory_every == 0 {
            return Err(TransitError::validation(
                "feeder.inventory_every must be greater than 0",
            ));
        }
        Ok(())
    }
}

fn parse_error(err: transit_common::Error) -> TransitError {
    match err {
        transit_common::Error::Config(msg) => TransitError::ConfigParse(msg),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransitConfig::parse(r#"{ credentials: { user: "u", password: "p" } }"#).unwrap();

        assert_eq!(config.library.path, NativeLibrary::default_path());
        assert_eq!(config.feeder.interval_secs, 60);
        assert_eq!(config.feeder.inventory_every, 10);
        assert!(config.feeder.metrics_file.is_none());
        assert!(config.feeder.max_cycles.is_none());
        assert_eq!(config.agent.app_type, "VEMA");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_full_config() {
        let json5 = r#"
        {
            library: { path: "/opt/transit/libtransit.so" },
            credentials: { user: "admin", password: "secret" },
            agent: { app_type: "CHECKER", agent_id: "a-1", version: "1.2.3" },
            feeder: {
                interval_secs: 5,
                inventory_every: 3,
                metrics_file: "/tmp/metrics.json",
                max_cycles: 2,
            },
            logging: { level: "debug", format: "json" },
        }
        "#;

        let config = TransitConfig::parse(json5).unwrap();
        assert_eq!(config.library.path, PathBuf::from("/opt/transit/libtransit.so"));
        assert_eq!(config.feeder.interval(), Duration::from_secs(5));
        assert_eq!(config.feeder.inventory_every, 3);
        assert_eq!(config.feeder.max_cycles, Some(2));
        assert_eq!(config.agent.agent_id, "a-1");
    }

    #[test]
    fn test_missing_credentials() {
        let result = TransitConfig::parse("{}");
        assert!(matches!(result, Err(TransitError::ConfigParse(_))));
    }

    #[test]
    fn test_validation() {
        let empty_user = TransitConfig::parse(r#"{ credentials: { user: " ", password: "p" } }"#);
        assert!(matches!(empty_user, Err(TransitError::ConfigValidation(_))));

        let zero_interval = TransitConfig::parse(
            r#"{ credentials: { user: "u", password: "p" }, feeder: { interval_secs: 0 } }"#,
        );
        assert!(matches!(zero_interval, Err(TransitError::ConfigValidation(_))));

        let zero_every = TransitConfig::parse(
            r#"{ credentials: { user: "u", password: "p" }, feeder: { inventory_every: 0 } }"#,
        );
        assert!(matches!(zero_every, Err(TransitError::ConfigValidation(_))));
    }

    #[test]
    fn test_config_not_found() {
        let result = TransitConfig::load("/nonexistent/path.json5");
        assert!(matches!(result, Err(TransitError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_relative_feeder_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transit.json5");
        std::fs::write(
            &path,
            r#"{ credentials: { user: "u", password: "p" }, feeder: { metrics_file: "m.json" } }"#,
        )
        .unwrap();

        let config = TransitConfig::load(&path).unwrap();
        assert_eq!(config.feeder.metrics_file, Some(dir.path().join("m.json")));
    }

    #[test]
    fn test_load_reports_parse_and_validation_errors() {
        let dir = tempfile::tempdir().unwrap();

        let broken = dir.path().join("broken.json5");
        std::fs::write(&broken, "{ credentials: ").unwrap();
        assert!(matches!(
            TransitConfig::load(&broken),
            Err(TransitError::ConfigParse(_))
        ));

        let invalid = dir.path().join("invalid.json5");
        std::fs::write(&invalid, r#"{ credentials: { user: "", password: "p" } }"#).unwrap();
        assert!(matches!(
            TransitConfig::load(&invalid),
            Err(TransitError::ConfigValidation(_))
        ));
    }
}
