//! Common CLI arguments.

use std::path::PathBuf;

use clap::Args;

use crate::config::TransitConfig;
use crate::error::Result;

/// Options shared by every transit command; flatten into a `clap::Parser`.
#[derive(Args, Debug, Clone)]
pub struct TransitArgs {
    /// Path to configuration file.
    #[arg(short, long, default_value = "transit.json5", global = true)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Override the transit library path from the configuration.
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,
}

impl TransitArgs {
    /// Load the configuration and apply CLI overrides.
    pub fn load_config(&self) -> Result<TransitConfig> {
        let mut config = TransitConfig::load(&self.config)?;
        self.apply(&mut config);
        Ok(config)
    }

    /// Apply CLI overrides to an already loaded configuration.
    pub fn apply(&self, config: &mut TransitConfig) {
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(ref library) = self.library {
            config.library.path = library.clone();
        }
    }
}
