use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use aps_core::error::{ApsError, Result};

use crate::handler_config::HandlerConfig;

/// Path of an optional YAML configuration file.
pub const CONFIG_PATH_ENV: &str = "APS_HANDLER_CONFIG";
pub const SHORT_CALLBACK_ENV: &str = "APS_SHORT_CALLBACK_SECONDS";
pub const LONG_CALLBACK_ENV: &str = "APS_LONG_CALLBACK_SECONDS";

impl HandlerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(&content)?)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(seconds) = read_seconds(SHORT_CALLBACK_ENV)? {
            self.callbacks.short_seconds = seconds;
        }
        if let Some(seconds) = read_seconds(LONG_CALLBACK_ENV)? {
            self.callbacks.long_seconds = seconds;
        }
        Ok(())
    }
}

fn read_seconds(name: &str) -> Result<Option<u32>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|e| {
                ApsError::Config(format!(
                    "{} must be a whole number of seconds: {}",
                    name, e
                ))
            }),
        Err(_) => Ok(None),
    }
}

/// Load the handler configuration: defaults, then the file named by
/// `APS_HANDLER_CONFIG` if set, then environment overrides. The result is
/// validated before it is returned.
pub fn load_handler_config() -> Result<HandlerConfig> {
    let mut config = match env::var(CONFIG_PATH_ENV) {
        Ok(path) => {
            let path = PathBuf::from(path);
            debug!("Loading handler configuration from {}", path.display());
            HandlerConfig::from_file(&path)?
        }
        Err(_) => HandlerConfig::default(),
    };

    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}
