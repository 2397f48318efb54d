//! Config path resolution and default file creation.

use std::path::{Path, PathBuf};
use stylekit_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("stylekit").join("config.toml"))
}

/// Get the platform-specific default option store path.
pub fn default_store_path() -> Result<PathBuf, ConfigError> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine data directory".into()))?;
    Ok(data_dir.join("stylekit").join("options.json"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!(path = %path.display(), "created default config");
    Ok(())
}
