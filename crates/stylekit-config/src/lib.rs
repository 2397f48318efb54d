//! StyleKit configuration.
//!
//! TOML-based settings for the option store location, revision history,
//! responsive breakpoints, token defaults, and logging. All sections use
//! defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stylekit_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod toml_writer;
pub mod validation;

pub use schema::{
    LogLevel, LoggingConfig, ResponsiveConfig, RevisionsConfig, StoreConfig, StyleKitConfig,
    TokensConfig, CONFIG_SCHEMA_VERSION,
};
pub use toml_loader::{default_store_path, load_from_path};
pub use toml_writer::{save_config, save_config_to_path};

use std::path::Path;

use stylekit_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a default `config.toml` if none exists.
pub fn load_config() -> Result<StyleKitConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &Path) -> Result<StyleKitConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &StyleKitConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&StyleKitConfig::default());
        assert!(json.contains("\"store\""));
        assert!(json.contains("\"revisions\""));
        assert!(json.contains("\"responsive\""));
        assert!(json.contains("\"tokens\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_to_json_is_valid_json() {
        let json = config_to_json(&StyleKitConfig::default());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tokens"]["default_group"], "General");
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[revisions]\nmax_revisions = 0\n").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn load_config_from_accepts_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[responsive]\ntablet_max_width = 960\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.responsive.tablet_max_width, 960);
    }

    #[test]
    fn schema_version_is_one() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }
}
