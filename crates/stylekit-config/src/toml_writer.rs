//! Write StyleKitConfig to TOML on disk.
//!
//! Writes go to a `.tmp` sibling first and are renamed into place.

use std::path::Path;

use stylekit_common::ConfigError;

use crate::schema::StyleKitConfig;
use crate::toml_loader::default_config_path;

/// Write config to the platform default path.
pub fn save_config(config: &StyleKitConfig) -> Result<(), ConfigError> {
    let path = default_config_path()?;
    save_config_to_path(config, &path)
}

/// Write config to a specific path, creating parent directories as needed.
pub fn save_config_to_path(config: &StyleKitConfig, path: &Path) -> Result<(), ConfigError> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::ParseError(format!("failed to serialize config to TOML: {e}")))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, &toml_str).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write config to {}: {e}",
            tmp_path.display()
        ))
    })?;

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        tracing::warn!("atomic rename failed ({}), falling back to direct write", e);
        std::fs::write(path, &toml_str).map_err(|e2| {
            ConfigError::ParseError(format!(
                "failed to write config to {}: {e2}",
                path.display()
            ))
        })?;
    }

    tracing::debug!(path = %path.display(), "Config saved to disk");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LogLevel;
    use tempfile::TempDir;

    #[test]
    fn save_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = StyleKitConfig::default();
        config.revisions.max_revisions = 40;
        config.tokens.default_group = "Brand".into();
        config.logging.level = LogLevel::Debug;
        config.store.path = Some(dir.path().join("options.json"));
        save_config_to_path(&config, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: StyleKitConfig = toml::from_str(&contents).unwrap();
        assert_eq!(parsed.revisions.max_revisions, 40);
        assert_eq!(parsed.tokens.default_group, "Brand");
        assert_eq!(parsed.logging.level, LogLevel::Debug);
        assert_eq!(parsed.store.path, config.store.path);
        assert_eq!(
            parsed.responsive.tablet_max_width,
            config.responsive.tablet_max_width
        );
    }

    #[test]
    fn save_config_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("config.toml");

        save_config_to_path(&StyleKitConfig::default(), &path).unwrap();

        assert!(path.exists());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("max_revisions"));
    }

    #[test]
    fn save_config_cleans_up_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        save_config_to_path(&StyleKitConfig::default(), &path).unwrap();

        let tmp_path = path.with_extension("toml.tmp");
        assert!(
            !tmp_path.exists(),
            "tmp file should be cleaned up after rename"
        );
    }
}
