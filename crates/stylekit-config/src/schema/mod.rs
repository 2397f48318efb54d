//! Configuration schema types for StyleKit.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod storage;
mod system;

pub use storage::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for StyleKit.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct StyleKitConfig {
    pub store: StoreConfig,
    pub revisions: RevisionsConfig,
    pub responsive: ResponsiveConfig,
    pub tokens: TokensConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StyleKitConfig::default();
        assert!(config.store.path.is_none());
        assert_eq!(config.revisions.max_revisions, 20);
        assert_eq!(config.responsive.tablet_max_width, 1024);
        assert_eq!(config.responsive.mobile_max_width, 767);
        assert_eq!(config.tokens.default_group, "General");
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(!config.logging.json);
    }

    #[test]
    fn empty_toml_is_default() {
        let config: StyleKitConfig = toml::from_str("").unwrap();
        assert_eq!(config.revisions.max_revisions, 20);
        assert_eq!(config.tokens.default_group, "General");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: StyleKitConfig = toml::from_str(
            r#"
[responsive]
tablet_max_width = 900
"#,
        )
        .unwrap();
        assert_eq!(config.responsive.tablet_max_width, 900);
        assert_eq!(config.responsive.mobile_max_width, 767);
        assert_eq!(config.revisions.max_revisions, 20);
    }

    #[test]
    fn store_path_parses() {
        let config: StyleKitConfig = toml::from_str(
            r#"
[store]
path = "/var/lib/stylekit/options.json"
"#,
        )
        .unwrap();
        assert_eq!(
            config.store.path.as_deref(),
            Some(std::path::Path::new("/var/lib/stylekit/options.json"))
        );
    }

    #[test]
    fn log_level_is_uppercase() {
        let config: StyleKitConfig = toml::from_str(
            r#"
[logging]
level = "WARNING"
"#,
        )
        .unwrap();
        assert_eq!(config.logging.level, LogLevel::Warning);
        assert_eq!(config.logging.level.as_filter(), "warn");
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let result: Result<StyleKitConfig, _> = toml::from_str(
            r#"
[logging]
level = "loud"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(StyleKitConfig::default()).unwrap();
        assert_eq!(json["revisions"]["max_revisions"], 20);
        assert_eq!(json["logging"]["level"], "INFO");
        assert!(json["store"].get("path").is_none());
    }
}
