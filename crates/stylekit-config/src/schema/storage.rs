//! Storage, revision, token, and breakpoint settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the option store lives.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the JSON option file. Defaults to the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Revision history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionsConfig {
    /// Revisions kept in the shared history (valid range: 1-500).
    pub max_revisions: usize,
}

impl Default for RevisionsConfig {
    fn default() -> Self {
        Self { max_revisions: 20 }
    }
}

/// Breakpoints used when compiling tablet and mobile segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsiveConfig {
    /// Tablet segment applies at or below this width in px (valid range: 320-4096).
    pub tablet_max_width: u32,
    /// Mobile segment applies at or below this width in px. Must be below the tablet width.
    pub mobile_max_width: u32,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            tablet_max_width: 1024,
            mobile_max_width: 767,
        }
    }
}

/// Token registry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokensConfig {
    /// Group assigned to tokens that arrive without one.
    pub default_group: String,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            default_group: "General".into(),
        }
    }
}
