//! Option store keys.

/// Structured token registry (JSON array of tokens).
pub const TOKENS_REGISTRY: &str = "stylekit_tokens_registry";
/// Denormalized token CSS; also read as the legacy flat token source.
pub const TOKENS_CSS: &str = "stylekit_tokens_css";
/// Compiled stylesheet for the site.
pub const ACTIVE_CSS: &str = "stylekit_active_css";
pub const CSS_DESKTOP: &str = "stylekit_css_desktop";
pub const CSS_TABLET: &str = "stylekit_css_tablet";
pub const CSS_MOBILE: &str = "stylekit_css_mobile";
pub const CSS_REVISIONS: &str = "stylekit_css_revisions";
pub const PRESETS: &str = "stylekit_presets";
pub const AVATAR_GLOW_PRESETS: &str = "stylekit_avatar_glow_presets";
