//! Design-token registry, CSS revision history, and preset collections.
//!
//! Everything persists through [`stylekit_common::OptionStore`]; nothing
//! reaches the store without passing the CSS sanitizer first.

pub mod context;
pub mod keys;
pub mod normalize;
pub mod presets;
pub mod registry;
pub mod revisions;
pub mod service;
pub mod token;

pub use context::{sanitize_context, CURATED_CONTEXTS, DEFAULT_CONTEXT};
pub use normalize::{normalize_name, normalize_token, DEFAULT_GROUP};
pub use presets::{
    sanitize_avatar_glow_presets, sanitize_preset_collection, AvatarGlowPreset, Preset,
    PresetLibrary,
};
pub use registry::{
    convert_css_to_registry_detailed, merge_metadata, normalize_registry, tokens_to_css,
    DuplicateGroup, NormalizedRegistry, SaveOutcome, TokenRegistry,
};
pub use revisions::{
    CssRevisions, RestoreConflict, RestoreOutcome, Revision, RevisionContext, Segments,
    DEFAULT_MAX_REVISIONS, TOKENS_DUPLICATES,
};
pub use service::{compile_segments, ActiveCssRequest, Breakpoints, StyleService};
pub use token::{InputKind, MetadataPatch, RawToken, Token, TokenStatus, TokenType};
