//! Facade tying registry saves, active-stylesheet compilation, and
//! presets to the revision history.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use stylekit_common::{
    CacheInvalidator, EventBus, IdentityResolver, NoopInvalidator, OptionStore, StoreError,
};
use stylekit_config::StyleKitConfig;
use stylekit_sanitizer::sanitize;

use crate::keys;
use crate::presets::PresetLibrary;
use crate::registry::{merge_metadata, tokens_to_css, SaveOutcome, TokenRegistry};
use crate::revisions::{CssRevisions, RevisionContext, Segments};
use crate::token::RawToken;

/// Request to save the active stylesheet. `css` is the desktop segment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActiveCssRequest {
    pub css: String,
    pub tablet: Option<String>,
    pub mobile: Option<String>,
    /// Append `css` to the stored desktop segment instead of replacing it.
    pub append: bool,
}

/// Breakpoints used when compiling segments, in px.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakpoints {
    pub tablet_max_width: u32,
    pub mobile_max_width: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            tablet_max_width: 1024,
            mobile_max_width: 767,
        }
    }
}

/// Join the three segments into one stylesheet, wrapping tablet and
/// mobile rules in `max-width` media queries, and sanitize the result.
pub fn compile_segments(segments: &Segments, breakpoints: Breakpoints) -> String {
    let mut parts = Vec::new();
    if !segments.desktop.trim().is_empty() {
        parts.push(segments.desktop.trim().to_string());
    }
    for (css, width) in [
        (&segments.tablet, breakpoints.tablet_max_width),
        (&segments.mobile, breakpoints.mobile_max_width),
    ] {
        if !css.trim().is_empty() {
            parts.push(format!("@media (max-width: {width}px) {{\n{}\n}}", css.trim()));
        }
    }
    sanitize(&parts.join("\n\n"))
}

#[derive(Clone)]
pub struct StyleService {
    store: Arc<dyn OptionStore>,
    tokens: TokenRegistry,
    revisions: CssRevisions,
    presets: PresetLibrary,
    invalidator: Arc<dyn CacheInvalidator>,
    breakpoints: Breakpoints,
}

impl StyleService {
    pub fn new(store: Arc<dyn OptionStore>) -> Self {
        let tokens = TokenRegistry::new(store.clone());
        Self {
            revisions: CssRevisions::new(store.clone(), tokens.clone()),
            presets: PresetLibrary::new(store.clone()),
            tokens,
            store,
            invalidator: Arc::new(NoopInvalidator),
            breakpoints: Breakpoints::default(),
        }
    }

    /// Service configured from the `[revisions]`, `[responsive]`, and
    /// `[tokens]` sections.
    pub fn from_config(store: Arc<dyn OptionStore>, config: &StyleKitConfig) -> Self {
        let mut service = Self::new(store);
        service.tokens = service
            .tokens
            .with_default_group(config.tokens.default_group.clone());
        service.revisions = CssRevisions::new(service.store.clone(), service.tokens.clone())
            .with_max_revisions(config.revisions.max_revisions);
        service.breakpoints = Breakpoints {
            tablet_max_width: config.responsive.tablet_max_width,
            mobile_max_width: config.responsive.mobile_max_width,
        };
        service
    }

    pub fn with_invalidator(mut self, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        self.tokens = self.tokens.with_invalidator(invalidator.clone());
        self.revisions = self.revisions.with_invalidator(invalidator.clone());
        self.presets = self.presets.with_invalidator(invalidator.clone());
        self.invalidator = invalidator;
        self.rewire_revisions()
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.tokens = self.tokens.with_events(events.clone());
        self.revisions = self.revisions.with_events(events);
        self.rewire_revisions()
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityResolver>) -> Self {
        self.revisions = self.revisions.with_identity(identity);
        self
    }

    /// Revisions hold their own registry handle; keep it in step with
    /// the service's after the registry changes.
    fn rewire_revisions(mut self) -> Self {
        self.revisions = self.revisions.with_registry(self.tokens.clone());
        self
    }

    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }

    pub fn revisions(&self) -> &CssRevisions {
        &self.revisions
    }

    pub fn presets(&self) -> &PresetLibrary {
        &self.presets
    }

    pub fn breakpoints(&self) -> Breakpoints {
        self.breakpoints
    }

    /// Save a token registry and, if it was written, record a tokens
    /// revision of the generated CSS.
    pub fn save_tokens(
        &self,
        raw: &[RawToken],
        context: &RevisionContext,
    ) -> Result<SaveOutcome, StoreError> {
        let outcome = self.tokens.save_registry(raw)?;
        if outcome.is_saved() {
            self.revisions
                .record(keys::TOKENS_CSS, &tokens_to_css(&outcome.tokens), context)?;
        }
        Ok(outcome)
    }

    /// Import tokens from CSS text, keeping curated metadata of tokens
    /// that already exist.
    pub fn import_tokens_css(
        &self,
        css: &str,
        context: &RevisionContext,
    ) -> Result<SaveOutcome, StoreError> {
        let converted = self.tokens.convert_css(css);
        if converted.has_duplicates() {
            return Ok(converted.into());
        }
        let merged = merge_metadata(converted.tokens, &self.tokens.get_registry());
        debug!(count = merged.len(), "importing tokens from css");
        let raw: Vec<RawToken> = merged.iter().map(RawToken::from).collect();
        self.save_tokens(&raw, context)
    }

    fn stored_string(&self, key: &str) -> String {
        self.store.get_string(key).unwrap_or_default()
    }

    /// Sanitize and store the responsive segments, compile them into the
    /// active stylesheet, and record a revision. Returns the compiled CSS.
    pub fn save_active_css(
        &self,
        request: &ActiveCssRequest,
        context: &RevisionContext,
    ) -> Result<String, StoreError> {
        let desktop = if request.append {
            let existing = self.stored_string(keys::CSS_DESKTOP);
            sanitize(&format!("{}\n{}", existing, request.css))
        } else {
            sanitize(&request.css)
        };
        let segments = Segments {
            desktop,
            tablet: request
                .tablet
                .as_deref()
                .map(sanitize)
                .unwrap_or_else(|| self.stored_string(keys::CSS_TABLET)),
            mobile: request
                .mobile
                .as_deref()
                .map(sanitize)
                .unwrap_or_else(|| self.stored_string(keys::CSS_MOBILE)),
        };
        let compiled = compile_segments(&segments, self.breakpoints);

        self.store
            .set(keys::CSS_DESKTOP, Value::String(segments.desktop.clone()))?;
        self.store
            .set(keys::CSS_TABLET, Value::String(segments.tablet.clone()))?;
        self.store
            .set(keys::CSS_MOBILE, Value::String(segments.mobile.clone()))?;
        self.store
            .set(keys::ACTIVE_CSS, Value::String(compiled.clone()))?;

        let context = RevisionContext {
            author: context.author.clone(),
            segments: Some(segments),
        };
        self.revisions.record(keys::ACTIVE_CSS, &compiled, &context)?;
        self.invalidator.invalidate();
        info!(bytes = compiled.len(), append = request.append, "active css saved");
        Ok(compiled)
    }
}

impl std::fmt::Debug for StyleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleService")
            .field("tokens", &self.tokens)
            .field("revisions", &self.revisions)
            .field("breakpoints", &self.breakpoints)
            .finish()
    }
}
