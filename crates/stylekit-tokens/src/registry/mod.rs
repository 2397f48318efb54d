//! Token registry: structured tokens backed by the option store, with a
//! denormalized CSS cache.

mod convert;
mod duplicates;
mod emit;
mod merge;

pub use convert::{convert_css_to_registry_detailed, extract_declarations, infer_type};
pub use duplicates::{normalize_registry, Conflict, DuplicateGroup, NormalizedRegistry};
pub use emit::{tokens_to_css, EMPTY_TOKENS_CSS};
pub use merge::merge_metadata;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use stylekit_common::{CacheInvalidator, Event, EventBus, NoopInvalidator, OptionStore, StoreError};

use crate::context::sanitize_context;
use crate::keys;
use crate::normalize::{normalize_name, registry_key, DEFAULT_GROUP};
use crate::token::{MetadataPatch, RawToken, Token, TokenStatus};

/// Result of a save attempt. A non-empty `duplicates` list means nothing
/// was written.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveOutcome {
    pub tokens: Vec<Token>,
    pub duplicates: Vec<DuplicateGroup>,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        self.duplicates.is_empty()
    }
}

impl From<NormalizedRegistry> for SaveOutcome {
    fn from(registry: NormalizedRegistry) -> Self {
        Self {
            tokens: registry.tokens,
            duplicates: registry.duplicates,
        }
    }
}

/// Tokens seeded into an empty store.
pub fn default_tokens() -> Vec<RawToken> {
    vec![
        RawToken {
            group: Some("Brand".into()),
            description: Some("Primary brand colour".into()),
            ..RawToken::new("--sk-color-primary", "#2271b1").with_type("color")
        },
        RawToken {
            group: Some("Spacing".into()),
            description: Some("Base spacing unit".into()),
            ..RawToken::new("--sk-space-base", "16px").with_type("spacing")
        },
    ]
}

/// Names of the fields that differ between two versions of a token.
pub fn changed_fields(before: &Token, after: &Token) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if before.value != after.value {
        fields.push("value");
    }
    if before.token_type != after.token_type {
        fields.push("type");
    }
    if before.description != after.description {
        fields.push("description");
    }
    if before.group != after.group {
        fields.push("group");
    }
    if before.context != after.context {
        fields.push("context");
    }
    if before.status != after.status {
        fields.push("status");
    }
    if before.owner != after.owner {
        fields.push("owner");
    }
    if before.version != after.version {
        fields.push("version");
    }
    if before.changelog != after.changelog {
        fields.push("changelog");
    }
    if before.linked_components != after.linked_components {
        fields.push("linked_components");
    }
    fields
}

fn to_store_value(tokens: &[Token]) -> Result<Value, StoreError> {
    serde_json::to_value(tokens).map_err(|e| StoreError::Serialize(e.to_string()))
}

/// Parse a stored registry array, skipping entries that are not objects.
fn raw_tokens_from(value: &Value) -> Vec<RawToken> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<RawToken>(item.clone()) {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!(error = %e, "skipping unreadable stored token");
                None
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct TokenRegistry {
    store: Arc<dyn OptionStore>,
    invalidator: Arc<dyn CacheInvalidator>,
    events: Option<Arc<EventBus>>,
    default_group: String,
}

impl TokenRegistry {
    pub fn new(store: Arc<dyn OptionStore>) -> Self {
        Self {
            store,
            invalidator: Arc::new(NoopInvalidator),
            events: None,
            default_group: DEFAULT_GROUP.to_string(),
        }
    }

    pub fn with_invalidator(mut self, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        self.invalidator = invalidator;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_default_group(mut self, group: impl Into<String>) -> Self {
        let group = group.into();
        if !group.trim().is_empty() {
            self.default_group = group;
        }
        self
    }

    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    pub fn normalize(&self, raw: &[RawToken]) -> NormalizedRegistry {
        normalize_registry(raw, &self.default_group)
    }

    pub fn convert_css(&self, css: &str) -> NormalizedRegistry {
        convert_css_to_registry_detailed(css, &self.default_group)
    }

    /// Current registry.
    ///
    /// Reads the structured registry if one is stored, else adopts tokens
    /// parsed from the legacy CSS option, else seeds the defaults.
    /// Normalization fixes and a stale CSS cache are written back only
    /// when the registry has no duplicates. Write failures are logged and
    /// the tokens are still returned.
    pub fn get_registry(&self) -> Vec<Token> {
        if let Some(stored) = self.store.get(keys::TOKENS_REGISTRY) {
            // An empty array is a registry whose tokens were all deleted.
            if stored.is_array() {
                let normalized = self.normalize(&raw_tokens_from(&stored));
                if !normalized.has_duplicates() {
                    self.refresh_if_stale(&stored, &normalized.tokens);
                }
                return normalized.tokens;
            }
        }

        if let Some(legacy) = self.store.get_string(keys::TOKENS_CSS) {
            if !legacy.trim().is_empty() {
                let converted = self.convert_css(&legacy);
                if !converted.tokens.is_empty() {
                    info!(count = converted.tokens.len(), "adopting tokens from legacy css");
                    if !converted.has_duplicates() {
                        self.persist_quietly(&converted.tokens);
                    }
                    return converted.tokens;
                }
            }
        }

        info!("seeding default token registry");
        let seeded = self.normalize(&default_tokens()).tokens;
        self.persist_quietly(&seeded);
        seeded
    }

    fn refresh_if_stale(&self, stored: &Value, tokens: &[Token]) {
        match to_store_value(tokens) {
            Ok(value) if value != *stored => {
                debug!("persisting token normalization fixes");
                if let Err(e) = self.store.set(keys::TOKENS_REGISTRY, value) {
                    warn!(error = %e, "failed to persist normalized registry");
                }
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to serialize registry"),
        }

        let css = tokens_to_css(tokens);
        if self.store.get_string(keys::TOKENS_CSS).as_deref() != Some(css.as_str()) {
            debug!("regenerating stale token css cache");
            if let Err(e) = self.store.set(keys::TOKENS_CSS, Value::String(css)) {
                warn!(error = %e, "failed to persist token css cache");
            }
        }
    }

    fn persist_quietly(&self, tokens: &[Token]) {
        if let Err(e) = self.persist(tokens) {
            warn!(error = %e, "failed to persist token registry");
        }
    }

    fn persist(&self, tokens: &[Token]) -> Result<(), StoreError> {
        self.store.set(keys::TOKENS_REGISTRY, to_store_value(tokens)?)?;
        self.store
            .set(keys::TOKENS_CSS, Value::String(tokens_to_css(tokens)))
    }

    /// Last saved tokens, read straight from the store without fallbacks
    /// or write-back.
    fn stored_tokens(&self) -> Vec<Token> {
        self.store
            .get(keys::TOKENS_REGISTRY)
            .map(|stored| self.normalize(&raw_tokens_from(&stored)).tokens)
            .unwrap_or_default()
    }

    /// Normalize and save a complete registry.
    ///
    /// When duplicates are found nothing is written and the outcome
    /// carries the duplicate report. Otherwise the registry and its CSS
    /// are stored, the cache hook fires, and change events go out.
    pub fn save_registry(&self, raw: &[RawToken]) -> Result<SaveOutcome, StoreError> {
        let normalized = self.normalize(raw);
        if normalized.has_duplicates() {
            warn!(
                groups = normalized.duplicates.len(),
                "token save aborted because of duplicates"
            );
            return Ok(normalized.into());
        }

        let previous = self.stored_tokens();
        self.persist(&normalized.tokens)?;
        self.invalidator.invalidate();
        self.publish_changes(&previous, &normalized.tokens);
        info!(count = normalized.tokens.len(), "token registry saved");
        Ok(normalized.into())
    }

    /// Save already-normalized tokens.
    pub fn save_tokens(&self, tokens: &[Token]) -> Result<SaveOutcome, StoreError> {
        let raw: Vec<RawToken> = tokens.iter().map(RawToken::from).collect();
        self.save_registry(&raw)
    }

    fn publish_changes(&self, previous: &[Token], current: &[Token]) {
        let Some(events) = &self.events else {
            return;
        };

        let before: HashMap<String, &Token> = previous
            .iter()
            .map(|t| (registry_key(&t.context, &t.name), t))
            .collect();
        let mut seen = Vec::with_capacity(current.len());

        for token in current {
            let key = registry_key(&token.context, &token.name);
            match before.get(&key) {
                None => {
                    events.publish(Event::TokenCreated {
                        name: token.name.clone(),
                        context: token.context.clone(),
                    });
                }
                Some(old) => {
                    let fields = changed_fields(old, token);
                    if !fields.is_empty() {
                        events.publish(Event::TokenUpdated {
                            name: token.name.clone(),
                            context: token.context.clone(),
                            fields: fields.into_iter().map(str::to_string).collect(),
                        });
                    }
                    if old.status != TokenStatus::Deprecated
                        && token.status == TokenStatus::Deprecated
                    {
                        events.publish(Event::TokenDeprecated {
                            name: token.name.clone(),
                            context: token.context.clone(),
                        });
                    }
                }
            }
            seen.push(key);
        }

        for (key, old) in &before {
            if !seen.contains(key) {
                events.publish(Event::TokenDeleted {
                    name: old.name.clone(),
                    context: old.context.clone(),
                });
            }
        }
    }

    /// Apply a governance patch to one token and save the registry.
    ///
    /// Returns the updated token, or `None` when no token matches or the
    /// save is rejected for duplicates.
    pub fn update_token_metadata(
        &self,
        name: &str,
        context: &str,
        patch: &MetadataPatch,
    ) -> Result<Option<Token>, StoreError> {
        let Some(name) = normalize_name(name) else {
            return Ok(None);
        };
        let key = registry_key(&sanitize_context(context), &name);

        let tokens = self.get_registry();
        if !tokens
            .iter()
            .any(|t| registry_key(&t.context, &t.name) == key)
        {
            debug!(name = %name, "metadata update for unknown token");
            return Ok(None);
        }

        let raw: Vec<RawToken> = tokens
            .iter()
            .map(|t| {
                let mut raw = RawToken::from(t);
                if registry_key(&t.context, &t.name) == key {
                    raw.apply_patch(patch);
                }
                raw
            })
            .collect();

        let outcome = self.save_registry(&raw)?;
        if !outcome.is_saved() {
            return Ok(None);
        }
        Ok(outcome
            .tokens
            .into_iter()
            .find(|t| registry_key(&t.context, &t.name) == key))
    }
}

impl std::fmt::Debug for TokenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRegistry")
            .field("default_group", &self.default_group)
            .field("events", &self.events.is_some())
            .finish()
    }
}
