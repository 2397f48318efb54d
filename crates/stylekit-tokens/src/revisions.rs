//! CSS revision history.
//!
//! One global list, most recent first, capped at a retention limit.
//! Revisions are immutable once recorded; restore writes their CSS back
//! to the option they came from.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use stylekit_common::{
    new_revision_id, utc_timestamp, AnonymousIdentity, CacheInvalidator, Event, EventBus,
    IdentityResolver, NoopInvalidator, OptionStore, StoreError,
};
use stylekit_sanitizer::sanitize;

use crate::keys;
use crate::registry::{merge_metadata, DuplicateGroup, TokenRegistry};
use crate::token::RawToken;

pub const DEFAULT_MAX_REVISIONS: usize = 20;

/// Error code carried by a restore refused for duplicate tokens.
pub const TOKENS_DUPLICATES: &str = "tokens_duplicates";

const ANONYMOUS_AUTHOR: &str = "anon";

/// Per-breakpoint source of the active stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Segments {
    pub desktop: String,
    pub tablet: String,
    pub mobile: String,
}

impl Segments {
    fn sanitized(&self) -> Segments {
        Segments {
            desktop: sanitize(&self.desktop),
            tablet: sanitize(&self.tablet),
            mobile: sanitize(&self.mobile),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub id: String,
    pub option: String,
    pub css: String,
    pub timestamp: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Segments>,
}

/// Caller-supplied details for a new revision.
#[derive(Debug, Clone, Default)]
pub struct RevisionContext {
    pub author: Option<String>,
    /// Kept only for revisions of the active stylesheet.
    pub segments: Option<Segments>,
}

impl RevisionContext {
    pub fn by(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            segments: None,
        }
    }
}

/// A tokens restore refused because the revision's CSS has duplicates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestoreConflict {
    pub error: String,
    pub duplicates: Vec<DuplicateGroup>,
    pub revision: Revision,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RestoreOutcome {
    Restored(Revision),
    Conflict(RestoreConflict),
}

#[derive(Clone)]
pub struct CssRevisions {
    store: Arc<dyn OptionStore>,
    tokens: TokenRegistry,
    identity: Arc<dyn IdentityResolver>,
    invalidator: Arc<dyn CacheInvalidator>,
    events: Option<Arc<EventBus>>,
    max_revisions: usize,
}

impl CssRevisions {
    pub fn new(store: Arc<dyn OptionStore>, tokens: TokenRegistry) -> Self {
        Self {
            store,
            tokens,
            identity: Arc::new(AnonymousIdentity),
            invalidator: Arc::new(NoopInvalidator),
            events: None,
            max_revisions: DEFAULT_MAX_REVISIONS,
        }
    }

    /// Retention cap; `0` means the default.
    pub fn with_max_revisions(mut self, max: usize) -> Self {
        self.max_revisions = max;
        self
    }

    /// Registry used when restoring tokens revisions.
    pub fn with_registry(mut self, tokens: TokenRegistry) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityResolver>) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_invalidator(mut self, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        self.invalidator = invalidator;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn max_revisions(&self) -> usize {
        if self.max_revisions == 0 {
            DEFAULT_MAX_REVISIONS
        } else {
            self.max_revisions
        }
    }

    fn resolve_author(&self, context: &RevisionContext) -> String {
        context
            .author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.identity
                    .current_author()
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
            })
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string())
    }

    fn load(&self) -> Vec<Revision> {
        let Some(Value::Array(items)) = self.store.get(keys::CSS_REVISIONS) else {
            return Vec::new();
        };
        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Revision>(item) {
                Ok(revision) => Some(revision),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable revision");
                    None
                }
            })
            .collect()
    }

    fn persist(&self, revisions: &[Revision]) -> Result<(), StoreError> {
        let value =
            serde_json::to_value(revisions).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.store.set(keys::CSS_REVISIONS, value)
    }

    /// Snapshot `css` for `option` and prepend it to the history.
    pub fn record(
        &self,
        option: &str,
        css: &str,
        context: &RevisionContext,
    ) -> Result<Revision, StoreError> {
        let segments = if option == keys::ACTIVE_CSS {
            context.segments.as_ref().map(Segments::sanitized)
        } else {
            None
        };
        let revision = Revision {
            id: new_revision_id(),
            option: option.to_string(),
            css: sanitize(css),
            timestamp: utc_timestamp(),
            author: self.resolve_author(context),
            segments,
        };

        let mut revisions = self.load();
        revisions.insert(0, revision.clone());
        let cap = self.max_revisions();
        if revisions.len() > cap {
            debug!(evicted = revisions.len() - cap, cap, "evicting old revisions");
            revisions.truncate(cap);
        }
        self.persist(&revisions)?;

        info!(option, id = %revision.id, author = %revision.author, "revision recorded");
        if let Some(events) = &self.events {
            events.publish(Event::RevisionRecorded {
                option: revision.option.clone(),
                id: revision.id.clone(),
            });
        }
        Ok(revision)
    }

    /// All revisions, most recent first, optionally for one option only.
    pub fn list(&self, option: Option<&str>) -> Vec<Revision> {
        let revisions = self.load();
        match option {
            Some(option) => revisions.into_iter().filter(|r| r.option == option).collect(),
            None => revisions,
        }
    }

    pub fn get(&self, id: &str) -> Option<Revision> {
        self.load().into_iter().find(|r| r.id == id)
    }

    /// Write a revision back to its option.
    ///
    /// `Ok(None)` when the id is unknown. A tokens revision whose CSS
    /// holds duplicate declarations is refused with a
    /// [`RestoreOutcome::Conflict`] and nothing is written.
    pub fn restore(&self, id: &str) -> Result<Option<RestoreOutcome>, StoreError> {
        let Some(revision) = self.get(id) else {
            debug!(id, "restore of unknown revision");
            return Ok(None);
        };

        let option = revision.option.clone();
        match option.as_str() {
            keys::TOKENS_CSS => {
                let converted = self.tokens.convert_css(&revision.css);
                if converted.has_duplicates() {
                    warn!(id, "tokens revision has duplicates, restore refused");
                    return Ok(Some(RestoreOutcome::Conflict(RestoreConflict {
                        error: TOKENS_DUPLICATES.to_string(),
                        duplicates: converted.duplicates,
                        revision,
                    })));
                }
                let merged = merge_metadata(converted.tokens, &self.tokens.get_registry());
                let raw: Vec<RawToken> = merged.iter().map(RawToken::from).collect();
                let outcome = self.tokens.save_registry(&raw)?;
                if !outcome.is_saved() {
                    return Ok(Some(RestoreOutcome::Conflict(RestoreConflict {
                        error: TOKENS_DUPLICATES.to_string(),
                        duplicates: outcome.duplicates,
                        revision,
                    })));
                }
            }
            keys::ACTIVE_CSS => {
                self.store
                    .set(keys::ACTIVE_CSS, Value::String(revision.css.clone()))?;
                let segments = revision.segments.clone().unwrap_or_else(|| Segments {
                    desktop: revision.css.clone(),
                    ..Segments::default()
                });
                self.store
                    .set(keys::CSS_DESKTOP, Value::String(segments.desktop))?;
                self.store
                    .set(keys::CSS_TABLET, Value::String(segments.tablet))?;
                self.store
                    .set(keys::CSS_MOBILE, Value::String(segments.mobile))?;
            }
            option => {
                self.store.set(option, Value::String(revision.css.clone()))?;
            }
        }

        self.invalidator.invalidate();
        info!(id, option = %option, "revision restored");
        if let Some(events) = &self.events {
            events.publish(Event::RevisionRestored {
                option,
                id: revision.id.clone(),
            });
        }
        Ok(Some(RestoreOutcome::Restored(revision)))
    }
}

impl std::fmt::Debug for CssRevisions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CssRevisions")
            .field("max_revisions", &self.max_revisions())
            .finish()
    }
}
