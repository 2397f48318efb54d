//! Host integration points the core calls out to.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Notified after any successful mutation so a downstream CSS delivery
/// layer can drop its cached output.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self);
}

/// Resolves a human-readable author for revision records.
pub trait IdentityResolver: Send + Sync {
    /// Best-effort author string; `None` or empty when nobody is known.
    fn current_author(&self) -> Option<String>;
}

/// Invalidator that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInvalidator;

impl CacheInvalidator for NoopInvalidator {
    fn invalidate(&self) {}
}

/// Invalidator that counts notifications. Useful for embedding and tests.
#[derive(Debug, Default)]
pub struct CountingInvalidator {
    count: AtomicUsize,
}

impl CountingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl CacheInvalidator for CountingInvalidator {
    fn invalidate(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("css cache invalidated");
    }
}

/// Identity resolver that never knows anyone.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnonymousIdentity;

impl IdentityResolver for AnonymousIdentity {
    fn current_author(&self) -> Option<String> {
        None
    }
}

/// Identity resolver that always returns the same author.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub String);

impl IdentityResolver for FixedIdentity {
    fn current_author(&self) -> Option<String> {
        Some(self.0.clone())
    }
}
