use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::normalize::{normalize_token, registry_key};
use crate::token::{RawToken, Token};

/// One entry taking part in a name collision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub name: String,
    pub value: String,
    pub context: String,
}

impl From<&Token> for Conflict {
    fn from(token: &Token) -> Self {
        Self {
            name: token.name.clone(),
            value: token.value.clone(),
            context: token.context.clone(),
        }
    }
}

/// All entries sharing one `(context, name)` key, case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub key: String,
    /// Spelling of the first entry seen.
    pub canonical: String,
    pub context: String,
    /// Distinct name spellings, first-seen order.
    pub variants: Vec<String>,
    /// Every colliding entry, the canonical one first.
    pub conflicts: Vec<Conflict>,
}

/// Deduplicated tokens plus the collisions found on the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRegistry {
    pub tokens: Vec<Token>,
    pub duplicates: Vec<DuplicateGroup>,
}

impl NormalizedRegistry {
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

/// Normalize every raw token and collapse `(context, name)` collisions.
///
/// The first occurrence of a key is kept; later ones are reported in that
/// key's [`DuplicateGroup`]. Unusable tokens are dropped.
pub fn normalize_registry(raw: &[RawToken], default_group: &str) -> NormalizedRegistry {
    let mut tokens: Vec<Token> = Vec::with_capacity(raw.len());
    let mut duplicates: Vec<DuplicateGroup> = Vec::new();
    let mut canonical_at: HashMap<String, usize> = HashMap::new();
    let mut group_at: HashMap<String, usize> = HashMap::new();

    for token in raw.iter().filter_map(|r| normalize_token(r, default_group)) {
        let key = registry_key(&token.context, &token.name);
        let Some(&index) = canonical_at.get(&key) else {
            canonical_at.insert(key, tokens.len());
            tokens.push(token);
            continue;
        };

        let slot = *group_at.entry(key.clone()).or_insert_with(|| {
            let canonical = &tokens[index];
            duplicates.push(DuplicateGroup {
                key: key.clone(),
                canonical: canonical.name.clone(),
                context: canonical.context.clone(),
                variants: vec![canonical.name.clone()],
                conflicts: vec![Conflict::from(canonical)],
            });
            duplicates.len() - 1
        });

        let group = &mut duplicates[slot];
        if !group.variants.contains(&token.name) {
            group.variants.push(token.name.clone());
        }
        group.conflicts.push(Conflict::from(&token));
    }

    for group in &duplicates {
        warn!(
            canonical = %group.canonical,
            context = %group.context,
            entries = group.conflicts.len(),
            "duplicate token name in context"
        );
    }

    NormalizedRegistry { tokens, duplicates }
}
