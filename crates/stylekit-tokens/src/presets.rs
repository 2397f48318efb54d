//! Preset collections: named bags of CSS properties, and avatar-glow
//! presets with a few typed fields on top.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use stylekit_common::{CacheInvalidator, NoopInvalidator, OptionStore, StoreError, StyleKitError};
use stylekit_sanitizer::{sanitize_declaration, sanitize_hex_color, sanitize_url, strip_tags};

use crate::keys;
use crate::normalize::{sanitize_key, sanitize_text_field};

pub const DEFAULT_GLOW_SPEED: f64 = 4.0;
pub const DEFAULT_GLOW_THICKNESS: f64 = 3.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub scope: String,
    pub props: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarGlowPreset {
    pub name: String,
    pub scope: String,
    pub props: BTreeMap<String, String>,
    pub color1: String,
    pub color2: String,
    pub speed: f64,
    pub thickness: f64,
    pub avatar_url: String,
}

pub type PresetCollection = BTreeMap<String, Preset>;
pub type AvatarGlowCollection = BTreeMap<String, AvatarGlowPreset>;

/// A selector scope: tags and control characters removed, trimmed.
pub fn sanitize_scope(raw: &str) -> String {
    strip_tags(raw)
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field_text(fields: &Map<String, Value>, key: &str) -> String {
    fields.get(key).and_then(scalar_text).unwrap_or_default()
}

fn sanitize_props(raw: Option<&Value>) -> BTreeMap<String, String> {
    let Some(Value::Object(props)) = raw else {
        return BTreeMap::new();
    };
    props
        .iter()
        .filter_map(|(property, value)| {
            let value = scalar_text(value)?;
            let cleaned = sanitize_declaration(property, &value);
            if cleaned.is_none() {
                debug!(property = %property, "dropped preset property");
            }
            cleaned
        })
        .collect()
}

fn sanitize_preset(id: &str, fields: &Map<String, Value>) -> Preset {
    let name = sanitize_text_field(&field_text(fields, "name"));
    Preset {
        name: if name.is_empty() { id.to_string() } else { name },
        scope: sanitize_scope(&field_text(fields, "scope")),
        props: sanitize_props(fields.get("props")),
    }
}

/// Preset entries as `(id, fields)`, with ids reduced to slugs and
/// non-object entries skipped.
fn preset_entries(presets: &Value) -> Vec<(String, &Map<String, Value>)> {
    let Value::Object(entries) = presets else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|(id, fields)| {
            let slug = sanitize_key(id);
            match (slug.is_empty(), fields) {
                (false, Value::Object(fields)) => Some((slug, fields)),
                _ => {
                    debug!(id = %id, "dropped preset with bad id or shape");
                    None
                }
            }
        })
        .collect()
}

/// Sanitize an `{id: {name, scope, props}}` collection.
pub fn sanitize_preset_collection(presets: &Value) -> PresetCollection {
    preset_entries(presets)
        .into_iter()
        .map(|(id, fields)| {
            let preset = sanitize_preset(&id, fields);
            (id, preset)
        })
        .collect()
}

/// A hex colour, or the text-sanitized input when it is not one.
fn sanitize_color(raw: &str) -> String {
    sanitize_hex_color(raw).unwrap_or_else(|| sanitize_text_field(raw))
}

fn non_negative(raw: Option<&Value>, default: f64) -> f64 {
    let parsed = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => v.max(0.0),
        _ => default,
    }
}

/// Sanitize avatar-glow presets: the generic preset fields plus colours,
/// animation speed, ring thickness, and an avatar image URL.
pub fn sanitize_avatar_glow_presets(presets: &Value) -> AvatarGlowCollection {
    preset_entries(presets)
        .into_iter()
        .map(|(id, fields)| {
            let base = sanitize_preset(&id, fields);
            let avatar_url = fields
                .get("avatar_url")
                .or_else(|| fields.get("avatarUrl"))
                .and_then(scalar_text)
                .and_then(|url| sanitize_url(&url))
                .unwrap_or_default();
            let preset = AvatarGlowPreset {
                name: base.name,
                scope: base.scope,
                props: base.props,
                color1: sanitize_color(&field_text(fields, "color1")),
                color2: sanitize_color(&field_text(fields, "color2")),
                speed: non_negative(fields.get("speed"), DEFAULT_GLOW_SPEED),
                thickness: non_negative(fields.get("thickness"), DEFAULT_GLOW_THICKNESS),
                avatar_url,
            };
            (id, preset)
        })
        .collect()
}

/// Stored preset collections.
#[derive(Clone)]
pub struct PresetLibrary {
    store: Arc<dyn OptionStore>,
    invalidator: Arc<dyn CacheInvalidator>,
}

impl PresetLibrary {
    pub fn new(store: Arc<dyn OptionStore>) -> Self {
        Self {
            store,
            invalidator: Arc::new(NoopInvalidator),
        }
    }

    pub fn with_invalidator(mut self, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        self.invalidator = invalidator;
        self
    }

    fn write<T: Serialize>(&self, key: &str, collection: &T) -> Result<(), StoreError> {
        let value =
            serde_json::to_value(collection).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.store.set(key, value)?;
        self.invalidator.invalidate();
        Ok(())
    }

    pub fn presets(&self) -> PresetCollection {
        self.store
            .get(keys::PRESETS)
            .map(|stored| sanitize_preset_collection(&stored))
            .unwrap_or_default()
    }

    /// Sanitize and store a whole collection, replacing what was there.
    pub fn save_presets(&self, presets: &Value) -> Result<PresetCollection, StoreError> {
        let clean = sanitize_preset_collection(presets);
        self.write(keys::PRESETS, &clean)?;
        info!(count = clean.len(), "presets saved");
        Ok(clean)
    }

    /// Remove one preset; `false` when it did not exist.
    pub fn delete_preset(&self, id: &str) -> Result<bool, StoreError> {
        let mut presets = self.presets();
        if presets.remove(&sanitize_key(id)).is_none() {
            return Ok(false);
        }
        self.write(keys::PRESETS, &presets)?;
        Ok(true)
    }

    pub fn avatar_glow_presets(&self) -> AvatarGlowCollection {
        self.store
            .get(keys::AVATAR_GLOW_PRESETS)
            .map(|stored| sanitize_avatar_glow_presets(&stored))
            .unwrap_or_default()
    }

    pub fn save_avatar_glow_presets(
        &self,
        presets: &Value,
    ) -> Result<AvatarGlowCollection, StoreError> {
        let clean = sanitize_avatar_glow_presets(presets);
        self.write(keys::AVATAR_GLOW_PRESETS, &clean)?;
        info!(count = clean.len(), "avatar glow presets saved");
        Ok(clean)
    }

    pub fn delete_avatar_glow_preset(&self, id: &str) -> Result<bool, StoreError> {
        let mut presets = self.avatar_glow_presets();
        if presets.remove(&sanitize_key(id)).is_none() {
            return Ok(false);
        }
        self.write(keys::AVATAR_GLOW_PRESETS, &presets)?;
        Ok(true)
    }

    /// Merge presets from a YAML document into the stored collection.
    /// Entries with an existing id replace it.
    pub fn import_yaml(&self, text: &str) -> Result<PresetCollection, StyleKitError> {
        let parsed: Value =
            serde_yaml::from_str(text).map_err(|e| StyleKitError::PresetParse(e.to_string()))?;
        let incoming = sanitize_preset_collection(&parsed);
        let mut presets = self.presets();
        let count = incoming.len();
        presets.extend(incoming);
        self.write(keys::PRESETS, &presets)?;
        info!(imported = count, total = presets.len(), "presets imported");
        Ok(presets)
    }
}

impl std::fmt::Debug for PresetLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetLibrary").finish_non_exhaustive()
    }
}
