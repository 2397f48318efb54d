//! `@property --name { ... }` blocks.
//!
//! Only `syntax`, `inherits`, and `initial-value` are meaningful inside a
//! property definition; each is checked against its own grammar.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::declarations::{sanitize_custom_property_value, split_declaration};
use crate::scanner::{split_top_level, strip_comments};

static PRELUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^@property\s+--[A-Za-z0-9_-]+$").unwrap());

/// Whether a (comment-free, trimmed) prelude introduces a property definition.
pub fn is_property_prelude(prelude: &str) -> bool {
    PRELUDE_RE.is_match(prelude)
}

/// `syntax` must be one quoted string with no quotes or control
/// characters inside.
fn valid_syntax(value: &str) -> bool {
    let mut chars = value.chars();
    let (Some(open), Some(close)) = (chars.next(), chars.next_back()) else {
        return false;
    };
    if !matches!(open, '\'' | '"') || open != close {
        return false;
    }
    chars.all(|c| !c.is_control() && c != '\'' && c != '"')
}

fn sanitize_field(property: &str, value: &str) -> Option<String> {
    match property.to_ascii_lowercase().as_str() {
        "syntax" => valid_syntax(value).then(|| value.to_string()),
        "inherits" => {
            let lower = value.to_ascii_lowercase();
            matches!(lower.as_str(), "true" | "false").then_some(lower)
        }
        "initial-value" => {
            let cleaned = sanitize_custom_property_value(value);
            (!cleaned.is_empty()).then_some(cleaned)
        }
        _ => None,
    }
}

/// Sanitize the body of an `@property` rule.
pub fn sanitize_property_block(body: &str) -> String {
    let body = strip_comments(body);
    split_top_level(&body, b';')
        .into_iter()
        .filter(|segment| !segment.trim().is_empty())
        .filter_map(|segment| {
            let raw = split_declaration(segment.trim())?;
            match sanitize_field(raw.property, raw.value) {
                Some(value) => Some(format!("{}:{}{value}", raw.property, raw.separator)),
                None => {
                    debug!(property = raw.property, "dropped @property descriptor");
                    None
                }
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
