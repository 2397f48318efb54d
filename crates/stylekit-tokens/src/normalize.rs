//! Field-level normalization of raw tokens.
//!
//! Every rule here drops bad input silently; callers learn about losses
//! only by comparing counts, so each drop is logged at `debug`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use stylekit_sanitizer::{sanitize_custom_property_value, strip_tags};

use crate::context::sanitize_context;
use crate::token::{RawToken, Token, TokenStatus, TokenType};

/// Group label applied when a token has none.
pub const DEFAULT_GROUP: &str = "General";

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+(?:[-+][0-9A-Za-z.-]+)?$").unwrap());

/// Force a `--` prefix and replace anything outside `[A-Za-z0-9_-]`
/// with `-`. Returns `None` when nothing usable remains.
pub fn normalize_name(raw: &str) -> Option<String> {
    let replaced: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let bare = replaced.trim_start_matches('-');
    if bare.is_empty() {
        None
    } else {
        Some(format!("--{bare}"))
    }
}

/// Lower-case and keep only `[a-z0-9_-]`.
pub fn sanitize_key(raw: &str) -> String {
    raw.chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// Single-line text: tags and control characters removed, whitespace
/// collapsed, trimmed.
pub fn sanitize_text_field(raw: &str) -> String {
    let stripped = strip_tags(raw);
    let cleaned: String = stripped
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Multi-line text: like [`sanitize_text_field`] but line breaks survive
/// (CRLF and lone CR become LF).
pub fn sanitize_textarea_field(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let stripped = strip_tags(&unified);
    let cleaned: String = stripped
        .chars()
        .filter(|c| *c == '\n' || *c == '\t' || !c.is_control())
        .collect();
    cleaned.trim().to_string()
}

/// Keep a semantic version (`1.2.3`, `1.2.3-beta.1`, `1.2.3+build`),
/// otherwise return an empty string.
pub fn sanitize_version(raw: &str) -> String {
    let trimmed = raw.trim();
    if VERSION_RE.is_match(trimmed) {
        trimmed.to_string()
    } else {
        if !trimmed.is_empty() {
            debug!(version = trimmed, "rejected malformed token version");
        }
        String::new()
    }
}

/// Absolute integer value of a number or numeric string, `0` otherwise.
pub fn sanitize_owner(raw: Option<&Value>) -> u64 {
    match raw {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_i64().map(i64::unsigned_abs))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.abs() as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .map(i64::unsigned_abs)
                .or_else(|_| s.parse::<f64>().map(|f| if f.is_finite() { f.abs() as u64 } else { 0 }))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Slug set from an array or a comma-separated string; deduplicated and
/// sorted.
pub fn sanitize_linked_components(raw: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match raw {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    items
        .iter()
        .map(|item| sanitize_key(item.trim()))
        .filter(|slug| !slug.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn value_text(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn normalize_value(raw: &str, token_type: TokenType) -> String {
    let text = if token_type.is_multiline() {
        sanitize_textarea_field(raw)
    } else {
        sanitize_text_field(raw)
    };
    sanitize_custom_property_value(&text)
}

/// Lower-cased `context|name` uniqueness key.
pub fn registry_key(context: &str, name: &str) -> String {
    format!("{}|{}", context.to_ascii_lowercase(), name.to_ascii_lowercase())
}

/// Normalize one raw token, or `None` if its name or value is unusable.
pub fn normalize_token(raw: &RawToken, default_group: &str) -> Option<Token> {
    let Some(name) = raw.name.as_deref().and_then(normalize_name) else {
        debug!(name = ?raw.name, "rejected token with empty or unusable name");
        return None;
    };

    let token_type = TokenType::parse(raw.token_type.as_deref().unwrap_or_default());
    let value = value_text(raw.value.as_ref())
        .map(|v| normalize_value(&v, token_type))
        .unwrap_or_default();
    if value.is_empty() {
        debug!(name = %name, "rejected token with empty value");
        return None;
    }

    let group = sanitize_text_field(raw.group.as_deref().unwrap_or_default());
    let group = if group.is_empty() {
        default_group.to_string()
    } else {
        group
    };

    Some(Token {
        name,
        value,
        token_type,
        description: sanitize_textarea_field(raw.description.as_deref().unwrap_or_default()),
        group,
        context: sanitize_context(raw.context.as_deref().unwrap_or_default()),
        status: TokenStatus::parse(raw.status.as_deref().unwrap_or_default()),
        owner: sanitize_owner(raw.owner.as_ref()),
        version: sanitize_version(raw.version.as_deref().unwrap_or_default()),
        changelog: sanitize_textarea_field(raw.changelog.as_deref().unwrap_or_default()),
        linked_components: sanitize_linked_components(raw.linked_components.as_ref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_normalization() {
        assert_eq!(normalize_name("my token!").as_deref(), Some("--my-token-"));
        assert_eq!(normalize_name("--Brand-Color").as_deref(), Some("--Brand-Color"));
        assert_eq!(normalize_name("  space_2 ").as_deref(), Some("--space_2"));
        assert_eq!(normalize_name("---x").as_deref(), Some("--x"));
        assert!(normalize_name("").is_none());
        assert!(normalize_name("--").is_none());
        assert!(normalize_name("!!").is_none());
    }

    #[test]
    fn version_shape() {
        assert_eq!(sanitize_version("1.2.3"), "1.2.3");
        assert_eq!(sanitize_version(" 2.0.0-beta.1 "), "2.0.0-beta.1");
        assert_eq!(sanitize_version("1.0.0+build.5"), "1.0.0+build.5");
        assert_eq!(sanitize_version("1.2"), "");
        assert_eq!(sanitize_version("v1.2.3"), "");
    }

    #[test]
    fn owner_is_absolute_integer() {
        assert_eq!(sanitize_owner(Some(&json!(7))), 7);
        assert_eq!(sanitize_owner(Some(&json!(-4))), 4);
        assert_eq!(sanitize_owner(Some(&json!("12"))), 12);
        assert_eq!(sanitize_owner(Some(&json!("abc"))), 0);
        assert_eq!(sanitize_owner(None), 0);
    }

    #[test]
    fn linked_components_are_sorted_slugs() {
        assert_eq!(
            sanitize_linked_components(Some(&json!(["Card", "button", "card", " "]))),
            vec!["button".to_string(), "card".to_string()]
        );
        assert_eq!(
            sanitize_linked_components(Some(&json!("nav, Hero Banner"))),
            vec!["herobanner".to_string(), "nav".to_string()]
        );
    }

    #[test]
    fn text_fields_collapse_whitespace() {
        assert_eq!(sanitize_text_field("  a \n\t b <b>c</b> "), "a b c");
        assert_eq!(sanitize_textarea_field("a\r\nb\rc  "), "a\nb\nc");
    }

    #[test]
    fn normalize_full_token() {
        let raw: RawToken = serde_json::from_value(json!({
            "name": "brand color",
            "value": "  #00d4ff ",
            "type": "COLOR",
            "group": "",
            "context": "[data-theme='dark']",
            "status": "nope",
            "owner": "-3",
            "version": "1.0",
            "linked_components": ["b", "a"]
        }))
        .unwrap();
        let token = normalize_token(&raw, DEFAULT_GROUP).unwrap();
        assert_eq!(token.name, "--brand-color");
        assert_eq!(token.value, "#00d4ff");
        assert_eq!(token.token_type, TokenType::Color);
        assert_eq!(token.group, "General");
        assert_eq!(token.context, "[data-theme=\"dark\"]");
        assert_eq!(token.status, TokenStatus::Draft);
        assert_eq!(token.owner, 3);
        assert_eq!(token.version, "");
        assert_eq!(token.linked_components, vec!["a", "b"]);
    }

    #[test]
    fn empty_value_rejects_token() {
        assert!(normalize_token(&RawToken::new("--a", "   "), DEFAULT_GROUP).is_none());
        assert!(normalize_token(&RawToken::new("--a", "<b></b>"), DEFAULT_GROUP).is_none());
        let mut raw = RawToken::new("--a", "");
        raw.value = None;
        assert!(normalize_token(&raw, DEFAULT_GROUP).is_none());
    }

    #[test]
    fn textarea_type_keeps_lines() {
        let raw = RawToken::new("--shadow", "0 1px 2px red,\r\n0 2px 4px blue").with_type("shadow");
        let token = normalize_token(&raw, DEFAULT_GROUP).unwrap();
        assert_eq!(token.value, "0 1px 2px red,\n0 2px 4px blue");

        let raw = RawToken::new("--pad", "1px\n2px");
        assert_eq!(normalize_token(&raw, DEFAULT_GROUP).unwrap().value, "1px 2px");
    }

    #[test]
    fn numeric_value_is_stringified() {
        let raw: RawToken = serde_json::from_value(json!({"name": "--z", "value": 10})).unwrap();
        assert_eq!(normalize_token(&raw, DEFAULT_GROUP).unwrap().value, "10");
    }

    #[test]
    fn unsafe_url_in_value_is_removed() {
        let raw = RawToken::new("--bg", "url(javascript:alert(1)) red");
        assert_eq!(normalize_token(&raw, DEFAULT_GROUP).unwrap().value, "red");
    }

    #[test]
    fn key_is_case_insensitive() {
        assert_eq!(registry_key(":ROOT", "--A"), registry_key(":root", "--a"));
    }
}
