//! Declaration-level sanitization: property allow-list and value
//! scrubbing for flat `prop: value` lists.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::html::strip_tags;
use crate::properties::is_allowed_property;
use crate::scanner::{split_top_level, strip_comments};
use crate::url::sanitize_urls;

static PROPERTY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(--[A-Za-z0-9_-]+|[A-Za-z-][A-Za-z0-9_-]*)$").unwrap());

static CUSTOM_VECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)behaviou?r\s*:").unwrap());

static STANDARD_VECTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:behaviou?r|-moz-binding)\s*:").unwrap());

/// A declaration split at its first colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawDeclaration<'a> {
    pub property: &'a str,
    /// `" "` when the source had whitespace after the colon, else `""`.
    pub separator: &'static str,
    pub value: &'a str,
}

pub(crate) fn split_declaration(segment: &str) -> Option<RawDeclaration<'_>> {
    let colon = segment.find(':')?;
    let raw_value = &segment[colon + 1..];
    let separator = if raw_value.starts_with(|c: char| c.is_whitespace()) {
        " "
    } else {
        ""
    };
    Some(RawDeclaration {
        property: segment[..colon].trim(),
        separator,
        value: raw_value.trim(),
    })
}

pub fn is_valid_property_name(name: &str) -> bool {
    PROPERTY_NAME_RE.is_match(name)
}

pub fn is_custom_property(name: &str) -> bool {
    name.starts_with("--")
}

fn has_control_chars(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
}

/// Remove every `expression(...)` call, nested parentheses included.
pub fn strip_expressions(value: &str) -> String {
    let mut current = value.to_string();
    loop {
        let next = strip_expressions_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn strip_expressions_once(value: &str) -> String {
    let lower = value.to_ascii_lowercase();
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find("expression") {
        let start = cursor + found;
        let mut pos = start + "expression".len();
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if bytes.get(pos) != Some(&b'(') {
            out.push_str(&value[cursor..pos]);
            cursor = pos;
            continue;
        }

        out.push_str(&value[cursor..start]);
        let mut depth = 0usize;
        let mut end = bytes.len();
        for (offset, &byte) in bytes.iter().enumerate().skip(pos) {
            match byte {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        end = offset + 1;
                        break;
                    }
                }
                _ => {}
            }
        }
        cursor = end;
    }

    out.push_str(&value[cursor..]);
    out
}

fn strip_pattern(re: &Regex, value: &str) -> String {
    let mut current = value.to_string();
    loop {
        let next = re.replace_all(&current, "").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Cleaning passes before a value is given up on as never settling.
const MAX_SCRUB_PASSES: usize = 16;

/// Run `pass` until the value stops changing. Removing one fragment can
/// splice its neighbours into a new one (`uexpression()rl(` becomes
/// `url(`), so a single pass is not enough. `None` when it never settles.
fn scrub_until_stable(value: &str, pass: impl Fn(&str) -> String) -> Option<String> {
    let mut current = value.to_string();
    for _ in 0..MAX_SCRUB_PASSES {
        let next = pass(&current);
        if next == current {
            return Some(next);
        }
        current = next;
    }
    debug!("value did not settle under cleaning, dropping it");
    None
}

/// Value pipeline for `--custom` properties: tags, `expression()`,
/// `behavior:` and unsafe `url()`s are removed. Returns an empty string
/// when nothing survives.
pub fn sanitize_custom_property_value(value: &str) -> String {
    scrub_until_stable(value, |v| {
        let v = strip_tags(v);
        let v = strip_expressions(&v);
        let v = strip_pattern(&CUSTOM_VECTOR_RE, &v);
        sanitize_urls(&v)
    })
    .map(|v| v.trim().to_string())
    .unwrap_or_default()
}

/// Value pipeline for allow-listed standard properties.
fn sanitize_standard_value(value: &str) -> Option<String> {
    if has_control_chars(value) {
        return None;
    }
    let value = scrub_until_stable(value, |v| {
        let v = strip_expressions(v);
        let v = strip_pattern(&STANDARD_VECTOR_RE, &v);
        sanitize_urls(&v)
    })?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Sanitize one property/value pair.
///
/// Returns the trimmed property and cleaned value, or `None` when the
/// property is malformed or not allow-listed, or the value is empty after
/// cleaning.
pub fn sanitize_declaration(property: &str, value: &str) -> Option<(String, String)> {
    let property = property.trim();
    if !is_valid_property_name(property) {
        debug!(property, "dropped declaration with malformed property name");
        return None;
    }

    if is_custom_property(property) {
        let value = sanitize_custom_property_value(value);
        if value.is_empty() {
            debug!(property, "dropped custom property with empty value");
            return None;
        }
        return Some((property.to_string(), value));
    }

    if !is_allowed_property(property) {
        debug!(property, "dropped declaration with disallowed property");
        return None;
    }

    match sanitize_standard_value(value) {
        Some(value) => Some((property.to_string(), value)),
        None => {
            debug!(property, "dropped declaration with unsafe or empty value");
            None
        }
    }
}

/// Sanitize a single `prop: value` segment, preserving whether the source
/// put a space after the colon.
pub(crate) fn sanitize_segment(segment: &str) -> Option<String> {
    let raw = split_declaration(segment.trim())?;
    let (property, value) = sanitize_declaration(raw.property, raw.value)?;
    Some(format!("{property}:{}{value}", raw.separator))
}

/// Sanitize a flat declaration body, rejoining survivors with `"; "`.
pub fn sanitize_declaration_list(body: &str) -> String {
    let body = strip_comments(body);
    split_top_level(&body, b';')
        .into_iter()
        .filter(|segment| !segment.trim().is_empty())
        .filter_map(|segment| {
            let cleaned = sanitize_segment(segment);
            if cleaned.is_none() && !segment.contains(':') {
                debug!(segment = segment.trim(), "dropped text without a colon");
            }
            cleaned
        })
        .collect::<Vec<_>>()
        .join("; ")
}
