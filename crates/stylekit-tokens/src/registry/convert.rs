use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use stylekit_sanitizer::looks_like_color;
use stylekit_sanitizer::scanner::{strip_comments, ByteKind, Scanner};

use super::duplicates::{normalize_registry, NormalizedRegistry};
use crate::token::{RawToken, TokenType};

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:\d+\.?\d*|\.\d+)$").unwrap());

/// Guess a token type from the shape of its value.
pub fn infer_type(value: &str) -> TokenType {
    let value = value.trim();
    if looks_like_color(value) {
        TokenType::Color
    } else if NUMBER_RE.is_match(value) {
        TokenType::Number
    } else {
        TokenType::Text
    }
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

/// End of a declaration value: the first top-level `;` or `}` after
/// `from`, or the end of the text.
fn value_end(css: &str, from: usize) -> usize {
    let mut depth = 0usize;
    for (offset, byte, kind) in Scanner::at(css, from) {
        if kind != ByteKind::Code {
            continue;
        }
        match byte {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b';' | b'}' if depth == 0 => return offset,
            _ => {}
        }
    }
    css.len()
}

/// Skip whitespace and comments; returns the first offset after them.
fn skip_trivia(css: &str, from: usize) -> usize {
    for (offset, byte, kind) in Scanner::at(css, from) {
        if kind == ByteKind::Code && !byte.is_ascii_whitespace() {
            return offset;
        }
    }
    css.len()
}

/// Every custom-property declaration sitting directly in a rule body,
/// with the nearest enclosing selector as its context.
pub fn extract_declarations(css: &str) -> Vec<RawToken> {
    let bytes = css.as_bytes();
    let mut found = Vec::new();
    let mut selectors: Vec<String> = Vec::new();
    let mut segment_start = 0;
    let mut last_significant: Option<u8> = None;
    let mut scanner = Scanner::new(css);

    while let Some((offset, byte, kind)) = scanner.next() {
        if kind != ByteKind::Code {
            continue;
        }
        match byte {
            b'{' => {
                let selector = strip_comments(&css[segment_start..offset]);
                selectors.push(selector.trim().to_string());
                segment_start = offset + 1;
            }
            b'}' => {
                selectors.pop();
                segment_start = offset + 1;
            }
            b';' => segment_start = offset + 1,
            b'-' if bytes.get(offset + 1) == Some(&b'-')
                && matches!(last_significant, Some(b'{') | Some(b';'))
                && !selectors.is_empty() =>
            {
                let mut name_end = offset + 2;
                while name_end < bytes.len() && is_name_byte(bytes[name_end]) {
                    name_end += 1;
                }
                let colon = skip_trivia(css, name_end);
                if name_end == offset + 2 || bytes.get(colon) != Some(&b':') {
                    last_significant = Some(byte);
                    continue;
                }

                let end = value_end(css, colon + 1);
                let value = strip_comments(&css[colon + 1..end]);
                let value = value.trim();
                let context = selectors.last().cloned().unwrap_or_default();
                debug!(name = &css[offset..name_end], context = %context, "found custom property");
                found.push(RawToken {
                    name: Some(css[offset..name_end].to_string()),
                    value: Some(Value::String(value.to_string())),
                    token_type: Some(infer_type(value).as_str().to_string()),
                    context: Some(context),
                    ..RawToken::default()
                });

                // Resume at the terminator so it updates the block state.
                scanner = Scanner::at(css, end);
                last_significant = Some(b':');
                continue;
            }
            _ => {}
        }
        if !byte.is_ascii_whitespace() {
            last_significant = Some(byte);
        }
    }

    found
}

/// Parse custom properties out of CSS text and normalize them into a
/// registry, reporting duplicates.
pub fn convert_css_to_registry_detailed(css: &str, default_group: &str) -> NormalizedRegistry {
    normalize_registry(&extract_declarations(css), default_group)
}
