//! Structural pass over `{ ... }` blocks.
//!
//! The walker copies text through until it meets a code `{`, then hands
//! the prelude and body to [`sanitize_block`], which decides whether the
//! body is a nested stylesheet, an `@property` definition, or a flat
//! declaration list.

use tracing::{debug, warn};

use crate::declarations::{sanitize_declaration_list, sanitize_segment};
use crate::html::strip_tags_preserving_strings;
use crate::import::normalize_imports;
use crate::property_rule::{is_property_prelude, sanitize_property_block};
use crate::scanner::{find_block_end, strip_comments, ByteKind, Scanner};
use crate::url::sanitize_urls;

/// Blocks nested deeper than this are dropped.
pub const MAX_NESTING: usize = 64;

/// How loose text between blocks is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Top level or a grouping at-rule body: text outside blocks is kept.
    Stylesheet,
    /// Body of a style rule that nests other rules: text outside blocks
    /// is a declaration and goes through the declaration sanitizer.
    NestedRule,
}

/// Run the full pipeline over a fragment of CSS.
pub(crate) fn sanitize_fragment(raw: &str, depth: usize, mode: Mode) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let text = strip_tags_preserving_strings(raw);
    let text = normalize_imports(&text);
    let text = sanitize_urls(&text);
    walk_blocks(&text, depth, mode)
}

/// Lower-cased at-rule name of a prelude, without the `@`.
fn at_rule_name(prelude: &str) -> Option<String> {
    let rest = prelude.strip_prefix('@')?;
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    Some(rest[..end].to_ascii_lowercase())
}

fn has_nested_block(body: &str) -> bool {
    Scanner::new(body).any(|(_, byte, kind)| kind == ByteKind::Code && byte == b'{')
}

fn sanitize_block(prelude: &str, body: &str, depth: usize, mode: Mode) -> String {
    if depth >= MAX_NESTING {
        warn!(depth, "dropping block nested beyond the limit");
        return String::new();
    }

    let head = strip_comments(prelude);
    let head = head.trim();
    if is_property_prelude(head) {
        return sanitize_property_block(body);
    }

    match at_rule_name(head).as_deref() {
        Some("media" | "supports") => sanitize_fragment(body, depth + 1, mode),
        Some(name) if name.ends_with("keyframes") => {
            sanitize_fragment(body, depth + 1, Mode::Stylesheet)
        }
        Some(_) if has_nested_block(body) => sanitize_fragment(body, depth + 1, Mode::Stylesheet),
        None if has_nested_block(body) => sanitize_fragment(body, depth + 1, Mode::NestedRule),
        _ => sanitize_declaration_list(body),
    }
}

/// Sanitize a loose declaration, keeping the whitespace that led into it.
fn push_loose_declaration(out: &mut String, segment: &str, terminator: Option<char>) {
    let segment = strip_comments(segment);
    let body = segment.trim_start();
    if body.trim().is_empty() {
        return;
    }
    match sanitize_segment(body) {
        Some(declaration) => {
            out.push_str(&segment[..segment.len() - body.len()]);
            out.push_str(&declaration);
            if let Some(t) = terminator {
                out.push(t);
            }
        }
        None => debug!(segment = body.trim(), "dropped loose declaration"),
    }
}

fn walk_blocks(text: &str, depth: usize, mode: Mode) -> String {
    let mut out = String::with_capacity(text.len());
    // Bytes of `text` already copied to `out`.
    let mut copied = 0;
    // Where the current prelude starts in `out`.
    let mut rule_start = 0;
    let mut scanner = Scanner::new(text);

    while let Some((offset, byte, kind)) = scanner.next() {
        if kind != ByteKind::Code {
            continue;
        }
        match byte {
            b';' if mode == Mode::NestedRule => {
                out.push_str(&text[copied..offset]);
                let segment = out.split_off(rule_start);
                push_loose_declaration(&mut out, &segment, Some(';'));
                copied = offset + 1;
                rule_start = out.len();
            }
            b';' | b'}' => {
                out.push_str(&text[copied..=offset]);
                copied = offset + 1;
                rule_start = out.len();
            }
            b'{' => {
                out.push_str(&text[copied..offset]);
                let Some(close) = find_block_end(text, offset) else {
                    debug!(offset, "unbalanced brace, passing remainder through");
                    out.push_str(&text[offset..]);
                    return out;
                };

                let prelude = out[rule_start..].to_string();
                let cleaned = sanitize_block(&prelude, &text[offset + 1..close], depth, mode);
                if cleaned.trim().is_empty() {
                    out.truncate(rule_start);
                } else {
                    out.push('{');
                    out.push_str(&cleaned);
                    out.push('}');
                }

                copied = close + 1;
                rule_start = out.len();
                scanner = Scanner::at(text, copied);
            }
            _ => {}
        }
    }

    if mode == Mode::NestedRule {
        out.push_str(&text[copied..]);
        let segment = out.split_off(rule_start);
        push_loose_declaration(&mut out, &segment, None);
        let tail = segment.len() - segment.trim_end().len();
        if !segment.trim().is_empty() && out.len() > rule_start {
            out.push_str(&segment[segment.len() - tail..]);
        }
    } else {
        out.push_str(&text[copied..]);
    }
    out
}
