use stylekit_sanitizer::sanitize;

use crate::context::DEFAULT_CONTEXT;
use crate::token::Token;

/// Stylesheet emitted for an empty registry.
pub const EMPTY_TOKENS_CSS: &str = ":root {\n}\n";

fn push_declaration(out: &mut String, token: &Token) {
    let mut lines = token.value.lines();
    out.push_str("    ");
    out.push_str(&token.name);
    out.push_str(": ");
    out.push_str(lines.next().unwrap_or_default().trim());
    for line in lines {
        out.push_str("\n        ");
        out.push_str(line.trim());
    }
    out.push_str(";\n");
}

/// Render tokens as one block per context, in first-seen context order,
/// and sanitize the result.
pub fn tokens_to_css(tokens: &[Token]) -> String {
    if tokens.is_empty() {
        return EMPTY_TOKENS_CSS.to_string();
    }

    let mut contexts: Vec<&str> = Vec::new();
    for token in tokens {
        let context = if token.context.is_empty() {
            DEFAULT_CONTEXT
        } else {
            token.context.as_str()
        };
        if !contexts.contains(&context) {
            contexts.push(context);
        }
    }

    let blocks: Vec<String> = contexts
        .iter()
        .map(|context| {
            let mut block = format!("{context} {{\n");
            for token in tokens.iter().filter(|t| {
                t.context == *context || (t.context.is_empty() && *context == DEFAULT_CONTEXT)
            }) {
                push_declaration(&mut block, token);
            }
            block.push_str("}\n");
            block
        })
        .collect();

    sanitize(&blocks.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize_token, DEFAULT_GROUP};
    use crate::token::RawToken;

    fn token(name: &str, value: &str, context: &str) -> Token {
        normalize_token(&RawToken::new(name, value).with_context(context), DEFAULT_GROUP).unwrap()
    }

    #[test]
    fn empty_registry() {
        assert_eq!(tokens_to_css(&[]), ":root {\n}\n");
    }

    #[test]
    fn groups_by_first_seen_context() {
        let css = tokens_to_css(&[
            token("--a", "1", ".is-admin"),
            token("--b", "2", ":root"),
            token("--c", "3", ".is-admin"),
        ]);
        assert_eq!(css, ".is-admin {--a: 1; --c: 3}\n\n:root {--b: 2}");
    }

    #[test]
    fn unsafe_values_do_not_survive() {
        let mut t = token("--a", "red", ":root");
        t.value = "url(javascript:alert(1))".into();
        let css = tokens_to_css(&[t, token("--b", "2", ":root")]);
        assert!(!css.contains("javascript"));
        assert!(css.contains("--b: 2"));
    }

    #[test]
    fn multiline_values_are_indented() {
        let raw = RawToken::new("--shadow", "0 1px red,\n0 2px blue").with_type("shadow");
        let t = normalize_token(&raw, DEFAULT_GROUP).unwrap();
        let mut block = String::new();
        push_declaration(&mut block, &t);
        assert_eq!(block, "    --shadow: 0 1px red,\n        0 2px blue;\n");
    }
}
