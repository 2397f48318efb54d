//! HTML tag stripping.
//!
//! CSS submitted through an admin form can carry markup meant to break
//! out of the `<style>` element it is eventually printed into. Tags are
//! removed outright; string literals can be shielded from the stripper so
//! values like `'<color>'` in `@property` syntax survive.

use std::sync::LazyLock;

use regex::Regex;

use crate::scanner::string_spans;

/// `<script>`/`<style>` elements are removed together with their content.
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>").unwrap()
});

static HTML_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[A-Za-z!/?][^<>]*>").unwrap());

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("\x1A([0-9]+)\x1A").unwrap());

/// Marker byte for masked string literals. Stripped from input first so
/// user text can never forge a placeholder.
const MASK: char = '\u{1A}';

/// Remove every HTML tag, comment, and script/style element.
///
/// Repeats until stable so split-up payloads such as `<scr<b>ipt>`
/// cannot reassemble after a single pass.
pub fn strip_tags(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = SCRIPT_STYLE_RE.replace_all(&current, "");
        let next = HTML_COMMENT_RE.replace_all(&next, "");
        let next = TAG_RE.replace_all(&next, "").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Strip tags from everything except quoted string literals.
///
/// Each literal is swapped for a numbered placeholder, the remaining text
/// is stripped, and the literals are restored.
pub fn strip_tags_preserving_strings(text: &str) -> String {
    let text: String = text.chars().filter(|c| *c != MASK && *c != '\0').collect();
    let spans = string_spans(&text);
    if spans.is_empty() {
        return strip_tags(&text);
    }

    let mut masked = String::with_capacity(text.len());
    let mut literals = Vec::with_capacity(spans.len());
    let mut cursor = 0;
    for span in spans {
        masked.push_str(&text[cursor..span.start]);
        masked.push(MASK);
        masked.push_str(&literals.len().to_string());
        masked.push(MASK);
        literals.push(&text[span.clone()]);
        cursor = span.end;
    }
    masked.push_str(&text[cursor..]);

    let stripped = strip_tags(&masked);

    PLACEHOLDER_RE
        .replace_all(&stripped, |caps: &regex::Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| literals.get(i))
                .map(|s| s.to_string())
                .unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_simple_tags() {
        assert_eq!(strip_tags("a<b>bold</b>c"), "aboldc");
    }

    #[test]
    fn strips_script_with_content() {
        assert_eq!(strip_tags(".a{}<script>alert(1)</script>.b{}"), ".a{}.b{}");
    }

    #[test]
    fn strips_style_close_tag() {
        assert_eq!(strip_tags(".a{color:red}</style><p>"), ".a{color:red}");
    }

    #[test]
    fn strips_html_comments() {
        assert_eq!(strip_tags("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn nested_payload_does_not_reassemble() {
        let out = strip_tags("<scr<b>ipt>x");
        assert!(!out.contains("<script"));
    }

    #[test]
    fn leaves_child_combinator_alone() {
        assert_eq!(strip_tags(".a > .b{color:red}"), ".a > .b{color:red}");
    }

    #[test]
    fn preserves_tags_inside_strings() {
        let css = r#"@property --x{syntax:'<color>'} .a{content:"<b>"}<i>"#;
        assert_eq!(
            strip_tags_preserving_strings(css),
            r#"@property --x{syntax:'<color>'} .a{content:"<b>"}"#
        );
    }

    #[test]
    fn forged_placeholder_is_removed() {
        let css = "a\u{1A}0\u{1A}b 'x'";
        assert_eq!(strip_tags_preserving_strings(css), "a0b 'x'");
    }
}
