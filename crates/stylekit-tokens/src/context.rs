//! Token context (selector scope) cleanup.

pub const DEFAULT_CONTEXT: &str = ":root";

/// Contexts offered by the editor, with their display labels.
pub const CURATED_CONTEXTS: &[(&str, &str)] = &[
    (":root", "Global (:root)"),
    ("[data-theme=\"dark\"]", "Dark theme"),
    ("[data-theme=\"light\"]", "Light theme"),
    (".is-admin", "Admin screens"),
    (".is-frontend", "Front end"),
];

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-:#.[]=\"'\\".contains(c)
}

/// Comparison form: lower-cased, single quotes as double, no whitespace.
fn curated_key(context: &str) -> String {
    context
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '\'' { '"' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Clean a context selector.
///
/// Characters outside the safe set are removed, whitespace runs collapse
/// to one space, and an empty result becomes `:root`. A context equal to
/// a curated one (ignoring case, quote style, and spacing) takes the
/// curated spelling.
pub fn sanitize_context(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| *c == ' ' || is_allowed_char(*c))
        .collect();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return DEFAULT_CONTEXT.to_string();
    }

    let key = curated_key(&collapsed);
    CURATED_CONTEXTS
        .iter()
        .find(|(curated, _)| curated_key(curated) == key)
        .map(|(curated, _)| curated.to_string())
        .unwrap_or(collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_becomes_root() {
        assert_eq!(sanitize_context(""), ":root");
        assert_eq!(sanitize_context("  {}  "), ":root");
    }

    #[test]
    fn collapses_whitespace_and_strips_unsafe() {
        assert_eq!(sanitize_context("  .card \n  .title{} "), ".card .title");
        assert_eq!(sanitize_context(".a<script>"), ".ascript");
    }

    #[test]
    fn snaps_to_curated_spelling() {
        assert_eq!(sanitize_context("[data-theme='dark']"), "[data-theme=\"dark\"]");
        assert_eq!(sanitize_context(":ROOT"), ":root");
        assert_eq!(sanitize_context(".IS-ADMIN"), ".is-admin");
    }

    #[test]
    fn free_form_is_kept() {
        assert_eq!(sanitize_context(".brand-x"), ".brand-x");
        assert_eq!(sanitize_context("[data-theme=dark]"), "[data-theme=dark]");
    }
}
