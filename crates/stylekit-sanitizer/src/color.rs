//! Color recognition helpers.
//!
//! Supports `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`, and the `rgb()`,
//! `rgba()`, `hsl()`, `hsla()` functional forms.

use std::sync::LazyLock;

use regex::Regex;

/// Regex for hex color: #RGB, #RGBA, #RRGGBB, or #RRGGBBAA.
pub(crate) static HEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap()
});

/// Regex for the functional color notations, comma or space separated.
pub(crate) static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(rgba?|hsla?)\(\s*[0-9.+\-]+(deg|turn|rad|%)?(\s*[,\s/]\s*[0-9.+\-]+%?){2,3}\s*\)$")
        .unwrap()
});

/// Return the color if it is a well-formed hex color, `None` otherwise.
pub fn sanitize_hex_color(s: &str) -> Option<String> {
    let s = s.trim();
    HEX_RE.is_match(s).then(|| s.to_string())
}

/// Validate that a string is a recognized color format.
pub fn is_css_color(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    if s.starts_with('#') {
        return HEX_RE.is_match(s);
    }
    FUNCTION_RE.is_match(s)
}

/// Cheap shape test used when inferring a token's type from its value.
pub fn looks_like_color(value: &str) -> bool {
    let lower = value.trim_start().to_ascii_lowercase();
    lower.starts_with('#') || lower.starts_with("rgb") || lower.starts_with("hsl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(sanitize_hex_color(" #FFF ").as_deref(), Some("#FFF"));
        assert_eq!(sanitize_hex_color("#00d4ff80").as_deref(), Some("#00d4ff80"));
        assert!(sanitize_hex_color("#12345").is_none());
        assert!(sanitize_hex_color("fff").is_none());
        assert!(sanitize_hex_color("#ggg").is_none());
    }

    #[test]
    fn functional_colors() {
        assert!(is_css_color("rgb(0, 212, 255)"));
        assert!(is_css_color("rgba(0,212,255,0.12)"));
        assert!(is_css_color("hsl(210deg 40% 50%)"));
        assert!(is_css_color("hsla(210, 40%, 50%, .5)"));
        assert!(is_css_color("rgb(0 0 0 / 50%)"));
        assert!(!is_css_color("rgb(red)"));
        assert!(!is_css_color("red"));
        assert!(!is_css_color(""));
    }

    #[test]
    fn color_shape() {
        assert!(looks_like_color("#fff"));
        assert!(looks_like_color("RGB(1,2,3)"));
        assert!(looks_like_color("hsl(1 2% 3%)"));
        assert!(!looks_like_color("12px"));
    }
}
