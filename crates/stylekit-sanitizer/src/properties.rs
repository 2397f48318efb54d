//! Safe CSS property allow-list.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Standard properties accepted by the declaration sanitizer.
pub const ALLOWED_PROPERTIES: &[&str] = &[
    // Color and background
    "color",
    "opacity",
    "background",
    "background-attachment",
    "background-blend-mode",
    "background-clip",
    "background-color",
    "background-image",
    "background-origin",
    "background-position",
    "background-position-x",
    "background-position-y",
    "background-repeat",
    "background-size",
    "accent-color",
    "caret-color",
    "color-scheme",
    "forced-color-adjust",
    "print-color-adjust",
    "mix-blend-mode",
    "isolation",
    // Box model
    "margin",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "margin-block",
    "margin-inline",
    "padding",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "padding-block",
    "padding-inline",
    "width",
    "height",
    "min-width",
    "min-height",
    "max-width",
    "max-height",
    "inline-size",
    "block-size",
    "min-inline-size",
    "min-block-size",
    "max-inline-size",
    "max-block-size",
    "box-sizing",
    "aspect-ratio",
    // Borders and outlines
    "border",
    "border-top",
    "border-right",
    "border-bottom",
    "border-left",
    "border-color",
    "border-style",
    "border-width",
    "border-radius",
    "border-collapse",
    "border-spacing",
    "border-image",
    "border-block",
    "border-inline",
    "outline",
    "outline-color",
    "outline-style",
    "outline-width",
    "outline-offset",
    "box-shadow",
    // Layout
    "display",
    "position",
    "top",
    "right",
    "bottom",
    "left",
    "inset",
    "inset-block",
    "inset-inline",
    "z-index",
    "float",
    "clear",
    "visibility",
    "overflow",
    "overflow-x",
    "overflow-y",
    "overflow-wrap",
    "overflow-anchor",
    "clip",
    "clip-path",
    "contain",
    "container",
    "container-name",
    "container-type",
    "content-visibility",
    "vertical-align",
    "table-layout",
    "caption-side",
    "empty-cells",
    "direction",
    "unicode-bidi",
    "writing-mode",
    // Flexbox
    "flex",
    "flex-basis",
    "flex-direction",
    "flex-flow",
    "flex-grow",
    "flex-shrink",
    "flex-wrap",
    "order",
    "align-content",
    "align-items",
    "align-self",
    "justify-content",
    "justify-items",
    "justify-self",
    "place-content",
    "place-items",
    "place-self",
    "gap",
    "row-gap",
    "column-gap",
    // Grid
    "grid",
    "grid-area",
    "grid-auto-columns",
    "grid-auto-flow",
    "grid-auto-rows",
    "grid-column",
    "grid-column-end",
    "grid-column-start",
    "grid-row",
    "grid-row-end",
    "grid-row-start",
    "grid-template",
    "grid-template-areas",
    "grid-template-columns",
    "grid-template-rows",
    "grid-gap",
    "grid-column-gap",
    "grid-row-gap",
    // Multi-column
    "columns",
    "column-count",
    "column-fill",
    "column-rule",
    "column-rule-color",
    "column-rule-style",
    "column-rule-width",
    "column-span",
    "column-width",
    "break-after",
    "break-before",
    "break-inside",
    "page-break-after",
    "page-break-before",
    "page-break-inside",
    "orphans",
    "widows",
    // Typography
    "font",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "font-variant",
    "font-stretch",
    "font-display",
    "font-feature-settings",
    "font-kerning",
    "font-optical-sizing",
    "font-size-adjust",
    "font-synthesis",
    "font-variation-settings",
    "line-height",
    "letter-spacing",
    "word-spacing",
    "word-break",
    "word-wrap",
    "white-space",
    "tab-size",
    "hyphens",
    "quotes",
    "text-align",
    "text-align-last",
    "text-decoration",
    "text-decoration-color",
    "text-decoration-line",
    "text-decoration-style",
    "text-decoration-thickness",
    "text-indent",
    "text-overflow",
    "text-rendering",
    "text-shadow",
    "text-transform",
    "text-underline-offset",
    "text-underline-position",
    "text-wrap",
    "line-clamp",
    "initial-letter",
    "src",
    "unicode-range",
    "size-adjust",
    "ascent-override",
    "descent-override",
    "line-gap-override",
    // Lists and generated content
    "list-style",
    "list-style-image",
    "list-style-position",
    "list-style-type",
    "content",
    "counter-increment",
    "counter-reset",
    "counter-set",
    // Effects
    "filter",
    "backdrop-filter",
    "transform",
    "transform-origin",
    "transform-style",
    "transform-box",
    "translate",
    "rotate",
    "scale",
    "perspective",
    "perspective-origin",
    "backface-visibility",
    "mask",
    "object-fit",
    "object-position",
    "image-rendering",
    "shape-outside",
    "shape-margin",
    "shape-image-threshold",
    // Motion
    "transition",
    "animation",
    "will-change",
    "offset",
    "offset-path",
    "offset-distance",
    "offset-rotate",
    // Interaction
    "cursor",
    "pointer-events",
    "resize",
    "user-select",
    "touch-action",
    "appearance",
    "scroll-behavior",
    "scroll-snap-align",
    "scroll-snap-stop",
    "scroll-snap-type",
    "overscroll-behavior",
    // SVG paint
    "fill",
    "fill-opacity",
    "fill-rule",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-opacity",
    "stroke-width",
    "stop-color",
    "stop-opacity",
    // Miscellaneous
    "all",
    "zoom",
];

/// Families accepted by prefix (`margin-inline-start`, `grid-template-*`, ...).
pub const SAFE_PREFIXES: &[&str] = &[
    "margin-",
    "padding-",
    "border-",
    "background-",
    "animation-",
    "transition-",
    "grid-template-",
    "grid-column-",
    "grid-row-",
    "grid-auto-",
    "mask-",
    "scrollbar-",
    "scroll-margin-",
    "scroll-padding-",
    "font-variant-",
    "text-emphasis-",
    "outline-",
    "inset-",
    "overscroll-behavior-",
    "inline-",
    "block-",
    "container-",
    "contain-intrinsic-",
];

const VENDOR_PREFIXES: &[&str] = &["-webkit-", "-moz-", "-ms-", "-o-"];

static ALLOWED_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ALLOWED_PROPERTIES.iter().copied().collect());

fn allowed_unprefixed(name: &str) -> bool {
    ALLOWED_SET.contains(name)
        || SAFE_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix) && name.len() > prefix.len())
}

/// Whether a standard (non-custom) property may pass sanitization.
///
/// Lookup is on the lower-cased name. Vendor-prefixed names pass only when
/// the unprefixed name does, so `-moz-binding` stays out.
pub fn is_allowed_property(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if allowed_unprefixed(&lower) {
        return true;
    }
    VENDOR_PREFIXES
        .iter()
        .find_map(|vendor| lower.strip_prefix(vendor))
        .is_some_and(allowed_unprefixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_is_substantial() {
        assert!(ALLOWED_PROPERTIES.len() > 250);
    }

    #[test]
    fn allow_list_has_no_duplicates() {
        assert_eq!(ALLOWED_SET.len(), ALLOWED_PROPERTIES.len());
    }

    #[test]
    fn accepts_common_properties() {
        assert!(is_allowed_property("color"));
        assert!(is_allowed_property("Background-Color"));
        assert!(is_allowed_property("grid-template-columns"));
    }

    #[test]
    fn accepts_prefix_families() {
        assert!(is_allowed_property("margin-inline-start"));
        assert!(is_allowed_property("scrollbar-color"));
        assert!(is_allowed_property("mask-image"));
        assert!(is_allowed_property("animation-timing-function"));
    }

    #[test]
    fn accepts_vendor_prefixed_safe_properties() {
        assert!(is_allowed_property("-webkit-transform"));
        assert!(is_allowed_property("-webkit-mask-image"));
    }

    #[test]
    fn rejects_dangerous_or_unknown() {
        assert!(!is_allowed_property("-moz-binding"));
        assert!(!is_allowed_property("behavior"));
        assert!(!is_allowed_property("behaviour"));
        assert!(!is_allowed_property("made-up-thing"));
        assert!(!is_allowed_property("margin-"));
    }
}
