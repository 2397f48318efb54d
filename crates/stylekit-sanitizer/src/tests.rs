use super::*;

fn assert_idempotent(css: &str) {
    let once = sanitize(css);
    assert_eq!(sanitize(&once), once, "not idempotent for {css:?}");
}

// =============================================================================
// Blank and trivial input
// =============================================================================

#[test]
fn blank_input_yields_empty() {
    assert_eq!(sanitize(""), "");
    assert_eq!(sanitize("   \n\t"), "");
}

#[test]
fn clean_rule_is_unchanged() {
    assert_eq!(sanitize(".a{color:red}"), ".a{color:red}");
    assert_eq!(sanitize("  .a { color: red }  "), ".a {color: red}");
}

// =============================================================================
// Injection
// =============================================================================

#[test]
fn javascript_url_is_removed() {
    let out = sanitize("div{background:url(javascript:alert(1))}");
    assert!(!out.to_ascii_lowercase().contains("javascript:"));
}

#[test]
fn url_spliced_together_by_stripping_is_removed() {
    for css in [
        ".a{background:uexpression(1)rl(javascript:alert(1))}",
        ".a{--x:uexpression(1)rl(javascript:alert(1))}",
        ".a{background:ubehavior:rl(javascript:alert(1))}",
        ".a{--x:ubehavior:rl(javascript:alert(1))}",
    ] {
        let out = sanitize(css);
        assert!(
            !out.to_ascii_lowercase().contains("javascript:"),
            "{css:?} produced {out:?}"
        );
        assert_idempotent(css);
    }
}

#[test]
fn import_text_inside_string_is_not_a_rule() {
    let css = ".a{content:\"@import x\"} .b{color:red}";
    assert_eq!(sanitize(css), css);
    assert_idempotent(css);
}

#[test]
fn vbscript_import_sanitizes_to_empty() {
    assert_eq!(sanitize("@import url(vbscript:x);"), "");
}

#[test]
fn safe_import_is_kept_in_canonical_form() {
    assert_eq!(
        sanitize("@import 'https://fonts.test/a.css' screen;"),
        "@import url(\"https://fonts.test/a.css\") screen;"
    );
}

#[test]
fn html_is_stripped_outside_strings() {
    assert_eq!(
        sanitize(".a{color:red}</style><script>alert(1)</script>"),
        ".a{color:red}"
    );
}

#[test]
fn closing_tag_inside_string_is_escaped() {
    let out = sanitize(".a{content:'</style>'}");
    assert!(!out.contains("</"));
    assert_eq!(out, ".a{content:'<\\/style>'}");
}

#[test]
fn expression_is_removed_from_values() {
    assert_eq!(
        sanitize(".a{width:expression(alert(1)); color:red}"),
        ".a{color:red}"
    );
}

// =============================================================================
// Data URIs
// =============================================================================

#[test]
fn safe_data_uri_passes_through() {
    let css = ".a{background:url(data:image/png;base64,AAAA)}";
    assert_eq!(sanitize(css), css);
}

#[test]
fn unsafe_data_uri_drops_the_url() {
    let out = sanitize(".a{background:url(data:text/html;base64,AAAA)}");
    assert!(!out.contains("url("));
    assert!(!out.contains("text/html"));
}

#[test]
fn font_data_uri_passes_through() {
    let css = "@font-face{font-family:x; src:url(data:font/woff2;base64,AAAA)}";
    assert_eq!(sanitize(css), css);
}

// =============================================================================
// Allow-list
// =============================================================================

#[test]
fn moz_binding_dropped_color_kept() {
    assert_eq!(
        sanitize(".a{-moz-binding:url(x.xml#y); color:red}"),
        ".a{color:red}"
    );
}

#[test]
fn custom_properties_always_pass_name_check() {
    assert_eq!(
        sanitize(":root{--brand:#00d4ff; --space-2:8px}"),
        ":root{--brand:#00d4ff; --space-2:8px}"
    );
}

// =============================================================================
// @property
// =============================================================================

#[test]
fn property_definition_keeps_three_fields() {
    assert_eq!(
        sanitize("@property --x {syntax: '<color>'; inherits: false; initial-value: #fff;}"),
        "@property --x {syntax: '<color>'; inherits: false; initial-value: #fff}"
    );
}

#[test]
fn property_definition_drops_fourth_field() {
    let out = sanitize(
        "@property --x {syntax: '<color>'; inherits: false; initial-value: #fff; color: red}",
    );
    assert!(!out.contains("color: red"));
    assert!(out.contains("initial-value: #fff"));
}

// =============================================================================
// Nesting
// =============================================================================

#[test]
fn media_block_round_trips() {
    let css = "@media (max-width:600px){ .a{color:red} }";
    assert_eq!(sanitize(css), css);
}

#[test]
fn supports_inside_media_round_trips() {
    let css = "@media screen{@supports (display:grid){.g{display:grid}}}";
    assert_eq!(sanitize(css), css);
}

#[test]
fn unsafe_declaration_inside_media_is_dropped() {
    assert_eq!(
        sanitize("@media print{.a{behavior:url(x.htc); color:black}}"),
        "@media print{.a{color:black}}"
    );
}

#[test]
fn media_left_empty_is_pruned() {
    assert_eq!(sanitize("@media print{.a{behavior:url(x.htc)}} .b{color:red}"), ".b{color:red}");
}

// =============================================================================
// Malformed input
// =============================================================================

#[test]
fn unbalanced_brace_keeps_parseable_prefix() {
    let out = sanitize(".a{behavior:x; color:red} .b{color:blue");
    assert!(out.starts_with(".a{color:red}"));
    assert!(out.ends_with(".b{color:blue"));
}

#[test]
fn comments_are_not_structure() {
    assert_eq!(
        sanitize(".a{/* } */color:red}"),
        ".a{color:red}"
    );
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn sanitize_is_idempotent() {
    let samples = [
        ".a{color:red}",
        "div{background:url(javascript:alert(1))}",
        "@import url(vbscript:x);",
        "@import 'a.css' print, screen;\n.a{color:red}",
        ".a{background:url( 'img/a b.png' )}",
        ".a{background:url(data:image/png;base64,AAAA)}",
        ".a{-moz-binding:url(x.xml#y); color:red}",
        "@property --x {syntax: '<color>'; inherits: false; initial-value: #fff;}",
        "@media (max-width:600px){ .a{color:red} }",
        "@keyframes k{from{opacity:0}to{opacity:1}}",
        ".a{color:red; .b{margin:0; behavior:x}}",
        ".a{content:'</style>'}",
        ".a{width:expresexpression(x)sion(y)}",
        "<scr<b>ipt>.a{color:red}",
        ".a{color:red} .b{color:blue",
        ".a{} /* note */ .b{ }",
        ".a{font-family:\"Inter\", sans-serif; --t:\"a;b\"}",
    ];
    for css in samples {
        assert_idempotent(css);
    }
}

// =============================================================================
// Specificity
// =============================================================================

#[test]
fn specificity_is_exported() {
    assert!(specificity("#a") > specificity(".a.b.c"));
}
