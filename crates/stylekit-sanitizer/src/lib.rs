//! CSS sanitization for untrusted stylesheet text.
//!
//! [`sanitize`] is total: any input yields a string that is safe to print
//! inside a `<style>` element. Unsafe constructs are removed at the
//! smallest granularity possible (one `url()`, one declaration, one rule)
//! and the rest of the document survives.

pub mod color;
pub mod declarations;
pub mod html;
pub mod import;
pub mod properties;
pub mod property_rule;
pub mod scanner;
pub mod selector;
mod structure;
pub mod url;

pub use color::{is_css_color, looks_like_color, sanitize_hex_color};
pub use declarations::{
    is_custom_property, is_valid_property_name, sanitize_custom_property_value,
    sanitize_declaration, sanitize_declaration_list,
};
pub use html::{strip_tags, strip_tags_preserving_strings};
pub use properties::is_allowed_property;
pub use selector::{specificity, Specificity};
pub use structure::MAX_NESTING;
pub use url::{escape_url, sanitize_url};

use structure::{sanitize_fragment, Mode};

/// Sanitize a whole stylesheet.
///
/// Returns `""` for blank input. `</` sequences that survive (inside
/// string literals, say) are escaped to `<\/` so the output cannot close
/// the surrounding `<style>` element.
pub fn sanitize(raw: &str) -> String {
    let cleaned = sanitize_fragment(raw, 0, Mode::Stylesheet);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return String::new();
    }
    cleaned.replace("</", "<\\/")
}

#[cfg(test)]
mod tests;
