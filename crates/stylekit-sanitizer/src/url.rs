//! URL filtering for `url()` tokens, `@import` targets, and preset
//! image fields.

use tracing::debug;

/// Schemes a URL may carry. Scheme-less (relative or protocol-relative)
/// URLs are always accepted.
pub const ALLOWED_PROTOCOLS: &[&str] = &["http", "https"];

const DATA_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
];

const DATA_FONT_APPLICATION_TYPES: &[&str] = &[
    "application/font-woff",
    "application/font-woff2",
    "application/x-font-woff",
    "application/x-font-ttf",
    "application/x-font-truetype",
    "application/x-font-opentype",
    "application/font-sfnt",
    "application/vnd.ms-fontobject",
];

/// Drop characters that have no business in a URL and percent-encode
/// spaces. Quotes, parentheses, backslashes, angle brackets, and every
/// control or whitespace character are removed.
pub fn escape_url(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        match c {
            ' ' => out.push_str("%20"),
            c if c.is_ascii_alphanumeric() => out.push(c),
            '-' | '~' | '+' | '_' | '.' | '?' | '#' | '=' | '!' | '&' | ';' | ',' | '/' | ':'
            | '%' | '@' | '$' | '|' | '*' | '[' | ']' => out.push(c),
            c if !c.is_ascii() && !c.is_control() && !c.is_whitespace() => out.push(c),
            _ => {}
        }
    }
    out
}

/// The scheme of an escaped URL, if the text before its first `:` could
/// be one. A colon after the first `/`, `?`, or `#` belongs to the path.
fn scheme_of(url: &str) -> Option<&str> {
    let colon = url.find(':')?;
    let head = &url[..colon];
    if head.contains(['/', '?', '#']) {
        None
    } else {
        Some(head)
    }
}

/// Filter a URL against [`ALLOWED_PROTOCOLS`].
///
/// Returns the escaped URL, or `None` when it is empty or carries any
/// other scheme (`javascript:`, `vbscript:`, `data:`, ...).
pub fn sanitize_url(raw: &str) -> Option<String> {
    let url = escape_url(raw);
    if url.is_empty() {
        return None;
    }
    match scheme_of(&url) {
        None => Some(url),
        Some(scheme) => {
            let scheme = scheme.to_ascii_lowercase();
            if ALLOWED_PROTOCOLS.contains(&scheme.as_str()) {
                Some(url)
            } else {
                debug!(scheme = %scheme, "rejected url with disallowed protocol");
                None
            }
        }
    }
}

/// True for `data:` URIs whose MIME type is a raster image or a font.
pub fn is_safe_data_uri(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    let Some(rest) = lower.strip_prefix("data:") else {
        return false;
    };
    if !rest.contains(',') {
        return false;
    }
    let mime_end = rest.find([';', ',']).unwrap_or(rest.len());
    let mime = rest[..mime_end].trim();

    DATA_IMAGE_TYPES.contains(&mime)
        || (mime.starts_with("font/") && mime.len() > "font/".len())
        || DATA_FONT_APPLICATION_TYPES.contains(&mime)
}

/// Filter the target of a CSS `url()`: safe `data:` URIs pass, anything
/// else goes through [`sanitize_url`].
pub fn sanitize_css_url(raw: &str) -> Option<String> {
    let url = escape_url(raw);
    if url.to_ascii_lowercase().starts_with("data:") {
        if is_safe_data_uri(&url) {
            return Some(url);
        }
        debug!("rejected data uri with disallowed mime type");
        return None;
    }
    sanitize_url(&url)
}

/// A parsed `url(...)` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UrlToken<'a> {
    pub inner: &'a str,
    pub quote: Option<char>,
    /// Offset just past the closing `)`.
    pub end: usize,
}

/// Parse the argument of a `url(` whose opening parenthesis ends right
/// before `from`. Returns `None` if the token is never closed.
pub(crate) fn parse_url_token(text: &str, from: usize) -> Option<UrlToken<'_>> {
    let bytes = text.as_bytes();
    let mut pos = from;
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    let first = *bytes.get(pos)?;

    if first == b'"' || first == b'\'' {
        let (inner_end, after_quote) = find_closing_quote(bytes, pos)?;
        let inner = &text[pos + 1..inner_end];
        let close = text[after_quote..].find(')')? + after_quote;
        return Some(UrlToken {
            inner,
            quote: Some(first as char),
            end: close + 1,
        });
    }

    let mut depth = 0usize;
    for (offset, &byte) in bytes.iter().enumerate().skip(pos) {
        match byte {
            b'(' => depth += 1,
            b')' if depth == 0 => {
                return Some(UrlToken {
                    inner: text[pos..offset].trim(),
                    quote: None,
                    end: offset + 1,
                });
            }
            b')' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Offset of the quote closing the string opened at `open`, and the
/// offset just past it.
pub(crate) fn find_closing_quote(bytes: &[u8], open: usize) -> Option<(usize, usize)> {
    let quote = bytes[open];
    let mut escaped = false;
    for (offset, &byte) in bytes.iter().enumerate().skip(open + 1) {
        if escaped {
            escaped = false;
        } else if byte == b'\\' {
            escaped = true;
        } else if byte == quote {
            return Some((offset, offset + 1));
        }
    }
    None
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

/// Rewrite every `url()` in `text`, dropping the whole token when its
/// target is unsafe. An unterminated `url(` swallows the rest of the text,
/// as it does in a browser.
pub fn sanitize_urls(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find("url(") {
        let start = cursor + found;
        let args = start + "url(".len();

        if start > 0 && is_ident_byte(bytes[start - 1]) {
            out.push_str(&text[cursor..args]);
            cursor = args;
            continue;
        }

        out.push_str(&text[cursor..start]);
        match parse_url_token(text, args) {
            Some(token) => {
                match sanitize_css_url(token.inner) {
                    Some(clean) => {
                        out.push_str("url(");
                        if let Some(q) = token.quote {
                            out.push(q);
                            out.push_str(&clean);
                            out.push(q);
                        } else {
                            out.push_str(&clean);
                        }
                        out.push(')');
                    }
                    None => debug!(url = token.inner, "dropped unsafe url()"),
                }
                cursor = token.end;
            }
            None => {
                debug!(offset = start, "dropped unterminated url(");
                cursor = text.len();
            }
        }
    }

    out.push_str(&text[cursor..]);
    out
}
