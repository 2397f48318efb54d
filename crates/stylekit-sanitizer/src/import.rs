//! `@import` normalisation.

use tracing::debug;

use crate::scanner::{ByteKind, Scanner};
use crate::url::{find_closing_quote, parse_url_token, sanitize_url};

const IMPORT: &str = "@import";

/// Rewrite every `@import` to the canonical `@import url("...") media;`
/// form, dropping rules whose target is empty or unsafe.
///
/// Media qualifiers run to the next `;` or line break; braces and
/// semicolons are stripped from them.
pub fn normalize_imports(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut scanner = Scanner::new(text);

    while let Some((start, byte, kind)) = scanner.next() {
        if kind != ByteKind::Code || byte != b'@' || !lower[start..].starts_with(IMPORT) {
            continue;
        }
        out.push_str(&text[cursor..start]);

        let mut pos = start + IMPORT.len();
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let target = if lower[pos..].starts_with("url(") {
            parse_url_token(text, pos + "url(".len()).map(|t| (t.inner, t.end))
        } else if matches!(bytes.get(pos), Some(b'"') | Some(b'\'')) {
            find_closing_quote(bytes, pos).map(|(close, after)| (&text[pos + 1..close], after))
        } else {
            None
        };

        let qualifier_start = target.map(|(_, end)| end).unwrap_or(pos);
        let statement_end = text[qualifier_start..]
            .find([';', '\n'])
            .map(|i| qualifier_start + i)
            .unwrap_or(text.len());
        let consumed_end = if bytes.get(statement_end) == Some(&b';') {
            statement_end + 1
        } else {
            statement_end
        };

        match target.and_then(|(url, _)| sanitize_url(url)) {
            Some(url) => {
                let media: String = text[qualifier_start..statement_end]
                    .chars()
                    .filter(|c| !matches!(c, '{' | '}' | ';'))
                    .collect();
                let media = media.split_whitespace().collect::<Vec<_>>().join(" ");

                out.push_str("@import url(\"");
                out.push_str(&url);
                out.push_str("\")");
                if !media.is_empty() {
                    out.push(' ');
                    out.push_str(&media);
                }
                out.push(';');
            }
            None => debug!(offset = start, "dropped @import with unsafe or missing target"),
        }

        cursor = consumed_end;
        scanner = Scanner::at(text, cursor);
    }

    out.push_str(&text[cursor..]);
    out
}
