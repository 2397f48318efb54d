//! Quote-, comment- and escape-aware byte scanner.
//!
//! Every structural decision the sanitizer makes (where a block ends,
//! where a declaration ends, which text is a string literal) goes through
//! this single state machine so all passes agree on what is code.
//!
//! Structural characters are all ASCII, so scanning bytes and slicing the
//! source `&str` at the reported offsets is always on a char boundary.

/// Which quote an escape sequence returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    None,
    Single,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Default,
    InSingleQuote,
    InDoubleQuote,
    InComment,
    Escaped(Quoting),
}

/// Classification of a scanned byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteKind {
    /// Outside strings and comments.
    Code,
    /// Part of a string literal, a quote delimiter, or an escaped byte.
    Quoted,
    /// Part of a `/* ... */` comment, delimiters included.
    Comment,
}

/// Iterator over `(offset, byte, kind)` triples.
///
/// The second byte of a comment delimiter (`*` in `/*`, `/` in `*/`) is
/// consumed without being yielded; callers only ever act on `Code` bytes
/// or copy non-comment bytes, so nothing observable is lost.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    state: ScanState,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::at(text, 0)
    }

    /// Start scanning at `pos`, assuming the text before it left the
    /// scanner in the default state.
    pub fn at(text: &'a str, pos: usize) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos,
            state: ScanState::Default,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// True while the scanner sits inside a string literal.
    pub fn in_string(&self) -> bool {
        matches!(
            self.state,
            ScanState::InSingleQuote
                | ScanState::InDoubleQuote
                | ScanState::Escaped(Quoting::Single)
                | ScanState::Escaped(Quoting::Double)
        )
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }
}

impl Iterator for Scanner<'_> {
    type Item = (usize, u8, ByteKind);

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.pos;
        let byte = *self.bytes.get(offset)?;
        self.pos += 1;

        let kind = match self.state {
            ScanState::Default => match byte {
                b'\'' => {
                    self.state = ScanState::InSingleQuote;
                    ByteKind::Quoted
                }
                b'"' => {
                    self.state = ScanState::InDoubleQuote;
                    ByteKind::Quoted
                }
                b'\\' => {
                    self.state = ScanState::Escaped(Quoting::None);
                    ByteKind::Quoted
                }
                b'/' if self.peek() == Some(b'*') => {
                    self.pos += 1;
                    self.state = ScanState::InComment;
                    ByteKind::Comment
                }
                _ => ByteKind::Code,
            },
            ScanState::InSingleQuote | ScanState::InDoubleQuote => {
                let closing = if self.state == ScanState::InSingleQuote {
                    b'\''
                } else {
                    b'"'
                };
                match byte {
                    b'\\' => {
                        let quoting = if closing == b'\'' {
                            Quoting::Single
                        } else {
                            Quoting::Double
                        };
                        self.state = ScanState::Escaped(quoting);
                        ByteKind::Quoted
                    }
                    // An unescaped newline ends a CSS string, as browsers tokenize it.
                    b'\n' => {
                        self.state = ScanState::Default;
                        ByteKind::Code
                    }
                    b if b == closing => {
                        self.state = ScanState::Default;
                        ByteKind::Quoted
                    }
                    _ => ByteKind::Quoted,
                }
            }
            ScanState::InComment => {
                if byte == b'*' && self.peek() == Some(b'/') {
                    self.pos += 1;
                    self.state = ScanState::Default;
                }
                ByteKind::Comment
            }
            ScanState::Escaped(quoting) => {
                self.state = match quoting {
                    Quoting::None => ScanState::Default,
                    Quoting::Single => ScanState::InSingleQuote,
                    Quoting::Double => ScanState::InDoubleQuote,
                };
                ByteKind::Quoted
            }
        };

        Some((offset, byte, kind))
    }
}

/// Offset of the `}` matching the `{` at `open`, or `None` when the
/// block is never closed.
pub fn find_block_end(text: &str, open: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, byte, kind) in Scanner::at(text, open + 1) {
        if kind != ByteKind::Code {
            continue;
        }
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on `separator` where it appears as code outside any parentheses.
pub fn split_top_level(text: &str, separator: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (offset, byte, kind) in Scanner::new(text) {
        if kind != ByteKind::Code {
            continue;
        }
        match byte {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b if b == separator && depth == 0 => {
                parts.push(&text[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Remove `/* ... */` comments, leaving string literals untouched.
pub fn strip_comments(text: &str) -> String {
    if !text.contains("/*") {
        return text.to_string();
    }
    let kept: Vec<u8> = Scanner::new(text)
        .filter(|(_, _, kind)| *kind != ByteKind::Comment)
        .map(|(_, byte, _)| byte)
        .collect();
    String::from_utf8_lossy(&kept).into_owned()
}

/// Byte ranges of every string literal (delimiters included).
pub fn string_spans(text: &str) -> Vec<std::ops::Range<usize>> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    let mut scanner = Scanner::new(text);
    while let Some((offset, _, _)) = scanner.next() {
        match (start, scanner.in_string()) {
            (None, true) => start = Some(offset),
            (Some(s), false) => {
                spans.push(s..offset + 1);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(s..text.len());
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(text: &str) -> String {
        Scanner::new(text)
            .filter(|(_, _, k)| *k == ByteKind::Code)
            .map(|(_, b, _)| b as char)
            .collect()
    }

    #[test]
    fn braces_inside_strings_are_not_code() {
        assert_eq!(code(r#"a{content:"}"}"#), "a{content:}");
    }

    #[test]
    fn comments_are_not_code() {
        assert_eq!(code("a/* { */b"), "ab");
    }

    #[test]
    fn escaped_quote_stays_in_string() {
        assert_eq!(code(r#"x"a\"b"y"#), "xy");
    }

    #[test]
    fn escaped_brace_outside_string_is_not_code() {
        assert_eq!(code(r"a\{b"), "ab");
    }

    #[test]
    fn newline_terminates_string() {
        assert_eq!(code("'abc\n}"), "\n}");
    }

    #[test]
    fn comment_slash_star_slash_stays_open() {
        assert_eq!(code("/*/ x */y"), "y");
    }

    #[test]
    fn find_block_end_handles_nesting() {
        let text = "@media x{ .a{color:red} }tail";
        let open = text.find('{').unwrap();
        let end = find_block_end(text, open).unwrap();
        assert_eq!(&text[end + 1..], "tail");
    }

    #[test]
    fn find_block_end_unbalanced() {
        assert!(find_block_end(".a{color:red", 2).is_none());
    }

    #[test]
    fn split_respects_parens_and_quotes() {
        let parts = split_top_level("a:url(x;y); b:'c;d'; e:f", b';');
        assert_eq!(parts, vec!["a:url(x;y)", " b:'c;d'", " e:f"]);
    }

    #[test]
    fn strip_comments_keeps_strings() {
        assert_eq!(strip_comments(r#"a/*x*/b"/*y*/""#), r#"ab"/*y*/""#);
    }

    #[test]
    fn string_spans_cover_literals() {
        let text = r#"a "b" c 'd"#;
        let spans = string_spans(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(&text[spans[0].clone()], r#""b""#);
        assert_eq!(&text[spans[1].clone()], "'d");
    }
}
