//! Selector specificity scoring.
//!
//! Not a selector parser: it walks the text once and counts id, class-like,
//! and type-like components, recursing only into the pseudo-classes whose
//! specificity depends on their arguments.

use serde::Serialize;

/// `(ids, classes, types)` specificity triple. Orders lexicographically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Specificity {
    pub ids: u32,
    pub classes: u32,
    pub types: u32,
}

impl Specificity {
    pub const ZERO: Specificity = Specificity {
        ids: 0,
        classes: 0,
        types: 0,
    };

    fn add(self, other: Specificity) -> Specificity {
        Specificity {
            ids: self.ids + other.ids,
            classes: self.classes + other.classes,
            types: self.types + other.types,
        }
    }
}

impl std::fmt::Display for Specificity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.ids, self.classes, self.types)
    }
}

const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '\\' || !c.is_ascii()
}

/// Split on commas that are not nested in parentheses or brackets.
fn split_selector_list(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

/// Highest specificity among the selectors of a comma-separated list.
pub fn specificity(selector_list: &str) -> Specificity {
    split_selector_list(selector_list)
        .into_iter()
        .map(complex_specificity)
        .max()
        .unwrap_or(Specificity::ZERO)
}

/// Consume an identifier starting at `start`; returns the end offset.
fn skip_ident(chars: &[(usize, char)], start: usize) -> usize {
    let mut i = start;
    while i < chars.len() && is_ident_char(chars[i].1) {
        i += 1;
    }
    i
}

/// Index just past the bracket matching the opener at `open`.
fn skip_group(chars: &[(usize, char)], open: usize, opener: char, closer: char) -> usize {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        let c = chars[i].1;
        if c == opener {
            depth += 1;
        } else if c == closer {
            depth -= 1;
            if depth == 0 {
                return i + 1;
            }
        }
        i += 1;
    }
    chars.len()
}

fn complex_specificity(selector: &str) -> Specificity {
    let chars: Vec<(usize, char)> = selector.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map(|(b, _)| *b).unwrap_or(selector.len());
    let mut total = Specificity::ZERO;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i].1;
        match c {
            '#' => {
                total.ids += 1;
                i = skip_ident(&chars, i + 1);
            }
            '.' => {
                total.classes += 1;
                i = skip_ident(&chars, i + 1);
            }
            '[' => {
                total.classes += 1;
                i = skip_group(&chars, i, '[', ']');
            }
            ':' if chars.get(i + 1).map(|(_, c)| *c) == Some(':') => {
                total.types += 1;
                i = skip_ident(&chars, i + 2);
                if chars.get(i).map(|(_, c)| *c) == Some('(') {
                    i = skip_group(&chars, i, '(', ')');
                }
            }
            ':' => {
                let name_end = skip_ident(&chars, i + 1);
                let name = selector[byte_at(i + 1)..byte_at(name_end)].to_ascii_lowercase();
                i = name_end;

                let args = if chars.get(i).map(|(_, c)| *c) == Some('(') {
                    let end = skip_group(&chars, i, '(', ')');
                    let inner_start = byte_at(i + 1);
                    let inner_end = byte_at(end.saturating_sub(1)).max(inner_start);
                    i = end;
                    Some(&selector[inner_start..inner_end])
                } else {
                    None
                };

                total = total.add(match (name.as_str(), args) {
                    ("where", Some(_)) => Specificity::ZERO,
                    ("is" | "not" | "has" | "matches" | "any", Some(args)) => specificity(args),
                    (n, None) if LEGACY_PSEUDO_ELEMENTS.contains(&n) => Specificity {
                        types: 1,
                        ..Specificity::ZERO
                    },
                    _ => Specificity {
                        classes: 1,
                        ..Specificity::ZERO
                    },
                });
            }
            c if c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii() => {
                total.types += 1;
                i = skip_ident(&chars, i);
            }
            _ => i += 1,
        }
    }

    total
}
