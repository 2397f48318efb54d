use std::collections::HashMap;

use crate::token::Token;

/// Re-attach curated metadata to tokens freshly parsed from CSS.
///
/// Each new token is matched to an existing one by `(name, context)`,
/// falling back to the first existing token with the same name. Type,
/// group, description, and the governance fields are copied over; the
/// context is copied only when the new token has none.
pub fn merge_metadata(new_tokens: Vec<Token>, existing: &[Token]) -> Vec<Token> {
    let mut by_key: HashMap<(String, String), &Token> = HashMap::new();
    let mut by_name: HashMap<String, &Token> = HashMap::new();
    for token in existing {
        let name = token.name.to_ascii_lowercase();
        by_key
            .entry((name.clone(), token.context.to_ascii_lowercase()))
            .or_insert(token);
        by_name.entry(name).or_insert(token);
    }

    new_tokens
        .into_iter()
        .map(|mut token| {
            let name = token.name.to_ascii_lowercase();
            let previous = by_key
                .get(&(name.clone(), token.context.to_ascii_lowercase()))
                .or_else(|| by_name.get(&name));
            if let Some(previous) = previous {
                token.token_type = previous.token_type;
                token.group = previous.group.clone();
                token.description = previous.description.clone();
                token.status = previous.status;
                token.owner = previous.owner;
                token.version = previous.version.clone();
                token.changelog = previous.changelog.clone();
                token.linked_components = previous.linked_components.clone();
                if token.context.is_empty() {
                    token.context = previous.context.clone();
                }
            }
            token
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize_token, DEFAULT_GROUP};
    use crate::token::{RawToken, TokenStatus, TokenType};

    fn token(name: &str, value: &str, context: &str) -> Token {
        normalize_token(&RawToken::new(name, value).with_context(context), DEFAULT_GROUP).unwrap()
    }

    #[test]
    fn reattaches_metadata_by_name_and_context() {
        let mut curated = token("--brand", "#000", ":root");
        curated.token_type = TokenType::Color;
        curated.group = "Brand".into();
        curated.description = "Primary brand colour".into();
        curated.status = TokenStatus::Ready;
        curated.version = "1.2.0".into();

        let mut admin = token("--brand", "#111", ".is-admin");
        admin.group = "Admin".into();

        let merged = merge_metadata(
            vec![token("--brand", "#fff", ":root"), token("--brand", "#eee", ".is-admin")],
            &[curated, admin],
        );
        assert_eq!(merged[0].value, "#fff");
        assert_eq!(merged[0].group, "Brand");
        assert_eq!(merged[0].token_type, TokenType::Color);
        assert_eq!(merged[0].status, TokenStatus::Ready);
        assert_eq!(merged[0].version, "1.2.0");
        assert_eq!(merged[1].group, "Admin");
    }

    #[test]
    fn falls_back_to_name_match() {
        let mut curated = token("--space", "4px", ":root");
        curated.group = "Spacing".into();
        let merged = merge_metadata(vec![token("--SPACE", "8px", ".card")], &[curated]);
        assert_eq!(merged[0].group, "Spacing");
        assert_eq!(merged[0].context, ".card");
        assert_eq!(merged[0].value, "8px");
    }

    #[test]
    fn missing_context_is_filled() {
        let curated = token("--a", "1", ".is-admin");
        let mut fresh = token("--a", "2", ":root");
        fresh.context.clear();
        let merged = merge_metadata(vec![fresh], &[curated]);
        assert_eq!(merged[0].context, ".is-admin");
    }

    #[test]
    fn unmatched_tokens_are_untouched() {
        let fresh = token("--new", "1", ":root");
        let merged = merge_metadata(vec![fresh.clone()], &[]);
        assert_eq!(merged, vec![fresh]);
    }
}
