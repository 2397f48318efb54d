//! Host hooks for running from a shell.

use stylekit_common::{CacheInvalidator, IdentityResolver};

/// Author taken from `STYLEKIT_AUTHOR`, then `USER` or `USERNAME`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvIdentity;

impl EnvIdentity {
    fn lookup(get: impl Fn(&str) -> Option<String>) -> Option<String> {
        ["STYLEKIT_AUTHOR", "USER", "USERNAME"]
            .into_iter()
            .filter_map(get)
            .map(|name| name.trim().to_string())
            .find(|name| !name.is_empty())
    }
}

impl IdentityResolver for EnvIdentity {
    fn current_author(&self) -> Option<String> {
        Self::lookup(|key| std::env::var(key).ok())
    }
}

/// There is no downstream cache when running from a shell; just log it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogInvalidator;

impl CacheInvalidator for LogInvalidator {
    fn invalidate(&self) {
        tracing::info!("css cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn explicit_author_wins() {
        let vars = env(&[("STYLEKIT_AUTHOR", "design-bot"), ("USER", "alex")]);
        assert_eq!(
            EnvIdentity::lookup(|k| vars.get(k).cloned()).as_deref(),
            Some("design-bot")
        );
    }

    #[test]
    fn blank_values_are_skipped() {
        let vars = env(&[("STYLEKIT_AUTHOR", "  "), ("USERNAME", "sam")]);
        assert_eq!(
            EnvIdentity::lookup(|k| vars.get(k).cloned()).as_deref(),
            Some("sam")
        );
    }

    #[test]
    fn nothing_set_is_none() {
        let vars = env(&[]);
        assert!(EnvIdentity::lookup(|k| vars.get(k).cloned()).is_none());
    }
}
