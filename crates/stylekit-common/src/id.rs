use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes behind a revision id (16 base64url characters).
const REVISION_ID_BYTES: usize = 12;

/// Generate a random, URL-safe revision id.
///
/// Falls back to a timestamp-derived id if the OS entropy source fails.
pub fn new_revision_id() -> String {
    let mut bytes = [0u8; REVISION_ID_BYTES];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => URL_SAFE_NO_PAD.encode(bytes),
        Err(e) => {
            tracing::warn!(error = %e, "entropy source unavailable, using timestamp revision id");
            fallback_revision_id()
        }
    }
}

pub(crate) fn fallback_revision_id() -> String {
    let now = chrono::Utc::now();
    format!(
        "rev-{}-{:09}",
        now.timestamp(),
        now.timestamp_subsec_nanos()
    )
}

/// Current time as an ISO-8601 UTC timestamp (`2024-05-01T12:00:00Z`).
pub fn utc_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_id_is_url_safe() {
        let id = new_revision_id();
        assert_eq!(id.len(), 16);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn revision_id_is_unique() {
        let a = new_revision_id();
        let b = new_revision_id();
        assert_ne!(a, b);
    }

    #[test]
    fn fallback_id_is_url_safe() {
        let id = fallback_revision_id();
        assert!(id.starts_with("rev-"));
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn utc_timestamp_is_iso8601() {
        let ts = utc_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
