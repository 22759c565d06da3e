//! HTTP cache validation module
//!
//! `ETag` derivation from file metadata and `If-None-Match` handling.

use std::fs::Metadata;
use std::time::UNIX_EPOCH;

/// Derive a quoted `ETag` from file size and modification time.
///
/// Unchanged files always produce the same tag, so repeated requests
/// revalidate without hashing the content.
#[must_use]
pub fn etag_for(metadata: &Metadata) -> String {
    let modified = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_nanos());
    format!("\"{:x}-{:x}\"", metadata.len(), modified)
}

/// Check if the client's `If-None-Match` header matches the server's `ETag`.
///
/// Accepts a single tag, a comma-separated list, weak tags (`W/"..."`) and
/// the `*` wildcard. A match means the response should be 304.
#[must_use]
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client| {
        client.split(',').map(str::trim).any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_is_stable_for_unchanged_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"hello world").unwrap();

        let first = etag_for(&std::fs::metadata(&path).unwrap());
        let second = etag_for(&std::fs::metadata(&path).unwrap());
        assert_eq!(first, second);
        assert!(first.starts_with("\"b-"));
        assert!(first.ends_with('"'));
    }

    #[test]
    fn test_etag_changes_with_size() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, b"short").unwrap();
        std::fs::write(&b, b"a little longer").unwrap();

        assert_ne!(
            etag_for(&std::fs::metadata(&a).unwrap()),
            etag_for(&std::fs::metadata(&b).unwrap())
        );
    }

    #[test]
    fn test_etag_matches() {
        let etag = "\"abc123\"";
        assert!(etag_matches(Some("\"abc123\""), etag));
        assert!(etag_matches(Some("\"xyz\", \"abc123\""), etag));
        assert!(etag_matches(Some("W/\"abc123\""), etag));
        assert!(etag_matches(Some("*"), etag));
        assert!(!etag_matches(Some("\"different\""), etag));
        assert!(!etag_matches(None, etag));
    }
}
