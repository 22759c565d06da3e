//! Static resource probe
//!
//! Decides whether a request path names something on disk under the server
//! root. The probe only routes; it never reads or serves content.

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Result of probing the filesystem for a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Existing file or directory under the root
    Found(PathBuf),
    /// Nothing usable on disk: hand the request to the dynamic handler
    Missing,
}

/// Probe `url_path` against `root`.
///
/// The leading slash is stripped; an empty remainder stands for the root
/// itself when listings are enabled and for `index.html` otherwise.
/// Undecodable paths, `..` segments and anything resolving outside the root
/// (symlinks included) count as missing.
pub async fn probe(root: &Path, url_path: &str, dir_listing: bool) -> Probe {
    let Some(relative) = relative_candidate(url_path, dir_listing) else {
        return Probe::Missing;
    };
    let candidate = root.join(relative);

    let (Ok(root), Ok(resolved)) = (
        fs::canonicalize(root).await,
        fs::canonicalize(&candidate).await,
    ) else {
        return Probe::Missing;
    };
    if !resolved.starts_with(&root) {
        crate::logger::log_warning(&format!(
            "Path traversal attempt blocked: {url_path} -> {}",
            resolved.display()
        ));
        return Probe::Missing;
    }

    // `file.css/` names no file
    if names_directory(url_path) && !fs::metadata(&resolved).await.is_ok_and(|m| m.is_dir()) {
        return Probe::Missing;
    }

    Probe::Found(candidate)
}

/// A non-root path with a trailing slash can only match a directory
fn names_directory(url_path: &str) -> bool {
    percent_decode_str(url_path)
        .decode_utf8()
        .is_ok_and(|decoded| decoded.ends_with('/') && !decoded.trim_start_matches('/').is_empty())
}

/// Map a URL path to a normalized path relative to the root
#[must_use]
pub fn relative_candidate(url_path: &str, dir_listing: bool) -> Option<PathBuf> {
    let decoded = percent_decode_str(url_path).decode_utf8().ok()?;
    let stripped = decoded.trim_start_matches('/');

    if stripped.is_empty() {
        let fallback = if dir_listing { "." } else { "index.html" };
        return Some(PathBuf::from(fallback));
    }

    let mut normalized = PathBuf::new();
    for component in Path::new(stripped).components() {
        match component {
            Component::CurDir => {}
            Component::Normal(segment) => normalized.push(segment),
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    Some(normalized)
}
