//! Repository location normalization.
//!
//! A dependency name may be a bare identifier, an `owner/repo`
//! shorthand, or an explicit URL or local path. Shorthands expand to the
//! canonical hosting URL; everything else passes through unchanged, so
//! the resolver treats all locations uniformly once normalized.

use url::Url;

/// Canonical hosting prefix for shorthand package names.
pub const DEFAULT_HOST: &str = "https://github.com";

/// Organization assumed for bare package names.
pub const DEFAULT_ORG: &str = "capstan-cli";

/// Repository name prefix for bare package names (`foo` lives in
/// `capstan-cli/cli-foo`).
pub const PACKAGE_PREFIX: &str = "cli-";

/// Expand a dependency name to a repository location.
pub fn normalize(name: &str) -> String {
    if name.starts_with("http://")
        || name.starts_with("https://")
        || name.starts_with("ssh://")
        || name.starts_with("git@")
        || name.starts_with("file://")
        || name.ends_with(".git")
    {
        return name.to_string();
    }

    if name.contains('/') {
        format!("{}/{}.git", DEFAULT_HOST, name)
    } else {
        format!(
            "{}/{}/{}{}.git",
            DEFAULT_HOST, DEFAULT_ORG, PACKAGE_PREFIX, name
        )
    }
}

/// The stable directory name derived from a repository location: the
/// last path segment with any `.git` suffix removed. Keys both the
/// shared cache and the project install layout.
pub fn base_name(location: &str) -> String {
    let segment = match Url::parse(location) {
        Ok(url) => url
            .path_segments()
            .and_then(|s| s.filter(|p| !p.is_empty()).last())
            .map(|s| s.to_string())
            .unwrap_or_else(|| location.to_string()),
        // scp-like syntax (git@host:owner/repo) and bare paths
        Err(_) => {
            let tail = location.rsplit(['/', ':']).next().unwrap_or(location);
            tail.to_string()
        }
    };

    segment
        .strip_suffix(".git")
        .unwrap_or(&segment)
        .to_string()
}
