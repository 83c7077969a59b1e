//! Version model: repository tags as orderable candidates.
//!
//! A tag string parses into a semantic version, a stability tier, and a
//! canonical 64-bit ordering key. The canonical key totally orders all
//! candidates, including across stability tiers, so any filtered subset
//! has a single well-defined newest version.

use semver::Version;

use crate::core::stability::Stability;

/// One published, tag-derived version of a dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCandidate {
    /// Parsed semantic version.
    pub semver: Version,

    /// Normalized version string, used as the checkout reference.
    pub reference: String,

    /// Canonical ordering key: newest version has the largest key.
    pub canonical: u64,

    /// Stability tier derived from the prerelease text.
    pub stability: Stability,
}

impl VersionCandidate {
    /// Parse a repository tag into a candidate.
    ///
    /// Returns `None` for tags that do not look like semantic versions;
    /// such tags are silently dropped from candidate lists, never an
    /// error. Accepts an optional leading `v` and missing minor/patch
    /// components.
    pub fn parse_tag(tag: &str) -> Option<VersionCandidate> {
        let semver = parse_version_lenient(tag)?;

        let pre = semver.pre.as_str();
        let mut parts = pre.split('.');
        let label = parts.next().unwrap_or("");
        let stability = Stability::from_prerelease_label(label);
        let ordinal: u64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);

        let canonical = semver.major * 100_000
            + semver.minor * 10_000
            + semver.patch * 1_000
            + (stability as u64 * 10 + ordinal);

        Some(VersionCandidate {
            reference: semver.to_string(),
            canonical,
            stability,
            semver,
        })
    }
}

/// Parse a list of tags into a candidate list sorted by canonical key
/// descending (newest first). Unparseable tags are skipped.
pub fn candidates_from_tags<I, S>(tags: I) -> Vec<VersionCandidate>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut candidates: Vec<_> = tags
        .into_iter()
        .filter_map(|t| VersionCandidate::parse_tag(t.as_ref()))
        .collect();
    candidates.sort_by(|left, right| right.canonical.cmp(&left.canonical));
    candidates
}

/// Parse a version string, allowing a leading `v` and missing
/// minor/patch components (`1`, `1.2`, `1.2-beta.1`).
pub fn parse_version_lenient(s: &str) -> Option<Version> {
    let s = s.strip_prefix('v').unwrap_or(s);

    if let Ok(v) = s.parse() {
        return Some(v);
    }

    // Split off prerelease/build metadata before counting components.
    let (core, rest) = match s.find(['-', '+']) {
        Some(idx) => (&s[..idx], &s[idx..]),
        None => (s, ""),
    };

    let dots = core.matches('.').count();
    let padded = match dots {
        0 => format!("{}.0.0{}", core, rest),
        1 => format!("{}.0{}", core, rest),
        _ => return None,
    };

    padded.parse().ok()
}
