//! Stability tiers for package versions.
//!
//! Every version carries a stability tier derived from its prerelease
//! text, and every manifest may set a `minimum-stability` floor. The
//! tiers form a total order: dev < alpha < beta < rc < stable.

use std::fmt;

/// Maturity classification of a version.
///
/// The discriminants participate in the canonical ordering key
/// (see [`crate::resolver::version`]), so they are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stability {
    Dev = 1,
    Alpha = 2,
    Beta = 3,
    Rc = 4,
    Stable = 5,
}

impl Stability {
    /// Parse a manifest `minimum-stability` value.
    ///
    /// Unknown or empty values default to stable, matching the manifest
    /// contract (absent = stable).
    pub fn parse(s: &str) -> Stability {
        match s.to_lowercase().as_str() {
            "dev" => Stability::Dev,
            "alpha" => Stability::Alpha,
            "beta" => Stability::Beta,
            "rc" => Stability::Rc,
            _ => Stability::Stable,
        }
    }

    /// Classify a prerelease label (the first dot-separated segment of
    /// the prerelease text). An empty label means a stable release; any
    /// label other than the well-known ones means dev.
    pub fn from_prerelease_label(label: &str) -> Stability {
        match label.to_lowercase().as_str() {
            "" => Stability::Stable,
            "alpha" => Stability::Alpha,
            "beta" => Stability::Beta,
            "rc" => Stability::Rc,
            _ => Stability::Dev,
        }
    }

    /// The suffix appended to constraints lacking a prerelease qualifier
    /// when this tier is the stability floor. Stable's name is empty and
    /// is never appended.
    pub fn suffix(&self) -> &'static str {
        match self {
            Stability::Dev => "dev",
            Stability::Alpha => "alpha",
            Stability::Beta => "beta",
            Stability::Rc => "rc",
            Stability::Stable => "",
        }
    }
}

impl Default for Stability {
    fn default() -> Self {
        Stability::Stable
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stability::Stable => write!(f, "stable"),
            other => write!(f, "{}", other.suffix()),
        }
    }
}
