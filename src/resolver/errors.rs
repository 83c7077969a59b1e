//! Resolution error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::manifest::ManifestError;

/// Error during dependency resolution.
///
/// All variants surface to the top-level caller unmodified; the resolver
/// performs no internal retries and no silent recovery.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("failed to fetch versions for `{location}`: {source}")]
    VersionFetch {
        location: String,
        #[source]
        source: git2::Error,
    },

    #[error("invalid constraint `{constraint}`: {reason}")]
    ConstraintParse { constraint: String, reason: String },

    #[error("mutually exclusive constraints (`{first}` and `{second}`) found")]
    MutuallyExclusive { first: String, second: String },

    #[error("no version of `{package}` satisfies {constraints:?}")]
    NoSatisfyingVersion {
        package: String,
        constraints: Vec<String>,
    },

    #[error("failed to check out `{reference}` in {dir}: {source}", dir = .dir.display())]
    CheckoutFailed {
        reference: String,
        dir: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("dependency tree too deep, unable to resolve (limit {limit})")]
    DepthExceeded { limit: usize },
}
