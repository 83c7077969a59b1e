//! Source trait - common interface for repository access.

use std::path::Path;

use crate::core::manifest::Manifest;
use crate::resolver::errors::ResolveError;
use crate::resolver::version::VersionCandidate;

/// Repository access used by the walker and materializer.
///
/// Implementations must be shareable across the walker's parallel
/// requirement processing; per-path mutual exclusion is handled by the
/// caller.
pub trait Source: Sync {
    /// The available versions for a repository location, sorted newest
    /// first. Uses the working copy at `cache_dir`, cloning it if
    /// absent and refreshing its tags otherwise.
    fn versions(
        &self,
        location: &str,
        cache_dir: &Path,
    ) -> Result<Vec<VersionCandidate>, ResolveError>;

    /// Bring the working copy at `dir` to `reference`, discarding local
    /// modifications.
    fn checkout(&self, dir: &Path, reference: &str) -> Result<(), ResolveError>;

    /// Clone a remote repository into `dest`.
    fn clone_remote(&self, location: &str, dest: &Path) -> Result<(), ResolveError>;

    /// Clone an already-cached working copy into `dest` without
    /// touching the network.
    fn clone_local(&self, cache_dir: &Path, dest: &Path) -> Result<(), ResolveError>;

    /// Read the manifest of the content currently checked out at `dir`.
    /// Never cached; the same working copy changes across a run.
    fn read_manifest(&self, dir: &Path) -> Result<Manifest, ResolveError>;
}
