//! Git-backed source: tag listings, forced checkouts, and cache clones.

use std::fs;
use std::path::Path;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{AutotagOption, FetchOptions, Oid, Repository, ResetType};

use crate::core::manifest::Manifest;
use crate::resolver::errors::ResolveError;
use crate::resolver::version::{candidates_from_tags, VersionCandidate};
use crate::sources::Source;

/// Repository access backed by libgit2.
///
/// Working copies managed through this source are resolver-owned
/// scratch state; every checkout is forced.
#[derive(Debug, Default)]
pub struct GitSource;

impl GitSource {
    pub fn new() -> Self {
        GitSource
    }

    /// Open the cached copy and refresh all tags with a forced update.
    /// "Already up to date" is not an error in libgit2, so a no-op
    /// fetch falls through as success.
    fn update_tags(cache_dir: &Path) -> Result<Repository, git2::Error> {
        let repo = Repository::open(cache_dir)?;
        {
            let mut remote = repo.find_remote("origin")?;
            let mut opts = FetchOptions::new();
            opts.download_tags(AutotagOption::All);
            remote.fetch(&["+refs/tags/*:refs/tags/*"], Some(&mut opts), None)?;
        }
        Ok(repo)
    }

    /// Full clone (unbounded history, to retrieve every tag).
    fn clone_full(location: &str, cache_dir: &Path) -> Result<Repository, git2::Error> {
        if let Some(parent) = cache_dir.parent() {
            let _ = fs::create_dir_all(parent);
        }
        Repository::clone(location, cache_dir)
    }

    /// Resolve `refname` and pin the working copy to its commit.
    fn pin_to_ref(repo: &Repository, refname: &str) -> Result<(), git2::Error> {
        let commit = repo.find_reference(refname)?.peel_to_commit()?;
        Self::reset_to(repo, &commit)
    }

    /// Detach HEAD at `commit` and force the worktree to match.
    fn reset_to(repo: &Repository, commit: &git2::Commit<'_>) -> Result<(), git2::Error> {
        repo.set_head_detached(commit.id())?;
        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        repo.reset(commit.as_object(), ResetType::Hard, Some(&mut checkout))
    }
}

impl Source for GitSource {
    fn versions(
        &self,
        location: &str,
        cache_dir: &Path,
    ) -> Result<Vec<VersionCandidate>, ResolveError> {
        let fetch_err = |source: git2::Error| ResolveError::VersionFetch {
            location: location.to_string(),
            source,
        };

        let repo = if cache_dir.exists() {
            tracing::debug!("updating tags for {}", location);
            Self::update_tags(cache_dir).map_err(fetch_err)?
        } else {
            tracing::info!("cloning {}", location);
            Self::clone_full(location, cache_dir).map_err(fetch_err)?
        };

        let tags = repo.tag_names(None).map_err(fetch_err)?;
        Ok(candidates_from_tags(tags.iter().flatten()))
    }

    fn checkout(&self, dir: &Path, reference: &str) -> Result<(), ResolveError> {
        let checkout_err = |source: git2::Error| ResolveError::CheckoutFailed {
            reference: reference.to_string(),
            dir: dir.to_path_buf(),
            source,
        };

        let repo = Repository::open(dir).map_err(checkout_err)?;

        // Strict fallback chain: tag, then branch, then raw revision.
        // The first success wins; all three failing surfaces the error
        // from the final attempt.
        let mut result = Self::pin_to_ref(&repo, &format!("refs/tags/{}", reference));
        if result.is_err() {
            result = Self::pin_to_ref(&repo, &format!("refs/heads/{}", reference));
        }
        if result.is_err() {
            result = Oid::from_str(reference)
                .and_then(|oid| repo.find_commit(oid))
                .and_then(|commit| Self::reset_to(&repo, &commit));
        }

        result.map_err(checkout_err)
    }

    fn clone_remote(&self, location: &str, dest: &Path) -> Result<(), ResolveError> {
        tracing::info!("cloning {}", location);
        if let Some(parent) = dest.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let mut opts = FetchOptions::new();
        opts.depth(1);
        RepoBuilder::new()
            .fetch_options(opts)
            .clone(location, dest)
            .map_err(|source| ResolveError::VersionFetch {
                location: location.to_string(),
                source,
            })?;
        Ok(())
    }

    fn clone_local(&self, cache_dir: &Path, dest: &Path) -> Result<(), ResolveError> {
        let location = cache_dir.to_string_lossy().into_owned();
        Repository::clone(&location, dest).map_err(|source| ResolveError::VersionFetch {
            location,
            source,
        })?;
        Ok(())
    }

    fn read_manifest(&self, dir: &Path) -> Result<Manifest, ResolveError> {
        Ok(Manifest::read(dir)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use tempfile::TempDir;

    /// Build a repository with two commits: `first` tagged `1.0.0` and
    /// carrying branch `shared`, `second` also tagged `shared` so the
    /// name exists as tag and branch simultaneously.
    fn fixture_repo(dir: &Path) -> (Repository, Oid, Oid) {
        let repo = Repository::init(dir).unwrap();
        let sig = Signature::now("test", "test@example.com").unwrap();

        let first = commit_file(&repo, &sig, "a.txt", "one", &[]);
        let second = {
            let parent = repo.find_commit(first).unwrap();
            commit_file(&repo, &sig, "a.txt", "two", &[&parent])
        };

        {
            let first_commit = repo.find_commit(first).unwrap();
            repo.branch("shared", &first_commit, true).unwrap();
            repo.tag_lightweight("1.0.0", first_commit.as_object(), true)
                .unwrap();
            let second_commit = repo.find_commit(second).unwrap();
            repo.tag_lightweight("shared", second_commit.as_object(), true)
                .unwrap();
        }

        (repo, first, second)
    }

    fn commit_file(
        repo: &Repository,
        sig: &Signature<'_>,
        name: &str,
        contents: &str,
        parents: &[&git2::Commit<'_>],
    ) -> Oid {
        std::fs::write(repo.workdir().unwrap().join(name), contents).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), sig, sig, contents, &tree, parents)
            .unwrap()
    }

    #[test]
    fn test_checkout_tag() {
        let tmp = TempDir::new().unwrap();
        let (repo, first, _) = fixture_repo(tmp.path());

        GitSource::new().checkout(tmp.path(), "1.0.0").unwrap();
        assert_eq!(repo.head().unwrap().target(), Some(first));
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("a.txt")).unwrap(),
            "one"
        );
    }

    #[test]
    fn test_checkout_prefers_tag_over_branch() {
        let tmp = TempDir::new().unwrap();
        let (repo, _, second) = fixture_repo(tmp.path());

        // `shared` names both a tag (second commit) and a branch (first
        // commit); the tag attempt must win.
        GitSource::new().checkout(tmp.path(), "shared").unwrap();
        assert_eq!(repo.head().unwrap().target(), Some(second));
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("a.txt")).unwrap(),
            "two"
        );
    }

    #[test]
    fn test_checkout_falls_back_to_branch_then_rev() {
        let tmp = TempDir::new().unwrap();
        let (repo, first, second) = fixture_repo(tmp.path());

        // Branch only.
        repo.branch("feature", &repo.find_commit(first).unwrap(), true)
            .unwrap();
        GitSource::new().checkout(tmp.path(), "feature").unwrap();
        assert_eq!(repo.head().unwrap().target(), Some(first));

        // Raw revision hash.
        GitSource::new()
            .checkout(tmp.path(), &second.to_string())
            .unwrap();
        assert_eq!(repo.head().unwrap().target(), Some(second));
    }

    #[test]
    fn test_checkout_all_attempts_exhausted() {
        let tmp = TempDir::new().unwrap();
        fixture_repo(tmp.path());

        let err = GitSource::new()
            .checkout(tmp.path(), "no-such-ref")
            .unwrap_err();
        assert!(matches!(err, ResolveError::CheckoutFailed { .. }));
    }

    #[test]
    fn test_checkout_discards_local_modifications() {
        let tmp = TempDir::new().unwrap();
        fixture_repo(tmp.path());

        std::fs::write(tmp.path().join("a.txt"), "scribbled").unwrap();
        GitSource::new().checkout(tmp.path(), "1.0.0").unwrap();
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("a.txt")).unwrap(),
            "one"
        );
    }

    #[test]
    fn test_versions_from_local_clone() {
        let upstream = TempDir::new().unwrap();
        let (repo, first, _) = fixture_repo(upstream.path());
        repo.tag_lightweight(
            "1.1.0-rc.1",
            repo.find_commit(first).unwrap().as_object(),
            true,
        )
        .unwrap();

        let cache = TempDir::new().unwrap();
        let cache_dir = cache.path().join("pkg");

        let source = GitSource::new();
        let location = upstream.path().to_string_lossy().into_owned();

        // First call clones; non-semver tags (`shared`) are dropped.
        let versions = source.versions(&location, &cache_dir).unwrap();
        let refs: Vec<_> = versions.iter().map(|v| v.reference.as_str()).collect();
        assert_eq!(refs, ["1.1.0-rc.1", "1.0.0"]);

        // Second call goes through the fetch path; an up-to-date remote
        // is success, not failure.
        let again = source.versions(&location, &cache_dir).unwrap();
        assert_eq!(again.len(), versions.len());
    }

    #[test]
    fn test_clone_local_then_pin() {
        let upstream = TempDir::new().unwrap();
        fixture_repo(upstream.path());

        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("install");

        let source = GitSource::new();
        source.clone_local(upstream.path(), &dest).unwrap();
        source.checkout(&dest, "1.0.0").unwrap();
        assert_eq!(std::fs::read_to_string(dest.join("a.txt")).unwrap(), "one");
    }
}
