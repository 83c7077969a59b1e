//! Test doubles for Capstan unit tests.
//!
//! Provides an in-memory [`Source`] whose repositories are defined by
//! tag lists and per-reference manifests, with call recording for
//! checkout and clone instrumentation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::manifest::Manifest;
use crate::resolver::errors::ResolveError;
use crate::resolver::version::{candidates_from_tags, VersionCandidate};
use crate::sources::{location, Source};

/// Build a manifest literal for tests.
pub fn manifest_with(name: &str, requirements: &[(&str, &str)], stability: &str) -> Manifest {
    Manifest {
        name: name.to_string(),
        version: "0.0.0".to_string(),
        requirements: requirements
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        minimum_stability: stability.to_string(),
        ..Manifest::default()
    }
}

#[derive(Default)]
struct FakeRepo {
    tags: Vec<String>,
    /// Manifest served per checked-out reference.
    manifests: HashMap<String, Manifest>,
    fail_versions: bool,
}

/// An in-memory source. Repositories are keyed by base name; any
/// directory whose final component matches a repository maps to it, so
/// cache and install working copies share repository state. Checkouts
/// accept any reference and are recorded for assertions.
#[derive(Default)]
pub struct FakeSource {
    repos: HashMap<String, FakeRepo>,
    checkouts: Mutex<HashMap<PathBuf, Vec<String>>>,
    fetches: Mutex<HashMap<String, usize>>,
    local_clones: Mutex<Vec<(PathBuf, PathBuf)>>,
    remote_clones: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        FakeSource::default()
    }

    pub fn add_repo(&mut self, name: &str, tags: &[&str]) {
        let repo = self.repos.entry(name.to_string()).or_default();
        repo.tags = tags.iter().map(|t| t.to_string()).collect();
    }

    pub fn set_manifest(&mut self, name: &str, reference: &str, manifest: Manifest) {
        self.repos
            .entry(name.to_string())
            .or_default()
            .manifests
            .insert(reference.to_string(), manifest);
    }

    /// Make version fetches for this repository fail with a transport
    /// error.
    pub fn fail_versions(&mut self, name: &str) {
        self.repos.entry(name.to_string()).or_default().fail_versions = true;
    }

    /// The last reference checked out in `dir`, if any.
    pub fn checked_out(&self, dir: impl AsRef<Path>) -> Option<String> {
        self.checkouts
            .lock()
            .unwrap()
            .get(dir.as_ref())
            .and_then(|refs| refs.last().cloned())
    }

    /// How many times this repository's versions were fetched.
    pub fn version_fetches(&self, name: &str) -> usize {
        *self.fetches.lock().unwrap().get(name).unwrap_or(&0)
    }

    /// Recorded local (cache -> install) clones.
    pub fn local_clones(&self) -> Vec<(PathBuf, PathBuf)> {
        self.local_clones.lock().unwrap().clone()
    }

    /// Recorded remote clones.
    pub fn remote_clones(&self) -> Vec<(String, PathBuf)> {
        self.remote_clones.lock().unwrap().clone()
    }

    fn repo_for_dir(&self, dir: &Path) -> Option<&FakeRepo> {
        let name = dir.file_name()?.to_string_lossy().into_owned();
        self.repos.get(&name)
    }
}

impl Source for FakeSource {
    fn versions(
        &self,
        repo_location: &str,
        _cache_dir: &Path,
    ) -> Result<Vec<VersionCandidate>, ResolveError> {
        let name = location::base_name(repo_location);
        *self.fetches.lock().unwrap().entry(name.clone()).or_insert(0) += 1;

        let repo = self.repos.get(&name);
        match repo {
            Some(repo) if !repo.fail_versions => {
                Ok(candidates_from_tags(repo.tags.iter()))
            }
            _ => Err(ResolveError::VersionFetch {
                location: repo_location.to_string(),
                source: git2::Error::from_str("fake transport failure"),
            }),
        }
    }

    fn checkout(&self, dir: &Path, reference: &str) -> Result<(), ResolveError> {
        self.checkouts
            .lock()
            .unwrap()
            .entry(dir.to_path_buf())
            .or_default()
            .push(reference.to_string());
        Ok(())
    }

    fn clone_remote(&self, repo_location: &str, dest: &Path) -> Result<(), ResolveError> {
        self.remote_clones
            .lock()
            .unwrap()
            .push((repo_location.to_string(), dest.to_path_buf()));
        Ok(())
    }

    fn clone_local(&self, cache_dir: &Path, dest: &Path) -> Result<(), ResolveError> {
        self.local_clones
            .lock()
            .unwrap()
            .push((cache_dir.to_path_buf(), dest.to_path_buf()));
        Ok(())
    }

    fn read_manifest(&self, dir: &Path) -> Result<Manifest, ResolveError> {
        let current = self.checked_out(dir);
        if let (Some(repo), Some(reference)) = (self.repo_for_dir(dir), current) {
            if let Some(manifest) = repo.manifests.get(&reference) {
                return Ok(manifest.clone());
            }
        }

        // A checked-out repository with no declared manifest behaves as
        // an empty package (no further requirements).
        let name = dir
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(manifest_with(&name, &[], ""))
    }
}
