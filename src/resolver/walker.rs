//! Dependency walker: the recursive driver of a resolution run.
//!
//! For each requirement in a manifest the walker normalizes the
//! dependency's repository location, obtains its candidate list
//! (cache-checked first), registers the constraint against the
//! dependency's accumulated record, brings the cached working copy to a
//! working reference, re-reads the dependency's own manifest, and
//! recurses. Requirements within one manifest fan out in parallel; a
//! parent blocks until its whole level settles, and the first observed
//! error aborts the remaining siblings (their results are ignored, not
//! cancelled).

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use crate::core::manifest::Manifest;
use crate::core::stability::Stability;
use crate::resolver::constraint;
use crate::resolver::errors::ResolveError;
use crate::resolver::version::VersionCandidate;
use crate::sources::{location, Source};

/// Maximum recursion depth. This is the cycle-breaker; true dependency
/// cycles are not otherwise detected.
pub const MAX_DEPTH: usize = 6;

/// Requirement keys naming a language runtime itself. These express a
/// runtime version floor for the installer, not a resolvable package,
/// and never enter the dependency graph.
const RUNTIME_NAMES: [&str; 5] = ["python", "go", "node", "ruby", "php"];

/// Check whether a requirement key is a runtime pseudo-dependency.
pub fn is_runtime(name: &str) -> bool {
    RUNTIME_NAMES
        .iter()
        .any(|r| name.eq_ignore_ascii_case(r))
}

/// Accumulated state for one dependency across a resolution run: its
/// full sorted candidate list plus every constraint contributed by
/// every requiring package. Grows monotonically; never shrinks.
#[derive(Debug, Clone, Default)]
pub struct DependencyRecord {
    pub versions: Vec<VersionCandidate>,
    pub constraints: Vec<String>,
}

/// Per-run resolution state, keyed by dependency cache path. Owned by
/// one walker, discarded when the run completes.
#[derive(Debug, Default)]
pub struct ResolutionState {
    records: BTreeMap<PathBuf, DependencyRecord>,
}

impl ResolutionState {
    /// Iterate accumulated records in deterministic (path) order.
    pub fn records(&self) -> impl Iterator<Item = (&Path, &DependencyRecord)> {
        self.records.iter().map(|(p, r)| (p.as_path(), r))
    }

    pub fn get(&self, cache_dir: &Path) -> Option<&DependencyRecord> {
        self.records.get(cache_dir)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The recursive resolution driver.
pub struct Walker<'a> {
    source: &'a dyn Source,

    /// Shared cache root holding one working copy per dependency.
    cache_root: PathBuf,

    state: Mutex<ResolutionState>,

    /// Per-cache-path locks serializing git mutation; sibling branches
    /// may reference the same dependency concurrently.
    path_locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl<'a> Walker<'a> {
    pub fn new(source: &'a dyn Source, cache_root: PathBuf) -> Self {
        Walker {
            source,
            cache_root,
            state: Mutex::new(ResolutionState::default()),
            path_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Walk the manifest's full requirement tree, accumulating
    /// per-dependency state. On success every reachable dependency has
    /// a record; the final selection happens afterwards against each
    /// record's complete merged constraint set.
    pub fn walk(&self, manifest: &Manifest) -> Result<(), ResolveError> {
        self.walk_at(manifest, 1)
    }

    /// Take the accumulated state out of a finished walker.
    pub fn into_state(self) -> ResolutionState {
        self.state.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn walk_at(&self, manifest: &Manifest, depth: usize) -> Result<(), ResolveError> {
        if depth > MAX_DEPTH {
            return Err(ResolveError::DepthExceeded { limit: MAX_DEPTH });
        }

        tracing::debug!("fetching dependencies for {}", manifest.name);
        let floor = manifest.minimum_stability();

        let requirements: Vec<(&str, &str)> = manifest
            .requirements
            .iter()
            .map(|(name, constraint)| (name.as_str(), constraint.as_str()))
            .filter(|(name, _)| !is_runtime(name))
            .collect();

        requirements
            .into_par_iter()
            .try_for_each(|(name, constraint)| {
                self.resolve_requirement(name, constraint, floor, depth)
            })
    }

    fn resolve_requirement(
        &self,
        name: &str,
        constraint: &str,
        floor: Stability,
        depth: usize,
    ) -> Result<(), ResolveError> {
        let repo_location = location::normalize(name);
        let cache_dir = self.cache_root.join(location::base_name(&repo_location));

        let path_lock = self.path_lock(&cache_dir);
        let guard = path_lock.lock().unwrap_or_else(|e| e.into_inner());

        // One candidate fetch per dependency per run; later requirements
        // on the same dependency reuse the recorded list.
        let cached = {
            let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.records.get(&cache_dir).map(|r| r.versions.clone())
        };
        let versions = match cached {
            Some(versions) => versions,
            None => self.source.versions(&repo_location, &cache_dir)?,
        };

        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            let record = state.records.entry(cache_dir.clone()).or_default();
            record.versions = versions.clone();
            record.constraints.push(constraint.to_string());
        }

        // Only this requirement's own constraint is known to be
        // satisfiable here; siblings may narrow the choice later. When
        // nothing satisfies yet, check out the raw constraint string as
        // a provisional reference and let the materializer re-resolve
        // for real.
        let constraints = [constraint.to_string()];
        let reference = match constraint::select(name, &constraints, &versions, floor) {
            Ok(candidate) => candidate.reference.clone(),
            Err(_) => {
                tracing::debug!("no version of {} satisfies {} yet, using provisional reference", name, constraint);
                constraint.to_string()
            }
        };

        self.source.checkout(&cache_dir, &reference)?;

        // The working copy just changed; its manifest must be re-read.
        let dep_manifest = self.source.read_manifest(&cache_dir)?;
        drop(guard);

        self.walk_at(&dep_manifest, depth + 1)
    }

    fn path_lock(&self, cache_dir: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.path_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(cache_dir.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
