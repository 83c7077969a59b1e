//! Package installation: resolving and materializing dependency trees.
//!
//! `install` resolves the current project; `install_packages` first
//! fetches named packages into the source tree and then resolves each
//! one's dependencies. Materialization recreates the project-local
//! install directory wholesale and pins every accumulated dependency to
//! the version selected against its complete merged constraint set.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;

use crate::core::manifest::{self, Manifest, ManifestError};
use crate::resolver::constraint;
use crate::resolver::walker::{ResolutionState, Walker};
use crate::sources::{location, GitSource, Source};
use crate::util::context::GlobalContext;

/// Name of the project-local install directory.
pub const INSTALL_DIR: &str = ".capstan";

/// Resolve and materialize the dependencies of the project enclosing
/// the current working directory.
pub fn install(ctx: &GlobalContext) -> Result<()> {
    let project_root = ctx.find_project_root().ok_or(ManifestError::NotFound {
        dir: ctx.cwd().to_path_buf(),
    })?;

    let spinner = progress("Installing packages...");
    let result = install_project_packages(ctx, &GitSource::new(), &project_root);
    finish(spinner, &result);
    result
}

/// Fetch each named package into the source tree, then resolve and
/// materialize its dependencies. A package that fails to install is
/// removed again rather than left half-fetched.
pub fn install_packages(ctx: &GlobalContext, names: &[String]) -> Result<()> {
    let source = GitSource::new();
    for name in names {
        install_package(ctx, &source, name)?;
    }
    Ok(())
}

/// Install one package by name, shorthand, or URL. Returns the path it
/// was installed to.
pub fn install_package(ctx: &GlobalContext, source: &dyn Source, name: &str) -> Result<PathBuf> {
    let repo_location = location::normalize(name);
    let src_dir = ctx.src_dir();
    fs::create_dir_all(&src_dir)
        .with_context(|| format!("failed to create {}", src_dir.display()))?;

    let package_path = src_dir.join(location::base_name(&repo_location));
    if package_path.exists() {
        bail!(
            "package directory already exists ({})",
            package_path.display()
        );
    }

    let spinner = progress(format!("Fetching command from {}...", repo_location));
    let fetched = source
        .clone_remote(&repo_location, &package_path)
        .with_context(|| format!("unable to clone repository {}", repo_location));
    finish(spinner, &fetched);
    if let Err(err) = fetched {
        let _ = fs::remove_dir_all(&package_path);
        return Err(err);
    }

    let spinner = progress("Installing...");
    let installed = install_project_packages(ctx, source, &package_path);
    finish(spinner, &installed);
    if let Err(err) = installed {
        let _ = fs::remove_dir_all(&package_path);
        return Err(err);
    }

    Ok(package_path)
}

/// Resolve the dependency tree of the package rooted at `project_root`
/// and materialize it into the project's install directory.
pub fn install_project_packages(
    ctx: &GlobalContext,
    source: &dyn Source,
    project_root: &Path,
) -> Result<()> {
    let root_manifest = Manifest::read(project_root)?;

    let walker = Walker::new(source, ctx.package_cache_dir());
    walker.walk(&root_manifest)?;
    let state = walker.into_state();

    materialize(source, project_root, &root_manifest, &state)
}

/// Commit the fully walked dependency set into the project tree. The
/// install directory is recreated from scratch; prior partial state is
/// discarded, not merged.
fn materialize(
    source: &dyn Source,
    project_root: &Path,
    root_manifest: &Manifest,
    state: &ResolutionState,
) -> Result<()> {
    let install_dir = project_root.join(INSTALL_DIR);
    if install_dir.exists() {
        fs::remove_dir_all(&install_dir)
            .with_context(|| format!("failed to clear {}", install_dir.display()))?;
    }
    fs::create_dir_all(&install_dir)
        .with_context(|| format!("failed to create {}", install_dir.display()))?;

    let floor = root_manifest.minimum_stability();
    for (cache_dir, record) in state.records() {
        let name = cache_dir
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let install_path = install_dir.join(&name);

        // Clone from the local cache, never the remote; the walk
        // already brought the cache up to date.
        source.clone_local(cache_dir, &install_path)?;

        let chosen = constraint::select(&name, &record.constraints, &record.versions, floor)?;
        tracing::info!("pinning {} to {}", name, chosen.reference);
        source.checkout(&install_path, &chosen.reference)?;
    }

    Ok(())
}

fn progress(msg: impl Into<String>) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(msg.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn finish<T>(bar: ProgressBar, result: &Result<T>) {
    if result.is_ok() {
        bar.finish_with_message(format!("{} [OK]", bar.message()));
    } else {
        bar.finish_with_message(format!("{} [FAIL]", bar.message()));
    }
}
