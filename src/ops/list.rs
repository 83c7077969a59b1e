//! Listing installed packages.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::manifest::Manifest;
use crate::util::context::GlobalContext;

/// One installed package directory and what it exposes.
#[derive(Debug, Clone)]
pub struct InstalledPackage {
    pub dir: PathBuf,
    pub name: String,
    pub version: String,
    pub commands: Vec<String>,
}

/// Enumerate the packages installed under the source tree, sorted by
/// directory name. Directories without a readable manifest are skipped.
pub fn list_packages(ctx: &GlobalContext) -> Result<Vec<InstalledPackage>> {
    let src_dir = ctx.src_dir();
    if !src_dir.exists() {
        return Ok(Vec::new());
    }

    let mut packages = Vec::new();
    for entry in fs::read_dir(&src_dir)
        .with_context(|| format!("failed to read {}", src_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        match Manifest::read(&path) {
            Ok(manifest) => packages.push(InstalledPackage {
                name: manifest.name.clone(),
                version: manifest.version.clone(),
                commands: manifest.commands.iter().map(|c| c.name.clone()).collect(),
                dir: path,
            }),
            Err(err) => {
                tracing::debug!("skipping {}: {}", path.display(), err);
            }
        }
    }

    packages.sort_by(|a, b| a.dir.cmp(&b.dir));
    Ok(packages)
}
