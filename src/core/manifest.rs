//! `cli.json` manifest parsing and schema.
//!
//! The manifest is a package's declared identity: its name, version,
//! exposed commands, dependency requirements, and minimum-stability
//! floor. Manifests are immutable once read and are re-read fresh after
//! every checkout, since the same working copy changes content across a
//! resolution run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::stability::Stability;

/// File name of the package manifest.
pub const MANIFEST_NAME: &str = "cli.json";

/// Error reading a package manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("package manifest not found in {dir}", dir = .dir.display())]
    NotFound { dir: PathBuf },

    #[error("failed to read manifest at {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest at {path}: {source}", path = .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One command descriptor exposed by a package.
///
/// Opaque to the resolver; carried through so callers can enumerate
/// what a package provides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Command {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub aliases: Vec<String>,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub description: String,

    /// Binary download URL template, if the command ships prebuilt
    /// binaries. Unused by the resolver.
    #[serde(default)]
    pub bin: String,
}

/// The parsed `cli.json` manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    /// Commands this package exposes.
    #[serde(default)]
    pub commands: Vec<Command>,

    /// Dependency name -> constraint expression.
    #[serde(default)]
    pub requirements: BTreeMap<String, String>,

    /// Raw `minimum-stability` field; absent or unknown means stable.
    #[serde(default, rename = "minimum-stability")]
    pub minimum_stability: String,
}

impl Manifest {
    /// Read the manifest for the package rooted at `dir`.
    ///
    /// If `cli.json` is not found directly in `dir`, the parent
    /// directory is tried once before giving up.
    pub fn read(dir: &Path) -> Result<Manifest, ManifestError> {
        let mut dir = dir.to_path_buf();
        if !dir.join(MANIFEST_NAME).is_file() {
            let parent = match dir.parent() {
                Some(p) => p.to_path_buf(),
                None => return Err(ManifestError::NotFound { dir }),
            };
            if !parent.join(MANIFEST_NAME).is_file() {
                return Err(ManifestError::NotFound { dir });
            }
            dir = parent;
        }

        let path = dir.join(MANIFEST_NAME);
        let data = fs::read_to_string(&path).map_err(|source| ManifestError::Io {
            path: path.clone(),
            source,
        })?;

        let mut manifest: Manifest =
            serde_json::from_str(&data).map_err(|source| ManifestError::Parse { path, source })?;

        for command in &mut manifest.commands {
            command.name = command.name.to_lowercase();
        }

        Ok(manifest)
    }

    /// The stability floor declared by this package.
    pub fn minimum_stability(&self) -> Stability {
        Stability::parse(&self.minimum_stability)
    }
}

/// Find the package directory containing `dir` by walking upward until
/// a manifest is found. Returns `None` when the root is reached without
/// finding one.
pub fn find_package_dir(dir: &Path) -> Option<PathBuf> {
    let mut current = if dir.is_file() {
        dir.parent()?.to_path_buf()
    } else {
        dir.to_path_buf()
    };

    loop {
        if current.join(MANIFEST_NAME).is_file() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}
