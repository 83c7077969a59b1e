//! Global context for Capstan operations.
//!
//! Provides centralized access to the directories one run works with:
//! the capstan home (shared cache and installed package sources) and
//! the current project.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::core::manifest;

/// Project directories for Capstan
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("io", "capstan", "capstan"));

/// Environment variable overriding the capstan home directory.
pub const HOME_ENV: &str = "CAPSTAN_HOME";

/// Global context containing the paths for one run.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Capstan data
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults. `CAPSTAN_HOME` in the
    /// environment overrides the platform data directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = match std::env::var_os(HOME_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => default_home(),
        };

        Ok(GlobalContext { cwd, home })
    }

    /// Use a specific working directory.
    pub fn with_cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = cwd;
        self
    }

    /// Use a specific home directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Shared cache root, persisted across runs.
    pub fn cache_dir(&self) -> PathBuf {
        self.home.join("cache")
    }

    /// Working copies of dependency repositories, one per base name.
    pub fn package_cache_dir(&self) -> PathBuf {
        self.cache_dir().join("package-cache")
    }

    /// Installed package sources (`capstan install <pkg>` targets).
    pub fn src_dir(&self) -> PathBuf {
        self.home.join("src")
    }

    /// Find the enclosing project: the nearest ancestor of the working
    /// directory carrying a package manifest.
    pub fn find_project_root(&self) -> Option<PathBuf> {
        manifest::find_package_dir(&self.cwd)
    }
}

fn default_home() -> PathBuf {
    if let Some(dirs) = PROJECT_DIRS.as_ref() {
        dirs.data_dir().to_path_buf()
    } else {
        dirs::home_dir()
            .map(|h| h.join(".capstan"))
            .unwrap_or_else(|| PathBuf::from(".capstan"))
    }
}
