//! Capstan - a plugin manager for command-line tools.
//!
//! This crate provides the core library functionality for Capstan:
//! reading package manifests, resolving their dependency trees against
//! git tag histories, and materializing the resolved set into a project.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test doubles for Capstan unit tests. Only compiled for test builds.
#[cfg(test)]
pub mod test_support;

pub use crate::core::manifest::{Manifest, ManifestError};
pub use crate::core::stability::Stability;

pub use resolver::errors::ResolveError;
pub use resolver::version::VersionCandidate;
pub use util::context::GlobalContext;
