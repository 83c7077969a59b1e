//! Core data structures for Capstan.
//!
//! This module contains the foundational types used throughout Capstan:
//! - Package manifests (`cli.json`)
//! - Stability tiers

pub mod manifest;
pub mod stability;

pub use manifest::{Manifest, ManifestError, MANIFEST_NAME};
pub use stability::Stability;
