//! Dependency resolution.
//!
//! The resolver walks a package's declared requirements, fetches each
//! dependency's tag-derived versions through a [`crate::sources::Source`],
//! accumulates per-dependency constraint sets, and selects versions under
//! a stability policy. Selection is pure and deterministic; all I/O goes
//! through the source seam.

pub mod constraint;
pub mod errors;
pub mod version;
pub mod walker;

pub use errors::ResolveError;
pub use version::VersionCandidate;
pub use walker::{DependencyRecord, ResolutionState, Walker, MAX_DEPTH};
