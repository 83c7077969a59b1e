//! Package sources.
//!
//! Sources are responsible for fetching version candidates from package
//! repositories and bringing working copies to a target reference.

pub mod git;
pub mod location;
pub mod source;

pub use git::GitSource;
pub use source::Source;
