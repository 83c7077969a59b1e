//! Shared utilities

pub mod context;

pub use context::GlobalContext;
