//! High-level operations.
//!
//! This module contains the implementation of Capstan commands.

pub mod install;
pub mod list;

pub use install::{install, install_packages, install_project_packages};
pub use list::{list_packages, InstalledPackage};
