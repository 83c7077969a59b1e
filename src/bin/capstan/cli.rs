//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Capstan - a plugin manager for command-line tools
#[derive(Parser)]
#[command(name = "capstan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the capstan home directory
    #[arg(long, global = true, env = "CAPSTAN_HOME")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install packages, or resolve the enclosing project's dependencies
    Install(InstallArgs),

    /// List installed packages and the commands they expose
    List(ListArgs),
}

#[derive(Args)]
pub struct InstallArgs {
    /// Packages to install (bare name, owner/repo shorthand, or URL).
    /// With no packages, resolves the current project.
    pub packages: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {}
