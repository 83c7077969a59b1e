//! Capstan CLI - a plugin manager for command-line tools

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use capstan::ops;
use capstan::GlobalContext;

mod cli;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("capstan=debug")
    } else {
        EnvFilter::new("capstan=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = GlobalContext::new()?;
    if let Some(home) = cli.home {
        ctx = ctx.with_home(home);
    }

    match cli.command {
        Commands::Install(args) => {
            if args.packages.is_empty() {
                ops::install(&ctx)
            } else {
                ops::install_packages(&ctx, &args.packages)
            }
        }
        Commands::List(_) => {
            for package in ops::list_packages(&ctx)? {
                println!("{} {}", package.name, package.version);
                for command in &package.commands {
                    println!("  {}", command);
                }
            }
            Ok(())
        }
    }
}
