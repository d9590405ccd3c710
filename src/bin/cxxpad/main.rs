//! cxxpad CLI - compile and run single-file C++ programs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cxxpad::util::GlobalContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cxxpad=debug")
    } else {
        EnvFilter::new("cxxpad=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let mut ctx = match cli.root {
        Some(root) => GlobalContext::with_root(root)?,
        None => GlobalContext::new()?,
    };
    ctx.set_verbose(cli.verbose);

    // Execute command
    match cli.command {
        Commands::Init => commands::init::execute(&ctx),
        Commands::Flags(args) => commands::flags::execute(&ctx, args),
        Commands::Build(args) => commands::build::execute(&ctx, args),
        Commands::Run => commands::run::execute(&ctx),
        Commands::Session(args) => commands::session::execute(&ctx, args),
        Commands::Doctor => commands::doctor::execute(&ctx),
        Commands::Completions(_) => Ok(()),
    }
}
