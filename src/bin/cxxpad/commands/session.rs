//! `cxxpad session` command

use anyhow::{Context, Result};

use crate::cli::{SessionArgs, SessionCommands};
use cxxpad::core::SessionState;
use cxxpad::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: SessionArgs) -> Result<()> {
    let path = ctx.layout().session_file;

    match args.command {
        SessionCommands::Show => {
            let Some(session) = SessionState::load(&path).filter(|s| !s.is_empty()) else {
                println!("No saved session.");
                return Ok(());
            };

            println!("Open files:");
            for file in &session.open_files {
                let marker = if session.active_file.as_ref() == Some(file) {
                    "*"
                } else {
                    " "
                };
                println!("  {} {}", marker, file.display());
            }
        }
        SessionCommands::Clear => {
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
                eprintln!("     Removed {}", path.display());
            } else {
                eprintln!("     No saved session.");
            }
        }
    }

    Ok(())
}
