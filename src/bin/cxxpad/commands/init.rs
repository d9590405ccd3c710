//! `cxxpad init` command

use anyhow::Result;

use cxxpad::ops::init_project;
use cxxpad::util::GlobalContext;

pub fn execute(ctx: &GlobalContext) -> Result<()> {
    let layout = ctx.layout();
    let result = init_project(&layout)?;

    if result.created_start_file {
        eprintln!(
            "     Created {}",
            layout.default_start_file.display()
        );
    }
    eprintln!("     Initialized project at {}", layout.root.display());

    if !layout.manifest_path.exists() {
        eprintln!(
            "        note: run `conan install` to write {}",
            layout.manifest_path.display()
        );
    }

    Ok(())
}
