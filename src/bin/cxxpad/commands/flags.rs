//! `cxxpad flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use cxxpad::core::resolve_manifest;
use cxxpad::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: FlagsArgs) -> Result<()> {
    let layout = ctx.layout();

    let Some(resolved) = resolve_manifest(&layout.manifest_path, &layout.root)? else {
        println!(
            "# No dependency manifest at {}",
            layout.manifest_path.display()
        );
        println!("# Run `conan install` first; builds are disabled until then.");
        return Ok(());
    };

    println!("{}", resolved.flags);

    if args.bin_dirs {
        println!();
        println!("# Runtime search directories:");
        for dir in &resolved.bin_dirs {
            println!("  {}", dir.display());
        }
        println!("  {}    # toolchain", layout.toolchain_bin_dir.display());
    }

    Ok(())
}
