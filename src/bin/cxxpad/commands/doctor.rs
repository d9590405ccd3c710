//! `cxxpad doctor` command

use anyhow::Result;

use cxxpad::ops::{doctor, format_report, DoctorOptions};
use cxxpad::util::GlobalContext;

pub fn execute(ctx: &GlobalContext) -> Result<()> {
    let options = DoctorOptions {
        probe_version: ctx.is_verbose(),
    };

    let report = doctor(ctx, options)?;

    // Print the formatted report
    print!("{}", format_report(&report, ctx.is_verbose()));

    // Exit with error code if required checks failed
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
