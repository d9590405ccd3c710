//! `cxxpad run` command

use std::sync::Arc;

use anyhow::{bail, Result};

use cxxpad::builder::{LaunchOutcome, SystemExecutor};
use cxxpad::ops::launch;
use cxxpad::util::GlobalContext;

use super::build::StderrSink;

pub fn execute(ctx: &GlobalContext) -> Result<()> {
    match launch(ctx, Arc::new(SystemExecutor), &StderrSink)? {
        LaunchOutcome::Launched => Ok(()),
        LaunchOutcome::MissingExecutable => bail!("nothing to run; build the project first"),
        LaunchOutcome::SpawnFailed => bail!("the application could not be started"),
    }
}
