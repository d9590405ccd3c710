//! Launching the built program.
//!
//! Launches are fire-and-forget: the program is started in the build
//! directory with the dependency and toolchain bin dirs on PATH, and is
//! neither waited on nor tracked afterwards.

use std::sync::Arc;

use serde::Serialize;

use crate::builder::context::BuildContext;
use crate::builder::executor::ProcessExecutor;
use crate::builder::output::OutputSink;

/// What happened when a launch was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchOutcome {
    Launched,
    /// Nothing has been built yet; no process was started
    MissingExecutable,
    SpawnFailed,
}

/// Starts the executable described by a build context.
#[derive(Debug, Clone)]
pub struct Launcher {
    ctx: Arc<BuildContext>,
    executor: Arc<dyn ProcessExecutor>,
}

impl Launcher {
    pub fn new(ctx: Arc<BuildContext>, executor: Arc<dyn ProcessExecutor>) -> Self {
        Launcher { ctx, executor }
    }

    /// Launch the built executable, reporting progress to `sink`.
    pub fn run(&self, sink: &dyn OutputSink) -> LaunchOutcome {
        let exe = &self.ctx.output_executable;
        if !exe.is_file() {
            sink.replace("Error: executable not found. Please compile first.\n");
            return LaunchOutcome::MissingExecutable;
        }

        sink.replace(&format!("Launching {}...\n", exe.display()));
        tracing::info!("launching {}", exe.display());

        let result = self
            .ctx
            .launch_command()
            .and_then(|cmd| self.executor.spawn(&cmd));

        match result {
            Ok(()) => LaunchOutcome::Launched,
            Err(e) => {
                tracing::warn!("failed to launch {}: {:#}", exe.display(), e);
                sink.replace(&format!("Unable to launch the application:\n{:#}\n", e));
                LaunchOutcome::SpawnFailed
            }
        }
    }
}
