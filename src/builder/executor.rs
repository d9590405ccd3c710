//! Process execution seam.
//!
//! The orchestrator and launcher never call `std::process` directly; they go
//! through [`ProcessExecutor`] so tests can substitute a recording mock.

use std::fmt;

use anyhow::Result;

use crate::util::process::ProcessBuilder;

/// Captured outcome of a finished compiler process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationResult {
    /// Exit code; `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CompilationResult {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Text to show for a failed build: stderr, or stdout when stderr is empty.
    pub fn diagnostic_text(&self) -> &str {
        if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Runs external processes.
pub trait ProcessExecutor: Send + Sync + fmt::Debug {
    /// Run to completion, capturing output.
    fn run(&self, cmd: &ProcessBuilder) -> Result<CompilationResult>;

    /// Start without waiting and without capturing output.
    fn spawn(&self, cmd: &ProcessBuilder) -> Result<()>;
}

/// Executor backed by real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl ProcessExecutor for SystemExecutor {
    fn run(&self, cmd: &ProcessBuilder) -> Result<CompilationResult> {
        let output = cmd.exec()?;
        Ok(CompilationResult {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn spawn(&self, cmd: &ProcessBuilder) -> Result<()> {
        // The child is dropped on purpose: launched programs outlive us and
        // are never waited on.
        let child = cmd.spawn_detached()?;
        tracing::debug!("spawned `{}` (pid {})", cmd.display_command(), child.id());
        Ok(())
    }
}
