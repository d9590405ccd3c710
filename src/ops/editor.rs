//! Editor session controller.
//!
//! Ties the buffer model to the orchestrator: saving happens here, on the
//! caller's thread, and only the saved path travels to the build worker.

use std::path::Path;

use anyhow::Result;

use crate::builder::events::BuildState;
use crate::builder::launcher::LaunchOutcome;
use crate::builder::orchestrator::{BuildRequest, Orchestrator, MSG_BUSY};
use crate::builder::output::{OutputSink, Reporter};
use crate::core::layout::ProjectLayout;
use crate::core::session::SessionState;
use crate::editor::buffers::{BufferSet, Prompt};

/// One editing session over a project.
#[derive(Debug)]
pub struct Editor {
    layout: ProjectLayout,
    buffers: BufferSet,
    orchestrator: Orchestrator,
    reporter: Reporter,
}

impl Editor {
    /// Open the editor on `layout`, restoring the previous session.
    pub fn start(
        layout: ProjectLayout,
        orchestrator: Orchestrator,
        reporter: Reporter,
        prompt: &dyn Prompt,
    ) -> Result<Self> {
        layout.ensure_dirs()?;

        let mut buffers = BufferSet::new(&layout.save_dir);
        let session = SessionState::load(&layout.session_file);
        buffers.restore(session.as_ref(), &layout, prompt)?;
        tracing::debug!("editor started with {} buffer(s)", buffers.len());

        reporter.can_run(layout.can_run());

        Ok(Editor {
            layout,
            buffers,
            orchestrator,
            reporter,
        })
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn buffers(&self) -> &BufferSet {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut BufferSet {
        &mut self.buffers
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Open `path` in a buffer and focus it.
    pub fn open(&mut self, path: &Path, prompt: &dyn Prompt) -> bool {
        self.buffers.open(path, prompt)
    }

    /// Save the active buffer and hand it to the orchestrator.
    ///
    /// While a build is running nothing is saved: the source on disk stays
    /// the one being compiled and the request ends as
    /// [`BuildState::Rejected`]. A cancelled save reaches the orchestrator
    /// as `None`. A failed write is reported on the output channel and ends
    /// the request as [`BuildState::Aborted`].
    pub fn compile(&mut self, prompt: &dyn Prompt, run_after: bool) -> BuildRequest {
        if self.orchestrator.is_building() {
            tracing::warn!("compile requested while a build is running; buffer left unsaved");
            self.reporter.append(MSG_BUSY);
            return self.complete(BuildState::Rejected);
        }

        self.reporter.state(BuildState::Saving);

        match self.buffers.save_active(prompt, &self.reporter) {
            Ok(path) => self.orchestrator.compile(path, run_after),
            Err(e) => {
                tracing::warn!("saving before compilation failed: {:#}", e);
                self.reporter
                    .append(&format!("An error occurred:\n{:#}\n", e));
                self.complete(BuildState::Aborted)
            }
        }
    }

    fn complete(&self, state: BuildState) -> BuildRequest {
        self.reporter.state(state);
        self.reporter.finished(state, 0);
        BuildRequest::Completed(state)
    }

    /// Launch the last built executable.
    pub fn run(&self) -> LaunchOutcome {
        self.orchestrator.launcher().run(&self.reporter)
    }

    /// Persist the session, then ask about unsaved buffers.
    ///
    /// Returns whether the host may exit.
    pub fn shutdown(&self, prompt: &dyn Prompt) -> bool {
        self.buffers.session().save(&self.layout.session_file);

        if self.buffers.has_dirty() {
            prompt.confirm_quit()
        } else {
            true
        }
    }
}
