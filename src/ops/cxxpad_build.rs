//! Implementation of `cxxpad build` and `cxxpad run`.
//!
//! Both run a headless editor session: the calling thread plays the part of
//! the interface thread and is the only consumer of the event channel.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::builder::context::BuildContext;
use crate::builder::events::{BuildEvent, BuildState};
use crate::builder::executor::ProcessExecutor;
use crate::builder::launcher::LaunchOutcome;
use crate::builder::orchestrator::{BuildRequest, Orchestrator};
use crate::builder::output::{channel, OutputSink, Reporter};
use crate::editor::buffers::Prompt;
use crate::ops::editor::Editor;
use crate::util::fs::absolutize;
use crate::util::GlobalContext;

/// How often the event loop checks on a worker that has gone quiet.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// File to compile; the session's active file when `None`
    pub file: Option<PathBuf>,

    /// Launch the program after a successful build
    pub run_after: bool,
}

/// Locate the toolchain, resolve the manifest and create an orchestrator
/// reporting on a fresh channel.
pub fn open_orchestrator(
    ctx: &GlobalContext,
    executor: Arc<dyn ProcessExecutor>,
) -> Result<(Orchestrator, Reporter, Receiver<BuildEvent>)> {
    let layout = ctx.layout();
    let build_ctx = BuildContext::from_layout(&layout, &ctx.config().toolchain)?;
    let (reporter, rx) = channel();
    let orchestrator = Orchestrator::new(build_ctx, executor, reporter.clone());
    Ok((orchestrator, reporter, rx))
}

/// Compile a file, feeding every event to `on_event` as it arrives.
///
/// Returns the terminal state of the build. The session is saved before
/// returning, including the newly opened file.
pub fn build(
    ctx: &GlobalContext,
    opts: &BuildOptions,
    executor: Arc<dyn ProcessExecutor>,
    prompt: &dyn Prompt,
    mut on_event: impl FnMut(&BuildEvent),
) -> Result<BuildState> {
    let (orchestrator, reporter, rx) = open_orchestrator(ctx, executor)?;
    let mut editor = Editor::start(ctx.layout(), orchestrator, reporter, prompt)?;

    if let Some(ref file) = opts.file {
        let path = absolutize(ctx.root(), file);
        if !editor.open(&path, prompt) {
            bail!("could not open `{}`", path.display());
        }
    }

    let request = editor.compile(prompt, opts.run_after);
    drain_until_finished(&rx, &request, &mut on_event);
    let state = request.wait();

    editor.shutdown(prompt);
    Ok(state)
}

/// Deliver events until the build reports `Finished`, or until its worker
/// has exited without doing so.
fn drain_until_finished(
    rx: &Receiver<BuildEvent>,
    request: &BuildRequest,
    on_event: &mut impl FnMut(&BuildEvent),
) {
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(event) => {
                on_event(&event);
                if matches!(event, BuildEvent::Finished { .. }) {
                    return;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if request.is_finished() {
                    rx.try_iter().for_each(|event| on_event(&event));
                    return;
                }
            }
            Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

/// Launch the last built executable of the project.
pub fn launch(
    ctx: &GlobalContext,
    executor: Arc<dyn ProcessExecutor>,
    sink: &dyn OutputSink,
) -> Result<LaunchOutcome> {
    let (orchestrator, _reporter, _rx) = open_orchestrator(ctx, executor)?;
    Ok(orchestrator.launcher().run(sink))
}
