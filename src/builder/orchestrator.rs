//! Compilation orchestrator.
//!
//! Turns "compile this saved file" into one background worker thread that
//! runs the compiler and reports back through a [`Reporter`]. Per request:
//!
//! ```text
//! Idle -> Saving -> Aborted                       (caller had no path)
//!                -> Rejected                      (a build is in flight)
//!                -> FlagsMissing | CompilerMissing
//!                -> Running -> Succeeded [-> launch] | Failed
//! ```
//!
//! Only one build may be in flight at a time; a second request while one is
//! running is rejected with a message rather than racing the first.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::builder::context::BuildContext;
use crate::builder::diagnostics::parse_diagnostics;
use crate::builder::events::BuildState;
use crate::builder::executor::ProcessExecutor;
use crate::builder::launcher::Launcher;
use crate::builder::output::{OutputSink, Reporter};
use crate::builder::BuildError;

pub const MSG_COMPILING: &str = "Compiling...\n\n";
pub const MSG_SUCCEEDED: &str = "Compilation succeeded!\n";
pub const MSG_FLAGS_MISSING: &str =
    "ERROR: dependency information not found (run conan install first).\n";
pub const MSG_BUSY: &str = "A build is already in progress; request ignored.\n";
pub const CANCELLED_TITLE: &str = "Cancelled";
pub const CANCELLED_MESSAGE: &str = "Compilation was cancelled because the file was not saved.";

/// Outcome of submitting a compile request.
#[derive(Debug)]
pub enum BuildRequest {
    /// A worker thread is running the compiler.
    Spawned(JoinHandle<BuildState>),
    /// The request ended without spawning anything.
    Completed(BuildState),
}

impl BuildRequest {
    /// Block until the request reaches its terminal state.
    pub fn wait(self) -> BuildState {
        match self {
            BuildRequest::Spawned(handle) => handle.join().unwrap_or(BuildState::Failed),
            BuildRequest::Completed(state) => state,
        }
    }

    pub fn is_spawned(&self) -> bool {
        matches!(self, BuildRequest::Spawned(_))
    }

    /// Whether the terminal state is available without blocking.
    pub fn is_finished(&self) -> bool {
        match self {
            BuildRequest::Spawned(handle) => handle.is_finished(),
            BuildRequest::Completed(_) => true,
        }
    }
}

/// Clears the in-flight flag when the build ends, including on panic.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(Arc::clone(flag)))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Schedules compilations against the current build context.
#[derive(Debug)]
pub struct Orchestrator {
    ctx: RwLock<Arc<BuildContext>>,
    executor: Arc<dyn ProcessExecutor>,
    reporter: Reporter,
    in_flight: Arc<AtomicBool>,
}

impl Orchestrator {
    pub fn new(ctx: BuildContext, executor: Arc<dyn ProcessExecutor>, reporter: Reporter) -> Self {
        Orchestrator {
            ctx: RwLock::new(Arc::new(ctx)),
            executor,
            reporter,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Snapshot of the current build context.
    pub fn context(&self) -> Arc<BuildContext> {
        match self.ctx.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Read the dependency manifest again and make the result current.
    ///
    /// Builds already running keep the context they started with.
    pub fn reload_manifest(&self) -> Result<(), BuildError> {
        let fresh = Arc::new(self.context().reresolve()?);
        match self.ctx.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
        tracing::info!("dependency manifest reloaded");
        Ok(())
    }

    /// Whether a build worker is currently running.
    pub fn is_building(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// A launcher for the current context.
    pub fn launcher(&self) -> Launcher {
        Launcher::new(self.context(), Arc::clone(&self.executor))
    }

    /// Compile `source`, which the caller has just written to disk.
    ///
    /// `None` means the caller's save was cancelled. With `run_after`, the
    /// program is launched from the worker once the build has succeeded.
    pub fn compile(&self, source: Option<PathBuf>, run_after: bool) -> BuildRequest {
        let started = Instant::now();

        let Some(source) = source else {
            tracing::info!("compilation cancelled: file was not saved");
            self.reporter.warning(CANCELLED_TITLE, CANCELLED_MESSAGE);
            return self.complete(BuildState::Aborted, started);
        };

        let Some(guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::warn!("rejecting build of {}: another build is running", source.display());
            self.reporter.append(MSG_BUSY);
            return self.complete(BuildState::Rejected, started);
        };

        let ctx = self.context();
        self.reporter.replace(MSG_COMPILING);

        if ctx.resolved.is_none() {
            self.reporter.append(MSG_FLAGS_MISSING);
            drop(guard);
            return self.complete(BuildState::FlagsMissing, started);
        }

        if !ctx.toolchain.compiler_exists() {
            self.reporter.append(&format!(
                "ERROR: compiler not found: {}\n",
                ctx.toolchain.compiler.display()
            ));
            drop(guard);
            return self.complete(BuildState::CompilerMissing, started);
        }

        let worker = Worker {
            ctx,
            executor: Arc::clone(&self.executor),
            reporter: self.reporter.clone(),
            source,
            run_after,
            started,
        };

        let spawned = thread::Builder::new()
            .name("cxxpad-build".to_string())
            .spawn(move || worker.run(guard));

        match spawned {
            Ok(handle) => BuildRequest::Spawned(handle),
            Err(e) => {
                // The closure (and with it the guard) was dropped by the failed spawn.
                self.reporter
                    .append(&format!("An error occurred:\n{}\n", e));
                self.complete(BuildState::Failed, started)
            }
        }
    }

    fn complete(&self, state: BuildState, started: Instant) -> BuildRequest {
        self.reporter.state(state);
        self.reporter
            .finished(state, started.elapsed().as_millis() as u64);
        BuildRequest::Completed(state)
    }
}

/// Everything a build worker owns.
struct Worker {
    ctx: Arc<BuildContext>,
    executor: Arc<dyn ProcessExecutor>,
    reporter: Reporter,
    source: PathBuf,
    run_after: bool,
    started: Instant,
}

impl Worker {
    fn run(self, guard: InFlightGuard) -> BuildState {
        let state = self.build(&self.source);

        self.reporter.can_run(self.ctx.can_run());
        drop(guard);

        self.reporter.state(state);
        self.reporter
            .finished(state, self.started.elapsed().as_millis() as u64);
        state
    }

    fn build(&self, source: &Path) -> BuildState {
        let cmd = match self.ctx.compile_command(source) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => {
                self.reporter.append(MSG_FLAGS_MISSING);
                return BuildState::FlagsMissing;
            }
            Err(e) => {
                self.reporter.append(&format!("An error occurred:\n{:#}\n", e));
                return BuildState::Failed;
            }
        };

        let command_line = cmd.display_command();
        self.reporter
            .append(&format!("Command:\n{}\n\n", command_line));
        self.reporter.state(BuildState::Running);
        tracing::info!("compiling {}", source.display());
        tracing::debug!("running `{}`", command_line);

        let result = match self.executor.run(&cmd) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("compiler invocation failed: {:#}", e);
                self.reporter.append(&format!("An error occurred:\n{:#}\n", e));
                return BuildState::Failed;
            }
        };

        if result.success() {
            tracing::info!("compilation of {} succeeded", source.display());
            self.reporter.append(MSG_SUCCEEDED);
            if self.run_after {
                Launcher::new(Arc::clone(&self.ctx), Arc::clone(&self.executor))
                    .run(&self.reporter);
            }
            BuildState::Succeeded
        } else {
            tracing::info!(
                "compilation of {} failed with status {:?}",
                source.display(),
                result.status
            );
            let text = result.diagnostic_text();
            self.reporter
                .append(&format!("Compilation FAILED:\n\n{}", text));
            for diagnostic in parse_diagnostics(text) {
                self.reporter.diagnostic(diagnostic);
            }
            BuildState::Failed
        }
    }
}
