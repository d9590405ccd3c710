//! Test utilities and mocks for cxxpad unit tests.
//!
//! Mocks for the seams that touch the outside world: process execution,
//! the output surface and user dialogs.
//!
//! # Example
//!
//! ```rust,ignore
//! use cxxpad::test_support::{test_context, MockExecutor};
//!
//! #[test]
//! fn test_example() {
//!     let tmp = tempfile::TempDir::new().unwrap();
//!     let ctx = test_context(tmp.path(), true);
//!     let exec = MockExecutor::new().creates(&ctx.output_executable);
//!
//!     // Hand `exec` to an Orchestrator and inspect `exec.runs()`...
//! }
//! ```

pub mod fixtures;

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::builder::executor::{CompilationResult, ProcessExecutor};
use crate::builder::output::{OutputBuffer, OutputSink};
use crate::editor::buffers::{Prompt, SaveChoice};
use crate::util::process::ProcessBuilder;

// Re-export fixtures for convenience
pub use fixtures::*;

/// Mock process executor for testing command execution.
///
/// Records every command it is given. `run` answers with a configured
/// [`CompilationResult`] (exit status 0 by default); `spawn` always succeeds.
#[derive(Debug, Default)]
pub struct MockExecutor {
    result: CompilationResult,
    run_error: Option<String>,
    /// File written on each successful run, standing in for the compiler's output
    creates: Option<PathBuf>,
    /// Each run waits for one message before returning
    gate: Option<Mutex<Receiver<()>>>,
    runs: Mutex<Vec<ProcessBuilder>>,
    spawned: Mutex<Vec<ProcessBuilder>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        MockExecutor {
            result: CompilationResult {
                status: Some(0),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Write `path` whenever a run succeeds.
    pub fn creates(mut self, path: &Path) -> Self {
        self.creates = Some(path.to_path_buf());
        self
    }

    /// Answer every run with `result`.
    pub fn returns(mut self, result: CompilationResult) -> Self {
        self.result = result;
        self
    }

    /// Make every run fail to start with `message`.
    pub fn fails_to_run(mut self, message: &str) -> Self {
        self.run_error = Some(message.to_string());
        self
    }

    /// Block each run until a `()` arrives on the returned sender.
    pub fn gated(mut self) -> (Self, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        self.gate = Some(Mutex::new(rx));
        (self, tx)
    }

    pub fn runs(&self) -> Vec<ProcessBuilder> {
        self.runs.lock().unwrap().clone()
    }

    pub fn run_count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }

    pub fn spawned(&self) -> Vec<ProcessBuilder> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.spawned.lock().unwrap().len()
    }
}

impl ProcessExecutor for MockExecutor {
    fn run(&self, cmd: &ProcessBuilder) -> Result<CompilationResult> {
        self.runs.lock().unwrap().push(cmd.clone());

        if let Some(ref gate) = self.gate {
            let _ = gate.lock().unwrap().recv();
        }

        if let Some(ref message) = self.run_error {
            bail!("{}", message);
        }

        if self.result.success() {
            if let Some(ref path) = self.creates {
                std::fs::write(path, b"mock executable")?;
            }
        }

        Ok(self.result.clone())
    }

    fn spawn(&self, cmd: &ProcessBuilder) -> Result<()> {
        self.spawned.lock().unwrap().push(cmd.clone());
        Ok(())
    }
}

/// Output sink that keeps the text in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    buffer: Mutex<OutputBuffer>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.buffer.lock().unwrap().text().to_string()
    }
}

impl OutputSink for RecordingSink {
    fn replace(&self, text: &str) {
        self.buffer.lock().unwrap().replace(text);
    }

    fn append(&self, text: &str) {
        self.buffer.lock().unwrap().append(text);
    }
}

/// Scripted answers for user dialogs.
///
/// Answers are consumed in order. When a queue runs dry, save dialogs are
/// cancelled and save confirmations answer [`SaveChoice::Cancel`].
#[derive(Debug)]
pub struct RecordingPrompt {
    save_paths: Mutex<VecDeque<Option<PathBuf>>>,
    choices: Mutex<VecDeque<SaveChoice>>,
    quit: bool,
    save_dirs: Mutex<Vec<PathBuf>>,
    confirmations: Mutex<Vec<String>>,
    warnings: Mutex<Vec<(String, String)>>,
}

impl Default for RecordingPrompt {
    fn default() -> Self {
        RecordingPrompt {
            save_paths: Mutex::default(),
            choices: Mutex::default(),
            quit: true,
            save_dirs: Mutex::default(),
            confirmations: Mutex::default(),
            warnings: Mutex::default(),
        }
    }
}

impl RecordingPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer to the quit confirmation (defaults to `true`).
    pub fn quit_answer(mut self, quit: bool) -> Self {
        self.quit = quit;
        self
    }

    pub fn push_save_path(&self, path: Option<PathBuf>) {
        self.save_paths.lock().unwrap().push_back(path);
    }

    pub fn push_choice(&self, choice: SaveChoice) {
        self.choices.lock().unwrap().push_back(choice);
    }

    /// Initial directories the save dialog was opened with.
    pub fn save_dirs(&self) -> Vec<PathBuf> {
        self.save_dirs.lock().unwrap().clone()
    }

    /// Buffer names the user was asked to save.
    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<(String, String)> {
        self.warnings.lock().unwrap().clone()
    }
}

impl Prompt for RecordingPrompt {
    fn save_path(&self, initial_dir: &Path) -> Option<PathBuf> {
        self.save_dirs.lock().unwrap().push(initial_dir.to_path_buf());
        self.save_paths.lock().unwrap().pop_front().flatten()
    }

    fn confirm_save(&self, name: &str) -> SaveChoice {
        self.confirmations.lock().unwrap().push(name.to_string());
        self.choices
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SaveChoice::Cancel)
    }

    fn confirm_quit(&self) -> bool {
        self.quit
    }

    fn warn(&self, title: &str, message: &str) {
        self.warnings
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mock_executor_records_and_creates() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("a.out");
        let exec = MockExecutor::new().creates(&out);

        let result = exec.run(&ProcessBuilder::new("g++").arg("x.cpp")).unwrap();

        assert!(result.success());
        assert!(out.is_file());
        assert_eq!(exec.run_count(), 1);
        assert_eq!(exec.runs()[0].get_args(), ["x.cpp"]);
    }

    #[test]
    fn test_mock_executor_failure_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("a.out");
        let exec = MockExecutor::new().creates(&out).returns(CompilationResult {
            status: Some(1),
            ..Default::default()
        });

        assert!(!exec.run(&ProcessBuilder::new("g++")).unwrap().success());
        assert!(!out.exists());
    }

    #[test]
    fn test_recording_prompt_defaults() {
        let prompt = RecordingPrompt::new();
        assert_eq!(prompt.save_path(Path::new("/saves")), None);
        assert_eq!(prompt.confirm_save("a.cpp"), SaveChoice::Cancel);
        assert!(prompt.confirm_quit());
        assert_eq!(prompt.confirmations(), vec!["a.cpp"]);
    }
}
