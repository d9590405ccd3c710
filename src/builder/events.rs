//! Build event types.
//!
//! Events are the only thing that crosses from a build worker thread back to
//! the thread that owns the interface. They are consumed from an
//! `mpsc::Receiver<BuildEvent>` and can also be serialized as one JSON
//! object per line (`--message-format json`).

use std::path::PathBuf;

use serde::Serialize;

/// Lifecycle state of a single compilation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildState {
    Idle,
    /// The caller is persisting the buffer to disk
    Saving,
    /// Save was cancelled; nothing was spawned
    Aborted,
    /// Another build was already running; nothing was spawned
    Rejected,
    /// The dependency manifest has not been generated yet
    FlagsMissing,
    /// The compiler binary is gone
    CompilerMissing,
    Running,
    Succeeded,
    Failed,
}

impl BuildState {
    /// Whether no further transition can happen for this request.
    pub fn is_terminal(self) -> bool {
        !matches!(self, BuildState::Idle | BuildState::Saving | BuildState::Running)
    }

    pub fn is_success(self) -> bool {
        self == BuildState::Succeeded
    }
}

/// How text is written to the output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Clear the surface, then show the text
    Replace,
    /// Add the text at the end and scroll to it
    Append,
}

/// Severity of a parsed compiler diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

/// One `file:line:col: severity: message` line from compiler output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerDiagnostic {
    pub file: PathBuf,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub severity: Severity,
    pub message: String,
}

/// An event emitted while handling a build request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason")]
pub enum BuildEvent {
    /// Text for the output surface.
    #[serde(rename = "output")]
    Output { mode: OutputMode, text: String },

    /// The request moved to a new state.
    #[serde(rename = "state-changed")]
    StateChanged { state: BuildState },

    /// Whether a runnable executable exists now.
    #[serde(rename = "can-run")]
    CanRun { can_run: bool },

    /// A user-facing warning (e.g. the save was cancelled).
    #[serde(rename = "warning")]
    Warning { title: String, message: String },

    /// A diagnostic parsed from the compiler output.
    #[serde(rename = "compiler-diagnostic")]
    Diagnostic(CompilerDiagnostic),

    /// The request reached a terminal state.
    #[serde(rename = "build-finished")]
    Finished { state: BuildState, duration_ms: u64 },
}

impl BuildEvent {
    /// Create a replace-output event.
    pub fn replace(text: impl Into<String>) -> Self {
        BuildEvent::Output {
            mode: OutputMode::Replace,
            text: text.into(),
        }
    }

    /// Create an append-output event.
    pub fn append(text: impl Into<String>) -> Self {
        BuildEvent::Output {
            mode: OutputMode::Append,
            text: text.into(),
        }
    }

    /// Create a build finished event.
    pub fn finished(state: BuildState, duration_ms: u64) -> Self {
        BuildEvent::Finished { state, duration_ms }
    }

    /// Serialize this event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
