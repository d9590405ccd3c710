//! Output reporting channel.
//!
//! Producers (the orchestrator, the launcher, buffer saves) write through
//! [`OutputSink`]. The concrete sink used at runtime is [`Reporter`], which
//! turns every call into a [`BuildEvent`] on an mpsc channel; the thread that
//! owns the interface drains the receiver and applies the events to its
//! display, e.g. an [`OutputBuffer`]. Worker threads never touch interface
//! state directly.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::builder::events::{BuildEvent, BuildState, CompilerDiagnostic, OutputMode};

/// A text surface that can be replaced or appended to.
pub trait OutputSink: Send + Sync {
    /// Clear the surface and show `text`.
    fn replace(&self, text: &str);

    /// Add `text` at the end and keep the end visible.
    fn append(&self, text: &str);
}

/// Channel-backed event producer.
///
/// Cloning is cheap; every clone feeds the same receiver. Events sent after
/// the receiver has been dropped are discarded.
#[derive(Debug, Clone)]
pub struct Reporter {
    tx: Sender<BuildEvent>,
}

/// Create a reporter and the receiver the primary thread drains.
pub fn channel() -> (Reporter, Receiver<BuildEvent>) {
    let (tx, rx) = mpsc::channel();
    (Reporter { tx }, rx)
}

impl Reporter {
    /// Send an event.
    pub fn send(&self, event: BuildEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event receiver dropped; discarding event");
        }
    }

    pub fn state(&self, state: BuildState) {
        self.send(BuildEvent::StateChanged { state });
    }

    pub fn can_run(&self, can_run: bool) {
        self.send(BuildEvent::CanRun { can_run });
    }

    pub fn warning(&self, title: impl Into<String>, message: impl Into<String>) {
        self.send(BuildEvent::Warning {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn diagnostic(&self, diagnostic: CompilerDiagnostic) {
        self.send(BuildEvent::Diagnostic(diagnostic));
    }

    pub fn finished(&self, state: BuildState, duration_ms: u64) {
        self.send(BuildEvent::finished(state, duration_ms));
    }
}

impl OutputSink for Reporter {
    fn replace(&self, text: &str) {
        self.send(BuildEvent::replace(text));
    }

    fn append(&self, text: &str) {
        self.send(BuildEvent::append(text));
    }
}

/// In-memory model of the output surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    text: String,
    scroll_to_end: bool,
    can_run: bool,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.scroll_to_end = false;
    }

    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
        self.scroll_to_end = true;
    }

    /// Apply an event from the channel. Returns `true` for events that
    /// changed the visible text.
    pub fn apply(&mut self, event: &BuildEvent) -> bool {
        match event {
            BuildEvent::Output { mode, text } => {
                match mode {
                    OutputMode::Replace => self.replace(text),
                    OutputMode::Append => self.append(text),
                }
                true
            }
            BuildEvent::CanRun { can_run } => {
                self.can_run = *can_run;
                false
            }
            _ => false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the surface should scroll to the newest output.
    pub fn scroll_to_end(&self) -> bool {
        self.scroll_to_end
    }

    /// Last "can run" signal seen.
    pub fn can_run(&self) -> bool {
        self.can_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_sends_output_events() {
        let (reporter, rx) = channel();
        reporter.replace("Compiling...\n\n");
        reporter.append("done\n");
        drop(reporter);

        let events: Vec<BuildEvent> = rx.iter().collect();
        assert_eq!(
            events,
            vec![BuildEvent::replace("Compiling...\n\n"), BuildEvent::append("done\n")]
        );
    }

    #[test]
    fn test_reporter_survives_dropped_receiver() {
        let (reporter, rx) = channel();
        drop(rx);
        reporter.append("nobody listens");
        reporter.finished(BuildState::Failed, 0);
    }

    #[test]
    fn test_output_buffer_apply() {
        let mut buffer = OutputBuffer::new();

        assert!(buffer.apply(&BuildEvent::replace("Compiling...\n\n")));
        assert!(!buffer.scroll_to_end());

        assert!(buffer.apply(&BuildEvent::append("Compilation succeeded!\n")));
        assert_eq!(buffer.text(), "Compiling...\n\nCompilation succeeded!\n");
        assert!(buffer.scroll_to_end());

        assert!(!buffer.apply(&BuildEvent::CanRun { can_run: true }));
        assert!(buffer.can_run());

        buffer.apply(&BuildEvent::replace("Launching...\n"));
        assert_eq!(buffer.text(), "Launching...\n");
    }

    #[test]
    fn test_reporter_is_usable_from_threads() {
        let (reporter, rx) = channel();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let r = reporter.clone();
                std::thread::spawn(move || r.append(&format!("{}\n", i)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        drop(reporter);

        assert_eq!(rx.iter().count(), 4);
    }
}
