//! `cxxpad build` command

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{BuildArgs, MessageFormat};
use crate::commands::NonInteractive;
use cxxpad::builder::{BuildEvent, BuildState, OutputSink, SystemExecutor};
use cxxpad::ops::{build, BuildOptions};
use cxxpad::util::GlobalContext;

/// Output surface for the terminal: replace and append both just print.
pub struct StderrSink;

impl OutputSink for StderrSink {
    fn replace(&self, text: &str) {
        eprint!("{}", text);
    }

    fn append(&self, text: &str) {
        eprint!("{}", text);
    }
}

pub fn execute(ctx: &GlobalContext, args: BuildArgs) -> Result<()> {
    let opts = BuildOptions {
        file: args.file,
        run_after: args.run,
    };

    let state = match args.message_format {
        MessageFormat::Json => build(ctx, &opts, Arc::new(SystemExecutor), &NonInteractive, |event| {
            println!("{}", event.to_json());
        })?,
        MessageFormat::Human => {
            let spinner = spinner(ctx.is_verbose());
            let state = build(ctx, &opts, Arc::new(SystemExecutor), &NonInteractive, |event| {
                show_event(&spinner, event);
            })?;
            spinner.finish_and_clear();
            state
        }
    };

    let _ = std::io::stdout().flush();

    match state {
        BuildState::Succeeded => Ok(()),
        state => bail!("build did not succeed ({})", describe(state)),
    }
}

fn spinner(verbose: bool) -> ProgressBar {
    if verbose {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Saving...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn show_event(pb: &ProgressBar, event: &BuildEvent) {
    match event {
        BuildEvent::Output { text, .. } => pb.suspend(|| {
            print!("{}", text);
            let _ = std::io::stdout().flush();
        }),
        BuildEvent::Warning { title, message } => {
            pb.suspend(|| eprintln!("warning: {}: {}", title, message))
        }
        BuildEvent::StateChanged {
            state: BuildState::Running,
        } => pb.set_message("Compiling..."),
        BuildEvent::Diagnostic(d) => tracing::debug!(
            "{}:{}: {:?}: {}",
            d.file.display(),
            d.line,
            d.severity,
            d.message
        ),
        BuildEvent::Finished { duration_ms, .. } => {
            tracing::debug!("request finished in {} ms", duration_ms)
        }
        _ => {}
    }
}

fn describe(state: BuildState) -> &'static str {
    match state {
        BuildState::Aborted => "cancelled",
        BuildState::Rejected => "another build is running",
        BuildState::FlagsMissing => "dependency information missing",
        BuildState::CompilerMissing => "compiler missing",
        BuildState::Failed => "compilation failed",
        _ => "unexpected state",
    }
}
