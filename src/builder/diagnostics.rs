//! Extracting GCC-style diagnostics from compiler output.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::builder::events::{CompilerDiagnostic, Severity};

/// `file:line[:col]: severity: message`, allowing a Windows drive prefix.
static DIAGNOSTIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^(?P<file>(?:[A-Za-z]:)?[^:\n]+):(?P<line>\d+):(?:(?P<col>\d+):)?\s*(?P<sev>fatal error|error|warning|note):\s*(?P<msg>.*?)\r?$",
    )
    .expect("diagnostic regex is valid")
});

/// Parse every diagnostic line in `output`, in order of appearance.
pub fn parse_diagnostics(output: &str) -> Vec<CompilerDiagnostic> {
    DIAGNOSTIC_RE
        .captures_iter(output)
        .filter_map(|caps| {
            let line = caps["line"].parse().ok()?;
            let column = caps.name("col").and_then(|c| c.as_str().parse().ok());
            let severity = match &caps["sev"] {
                "warning" => Severity::Warning,
                "note" => Severity::Note,
                _ => Severity::Error,
            };

            Some(CompilerDiagnostic {
                file: PathBuf::from(caps["file"].trim()),
                line,
                column,
                severity,
                message: caps["msg"].trim().to_string(),
            })
        })
        .collect()
}
