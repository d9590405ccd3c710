//! Project and toolchain health checks.
//!
//! The `doctor` command verifies that a project can be built: a compiler
//! can be located, the dependency manifest is present and readable, and the
//! build directory accepts new files.
//!
//! ## Usage
//!
//! ```bash
//! cxxpad doctor           # Quick check
//! cxxpad -v doctor        # Detailed output
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::builder::toolchain::Toolchain;
use crate::core::layout::ProjectLayout;
use crate::core::manifest::DependencyGraph;
use crate::util::config::{project_config_path, Config};
use crate::util::fs::ensure_dir;
use crate::util::process::ProcessBuilder;
use crate::util::GlobalContext;

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool or file (if applicable)
    pub path: Option<PathBuf>,

    /// Version string (if applicable)
    pub version: Option<String>,

    /// How long the check took
    pub duration: Duration,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            passed: false,
            ..Self::pass(name, message)
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    pub checks: Vec<CheckResult>,

    pub total_duration: Duration,

    /// Environment information
    pub environment: BTreeMap<String, String>,
}

impl DoctorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }
}

/// Options for the doctor command.
#[derive(Debug, Clone, Default)]
pub struct DoctorOptions {
    /// Run the compiler to report its version
    pub probe_version: bool,
}

/// Run every check against the project in `ctx`.
pub fn doctor(ctx: &GlobalContext, options: DoctorOptions) -> Result<DoctorReport> {
    let start = Instant::now();
    let mut report = DoctorReport::new();
    let layout = ctx.layout();

    report
        .environment
        .insert("os".to_string(), std::env::consts::OS.to_string());
    report
        .environment
        .insert("arch".to_string(), std::env::consts::ARCH.to_string());
    report
        .environment
        .insert("root".to_string(), layout.root.display().to_string());

    report.add(check_config(ctx));
    report.add(check_compiler(ctx, &layout, &options));
    report.add(check_toolchain_bin_dir(&layout));
    report.add(check_manifest(&layout));
    report.add(check_build_dir(&layout));

    report.total_duration = start.elapsed();
    Ok(report)
}

/// The project config file, when present, must parse.
fn check_config(ctx: &GlobalContext) -> CheckResult {
    let start = Instant::now();
    let path = project_config_path(ctx.root());

    if !path.exists() {
        return CheckResult::pass("Configuration", "No project configuration (using defaults)")
            .with_duration(start.elapsed())
            .optional();
    }

    let check = match Config::load(&path) {
        Ok(_) => CheckResult::pass("Configuration", "Project configuration is valid"),
        Err(e) => CheckResult::fail("Configuration", format!("{:#}", e)),
    };
    check
        .with_path(path)
        .with_duration(start.elapsed())
        .optional()
}

fn check_compiler(ctx: &GlobalContext, layout: &ProjectLayout, options: &DoctorOptions) -> CheckResult {
    let start = Instant::now();

    match Toolchain::locate(layout, &ctx.config().toolchain) {
        Ok(toolchain) => {
            let mut check = CheckResult::pass("C++ Compiler", "Compiler located");
            if options.probe_version {
                if let Some(version) = compiler_version(&toolchain) {
                    check = check.with_version(version);
                }
            }
            check
                .with_path(toolchain.compiler)
                .with_duration(start.elapsed())
        }
        Err(e) => CheckResult::fail("C++ Compiler", e.to_string()).with_duration(start.elapsed()),
    }
}

/// First line of `<compiler> --version`.
fn compiler_version(toolchain: &Toolchain) -> Option<String> {
    let output = ProcessBuilder::new(&toolchain.compiler)
        .arg("--version")
        .exec()
        .ok()?;
    let text = String::from_utf8_lossy(&output.stdout);
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// The bundled toolchain is only shipped on Windows.
fn check_toolchain_bin_dir(layout: &ProjectLayout) -> CheckResult {
    let dir = &layout.toolchain_bin_dir;
    let check = if dir.is_dir() {
        CheckResult::pass("Bundled toolchain", "Toolchain bin directory present")
    } else {
        CheckResult::fail("Bundled toolchain", "Toolchain bin directory not found")
    };
    check.with_path(dir.clone()).optional()
}

fn check_manifest(layout: &ProjectLayout) -> CheckResult {
    let start = Instant::now();
    let path = layout.manifest_path.clone();

    let check = match DependencyGraph::load(&path) {
        Ok(Some(graph)) => CheckResult::pass(
            "Dependency manifest",
            format!("{} dependency node(s)", graph.graph.nodes.len()),
        ),
        Ok(None) => CheckResult::fail(
            "Dependency manifest",
            "Not found (run conan install first); builds are disabled",
        ),
        Err(e) => CheckResult::fail("Dependency manifest", e.to_string()),
    };

    check.with_path(path).with_duration(start.elapsed())
}

/// The build directory must accept new files (the compiler writes there).
fn check_build_dir(layout: &ProjectLayout) -> CheckResult {
    let start = Instant::now();
    let dir = &layout.build_dir;

    let result = ensure_dir(dir).and_then(|_| Ok(tempfile::NamedTempFile::new_in(dir)?));

    let check = match result {
        Ok(_) => CheckResult::pass("Build directory", "Writable"),
        Err(e) => CheckResult::fail("Build directory", format!("Not writable: {:#}", e)),
    };
    check.with_path(dir.clone()).with_duration(start.elapsed())
}

/// Format the doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    let _ = writeln!(output, "cxxpad doctor");
    let _ = writeln!(output, "=============\n");

    if verbose {
        let get = |key: &str| {
            report
                .environment
                .get(key)
                .map(String::as_str)
                .unwrap_or("unknown")
        };
        let _ = writeln!(output, "Environment:");
        let _ = writeln!(output, "  OS: {} ({})", get("os"), get("arch"));
        let _ = writeln!(output, "  Project: {}", get("root"));
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "Checks:");
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };

        let _ = writeln!(output, "  {} {}{}", status, check.name, required);

        if verbose || !check.passed {
            let _ = writeln!(output, "      {}", check.message);
        }
        if verbose {
            if let Some(path) = &check.path {
                let _ = writeln!(output, "      Path: {}", path.display());
            }
            if let Some(version) = &check.version {
                let _ = writeln!(output, "      Version: {}", version);
            }
        }
    }

    let _ = writeln!(output);

    let failed = report.failed_count();
    let required_failed = report.required_failed_count();

    let _ = writeln!(
        output,
        "Summary: {} passed, {} failed",
        report.passed_count(),
        failed
    );

    if required_failed > 0 {
        let _ = writeln!(
            output,
            "\nWarning: {} required check(s) failed. Builds will not work until they are fixed.",
            required_failed
        );
    } else if failed > 0 {
        let _ = writeln!(
            output,
            "\nAll required checks passed. {} optional check(s) failed.",
            failed
        );
    } else {
        let _ = writeln!(output, "\nAll checks passed. The project is ready to build.");
    }

    output
}
