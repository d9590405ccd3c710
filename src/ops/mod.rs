//! High-level operations.
//!
//! This module contains the implementation of cxxpad commands.

pub mod cxxpad_build;
pub mod cxxpad_init;
pub mod doctor;
pub mod editor;

pub use cxxpad_build::{build, launch, open_orchestrator, BuildOptions};
pub use cxxpad_init::{init_project, InitResult};
pub use doctor::{doctor, format_report, CheckResult, DoctorOptions, DoctorReport};
pub use editor::Editor;
