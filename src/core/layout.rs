//! Fixed on-disk layout of a cxxpad project.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::config::BuildSettings;
use crate::util::fs::ensure_dir;

/// Default name of the dependency manifest inside the build directory.
pub const DEFAULT_MANIFEST_NAME: &str = "conan_info.json";

/// Default name of the produced executable (without platform suffix).
pub const DEFAULT_OUTPUT_NAME: &str = "user_app";

/// Source written to the start file the first time a project is opened.
pub const DEFAULT_CPP_CODE: &str = r#"#include <GL/freeglut.h>

void display() {
    glClear(GL_COLOR_BUFFER_BIT);
    // Your OpenGL code here

    glFlush();
}

int main(int argc, char** argv) {
    glutInit(&argc, argv);
    glutCreateWindow("OpenGL Project");
    glutInitDisplayMode(GLUT_SINGLE | GLUT_RGB);
    glutInitWindowSize(500, 500);
    glutInitWindowPosition(100, 100);
    glClearColor(0.2f, 0.2f, 0.2f, 1.0f);
    glutDisplayFunc(display);
    glutMainLoop();
    return 0;
}
"#;

/// All locations derived from a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub vendor_dir: PathBuf,
    pub build_dir: PathBuf,
    pub save_dir: PathBuf,
    pub session_file: PathBuf,
    pub default_start_file: PathBuf,
    /// Dependency manifest written by `conan install`
    pub manifest_path: PathBuf,
    pub output_executable: PathBuf,
    /// Bundled MinGW toolchain binaries
    pub toolchain_bin_dir: PathBuf,
}

impl ProjectLayout {
    /// Create the default layout for `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let vendor_dir = root.join("vendor");
        let build_dir = root.join("build");
        let save_dir = root.join("saves");

        ProjectLayout {
            session_file: root.join("session.json"),
            default_start_file: save_dir.join("main.cpp"),
            manifest_path: build_dir.join(DEFAULT_MANIFEST_NAME),
            output_executable: build_dir.join(executable_name(DEFAULT_OUTPUT_NAME)),
            toolchain_bin_dir: vendor_dir.join("mingw64").join("bin"),
            root,
            vendor_dir,
            build_dir,
            save_dir,
        }
    }

    /// Apply manifest/output name overrides from configuration.
    pub fn with_build_settings(mut self, settings: &BuildSettings) -> Self {
        if let Some(ref name) = settings.output_name {
            self.output_executable = self.build_dir.join(executable_name(name));
        }
        if let Some(ref manifest) = settings.manifest {
            self.manifest_path = self.build_dir.join(manifest);
        }
        self
    }

    /// Create the save and build directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        ensure_dir(&self.save_dir)?;
        ensure_dir(&self.build_dir)?;
        Ok(())
    }

    /// Whether a built executable is present on disk.
    pub fn can_run(&self) -> bool {
        self.output_executable.is_file()
    }
}

/// Platform-appropriate executable file name.
pub fn executable_name(stem: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", stem)
    } else {
        stem.to_string()
    }
}
