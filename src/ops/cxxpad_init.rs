//! Implementation of `cxxpad init`.

use anyhow::Result;

use crate::core::layout::{ProjectLayout, DEFAULT_CPP_CODE};
use crate::util::fs::write_string;

/// What `init` created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitResult {
    /// The start file did not exist and was written from the template
    pub created_start_file: bool,
}

/// Create the project directories and the start file.
///
/// Existing files are left alone, so running `init` twice is harmless.
pub fn init_project(layout: &ProjectLayout) -> Result<InitResult> {
    layout.ensure_dirs()?;

    let created_start_file = !layout.default_start_file.exists();
    if created_start_file {
        write_string(&layout.default_start_file, DEFAULT_CPP_CODE)?;
        tracing::info!("created {}", layout.default_start_file.display());
    }

    Ok(InitResult { created_start_file })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_layout() {
        let tmp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(tmp.path());

        let result = init_project(&layout).unwrap();

        assert!(result.created_start_file);
        assert!(layout.build_dir.is_dir());
        assert_eq!(
            std::fs::read_to_string(&layout.default_start_file).unwrap(),
            DEFAULT_CPP_CODE
        );
    }

    #[test]
    fn test_init_keeps_existing_start_file() {
        let tmp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(tmp.path());
        layout.ensure_dirs().unwrap();
        std::fs::write(&layout.default_start_file, "int main() {}").unwrap();

        let result = init_project(&layout).unwrap();

        assert!(!result.created_start_file);
        assert_eq!(
            std::fs::read_to_string(&layout.default_start_file).unwrap(),
            "int main() {}"
        );
    }
}
