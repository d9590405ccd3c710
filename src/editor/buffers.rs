//! Open text buffers (editor tabs).
//!
//! This is the interface-independent part of tab management: naming,
//! dirty tracking, saving and closing. Anything that needs a dialog goes
//! through [`Prompt`], so a GUI, a terminal front end and tests can each
//! answer in their own way.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::output::OutputSink;
use crate::core::layout::{ProjectLayout, DEFAULT_CPP_CODE};
use crate::core::session::SessionState;
use crate::util::fs::{read_to_string, write_string};

/// Name given to buffers that have never been saved.
pub const UNTITLED: &str = "Untitled";

/// Answer to "save changes before continuing?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

/// User interaction needed by buffer operations.
pub trait Prompt {
    /// Ask for a destination file; `None` if the user cancelled.
    fn save_path(&self, initial_dir: &Path) -> Option<PathBuf>;

    /// Ask whether to save the modified buffer `name`.
    fn confirm_save(&self, name: &str) -> SaveChoice;

    /// Ask whether to quit although some buffers are unsaved.
    fn confirm_quit(&self) -> bool;

    /// Show a warning.
    fn warn(&self, title: &str, message: &str);
}

/// One open file (or unsaved scratch buffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    name: String,
    path: Option<PathBuf>,
    content: String,
    dirty: bool,
}

impl Buffer {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Tab label: the name, with a `*` while there are unsaved changes.
    pub fn label(&self) -> String {
        if self.dirty {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// The ordered set of open buffers and which one is active.
#[derive(Debug, Clone)]
pub struct BufferSet {
    buffers: Vec<Buffer>,
    active: Option<usize>,
    save_dir: PathBuf,
}

impl BufferSet {
    /// `save_dir` is where "save as" dialogs start.
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        BufferSet {
            buffers: Vec::new(),
            active: None,
            save_dir: save_dir.into(),
        }
    }

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn active(&self) -> Option<&Buffer> {
        self.active.and_then(|i| self.buffers.get(i))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.active().and_then(Buffer::path)
    }

    /// Tab labels in display order.
    pub fn labels(&self) -> Vec<String> {
        self.buffers.iter().map(Buffer::label).collect()
    }

    /// Paths of saved buffers, in tab order.
    pub fn open_paths(&self) -> Vec<PathBuf> {
        self.buffers.iter().filter_map(|b| b.path.clone()).collect()
    }

    pub fn has_dirty(&self) -> bool {
        self.buffers.iter().any(|b| b.dirty)
    }

    /// Snapshot for the session file.
    pub fn session(&self) -> SessionState {
        SessionState::new(self.open_paths(), self.active_path().map(Path::to_path_buf))
    }

    /// Focus the buffer at `index`.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index < self.buffers.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    /// Focus the buffer showing `path`.
    pub fn set_active_path(&mut self, path: &Path) -> bool {
        match self.position_of(path) {
            Some(index) => self.set_active(index),
            None => {
                tracing::warn!("no open buffer for {}", path.display());
                false
            }
        }
    }

    fn position_of(&self, path: &Path) -> Option<usize> {
        self.buffers
            .iter()
            .position(|b| b.path.as_deref() == Some(path))
    }

    /// A name not used by any buffer other than `except`:
    /// `main.cpp`, then `main_1.cpp`, `main_2.cpp`, ...
    fn unique_name(&self, base: &str, except: Option<usize>) -> String {
        let taken = |name: &str| {
            self.buffers
                .iter()
                .enumerate()
                .any(|(i, b)| Some(i) != except && b.name == name)
        };

        if !taken(base) {
            return base.to_string();
        }

        let base_path = Path::new(base);
        let stem = base_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| base.to_string());
        let ext = base_path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        (1..)
            .map(|i| format!("{}_{}{}", stem, i, ext))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Add a buffer and focus it. Buffers without a path start dirty.
    fn add(&mut self, path: Option<PathBuf>, content: String) -> usize {
        let base = path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string());
        let name = self.unique_name(&base, None);

        self.buffers.push(Buffer {
            name,
            dirty: path.is_none(),
            path,
            content,
        });
        let index = self.buffers.len() - 1;
        self.active = Some(index);
        index
    }

    /// Ask to save the active buffer if it has changes.
    ///
    /// Returns `false` when the caller should not proceed.
    fn settle_active(&mut self, prompt: &dyn Prompt, sink: &dyn OutputSink) -> Result<bool> {
        let Some(buffer) = self.active() else {
            return Ok(true);
        };
        if !buffer.dirty {
            return Ok(true);
        }

        match prompt.confirm_save(&buffer.name) {
            SaveChoice::Save => Ok(self.save_active(prompt, sink)?.is_some()),
            SaveChoice::Discard => Ok(true),
            SaveChoice::Cancel => Ok(false),
        }
    }

    /// Open a new untitled buffer with the starter program.
    ///
    /// A modified active buffer is offered for saving first; returns
    /// `false` if the user backed out.
    pub fn new_buffer(&mut self, prompt: &dyn Prompt, sink: &dyn OutputSink) -> Result<bool> {
        if !self.settle_active(prompt, sink)? {
            return Ok(false);
        }
        self.add(None, DEFAULT_CPP_CODE.to_string());
        Ok(true)
    }

    /// Open `path`, or focus it if it is already open.
    ///
    /// Read failures are shown through `prompt` and yield `false`.
    pub fn open(&mut self, path: &Path, prompt: &dyn Prompt) -> bool {
        if let Some(index) = self.position_of(path) {
            return self.set_active(index);
        }

        match read_to_string(path) {
            Ok(content) => {
                self.add(Some(path.to_path_buf()), content);
                true
            }
            Err(e) => {
                prompt.warn(
                    "Open failed",
                    &format!("Unable to open file {}:\n{:#}", path.display(), e),
                );
                false
            }
        }
    }

    /// Replace the active buffer's text and mark it modified.
    pub fn edit(&mut self, content: impl Into<String>) -> bool {
        match self.active.and_then(|i| self.buffers.get_mut(i)) {
            Some(buffer) => {
                buffer.content = content.into();
                buffer.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Write the active buffer to its file.
    ///
    /// Untitled buffers go through [`BufferSet::save_active_as`]. Returns the
    /// saved path, or `None` when there is nothing to save or the user
    /// cancelled the destination dialog.
    pub fn save_active(&mut self, prompt: &dyn Prompt, sink: &dyn OutputSink) -> Result<Option<PathBuf>> {
        let Some(index) = self.active else {
            return Ok(None);
        };
        let Some(path) = self.buffers[index].path.clone() else {
            return self.save_active_as(prompt, sink);
        };

        write_string(&path, &self.buffers[index].content)?;

        let base = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string());
        let name = self.unique_name(&base, Some(index));
        let buffer = &mut self.buffers[index];
        buffer.dirty = false;
        buffer.name = name;

        tracing::debug!("saved {}", path.display());
        sink.append(&format!("File '{}' saved.\n", base));
        Ok(Some(path))
    }

    /// Ask for a new destination for the active buffer, then save it there.
    pub fn save_active_as(&mut self, prompt: &dyn Prompt, sink: &dyn OutputSink) -> Result<Option<PathBuf>> {
        let Some(index) = self.active else {
            return Ok(None);
        };
        let Some(path) = prompt.save_path(&self.save_dir) else {
            return Ok(None);
        };

        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let buffer = &mut self.buffers[index];
        buffer.path = Some(path);
        buffer.dirty = true;

        sink.append(&format!("File saved as '{}'.\n", display_name));
        self.save_active(prompt, sink)
    }

    /// Close the active buffer, offering to save changes first.
    ///
    /// Closing the last buffer opens a fresh untitled one. Returns `false`
    /// if the user backed out.
    pub fn close_active(&mut self, prompt: &dyn Prompt, sink: &dyn OutputSink) -> Result<bool> {
        let Some(index) = self.active else {
            return Ok(false);
        };
        if !self.settle_active(prompt, sink)? {
            return Ok(false);
        }

        self.buffers.remove(index);
        self.active = if self.buffers.is_empty() {
            None
        } else {
            Some(index.min(self.buffers.len() - 1))
        };

        if self.buffers.is_empty() {
            self.add(None, DEFAULT_CPP_CODE.to_string());
        }
        Ok(true)
    }

    /// Reopen the files of a previous session.
    ///
    /// Files that no longer exist are skipped. If nothing could be opened,
    /// the project's start file is opened instead (and created from the
    /// starter program if missing).
    pub fn restore(
        &mut self,
        session: Option<&SessionState>,
        layout: &ProjectLayout,
        prompt: &dyn Prompt,
    ) -> Result<()> {
        if let Some(session) = session.filter(|s| !s.is_empty()) {
            for path in &session.open_files {
                if path.exists() {
                    self.open(path, prompt);
                } else {
                    tracing::debug!("skipping missing session file {}", path.display());
                }
            }
            if let Some(ref active) = session.active_file {
                if self.position_of(active).is_some() {
                    self.set_active_path(active);
                }
            }
        }

        if self.buffers.is_empty() {
            self.open_start_file(layout, prompt)?;
        }
        Ok(())
    }

    fn open_start_file(&mut self, layout: &ProjectLayout, prompt: &dyn Prompt) -> Result<()> {
        let start = &layout.default_start_file;
        if !start.exists() {
            write_string(start, DEFAULT_CPP_CODE)?;
        }
        self.open(start, prompt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingPrompt, RecordingSink};
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_open_and_focus_existing() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "a.cpp", "int a;");
        let b = write(tmp.path(), "b.cpp", "int b;");
        let prompt = RecordingPrompt::new();
        let mut set = BufferSet::new(tmp.path());

        assert!(set.open(&a, &prompt));
        assert!(set.open(&b, &prompt));
        assert_eq!(set.active_path(), Some(b.as_path()));

        assert!(set.open(&a, &prompt));
        assert_eq!(set.len(), 2);
        assert_eq!(set.active_path(), Some(a.as_path()));
        assert_eq!(set.active().unwrap().content(), "int a;");
    }

    #[test]
    fn test_open_failure_warns() {
        let tmp = TempDir::new().unwrap();
        let prompt = RecordingPrompt::new();
        let mut set = BufferSet::new(tmp.path());

        assert!(!set.open(&tmp.path().join("missing.cpp"), &prompt));
        assert!(set.is_empty());
        assert_eq!(prompt.warnings().len(), 1);
        assert_eq!(prompt.warnings()[0].0, "Open failed");
    }

    #[test]
    fn test_unique_names_for_same_file_name() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("x")).unwrap();
        std::fs::create_dir_all(tmp.path().join("y")).unwrap();
        let first = write(&tmp.path().join("x"), "main.cpp", "");
        let second = write(&tmp.path().join("y"), "main.cpp", "");
        let prompt = RecordingPrompt::new();
        let mut set = BufferSet::new(tmp.path());

        set.open(&first, &prompt);
        set.open(&second, &prompt);

        assert_eq!(set.labels(), vec!["main.cpp", "main_1.cpp"]);
    }

    #[test]
    fn test_new_buffer_is_untitled_and_dirty() {
        let tmp = TempDir::new().unwrap();
        let prompt = RecordingPrompt::new();
        let sink = RecordingSink::new();
        let mut set = BufferSet::new(tmp.path());

        assert!(set.new_buffer(&prompt, &sink).unwrap());
        // The second untitled buffer prompts because the first is dirty.
        prompt.push_choice(SaveChoice::Discard);
        assert!(set.new_buffer(&prompt, &sink).unwrap());

        assert_eq!(set.labels(), vec!["Untitled*", "Untitled_1*"]);
        assert_eq!(set.active().unwrap().content(), DEFAULT_CPP_CODE);
        assert!(set.open_paths().is_empty());
    }

    #[test]
    fn test_new_buffer_cancelled() {
        let tmp = TempDir::new().unwrap();
        let prompt = RecordingPrompt::new();
        let sink = RecordingSink::new();
        let mut set = BufferSet::new(tmp.path());
        set.new_buffer(&prompt, &sink).unwrap();

        prompt.push_choice(SaveChoice::Cancel);
        assert!(!set.new_buffer(&prompt, &sink).unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_edit_and_save() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "main.cpp", "old");
        let prompt = RecordingPrompt::new();
        let sink = RecordingSink::new();
        let mut set = BufferSet::new(tmp.path());
        set.open(&path, &prompt);

        assert!(set.edit("new"));
        assert_eq!(set.labels(), vec!["main.cpp*"]);
        assert!(set.has_dirty());

        let saved = set.save_active(&prompt, &sink).unwrap();
        assert_eq!(saved, Some(path.clone()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(set.labels(), vec!["main.cpp"]);
        assert!(!set.has_dirty());
        assert_eq!(sink.text(), "File 'main.cpp' saved.\n");
    }

    #[test]
    fn test_save_untitled_goes_through_save_as() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("saves").join("demo.cpp");
        let prompt = RecordingPrompt::new();
        prompt.push_save_path(Some(dest.clone()));
        let sink = RecordingSink::new();
        let mut set = BufferSet::new(tmp.path().join("saves"));
        set.new_buffer(&prompt, &sink).unwrap();

        let saved = set.save_active(&prompt, &sink).unwrap();

        assert_eq!(saved, Some(dest.clone()));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), DEFAULT_CPP_CODE);
        assert_eq!(set.labels(), vec!["demo.cpp"]);
        assert_eq!(sink.text(), "File saved as 'demo.cpp'.\nFile 'demo.cpp' saved.\n");
        assert_eq!(prompt.save_dirs(), vec![tmp.path().join("saves")]);
    }

    #[test]
    fn test_save_untitled_cancelled() {
        let tmp = TempDir::new().unwrap();
        let prompt = RecordingPrompt::new();
        prompt.push_save_path(None);
        let sink = RecordingSink::new();
        let mut set = BufferSet::new(tmp.path());
        set.new_buffer(&prompt, &sink).unwrap();

        assert_eq!(set.save_active(&prompt, &sink).unwrap(), None);
        assert!(set.has_dirty());
        assert!(sink.text().is_empty());
    }

    #[test]
    fn test_close_dirty_buffer_choices() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "a.cpp", "a");
        let b = write(tmp.path(), "b.cpp", "b");
        let prompt = RecordingPrompt::new();
        let sink = RecordingSink::new();
        let mut set = BufferSet::new(tmp.path());
        set.open(&a, &prompt);
        set.open(&b, &prompt);
        set.edit("b2");

        prompt.push_choice(SaveChoice::Cancel);
        assert!(!set.close_active(&prompt, &sink).unwrap());
        assert_eq!(set.len(), 2);

        prompt.push_choice(SaveChoice::Save);
        assert!(set.close_active(&prompt, &sink).unwrap());
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "b2");
        assert_eq!(set.len(), 1);
        assert_eq!(set.active_path(), Some(a.as_path()));
    }

    #[test]
    fn test_closing_last_buffer_opens_untitled() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "a.cpp", "a");
        let prompt = RecordingPrompt::new();
        let sink = RecordingSink::new();
        let mut set = BufferSet::new(tmp.path());
        set.open(&a, &prompt);

        assert!(set.close_active(&prompt, &sink).unwrap());
        assert_eq!(set.labels(), vec!["Untitled*"]);
    }

    #[test]
    fn test_restore_session() {
        let tmp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(tmp.path());
        layout.ensure_dirs().unwrap();
        let a = write(&layout.save_dir, "a.cpp", "a");
        let b = write(&layout.save_dir, "b.cpp", "b");
        let session = SessionState::new(
            vec![a.clone(), layout.save_dir.join("gone.cpp"), b.clone()],
            Some(a.clone()),
        );
        let prompt = RecordingPrompt::new();
        let mut set = BufferSet::new(&layout.save_dir);

        set.restore(Some(&session), &layout, &prompt).unwrap();

        assert_eq!(set.open_paths(), vec![a.clone(), b]);
        assert_eq!(set.active_path(), Some(a.as_path()));
        assert!(prompt.warnings().is_empty());
    }

    #[test]
    fn test_restore_without_session_creates_start_file() {
        let tmp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(tmp.path());
        let prompt = RecordingPrompt::new();
        let mut set = BufferSet::new(&layout.save_dir);

        set.restore(None, &layout, &prompt).unwrap();

        assert_eq!(set.active_path(), Some(layout.default_start_file.as_path()));
        assert_eq!(
            std::fs::read_to_string(&layout.default_start_file).unwrap(),
            DEFAULT_CPP_CODE
        );
        assert!(!set.has_dirty());
    }

    #[test]
    fn test_session_snapshot_skips_untitled() {
        let tmp = TempDir::new().unwrap();
        let a = write(tmp.path(), "a.cpp", "a");
        let prompt = RecordingPrompt::new();
        let sink = RecordingSink::new();
        let mut set = BufferSet::new(tmp.path());
        set.open(&a, &prompt);
        set.new_buffer(&prompt, &sink).unwrap();

        let session = set.session();
        assert_eq!(session.open_files, vec![a]);
        assert_eq!(session.active_file, None);
    }
}
