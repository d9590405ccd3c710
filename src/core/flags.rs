//! Flattening a dependency manifest into compiler flags.
//!
//! Path-like sets are emitted sorted; library lists keep the order in which
//! names were first seen, since link order can decide whether a link
//! succeeds. The output for a given manifest is byte-for-byte stable.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::manifest::{ComponentInfo, DependencyGraph, ManifestError};
use crate::util::fs::{absolutize, normalize_path};

/// Accumulated build information from every component of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub include_dirs: BTreeSet<PathBuf>,
    pub lib_dirs: BTreeSet<PathBuf>,
    pub bin_dirs: BTreeSet<PathBuf>,
    pub defines: BTreeSet<String>,
    pub libs: Vec<String>,
    pub system_libs: Vec<String>,
}

impl FlagSet {
    /// Fold every component of `graph` into a new set.
    ///
    /// Relative paths are resolved against `root`.
    pub fn from_graph(graph: &DependencyGraph, root: &Path) -> Self {
        let mut set = FlagSet::default();
        for component in graph.components() {
            set.add_component(component, root);
        }
        set
    }

    /// Add one component's information.
    pub fn add_component(&mut self, info: &ComponentInfo, root: &Path) {
        let resolve = |p: &String| normalize_path(&absolutize(root, Path::new(p)));

        self.include_dirs.extend(info.includedirs().iter().map(resolve));
        self.lib_dirs.extend(info.libdirs().iter().map(resolve));
        self.bin_dirs.extend(info.bindirs().iter().map(resolve));
        self.defines.extend(info.defines().iter().cloned());

        push_unique(&mut self.libs, info.libs());
        push_unique(&mut self.system_libs, info.system_libs());
    }

    /// Render the compiler flags in their canonical order.
    pub fn to_flags(&self) -> ResolvedFlags {
        let mut flags = Vec::with_capacity(
            self.include_dirs.len()
                + self.lib_dirs.len()
                + self.defines.len()
                + self.libs.len()
                + self.system_libs.len(),
        );

        flags.extend(self.include_dirs.iter().map(|p| format!("-I{}", p.display())));
        flags.extend(self.lib_dirs.iter().map(|p| format!("-L{}", p.display())));
        flags.extend(self.defines.iter().map(|d| format!("-D{}", d)));
        flags.extend(self.libs.iter().map(|l| format!("-l{}", l)));
        flags.extend(self.system_libs.iter().map(|l| format!("-l{}", l)));

        ResolvedFlags(flags)
    }
}

fn push_unique(list: &mut Vec<String>, names: &[String]) {
    for name in names {
        if !list.contains(name) {
            list.push(name.clone());
        }
    }
}

/// Ordered compiler flags derived from a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFlags(Vec<String>);

impl ResolvedFlags {
    pub fn new(flags: Vec<String>) -> Self {
        ResolvedFlags(flags)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResolvedFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl<'a> IntoIterator for &'a ResolvedFlags {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of resolving a manifest: the flags plus the directories that must
/// be on the runtime search path for the built program to find its DLLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedManifest {
    pub flags: ResolvedFlags,
    pub bin_dirs: Vec<PathBuf>,
}

impl ResolvedManifest {
    pub fn from_graph(graph: &DependencyGraph, root: &Path) -> Self {
        let set = FlagSet::from_graph(graph, root);
        ResolvedManifest {
            flags: set.to_flags(),
            bin_dirs: set.bin_dirs.into_iter().collect(),
        }
    }
}

/// Read the manifest at `path` and resolve it against `root`.
///
/// Returns `Ok(None)` when the manifest does not exist yet.
pub fn resolve_manifest(path: &Path, root: &Path) -> Result<Option<ResolvedManifest>, ManifestError> {
    let Some(graph) = DependencyGraph::load(path)? else {
        return Ok(None);
    };

    let resolved = ResolvedManifest::from_graph(&graph, root);
    tracing::debug!(
        "resolved {} flag(s) and {} bin dir(s) from {}",
        resolved.flags.len(),
        resolved.bin_dirs.len(),
        path.display()
    );
    Ok(Some(resolved))
}
