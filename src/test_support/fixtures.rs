//! Test fixtures for common test scenarios.
//!
//! Builders for Conan-style `conan_info.json` documents and for
//! ready-to-use project directories.

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::builder::context::BuildContext;
use crate::builder::toolchain::Toolchain;
use crate::core::flags::{ResolvedFlags, ResolvedManifest};
use crate::core::layout::ProjectLayout;

/// One `cpp_info` component of a dependency node.
///
/// Fields that are never set are emitted as `null`, the way Conan writes
/// components that carry no information of that kind.
#[derive(Debug, Clone, Default)]
pub struct ComponentFixture {
    includedirs: Option<Vec<String>>,
    libdirs: Option<Vec<String>>,
    bindirs: Option<Vec<String>>,
    defines: Option<Vec<String>>,
    libs: Option<Vec<String>>,
    system_libs: Option<Vec<String>>,
}

fn owned(values: &[&str]) -> Option<Vec<String>> {
    Some(values.iter().map(|v| v.to_string()).collect())
}

impl ComponentFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn includedirs(mut self, dirs: &[&str]) -> Self {
        self.includedirs = owned(dirs);
        self
    }

    pub fn libdirs(mut self, dirs: &[&str]) -> Self {
        self.libdirs = owned(dirs);
        self
    }

    pub fn bindirs(mut self, dirs: &[&str]) -> Self {
        self.bindirs = owned(dirs);
        self
    }

    pub fn defines(mut self, defines: &[&str]) -> Self {
        self.defines = owned(defines);
        self
    }

    pub fn libs(mut self, libs: &[&str]) -> Self {
        self.libs = owned(libs);
        self
    }

    pub fn system_libs(mut self, libs: &[&str]) -> Self {
        self.system_libs = owned(libs);
        self
    }

    fn to_value(&self) -> Value {
        json!({
            "includedirs": self.includedirs,
            "libdirs": self.libdirs,
            "bindirs": self.bindirs,
            "defines": self.defines,
            "libs": self.libs,
            "system_libs": self.system_libs,
        })
    }
}

/// A manifest with one node per entry, each holding a single `root`
/// component.
///
/// Node ids are written in the given order; the JSON text is assembled by
/// hand because `serde_json::Map` sorts its keys.
pub fn manifest_json(nodes: &[(&str, ComponentFixture)]) -> String {
    let rendered: Vec<String> = nodes
        .iter()
        .map(|(id, component)| {
            let mut cpp_info = Map::new();
            cpp_info.insert("root".to_string(), component.to_value());
            let node = json!({
                "ref": format!("{}/1.0", id.to_lowercase()),
                "cpp_info": cpp_info,
            });
            format!("{}: {}", Value::String(id.to_string()), node)
        })
        .collect();

    format!("{{\"graph\": {{\"nodes\": {{{}}}}}}}", rendered.join(", "))
}

/// A small two-node manifest resembling a freeglut install.
pub fn simple_manifest() -> String {
    manifest_json(&[
        (
            "0",
            ComponentFixture::new(),
        ),
        (
            "1",
            ComponentFixture::new()
                .includedirs(&["deps/freeglut/include"])
                .libdirs(&["deps/freeglut/lib"])
                .bindirs(&["deps/freeglut/bin"])
                .defines(&["FREEGLUT_STATIC"])
                .libs(&["freeglut_static"])
                .system_libs(&["opengl32", "glu32", "gdi32", "winmm"]),
        ),
    ])
}

/// A build context rooted at `root` with a placeholder compiler on disk.
///
/// The save and build directories exist afterwards. With `resolved`, the
/// context carries flags for a single `-lfoo` dependency; otherwise it
/// behaves as if no manifest has been written yet.
pub fn test_context(root: &Path, resolved: bool) -> BuildContext {
    let layout = ProjectLayout::new(root);
    layout.ensure_dirs().unwrap();
    std::fs::create_dir_all(&layout.toolchain_bin_dir).unwrap();

    let compiler = layout.toolchain_bin_dir.join("g++");
    std::fs::write(&compiler, b"").unwrap();

    let resolved = resolved.then(|| ResolvedManifest {
        flags: ResolvedFlags::new(vec!["-lfoo".to_string()]),
        bin_dirs: Vec::new(),
    });

    BuildContext {
        toolchain: Toolchain::new(compiler, &layout.toolchain_bin_dir),
        root: layout.root.clone(),
        build_dir: layout.build_dir.clone(),
        manifest_path: layout.manifest_path.clone(),
        output_executable: layout.output_executable.clone(),
        resolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::DependencyGraph;

    #[test]
    fn test_manifest_json_keeps_node_order() {
        let json = manifest_json(&[
            ("9", ComponentFixture::new().libs(&["z"])),
            ("1", ComponentFixture::new().libs(&["a"])),
        ]);
        let graph = DependencyGraph::from_json(Path::new("conan_info.json"), &json).unwrap();
        let libs: Vec<&str> = graph
            .components()
            .flat_map(|c| c.libs().iter().map(String::as_str))
            .collect();
        assert_eq!(libs, vec!["z", "a"]);
    }

    #[test]
    fn test_simple_manifest_parses() {
        let graph = DependencyGraph::from_json(Path::new("conan_info.json"), &simple_manifest()).unwrap();
        assert_eq!(graph.graph.nodes.len(), 2);
    }
}
