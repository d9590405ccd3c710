//! Conan dependency-graph manifest.
//!
//! The manifest is the JSON document written by
//! `conan graph info --format json` (or `conan install --format json`) into
//! the build directory:
//!
//! ```json
//! {
//!   "graph": {
//!     "nodes": {
//!       "1": {
//!         "ref": "freeglut/3.4.0",
//!         "cpp_info": {
//!           "root": { "includedirs": ["include"], "libs": ["freeglut"] }
//!         }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Only the `cpp_info` records are read. Node and component maps keep the
//! order they have in the document, which defines "first seen" for library
//! names.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read dependency manifest {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dependency manifest {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A string-keyed map that keeps document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        OrderedMap(Vec::new())
    }
}

impl<'de, V> Deserialize<'de> for OrderedMap<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V> Visitor<'de> for OrderedMapVisitor<V>
        where
            V: Deserialize<'de>,
        {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    // Duplicate keys: last value wins, first position is kept
                    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
                        slot.1 = value;
                    } else {
                        entries.push((key, value));
                    }
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Top-level manifest document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependencyGraph {
    #[serde(default)]
    pub graph: Graph,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: OrderedMap<DependencyNode>,
}

/// One node of the dependency graph.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependencyNode {
    /// Package reference, e.g. `freeglut/3.4.0` (absent for the consumer)
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,

    /// Component name → build information
    #[serde(default)]
    pub cpp_info: Option<OrderedMap<ComponentInfo>>,
}

/// Build information for one component of a package.
///
/// Every field is optional in the document and may be `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentInfo {
    #[serde(default)]
    pub includedirs: Option<Vec<String>>,
    #[serde(default)]
    pub libdirs: Option<Vec<String>>,
    #[serde(default)]
    pub bindirs: Option<Vec<String>>,
    #[serde(default)]
    pub defines: Option<Vec<String>>,
    #[serde(default)]
    pub libs: Option<Vec<String>>,
    #[serde(default)]
    pub system_libs: Option<Vec<String>>,
}

impl ComponentInfo {
    pub fn includedirs(&self) -> &[String] {
        self.includedirs.as_deref().unwrap_or_default()
    }

    pub fn libdirs(&self) -> &[String] {
        self.libdirs.as_deref().unwrap_or_default()
    }

    pub fn bindirs(&self) -> &[String] {
        self.bindirs.as_deref().unwrap_or_default()
    }

    pub fn defines(&self) -> &[String] {
        self.defines.as_deref().unwrap_or_default()
    }

    pub fn libs(&self) -> &[String] {
        self.libs.as_deref().unwrap_or_default()
    }

    pub fn system_libs(&self) -> &[String] {
        self.system_libs.as_deref().unwrap_or_default()
    }
}

impl DependencyGraph {
    /// Parse a manifest from a JSON string.
    pub fn from_json(path: &Path, json: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(json).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the manifest at `path`.
    ///
    /// A missing file is not an error: it means dependencies have not been
    /// installed yet, and yields `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>, ManifestError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no dependency manifest at {}", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(ManifestError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_json(path, &contents).map(Some)
    }

    /// All component records, in document order, skipping nodes without
    /// build information.
    pub fn components(&self) -> impl Iterator<Item = &ComponentInfo> {
        self.graph
            .nodes
            .values()
            .filter_map(|node| node.cpp_info.as_ref())
            .flat_map(|info| info.values())
    }
}
