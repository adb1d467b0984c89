//! The node catalog: static knowledge of node kinds and their typed slots.
//!
//! A catalog is built once and then only read. Kinds are shared behind `Arc`, so every
//! node instance in every graph can hold onto its kind without borrowing the catalog,
//! and a single catalog can serve concurrent graph builds.

use crate::error::GraphError;
use ahash::AHashMap;
use std::sync::Arc;

mod builtin;
pub mod kind;

pub use builtin::{ADAPTER_KIND, BUILTIN_KINDS};
pub use kind::{DataType, InputSlot, NodeKind, OutputSlot};

/// Registry of node kinds, keyed by kind name.
#[derive(Debug, Clone)]
pub struct NodeCatalog {
    kinds: AHashMap<String, Arc<NodeKind>>,
}

impl NodeCatalog {
    /// A catalog holding every built-in kind.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for kind in builtin::builtin_kinds() {
            catalog.register(kind);
        }
        catalog
    }

    pub fn empty() -> Self {
        Self {
            kinds: AHashMap::new(),
        }
    }

    /// Registers a kind, replacing any kind with the same name.
    pub fn register(&mut self, kind: NodeKind) {
        self.kinds.insert(kind.name().to_string(), Arc::new(kind));
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.register(kind);
        self
    }

    pub fn lookup(&self, kind_name: &str) -> Result<Arc<NodeKind>, GraphError> {
        self.kinds
            .get(kind_name)
            .cloned()
            .ok_or_else(|| GraphError::UnknownNodeKind(kind_name.to_string()))
    }

    pub fn contains(&self, kind_name: &str) -> bool {
        self.kinds.contains_key(kind_name)
    }

    /// Registered kind names, sorted.
    pub fn kind_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for NodeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
