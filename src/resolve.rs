//! Resource identifiers and name resolution.
//!
//! The engine refers to layouts and views by numeric ids; resolution maps an
//! id back to the human-readable name it was declared under. Unresolvable
//! ids are an expected, recoverable condition and the lookup is
//! `Result`-shaped so callers handle it explicitly.

use std::collections::HashMap;

use thiserror::Error;

use crate::layout::{ElementSpec, LayoutFile};

/// Numeric resource identifier. "Unset" is modeled as `Option::None` at the
/// call sites, never as a sentinel value.
pub type ResourceId = u32;

/// Synthetic id space for interned names, in the style of compiled resource
/// tables.
const ID_BASE: ResourceId = 0x7f0a_0000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no resource entry for id 0x{0:08x}")]
    NotFound(ResourceId),
}

/// Maps an id back to the name it was declared under. Failure is common
/// (dynamically generated or private ids) and must never propagate past the
/// classifier.
pub trait ResourceResolver {
    fn resolve_name(&self, id: ResourceId) -> Result<String, ResolveError>;
}

/// In-memory resource table: interns names to synthetic ids.
#[derive(Debug, Default)]
pub struct ResourceTable {
    by_name: HashMap<String, ResourceId>,
    by_id: HashMap<ResourceId, String>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table for one layout file: the layout's own name plus every
    /// id declared anywhere in its tree.
    pub fn from_layout(layout: &LayoutFile) -> Self {
        let mut table = Self::new();
        table.intern(&layout.name);
        table.intern_element(&layout.root);
        table
    }

    fn intern_element(&mut self, spec: &ElementSpec) {
        if let Some(id) = &spec.id {
            self.intern(id);
        }
        for child in &spec.children {
            self.intern_element(child);
        }
    }

    /// Intern `name`, returning its id. Idempotent.
    pub fn intern(&mut self, name: &str) -> ResourceId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = ID_BASE + self.by_name.len() as ResourceId;
        self.by_name.insert(name.to_string(), id);
        self.by_id.insert(id, name.to_string());
        id
    }

    pub fn lookup_id(&self, name: &str) -> Option<ResourceId> {
        self.by_name.get(name).copied()
    }
}

impl ResourceResolver for ResourceTable {
    fn resolve_name(&self, id: ResourceId) -> Result<String, ResolveError> {
        self.by_id
            .get(&id)
            .cloned()
            .ok_or(ResolveError::NotFound(id))
    }
}
