//! Core types for detection results.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::resolve::ResourceId;

/// Sentinel recorded when a node id is unset or cannot be resolved.
pub const UNRESOLVED_NAME: &str = "N/A";

/// Seed segment every hierarchy path is built from.
pub const ROOT_SEGMENT: &str = "Root";

/// Classification of one detected node. Closed set, never extended at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingKind {
    #[serde(rename = "deferred_placeholder")]
    DeferredPlaceholder,
    #[serde(rename = "hidden_at_load")]
    HiddenAtLoad,
    /// Reserved for deferred content matched by neither rule.
    #[serde(rename = "unknown_deferred")]
    UnknownDeferred,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::DeferredPlaceholder => "deferred_placeholder",
            FindingKind::HiddenAtLoad => "hidden_at_load",
            FindingKind::UnknownDeferred => "unknown_deferred",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "deferred_placeholder" => Some(FindingKind::DeferredPlaceholder),
            "hidden_at_load" => Some(FindingKind::HiddenAtLoad),
            "unknown_deferred" => Some(FindingKind::UnknownDeferred),
            _ => None,
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded detection result. Plain value: two findings with identical
/// fields are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Identity of the construction root this node was found under.
    pub root_id: Option<ResourceId>,
    pub root_name: String,
    pub node_id: Option<ResourceId>,
    /// Resolved id name, or [`UNRESOLVED_NAME`].
    pub node_id_name: String,
    pub kind: FindingKind,
    /// Slash-delimited type names from the construction root to this node,
    /// with `[id/<name>]` suffixes where ids resolve.
    pub hierarchy_path: String,
}

/// Ordered collection of findings for an inflation session. Append-only
/// between explicit clears; duplicates across passes are expected.
#[derive(Debug, Default)]
pub struct FindingRegistry {
    findings: Vec<Finding>,
}

/// Registry handle shared between the driver and the hooks it installs.
/// Single-threaded by contract.
pub type SharedRegistry = Rc<RefCell<FindingRegistry>>;

impl FindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn append(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Current findings in insertion order. Does not reflect later appends.
    pub fn snapshot(&self) -> &[Finding] {
        &self.findings
    }

    /// Drop all findings; called by the driver between inflation passes.
    pub fn clear(&mut self) {
        self.findings.clear();
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Findings for one scanned layout file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub file: String,
    pub layout: String,
    pub findings: Vec<Finding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: FindingKind, path: &str) -> Finding {
        Finding {
            root_id: None,
            root_name: "main".to_string(),
            node_id: None,
            node_id_name: UNRESOLVED_NAME.to_string(),
            kind,
            hierarchy_path: path.to_string(),
        }
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            FindingKind::DeferredPlaceholder,
            FindingKind::HiddenAtLoad,
            FindingKind::UnknownDeferred,
        ] {
            assert_eq!(FindingKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(FindingKind::parse("view_stub"), None);
    }

    #[test]
    fn test_registry_preserves_insertion_order() {
        let mut registry = FindingRegistry::new();
        registry.append(sample(FindingKind::DeferredPlaceholder, "Root/A"));
        registry.append(sample(FindingKind::HiddenAtLoad, "Root/B"));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].hierarchy_path, "Root/A");
        assert_eq!(snapshot[1].hierarchy_path, "Root/B");
    }

    #[test]
    fn test_registry_clear_empties() {
        let mut registry = FindingRegistry::new();
        registry.append(sample(FindingKind::HiddenAtLoad, "Root/A"));
        assert!(!registry.is_empty());

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
