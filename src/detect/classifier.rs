//! Recursive classification of inflated view trees.
//!
//! The walk is pre-order: a node is classified before any of its
//! descendants, and every reachable descendant is visited exactly once. Two
//! mutually exclusive checks apply per node: placeholder detection (a
//! deferred-content stub is reported regardless of its own visibility), and
//! hidden-at-load detection (a hidden node is reported only when its direct
//! parent is not also hidden, so a hidden subtree yields one finding for its
//! outermost ancestor instead of one per node).
//!
//! The walk never mutates the tree and never halts early. Id resolution
//! failures are expected and swallowed.

use std::cell::RefCell;

use tracing::debug;

use crate::resolve::{ResourceId, ResourceResolver};
use crate::view::ViewRef;

use super::types::{Finding, FindingKind, FindingRegistry, UNRESOLVED_NAME};

/// Walks a view tree and appends findings to a registry.
pub struct Classifier<'a> {
    resolver: &'a dyn ResourceResolver,
    registry: &'a RefCell<FindingRegistry>,
}

impl<'a> Classifier<'a> {
    pub fn new(
        resolver: &'a dyn ResourceResolver,
        registry: &'a RefCell<FindingRegistry>,
    ) -> Self {
        Classifier { resolver, registry }
    }

    /// Classify `view` and all of its descendants under the identity of the
    /// construction root `(root_id, root_name)`. `parent_path` seeds the
    /// hierarchy path; callers start with [`super::ROOT_SEGMENT`].
    pub fn classify(
        &self,
        root_id: Option<ResourceId>,
        root_name: &str,
        view: Option<&ViewRef>,
        parent_path: &str,
    ) {
        let Some(view) = view else {
            return;
        };

        let mut current_path = format!("{}/{}", parent_path, view.type_name());
        if let Some(id) = view.id() {
            // Resolution failure leaves the path unsuffixed.
            if let Ok(name) = self.resolver.resolve_name(id) {
                current_path.push_str(&format!("[id/{}]", name));
            }
        }

        if view.is_stub() {
            self.record(
                root_id,
                root_name,
                view,
                FindingKind::DeferredPlaceholder,
                &current_path,
            );
        } else if view.visibility().is_hidden() && !parent_is_hidden(view) {
            self.record(root_id, root_name, view, FindingKind::HiddenAtLoad, &current_path);
        }

        for child in view.children() {
            self.classify(root_id, root_name, Some(&child), &current_path);
        }
    }

    fn record(
        &self,
        root_id: Option<ResourceId>,
        root_name: &str,
        view: &ViewRef,
        kind: FindingKind,
        path: &str,
    ) {
        let node_id = view.id();
        let node_id_name = node_id
            .and_then(|id| self.resolver.resolve_name(id).ok())
            .unwrap_or_else(|| UNRESOLVED_NAME.to_string());

        let finding = Finding {
            root_id,
            root_name: root_name.to_string(),
            node_id,
            node_id_name,
            kind,
            hierarchy_path: path.to_string(),
        };
        match view.deferred_target() {
            Some(target) => debug!(
                "detected {} at {} (defers {})",
                finding.kind, finding.hierarchy_path, target
            ),
            None => debug!("detected {} at {}", finding.kind, finding.hierarchy_path),
        }
        self.registry.borrow_mut().append(finding);
    }
}

/// A node without a view parent (detached, or hosted by a non-view
/// container) counts as having a visible parent.
fn parent_is_hidden(view: &ViewRef) -> bool {
    view.parent_view()
        .map(|parent| parent.visibility().is_hidden())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::types::ROOT_SEGMENT;
    use crate::resolve::ResourceTable;
    use crate::view::{View, Visibility};

    fn classify_tree(table: &ResourceTable, root: &ViewRef) -> Vec<Finding> {
        let registry = RefCell::new(FindingRegistry::new());
        Classifier::new(table, &registry).classify(None, "test_layout", Some(root), ROOT_SEGMENT);
        let findings = registry.borrow().snapshot().to_vec();
        findings
    }

    #[test]
    fn test_absent_node_is_a_noop() {
        let table = ResourceTable::new();
        let registry = RefCell::new(FindingRegistry::new());
        Classifier::new(&table, &registry).classify(None, "test_layout", None, ROOT_SEGMENT);
        assert!(registry.borrow().is_empty());
    }

    #[test]
    fn test_outermost_hidden_ancestor_wins() {
        // Root[visible] -> A[gone] -> B[gone]: only A is reported.
        let root = View::group("FrameLayout", None, Visibility::Visible);
        let a = View::group("LinearLayout", None, Visibility::Gone);
        let b = View::widget("TextView", None, Visibility::Gone);
        a.add_child(b);
        root.add_child(a);

        let findings = classify_tree(&ResourceTable::new(), &root);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::HiddenAtLoad);
        assert_eq!(findings[0].hierarchy_path, "Root/FrameLayout/LinearLayout");
    }

    #[test]
    fn test_invisible_counts_as_hidden() {
        let root = View::group("FrameLayout", None, Visibility::Visible);
        let child = View::widget("ProgressBar", None, Visibility::Invisible);
        root.add_child(child);

        let findings = classify_tree(&ResourceTable::new(), &root);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::HiddenAtLoad);
    }

    #[test]
    fn test_hidden_root_without_parent_is_reported() {
        // Detached and window-hosted roots both default to "report it".
        let detached = View::group("FrameLayout", None, Visibility::Gone);
        let findings = classify_tree(&ResourceTable::new(), &detached);
        assert_eq!(findings.len(), 1);

        let hosted = View::group("FrameLayout", None, Visibility::Gone);
        hosted.attach_to_window();
        let findings = classify_tree(&ResourceTable::new(), &hosted);
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_stub_reported_regardless_of_visibility() {
        let mut table = ResourceTable::new();
        let stub_id = table.intern("loader_stub");

        let root = View::group("FrameLayout", None, Visibility::Visible);
        let stub = View::stub("ViewStub", Some(stub_id), Visibility::Gone, None);
        root.add_child(stub);

        let findings = classify_tree(&table, &root);
        // One finding only: a stub is never also reported as hidden.
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::DeferredPlaceholder);
        assert_eq!(findings[0].node_id_name, "loader_stub");
        assert_eq!(
            findings[0].hierarchy_path,
            "Root/FrameLayout/ViewStub[id/loader_stub]"
        );
    }

    #[test]
    fn test_stub_under_hidden_parent_still_reported() {
        let root = View::group("FrameLayout", None, Visibility::Gone);
        let stub = View::stub("ViewStub", None, Visibility::Gone, None);
        root.add_child(stub);

        let findings = classify_tree(&ResourceTable::new(), &root);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].kind, FindingKind::HiddenAtLoad);
        assert_eq!(findings[1].kind, FindingKind::DeferredPlaceholder);
    }

    #[test]
    fn test_unresolvable_id_uses_sentinel_and_continues() {
        // Id 0x1 is in no table: path stays unsuffixed, name falls back to
        // the sentinel, and siblings are still visited.
        let root = View::group("FrameLayout", None, Visibility::Visible);
        let hidden = View::widget("TextView", Some(0x1), Visibility::Gone);
        let stub = View::stub("ViewStub", None, Visibility::Gone, None);
        root.add_child(hidden);
        root.add_child(stub);

        let findings = classify_tree(&ResourceTable::new(), &root);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].node_id_name, UNRESOLVED_NAME);
        assert_eq!(findings[0].hierarchy_path, "Root/FrameLayout/TextView");
        assert_eq!(findings[1].kind, FindingKind::DeferredPlaceholder);
    }

    #[test]
    fn test_preorder_and_path_prefix_extension() {
        let mut table = ResourceTable::new();
        let panel_id = table.intern("side_panel");

        let root = View::group("FrameLayout", None, Visibility::Visible);
        let hidden_top = View::widget("ImageView", None, Visibility::Gone);
        let panel = View::group("LinearLayout", Some(panel_id), Visibility::Visible);
        let hidden_deep = View::widget("TextView", None, Visibility::Invisible);
        panel.add_child(hidden_deep);
        root.add_child(hidden_top);
        root.add_child(panel);

        let findings = classify_tree(&table, &root);
        assert_eq!(findings.len(), 2);
        // Parent-before-child document order.
        assert_eq!(findings[0].hierarchy_path, "Root/FrameLayout/ImageView");
        assert_eq!(
            findings[1].hierarchy_path,
            "Root/FrameLayout/LinearLayout[id/side_panel]/TextView"
        );
        // The deep path strictly prefix-extends its parent's path, one
        // segment per level.
        assert!(findings[1]
            .hierarchy_path
            .starts_with("Root/FrameLayout/LinearLayout[id/side_panel]/"));
        assert_eq!(findings[0].hierarchy_path.split('/').count(), 3);
    }

    #[test]
    fn test_clear_between_passes_keeps_only_last_pass() {
        let root = View::group("FrameLayout", None, Visibility::Visible);
        root.add_child(View::widget("TextView", None, Visibility::Gone));

        let table = ResourceTable::new();
        let registry = RefCell::new(FindingRegistry::new());
        let classifier = Classifier::new(&table, &registry);

        classifier.classify(None, "first", Some(&root), ROOT_SEGMENT);
        classifier.classify(None, "second", Some(&root), ROOT_SEGMENT);
        // Passes concatenate until cleared.
        assert_eq!(registry.borrow().len(), 2);

        registry.borrow_mut().clear();
        classifier.classify(None, "third", Some(&root), ROOT_SEGMENT);
        let snapshot = registry.borrow().snapshot().to_vec();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].root_name, "third");
    }
}
