//! The engine's node model.
//!
//! A [`View`] is one element of an inflated tree: a simple type name, an
//! optional resource id, an initial visibility, a parent relation, and a
//! body that decides whether it exposes children or marks deferred content.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::resolve::ResourceId;

/// Shared handle to a view; trees are single-threaded by contract.
pub type ViewRef = Rc<View>;

/// Initial visibility of a view, as declared in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    /// Hidden but still occupying layout space.
    Invisible,
    /// Hidden and taking no layout space.
    Gone,
}

impl Visibility {
    /// True for the two states that keep a view off screen at load time.
    pub fn is_hidden(self) -> bool {
        !matches!(self, Visibility::Visible)
    }
}

/// What a view is attached to. The window host is a container that is not
/// itself a view.
#[derive(Debug, Default)]
pub enum ViewParent {
    #[default]
    Detached,
    Window,
    View(Weak<View>),
}

/// Concrete shape of a view.
#[derive(Debug)]
pub enum ViewBody {
    Widget,
    /// Container exposing ordered children.
    Group(RefCell<Vec<ViewRef>>),
    /// Placeholder for content that is inflated on demand, carrying the
    /// layout it defers to when one was declared.
    Stub { target: Option<String> },
}

#[derive(Debug)]
pub struct View {
    type_name: String,
    id: Option<ResourceId>,
    visibility: Visibility,
    parent: RefCell<ViewParent>,
    body: ViewBody,
}

impl View {
    fn build(
        type_name: impl Into<String>,
        id: Option<ResourceId>,
        visibility: Visibility,
        body: ViewBody,
    ) -> ViewRef {
        Rc::new(View {
            type_name: type_name.into(),
            id,
            visibility,
            parent: RefCell::new(ViewParent::Detached),
            body,
        })
    }

    /// Create a leaf view.
    pub fn widget(
        type_name: impl Into<String>,
        id: Option<ResourceId>,
        visibility: Visibility,
    ) -> ViewRef {
        Self::build(type_name, id, visibility, ViewBody::Widget)
    }

    /// Create a container view with no children yet.
    pub fn group(
        type_name: impl Into<String>,
        id: Option<ResourceId>,
        visibility: Visibility,
    ) -> ViewRef {
        Self::build(type_name, id, visibility, ViewBody::Group(RefCell::new(Vec::new())))
    }

    /// Create a deferred-content placeholder. `target` names the layout
    /// the placeholder inflates on demand, when the element declares one.
    pub fn stub(
        type_name: impl Into<String>,
        id: Option<ResourceId>,
        visibility: Visibility,
        target: Option<String>,
    ) -> ViewRef {
        Self::build(type_name, id, visibility, ViewBody::Stub { target })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id(&self) -> Option<ResourceId> {
        self.id
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_stub(&self) -> bool {
        matches!(self.body, ViewBody::Stub { .. })
    }

    /// Layout a placeholder defers to. `None` for non-placeholders and for
    /// placeholders declared without a target.
    pub fn deferred_target(&self) -> Option<&str> {
        match &self.body {
            ViewBody::Stub { target } => target.as_deref(),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.body, ViewBody::Group(_))
    }

    /// Child views in native order. Empty for non-containers.
    pub fn children(&self) -> Vec<ViewRef> {
        match &self.body {
            ViewBody::Group(children) => children.borrow().clone(),
            _ => Vec::new(),
        }
    }

    /// The parent when it is itself a view; `None` when detached, hosted by
    /// the window, or already dropped.
    pub fn parent_view(&self) -> Option<ViewRef> {
        match &*self.parent.borrow() {
            ViewParent::View(weak) => weak.upgrade(),
            _ => None,
        }
    }

    pub fn set_parent(&self, parent: ViewParent) {
        *self.parent.borrow_mut() = parent;
    }

    /// Hand the view to the window host (a non-view container).
    pub fn attach_to_window(&self) {
        self.set_parent(ViewParent::Window);
    }

    /// Append `child` and point its parent link back here. Ignored for
    /// non-container bodies.
    pub fn add_child(self: &Rc<Self>, child: ViewRef) {
        if let ViewBody::Group(children) = &self.body {
            child.set_parent(ViewParent::View(Rc::downgrade(self)));
            children.borrow_mut().push(child);
        }
    }
}
