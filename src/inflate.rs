//! The construction engine: materializes a view tree from a layout
//! description, invoking whichever creation hook handles each element.
//!
//! Hooks mirror the two shapes inflation engines historically expose: a
//! legacy [`Factory`] that only sees the tag, and a parent-aware
//! [`Factory2`]. The engine consults the parent-aware hook first, then the
//! legacy hook, and falls back to its own default construction when neither
//! produces a view. [`FactoryHost`] is the official read/registration
//! surface for those hook slots, so observers can chain to whatever was
//! installed before them without reaching into engine internals.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;
use tracing::warn;

use crate::layout::{ElementSpec, LayoutFile};
use crate::resolve::ResourceTable;
use crate::view::{View, ViewParent, ViewRef, Visibility};

/// Tag that marks a deferred-content placeholder element.
pub const STUB_TAG: &str = "ViewStub";

/// Tags the engine materializes as containers even when declared childless.
const GROUP_TAGS: &[&str] = &[
    "FrameLayout",
    "LinearLayout",
    "RelativeLayout",
    "ConstraintLayout",
    "CoordinatorLayout",
    "ScrollView",
    "GridLayout",
    "TableLayout",
];

/// Attributes of the element currently being materialized, as the hooks see
/// them.
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    pub id: Option<String>,
    pub visibility: Visibility,
    /// Deferred layout reference, present on stub elements.
    pub layout: Option<String>,
    pub has_children: bool,
}

impl AttributeSet {
    pub fn from_spec(spec: &ElementSpec) -> Self {
        AttributeSet {
            id: spec.id.clone(),
            visibility: spec.visibility,
            layout: spec.layout.clone(),
            has_children: !spec.children.is_empty(),
        }
    }
}

/// Shared state every creation callback receives.
pub struct InflateContext {
    pub resources: Rc<ResourceTable>,
}

/// Legacy creation hook: sees only the tag. Returning `None` hands the tag
/// to the next alternative in the chain.
pub trait Factory {
    fn on_create_view(
        &self,
        name: &str,
        context: &InflateContext,
        attrs: &AttributeSet,
    ) -> Option<ViewRef>;
}

/// Parent-aware creation hook. Consulted before [`Factory`] when both are
/// registered.
pub trait Factory2 {
    fn on_create_view(
        &self,
        parent: Option<&ViewRef>,
        name: &str,
        context: &InflateContext,
        attrs: &AttributeSet,
    ) -> Option<ViewRef>;
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("factory slot is currently borrowed elsewhere")]
    SlotBusy,
}

/// Read and registration access to an engine's creation-hook slots.
///
/// Reads are fallible: a host whose slot cannot be inspected reports
/// [`HostError`] and observers degrade to chaining to nothing.
pub trait FactoryHost {
    fn factory2(&self) -> Result<Option<Rc<dyn Factory2>>, HostError>;
    fn factory(&self) -> Result<Option<Rc<dyn Factory>>, HostError>;
    /// Register `factory` as the sole parent-aware hook, replacing any
    /// previous registration.
    fn set_factory2(&self, factory: Rc<dyn Factory2>);
}

/// The construction engine for one inflation session.
pub struct Inflater {
    context: InflateContext,
    factory2: RefCell<Option<Rc<dyn Factory2>>>,
    factory: RefCell<Option<Rc<dyn Factory>>>,
}

impl Inflater {
    pub fn new(resources: Rc<ResourceTable>) -> Self {
        Inflater {
            context: InflateContext { resources },
            factory2: RefCell::new(None),
            factory: RefCell::new(None),
        }
    }

    pub fn context(&self) -> &InflateContext {
        &self.context
    }

    /// Register a legacy hook.
    pub fn set_factory(&self, factory: Rc<dyn Factory>) {
        *self.factory.borrow_mut() = Some(factory);
    }

    /// Materialize the whole tree depth-first and hand the root to the
    /// window host.
    pub fn inflate(&self, layout: &LayoutFile) -> ViewRef {
        let root = self.materialize(None, &layout.root);
        root.attach_to_window();
        root
    }

    fn materialize(&self, parent: Option<&ViewRef>, spec: &ElementSpec) -> ViewRef {
        let attrs = AttributeSet::from_spec(spec);
        let view = self.create_view(parent, &spec.tag, &attrs);
        if let Some(parent) = parent {
            if parent.is_group() {
                parent.add_child(view.clone());
            } else {
                // A hook produced a non-container for an element with
                // declared children; anything built under it never joins
                // the tree.
                warn!(
                    "{} is not a container, dropping {} from the tree",
                    parent.type_name(),
                    spec.tag
                );
            }
        }
        for child in &spec.children {
            self.materialize(Some(&view), child);
        }
        view
    }

    /// One element through the hook chain: parent-aware hook, legacy hook,
    /// engine default.
    fn create_view(
        &self,
        parent: Option<&ViewRef>,
        name: &str,
        attrs: &AttributeSet,
    ) -> ViewRef {
        let factory2 = self.factory2.borrow().clone();
        if let Some(factory2) = factory2 {
            if let Some(view) = factory2.on_create_view(parent, name, &self.context, attrs) {
                return view;
            }
        }
        let factory = self.factory.borrow().clone();
        if let Some(factory) = factory {
            if let Some(view) = factory.on_create_view(name, &self.context, attrs) {
                return view;
            }
        }
        default_create(parent, name, &self.context, attrs)
    }
}

impl FactoryHost for Inflater {
    fn factory2(&self) -> Result<Option<Rc<dyn Factory2>>, HostError> {
        self.factory2
            .try_borrow()
            .map(|slot| slot.clone())
            .map_err(|_| HostError::SlotBusy)
    }

    fn factory(&self) -> Result<Option<Rc<dyn Factory>>, HostError> {
        self.factory
            .try_borrow()
            .map(|slot| slot.clone())
            .map_err(|_| HostError::SlotBusy)
    }

    fn set_factory2(&self, factory: Rc<dyn Factory2>) {
        *self.factory2.borrow_mut() = Some(factory);
    }
}

/// The engine's default construction for a tag. The parent link is set at
/// creation time so observers running inside the creation callback see real
/// parent visibility.
pub fn default_create(
    parent: Option<&ViewRef>,
    name: &str,
    context: &InflateContext,
    attrs: &AttributeSet,
) -> ViewRef {
    let id = attrs
        .id
        .as_deref()
        .and_then(|n| context.resources.lookup_id(n));

    let view = if name == STUB_TAG {
        View::stub(name, id, attrs.visibility, attrs.layout.clone())
    } else if attrs.has_children || GROUP_TAGS.contains(&name) {
        View::group(name, id, attrs.visibility)
    } else {
        View::widget(name, id, attrs.visibility)
    };

    if let Some(parent) = parent {
        view.set_parent(ViewParent::View(Rc::downgrade(parent)));
    }
    view
}

/// [`Factory2`] wrapper over [`default_create`]. Drivers register it so that
/// every element flows through the hook chain instead of the engine's
/// unobservable fallback.
pub struct DefaultMaterializer;

impl Factory2 for DefaultMaterializer {
    fn on_create_view(
        &self,
        parent: Option<&ViewRef>,
        name: &str,
        context: &InflateContext,
        attrs: &AttributeSet,
    ) -> Option<ViewRef> {
        Some(default_create(parent, name, context, attrs))
    }
}
