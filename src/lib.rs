//! Lazyscan - deferred-load layout detector.
//!
//! Lazyscan instruments a UI-tree construction pipeline to find subtrees
//! that are deliberately not rendered at load time: deferred-content
//! placeholders (stubs inflated on demand) and views whose initial
//! visibility hides them. It intercepts the view-creation callback so every
//! node is observed as it is constructed, classifies each node's subtree,
//! and records findings with enough positional metadata (id, resource name,
//! hierarchy path) to locate each one.
//!
//! # Architecture
//!
//! - `layout`: declarative layout file schema (YAML)
//! - `view`: the engine's node model (visibility, parent links, stubs)
//! - `resolve`: resource ids and name resolution
//! - `inflate`: the construction engine and its creation-hook surface
//! - `detect`: the interception chain, tree classifier, and finding registry
//! - `report`: output formatting (pretty, JSON)

pub mod cli;
pub mod detect;
pub mod inflate;
pub mod layout;
pub mod report;
pub mod resolve;
pub mod view;

pub use detect::{
    Classifier, Finding, FindingKind, FindingRegistry, InflateInterceptor, ScanResult,
    SharedRegistry,
};
pub use inflate::{DefaultMaterializer, Factory, Factory2, FactoryHost, Inflater};
pub use layout::LayoutFile;
pub use resolve::{ResourceResolver, ResourceTable};
pub use view::{View, ViewRef, Visibility};
