//! Factory-chaining interception of the inflation pipeline.
//!
//! The interceptor registers itself as the engine's sole parent-aware
//! creation hook and delegates to whatever hook(s) were installed before it:
//! the parent-aware hook first, then the legacy hook, then "not handled" so
//! the engine falls back to its own default construction. That fallback is
//! the one path the interceptor cannot observe; nodes created there are not
//! classified. Drivers that need full coverage register a materializer hook
//! before installing the interceptor.
//!
//! Every node the chain does produce is classified immediately, inside the
//! creation callback, as its own construction-unit root. Its identity is
//! best-effort: the node's own id and resolved name when it has one,
//! otherwise the raw tag it was created from. The engine does not tell a
//! creation hook which layout file an element came from, so a stronger
//! guarantee is not available here; drivers that know the true root identity
//! run their own classification pass over the finished tree.

use std::rc::Rc;

use tracing::{debug, error};

use crate::inflate::{AttributeSet, Factory, Factory2, FactoryHost, InflateContext};
use crate::resolve::ResourceResolver;
use crate::view::ViewRef;

use super::classifier::Classifier;
use super::types::{SharedRegistry, ROOT_SEGMENT, UNRESOLVED_NAME};

/// The single creation hook for an inflation session, chaining to any
/// previously-installed hooks.
pub struct InflateInterceptor {
    prior2: Option<Rc<dyn Factory2>>,
    prior: Option<Rc<dyn Factory>>,
    resolver: Rc<dyn ResourceResolver>,
    registry: SharedRegistry,
}

impl InflateInterceptor {
    /// Read the hooks currently registered on `host`, then install a new
    /// interceptor as the sole parent-aware hook. A hook slot that cannot be
    /// read is logged and treated as absent: the interceptor still installs,
    /// it just has nothing to chain to. Installing twice nests two
    /// interceptors; idempotency is the caller's responsibility.
    pub fn install(
        host: &dyn FactoryHost,
        resolver: Rc<dyn ResourceResolver>,
        registry: SharedRegistry,
    ) {
        let prior2 = match host.factory2() {
            Ok(slot) => slot,
            Err(e) => {
                error!("could not read installed parent-aware factory: {}", e);
                None
            }
        };
        // The legacy slot only matters when no parent-aware hook is present.
        let prior = if prior2.is_some() {
            None
        } else {
            match host.factory() {
                Ok(slot) => slot,
                Err(e) => {
                    error!("could not read installed legacy factory: {}", e);
                    None
                }
            }
        };

        host.set_factory2(Rc::new(InflateInterceptor {
            prior2,
            prior,
            resolver,
            registry,
        }));
        debug!("inflate interceptor installed");
    }

    /// Classify an observed node as a construction-unit root with
    /// best-effort identity.
    fn observe(&self, name: &str, view: &ViewRef) {
        let root_id = view.id();
        let root_name = match root_id {
            Some(id) => self
                .resolver
                .resolve_name(id)
                .unwrap_or_else(|_| UNRESOLVED_NAME.to_string()),
            None => name.to_string(),
        };

        Classifier::new(self.resolver.as_ref(), &self.registry).classify(
            root_id,
            &root_name,
            Some(view),
            ROOT_SEGMENT,
        );
    }
}

impl Factory2 for InflateInterceptor {
    fn on_create_view(
        &self,
        parent: Option<&ViewRef>,
        name: &str,
        context: &InflateContext,
        attrs: &AttributeSet,
    ) -> Option<ViewRef> {
        let mut view = self
            .prior2
            .as_ref()
            .and_then(|f| f.on_create_view(parent, name, context, attrs));
        if view.is_none() {
            view = self
                .prior
                .as_ref()
                .and_then(|f| f.on_create_view(name, context, attrs));
        }

        // None hands the tag back to the engine's unobservable default path.
        if let Some(view) = &view {
            self.observe(name, view);
        }
        view
    }
}

impl Factory for InflateInterceptor {
    fn on_create_view(
        &self,
        name: &str,
        context: &InflateContext,
        attrs: &AttributeSet,
    ) -> Option<ViewRef> {
        Factory2::on_create_view(self, None, name, context, attrs)
    }
}
