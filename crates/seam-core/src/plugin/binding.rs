//! The descriptor an engine writes into every plugin it registers.

use std::sync::Arc;

use crate::dispatcher::PassStats;
use crate::error::ApplyResult;

/// Callback running a full apply pass of the owning engine.
pub type ApplyFn<N> = Arc<dyn Fn(&N) -> ApplyResult<PassStats> + Send + Sync>;

/// Self-description handed to a registered plugin.
///
/// Carries the name the plugin was registered under and a callback into the
/// engine that registered it. The callback only holds a weak reference to
/// the engine, so a binding never keeps its engine alive.
pub struct PluginBinding<N> {
    name: Arc<str>,
    apply: ApplyFn<N>,
}

impl<N> PluginBinding<N> {
    pub(crate) fn new(name: &str, apply: ApplyFn<N>) -> Self {
        Self {
            name: Arc::from(name),
            apply,
        }
    }

    /// The registry key of this plugin.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the owning engine over `node`, returning `node` on success.
    ///
    /// Equivalent to calling `apply` on the engine itself. Fails with
    /// [`ApplyError::EngineDropped`](crate::ApplyError::EngineDropped) once
    /// the engine is gone.
    pub fn apply<'a>(&self, node: &'a N) -> ApplyResult<&'a N> {
        (self.apply)(node).map(|_| node)
    }

    /// Like [`apply`](Self::apply) but returns the pass statistics.
    pub fn apply_with_stats(&self, node: &N) -> ApplyResult<PassStats> {
        (self.apply)(node)
    }
}

impl<N> Clone for PluginBinding<N> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            apply: Arc::clone(&self.apply),
        }
    }
}

impl<N> std::fmt::Debug for PluginBinding<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginBinding")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
