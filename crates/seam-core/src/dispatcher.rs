//! The apply pass: tree walk, attribute matching and method dispatch.
//!
//! For every node of the subtree, in document order:
//!
//! 1. Attributes named `<prefix><plugin>` are selected.
//! 2. Each value is parsed into [`Invocation`]s.
//! 3. `<plugin>` is resolved against the registry; unknown plugins are skipped.
//! 4. Each invocation whose method exists and is callable is invoked with the
//!    plugin as receiver and `(node, params...)` as arguments.
//!
//! Unresolved plugins and methods are expected (markup may reference plugins
//! that are not loaded) and are skipped without logging. A method returning
//! an error is logged and the pass continues.

use tracing::{Level, debug, error, span};

use crate::grammar::{Invocation, parse_invocations};
use crate::node::{Node, document_order};
use crate::registry::PluginRegistry;

/// Default attribute prefix marking a plugin binding.
pub const DEFAULT_PREFIX: &str = "data-";

/// Counters collected during one apply pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Nodes visited, root included.
    pub nodes: usize,
    /// Attributes carrying the binding prefix.
    pub attributes: usize,
    /// Methods invoked successfully.
    pub invoked: usize,
    /// Attributes naming a plugin that is not registered.
    pub unresolved_plugins: usize,
    /// Invocations naming a member that is absent or not callable.
    pub unresolved_methods: usize,
    /// Methods that returned an error.
    pub failed: usize,
}

impl std::fmt::Display for PassStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} node(s), {} binding(s): {} invoked, {} failed, {} unknown plugin(s), {} unknown method(s)",
            self.nodes,
            self.attributes,
            self.invoked,
            self.failed,
            self.unresolved_plugins,
            self.unresolved_methods
        )
    }
}

/// Extracts the plugin name from an attribute name carrying `prefix`.
///
/// Returns `None` for other attributes and for the bare prefix.
pub fn plugin_name<'a>(attribute: &'a str, prefix: &str) -> Option<&'a str> {
    attribute
        .strip_prefix(prefix)
        .filter(|name| !name.is_empty())
}

/// Runs one complete pass over `root` and its descendants.
///
/// The caller is responsible for validating `root`.
pub(crate) fn run_pass<N: Node>(registry: &PluginRegistry<N>, prefix: &str, root: &N) -> PassStats {
    let span = span!(Level::DEBUG, "apply", prefix = %prefix);
    let _enter = span.enter();

    let mut stats = PassStats::default();

    for node in document_order(root) {
        stats.nodes += 1;
        for (attribute, value) in node.attributes() {
            if let Some(name) = plugin_name(&attribute, prefix) {
                stats.attributes += 1;
                dispatch_attribute(registry, name, &value, &node, &mut stats);
            }
        }
    }

    debug!(%stats, "Apply pass finished");
    stats
}

fn dispatch_attribute<N: Node>(
    registry: &PluginRegistry<N>,
    name: &str,
    value: &str,
    node: &N,
    stats: &mut PassStats,
) {
    let Some(plugin) = registry.get(name) else {
        stats.unresolved_plugins += 1;
        return;
    };

    for Invocation { method, params } in parse_invocations(value) {
        match plugin.call(&method, node, &params) {
            None => stats.unresolved_methods += 1,
            Some(Ok(())) => stats.invoked += 1,
            Some(Err(e)) => {
                stats.failed += 1;
                error!(
                    plugin = %name,
                    method = %method,
                    error  = %e,
                    "Plugin method returned an error"
                );
            }
        }
    }
}
