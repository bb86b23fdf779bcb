use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use super::binding::PluginBinding;
use crate::error::MethodResult;

/// Signature of a callable plugin member.
///
/// Arguments are the receiver (the plugin the method belongs to), the node
/// being processed and the literal parameters parsed from the attribute.
pub type MethodFn<N> = Arc<dyn Fn(&Plugin<N>, &N, &[String]) -> MethodResult + Send + Sync>;

// ─── Member ───────────────────────────────────────────────────────────────────

/// A named member of a plugin.
///
/// Markup may name any member, so the dispatcher checks callability before
/// invoking: only [`Member::Method`] can be dispatched to.
pub enum Member<N> {
    /// A callable method.
    Method(MethodFn<N>),
    /// A plain data property. Never dispatched to.
    Value(Value),
}

impl<N> Member<N> {
    /// Returns the handler when this member is callable.
    pub fn as_method(&self) -> Option<&MethodFn<N>> {
        match self {
            Self::Method(f) => Some(f),
            Self::Value(_) => None,
        }
    }

    /// Returns the property value when this member is data.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Method(_) => None,
            Self::Value(v) => Some(v),
        }
    }

    /// Returns `true` if the member can be invoked.
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Method(_))
    }
}

impl<N> Clone for Member<N> {
    fn clone(&self) -> Self {
        match self {
            Self::Method(f) => Self::Method(Arc::clone(f)),
            Self::Value(v) => Self::Value(v.clone()),
        }
    }
}

impl<N> std::fmt::Debug for Member<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Method(_) => f.write_str("Method(..)"),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

// ─── Plugin ───────────────────────────────────────────────────────────────────

/// A plugin: a table of named members plus the binding it receives once
/// registered.
///
/// Plugins are shared as `Arc<Plugin<N>>`. The engine that registers a plugin
/// stores the same `Arc` and writes the [`PluginBinding`] into it, so the
/// plugin can re-apply the engine without holding the engine itself.
///
/// # Example
///
/// ```rust,ignore
/// let tooltip = Plugin::<Element>::builder()
///     .method("show", |_this, node, params| {
///         node.set_attribute("title", params.join(" "));
///         Ok(())
///     })
///     .value("delay_ms", 250)
///     .build();
/// ```
pub struct Plugin<N> {
    members: HashMap<String, Member<N>>,
    binding: RwLock<Option<PluginBinding<N>>>,
}

impl<N> Plugin<N> {
    /// Starts building a plugin.
    pub fn builder() -> PluginBuilder<N> {
        PluginBuilder::new()
    }

    /// Creates a plugin without members.
    pub fn empty() -> Arc<Self> {
        Self::builder().build()
    }

    /// Looks up a member by name.
    pub fn member(&self, name: &str) -> Option<&Member<N>> {
        self.members.get(name)
    }

    /// Looks up a callable member by name.
    pub fn method(&self, name: &str) -> Option<&MethodFn<N>> {
        self.members.get(name).and_then(Member::as_method)
    }

    /// Looks up a data property by name.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.members.get(name).and_then(Member::as_value)
    }

    /// Returns `true` if a callable member exists under `name`.
    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// Names of all members, sorted.
    pub fn member_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.members.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Invokes the method named `name` with this plugin as receiver.
    ///
    /// Returns `None` when no callable member exists under that name.
    pub fn call(&self, name: &str, node: &N, params: &[String]) -> Option<MethodResult> {
        let method = Arc::clone(self.method(name)?);
        Some(method(self, node, params))
    }

    /// The binding written by the engine at registration time.
    ///
    /// `None` until the plugin has been added to an engine. A plugin added
    /// several times carries the binding of its most recent registration.
    pub fn plugins(&self) -> Option<PluginBinding<N>> {
        self.binding.read().clone()
    }

    /// Returns `true` once the plugin has been registered somewhere.
    pub fn is_bound(&self) -> bool {
        self.binding.read().is_some()
    }

    pub(crate) fn bind(&self, binding: PluginBinding<N>) {
        *self.binding.write() = Some(binding);
    }
}

impl<N> std::fmt::Debug for Plugin<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("members", &self.member_names())
            .field(
                "bound_as",
                &self.binding.read().as_ref().map(|b| b.name().to_string()),
            )
            .finish()
    }
}

// ─── PluginBuilder ────────────────────────────────────────────────────────────

/// Builder for [`Plugin`]. Later members replace earlier ones of the same name.
pub struct PluginBuilder<N> {
    members: HashMap<String, Member<N>>,
}

impl<N> PluginBuilder<N> {
    fn new() -> Self {
        Self {
            members: HashMap::new(),
        }
    }

    /// Adds a callable member.
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Plugin<N>, &N, &[String]) -> MethodResult + Send + Sync + 'static,
    {
        self.members.insert(name.into(), Member::Method(Arc::new(f)));
        self
    }

    /// Adds a data property.
    pub fn value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), Member::Value(value.into()));
        self
    }

    /// Adds an already-constructed member.
    pub fn member(mut self, name: impl Into<String>, member: Member<N>) -> Self {
        self.members.insert(name.into(), member);
        self
    }

    /// Finishes the plugin, ready to be shared with an engine.
    pub fn build(self) -> Arc<Plugin<N>> {
        Arc::new(Plugin {
            members: self.members,
            binding: RwLock::new(None),
        })
    }
}

impl<N> Default for PluginBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}
