//! Name-keyed plugin store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::plugin::Plugin;

/// Mapping from plugin name to the shared plugin.
///
/// Every operation takes the lock only for the map access itself; no lock is
/// held while a plugin runs, so plugin methods may freely add, remove or look
/// up plugins while a pass is in progress.
pub struct PluginRegistry<N> {
    plugins: RwLock<HashMap<String, Arc<Plugin<N>>>>,
}

impl<N> PluginRegistry<N> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            plugins: RwLock::new(HashMap::new()),
        }
    }

    /// Stores `plugin` under `name`, returning the plugin it replaced.
    pub fn insert(&self, name: &str, plugin: Arc<Plugin<N>>) -> Option<Arc<Plugin<N>>> {
        self.plugins.write().insert(name.to_string(), plugin)
    }

    /// Removes the plugin stored under `name`, if any.
    pub fn remove(&self, name: &str) -> Option<Arc<Plugin<N>>> {
        self.plugins.write().remove(name)
    }

    /// Returns the plugin stored under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Plugin<N>>> {
        self.plugins.read().get(name).cloned()
    }

    /// Returns `true` if a plugin is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.plugins.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }
}

impl<N> Default for PluginRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> std::fmt::Debug for PluginRegistry<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let registry = PluginRegistry::<()>::new();
        let plugin = Plugin::empty();

        assert!(registry.insert("a", Arc::clone(&plugin)).is_none());
        assert!(registry.get("a").is_some_and(|p| Arc::ptr_eq(&p, &plugin)));
        assert!(registry.contains("a"));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove("a").is_some());
        assert!(registry.get("a").is_none());
        assert!(registry.remove("a").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let registry = PluginRegistry::<()>::new();
        let first = Plugin::empty();
        let second = Plugin::empty();

        registry.insert("a", Arc::clone(&first));
        let replaced = registry.insert("a", Arc::clone(&second));

        assert!(replaced.is_some_and(|p| Arc::ptr_eq(&p, &first)));
        assert!(registry.get("a").is_some_and(|p| Arc::ptr_eq(&p, &second)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_sorted() {
        let registry = PluginRegistry::<()>::new();
        registry.insert("zeta", Plugin::empty());
        registry.insert("alpha", Plugin::empty());
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }
}
