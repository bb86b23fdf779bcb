//! The engine facade: registry operations and the apply entry point.

use std::sync::{Arc, Weak};

use tracing::{debug, trace};

use crate::dispatcher::{self, DEFAULT_PREFIX, PassStats};
use crate::error::{ApplyError, ApplyResult, RegistryError, RegistryResult};
use crate::node::Node;
use crate::plugin::{ApplyFn, Plugin, PluginBinding};
use crate::registry::PluginRegistry;

struct SeamInner<N> {
    prefix: String,
    registry: PluginRegistry<N>,
}

/// A plugin-binding engine over trees of `N`.
///
/// `Seam` is a cheap handle: clones share the same registry. Plugins added to
/// it receive a [`PluginBinding`] that calls back into this engine.
///
/// # Example
///
/// ```rust,ignore
/// let seam = Seam::new();
/// seam.add("tooltip", tooltip_plugin);
///
/// // <div data-tooltip="show: Hello, world"></div>
/// seam.apply(&root)?;
/// ```
pub struct Seam<N> {
    inner: Arc<SeamInner<N>>,
}

impl<N: Node + 'static> Seam<N> {
    /// Creates an engine matching the default `data-` prefix.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Creates an engine matching attributes named `<prefix><plugin>`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SeamInner {
                prefix: prefix.into(),
                registry: PluginRegistry::new(),
            }),
        }
    }

    /// Creates an engine pre-populated with `plugins`, as if by
    /// [`add_all`](Self::add_all).
    pub fn with_plugins<I, S>(plugins: I) -> Self
    where
        I: IntoIterator<Item = (S, Arc<Plugin<N>>)>,
        S: AsRef<str>,
    {
        let seam = Self::new();
        seam.add_all(plugins);
        seam
    }

    /// The attribute prefix this engine matches.
    pub fn prefix(&self) -> &str {
        &self.inner.prefix
    }

    /// Registers `plugin` under `name` and binds it to this engine.
    ///
    /// Returns `false` without touching the registry or the plugin when the
    /// name is empty. Re-adding a name replaces the previous plugin.
    pub fn add(&self, name: &str, plugin: Arc<Plugin<N>>) -> bool {
        self.try_add(name, plugin).is_ok()
    }

    /// Like [`add`](Self::add), reporting why the registration was refused.
    pub fn try_add(&self, name: &str, plugin: Arc<Plugin<N>>) -> RegistryResult<()> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        plugin.bind(PluginBinding::new(name, self.apply_fn(name)));
        if self.inner.registry.insert(name, plugin).is_some() {
            debug!(plugin = %name, "Replaced plugin");
        } else {
            debug!(plugin = %name, "Registered plugin");
        }

        Ok(())
    }

    /// Adds every `(name, plugin)` pair, one [`add`](Self::add) per pair.
    ///
    /// Refused entries do not stop the batch. Returns how many were added.
    pub fn add_all<I, S>(&self, plugins: I) -> usize
    where
        I: IntoIterator<Item = (S, Arc<Plugin<N>>)>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for (name, plugin) in plugins {
            if self.add(name.as_ref(), plugin) {
                added += 1;
            }
        }
        added
    }

    /// Returns the plugin registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Plugin<N>>> {
        self.inner.registry.get(name)
    }

    /// Removes the plugin registered under `name`.
    ///
    /// Always returns `true`, whether or not the name was registered.
    pub fn del(&self, name: &str) -> bool {
        if self.inner.registry.remove(name).is_some() {
            debug!(plugin = %name, "Removed plugin");
        }
        true
    }

    /// Returns `true` if a plugin is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.registry.contains(name)
    }

    /// Registered plugin names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.inner.registry.names()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    /// Returns `true` if no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.registry.is_empty()
    }

    /// Applies registered plugins to `root` and all of its descendants.
    ///
    /// Returns `root` so calls can be chained.
    ///
    /// # Errors
    ///
    /// [`ApplyError::InvalidRoot`] when `root` is not an element.
    pub fn apply<'a>(&self, root: &'a N) -> ApplyResult<&'a N> {
        self.apply_with_stats(root).map(|(root, _)| root)
    }

    /// Like [`apply`](Self::apply), also returning the pass counters.
    pub fn apply_with_stats<'a>(&self, root: &'a N) -> ApplyResult<(&'a N, PassStats)> {
        let stats = run(&self.inner, root)?;
        Ok((root, stats))
    }

    fn apply_fn(&self, name: &str) -> ApplyFn<N> {
        let engine: Weak<SeamInner<N>> = Arc::downgrade(&self.inner);
        let name = name.to_string();
        Arc::new(move |node: &N| {
            let inner = engine.upgrade().ok_or_else(|| ApplyError::EngineDropped {
                plugin: name.clone(),
            })?;
            trace!(plugin = %name, "Re-applying from plugin binding");
            run(&inner, node)
        })
    }
}

fn run<N: Node>(inner: &SeamInner<N>, root: &N) -> ApplyResult<PassStats> {
    if !root.is_element() {
        return Err(ApplyError::InvalidRoot);
    }
    Ok(dispatcher::run_pass(&inner.registry, &inner.prefix, root))
}

impl<N: Node + 'static> Default for Seam<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Clone for Seam<N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N> std::fmt::Debug for Seam<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seam")
            .field("prefix", &self.inner.prefix)
            .field("plugins", &self.inner.registry.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PluginError;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ─── Test tree ────────────────────────────────────────────────────────

    struct TestData {
        id: &'static str,
        element: bool,
        attributes: Mutex<Vec<(String, String)>>,
        children: Mutex<Vec<TestNode>>,
    }

    #[derive(Clone)]
    struct TestNode(Arc<TestData>);

    impl TestNode {
        fn element(id: &'static str) -> Self {
            Self(Arc::new(TestData {
                id,
                element: true,
                attributes: Mutex::new(Vec::new()),
                children: Mutex::new(Vec::new()),
            }))
        }

        fn text(id: &'static str) -> Self {
            Self(Arc::new(TestData {
                id,
                element: false,
                attributes: Mutex::new(Vec::new()),
                children: Mutex::new(Vec::new()),
            }))
        }

        fn attr(self, name: &str, value: &str) -> Self {
            self.0
                .attributes
                .lock()
                .push((name.to_string(), value.to_string()));
            self
        }

        fn child(self, child: TestNode) -> Self {
            self.0.children.lock().push(child);
            self
        }

        fn id(&self) -> &'static str {
            self.0.id
        }
    }

    impl Node for TestNode {
        fn is_element(&self) -> bool {
            self.0.element
        }

        fn attributes(&self) -> Vec<(String, String)> {
            self.0.attributes.lock().clone()
        }

        fn children(&self) -> Vec<Self> {
            self.0.children.lock().clone()
        }
    }

    /// Records `(method, node id, params)` for every call.
    type CallLog = Arc<Mutex<Vec<(String, &'static str, Vec<String>)>>>;

    fn recording_plugin(methods: &[&'static str], log: &CallLog) -> Arc<Plugin<TestNode>> {
        let mut builder = Plugin::builder();
        for &method in methods {
            let log = Arc::clone(log);
            builder = builder.method(method, move |_this, node: &TestNode, params| {
                log.lock()
                    .push((method.to_string(), node.id(), params.to_vec()));
                Ok(())
            });
        }
        builder.build()
    }

    fn three_paragraphs() -> TestNode {
        TestNode::element("div")
            .child(TestNode::element("p1"))
            .child(TestNode::element("p2"))
            .child(TestNode::element("p3"))
    }

    // ─── Registry ─────────────────────────────────────────────────────────

    #[test]
    fn test_with_plugins() {
        let plugin = Plugin::empty();
        let seam = Seam::<TestNode>::with_plugins([("plugin", Arc::clone(&plugin))]);
        assert!(seam.get("plugin").is_some_and(|p| Arc::ptr_eq(&p, &plugin)));
        assert!(plugin.is_bound());
    }

    #[test]
    fn test_add() {
        let seam = Seam::<TestNode>::new();
        let plugin = Plugin::empty();

        assert!(!seam.add("", Arc::clone(&plugin)));
        assert_eq!(
            seam.try_add("", Arc::clone(&plugin)),
            Err(RegistryError::EmptyName)
        );
        assert!(seam.is_empty());
        assert!(!plugin.is_bound());

        assert!(seam.add("test", Arc::clone(&plugin)));
        assert!(seam.get("test").is_some_and(|p| Arc::ptr_eq(&p, &plugin)));
        assert_eq!(seam.names(), vec!["test"]);
    }

    #[test]
    fn test_add_same_name_last_wins() {
        let seam = Seam::<TestNode>::new();
        let first = Plugin::empty();
        let second = Plugin::empty();

        assert!(seam.add("test", Arc::clone(&first)));
        assert!(seam.add("test", Arc::clone(&second)));
        assert!(seam.get("test").is_some_and(|p| Arc::ptr_eq(&p, &second)));
        assert_eq!(seam.len(), 1);
    }

    #[test]
    fn test_del() {
        let seam = Seam::<TestNode>::new();
        seam.add("test", Plugin::empty());

        assert!(seam.del("test"));
        assert!(seam.get("test").is_none());
        assert!(seam.del("test"));
        assert!(!seam.contains("test"));
    }

    #[test]
    fn test_add_all() {
        let seam = Seam::<TestNode>::new();
        let plugin1 = Plugin::empty();
        let plugin2 = Plugin::empty();

        let added = seam.add_all([
            ("plugin1", Arc::clone(&plugin1)),
            ("plugin2", Arc::clone(&plugin2)),
        ]);

        assert_eq!(added, 2);
        assert!(seam.get("plugin1").is_some_and(|p| Arc::ptr_eq(&p, &plugin1)));
        assert!(seam.get("plugin2").is_some_and(|p| Arc::ptr_eq(&p, &plugin2)));
    }

    #[test]
    fn test_add_all_continues_past_refused_entries() {
        let seam = Seam::<TestNode>::new();
        let added = seam.add_all(vec![
            (String::new(), Plugin::empty()),
            ("ok".to_string(), Plugin::empty()),
        ]);
        assert_eq!(added, 1);
        assert_eq!(seam.names(), vec!["ok"]);
    }

    // ─── Apply ────────────────────────────────────────────────────────────

    #[test]
    fn test_apply_rejects_non_elements() {
        let seam = Seam::<TestNode>::new();
        let text = TestNode::text("text");
        assert_eq!(seam.apply(&text).err(), Some(ApplyError::InvalidRoot));

        let dom = three_paragraphs();
        assert!(seam.apply(&dom).is_ok_and(|root| Arc::ptr_eq(&root.0, &dom.0)));
    }

    #[test]
    fn test_apply_calls_plugins() {
        let log = CallLog::default();
        let seam = Seam::new();
        let plugin1 = recording_plugin(&["method"], &log);
        let dom = three_paragraphs().attr("data-plugin1", "method");

        seam.apply(&dom).unwrap();
        assert!(log.lock().is_empty());

        seam.add("plugin1", Arc::clone(&plugin1));
        seam.apply(&dom).unwrap();
        assert_eq!(
            *log.lock(),
            vec![("method".to_string(), "div", Vec::<String>::new())]
        );
    }

    #[test]
    fn test_apply_binds_receiver() {
        let seam = Seam::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in = Arc::clone(&calls);
        let plugin = Plugin::builder()
            .value("id", "plugin1")
            .method("method", move |this: &Plugin<TestNode>, _node, _params| {
                assert_eq!(this.value("id").and_then(|v| v.as_str()), Some("plugin1"));
                assert_eq!(this.plugins().map(|b| b.name().to_string()), Some("plugin1".into()));
                calls_in.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .build();
        seam.add("plugin1", plugin);

        seam.apply(&TestNode::element("div").attr("data-plugin1", "method"))
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_apply_multiple_plugins() {
        let log = CallLog::default();
        let seam = Seam::new();
        seam.add("plugin1", recording_plugin(&["method"], &log));
        seam.add("plugin2", recording_plugin(&["method1", "method2"], &log));

        let dom = TestNode::element("root")
            .child(TestNode::element("span").attr("data-plugin1", "method"))
            .child(TestNode::element("p").attr("data-plugin2", "method1"))
            .child(
                TestNode::element("div")
                    .attr("data-plugin1", "method")
                    .attr("data-plugin2", "method1;method2"),
            );

        let (_, stats) = seam.apply_with_stats(&dom).unwrap();

        let calls: Vec<_> = log.lock().iter().map(|(m, id, _)| (m.clone(), *id)).collect();
        assert_eq!(
            calls,
            vec![
                ("method".to_string(), "span"),
                ("method1".to_string(), "p"),
                ("method".to_string(), "div"),
                ("method1".to_string(), "div"),
                ("method2".to_string(), "div"),
            ]
        );
        assert_eq!(stats.nodes, 4);
        assert_eq!(stats.attributes, 4);
        assert_eq!(stats.invoked, 5);
    }

    #[test]
    fn test_apply_params() {
        let log = CallLog::default();
        let seam = Seam::new();
        seam.add("plugin2", recording_plugin(&["method1", "method2"], &log));
        let dom = TestNode::element("div")
            .attr("data-plugin2", "method1:param1, param2; method2: param1");

        seam.apply(&dom).unwrap();

        assert_eq!(
            *log.lock(),
            vec![
                (
                    "method1".to_string(),
                    "div",
                    vec!["param1".to_string(), "param2".to_string()]
                ),
                ("method2".to_string(), "div", vec!["param1".to_string()]),
            ]
        );
    }

    #[test]
    fn test_apply_skips_unresolved() {
        let log = CallLog::default();
        let seam = Seam::new();
        seam.add(
            "plugin2",
            Plugin::builder()
                .value("data", 1)
                .method("method1", {
                    let log = Arc::clone(&log);
                    move |_this, node: &TestNode, _params| {
                        log.lock().push(("method1".into(), node.id(), Vec::new()));
                        Ok(())
                    }
                })
                .build(),
        );

        let dom = TestNode::element("div")
            .attr("data-plugin2", "method3; data; method1")
            .attr("data-unknown", "method1")
            .attr("class", "method1");

        let (_, stats) = seam.apply_with_stats(&dom).unwrap();
        assert_eq!(log.lock().len(), 1);
        assert_eq!(stats.unresolved_methods, 2);
        assert_eq!(stats.unresolved_plugins, 1);
        assert_eq!(stats.attributes, 2);
    }

    #[test]
    fn test_apply_continues_after_failing_method() {
        let log = CallLog::default();
        let seam = Seam::new();
        let ok = recording_plugin(&["after"], &log);
        seam.add(
            "failing",
            Plugin::builder()
                .method("boom", |_this, _node: &TestNode, _params| {
                    Err(PluginError::new("boom"))
                })
                .build(),
        );
        seam.add("ok", ok);

        let dom = TestNode::element("div")
            .attr("data-failing", "boom;boom")
            .child(TestNode::element("p").attr("data-ok", "after"));

        let (_, stats) = seam.apply_with_stats(&dom).unwrap();
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.invoked, 1);
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_apply_custom_prefix() {
        let log = CallLog::default();
        let seam = Seam::with_prefix("x-");
        seam.add("plugin", recording_plugin(&["method"], &log));

        let dom = TestNode::element("div")
            .attr("data-plugin", "method")
            .attr("x-plugin", "method");
        seam.apply(&dom).unwrap();

        assert_eq!(log.lock().len(), 1);
        assert_eq!(seam.prefix(), "x-");
    }

    // ─── Binding ──────────────────────────────────────────────────────────

    #[test]
    fn test_binding_name_and_apply() {
        let log = CallLog::default();
        let seam = Seam::new();
        let plugin = Plugin::empty();
        seam.add("plugin", Arc::clone(&plugin));
        seam.add("other", recording_plugin(&["method"], &log));

        let binding = plugin.plugins().unwrap();
        assert_eq!(binding.name(), "plugin");

        let div = TestNode::element("div").attr("data-other", "method");
        let applied = binding.apply(&div).unwrap();
        assert_eq!(applied.id(), "div");
        assert_eq!(log.lock().len(), 1);

        let text = TestNode::text("t");
        assert_eq!(binding.apply(&text).err(), Some(ApplyError::InvalidRoot));
    }

    #[test]
    fn test_binding_reenters_engine() {
        let log = CallLog::default();
        let seam = Seam::new();
        seam.add("leaf", recording_plugin(&["mark"], &log));

        let inner = TestNode::element("inner").attr("data-leaf", "mark");
        seam.add(
            "outer",
            Plugin::builder()
                .method("expand", move |this: &Plugin<TestNode>, _node, _params| {
                    let binding = this.plugins().ok_or("unbound")?;
                    binding
                        .apply(&inner)
                        .map_err(|e| PluginError::new(e.to_string()))?;
                    Ok(())
                })
                .build(),
        );

        let dom = TestNode::element("div")
            .attr("data-outer", "expand")
            .child(TestNode::element("p").attr("data-leaf", "mark"));
        seam.apply(&dom).unwrap();

        let ids: Vec<_> = log.lock().iter().map(|(_, id, _)| *id).collect();
        assert_eq!(ids, vec!["inner", "p"]);
    }

    #[test]
    fn test_binding_outliving_engine() {
        let plugin = Plugin::<TestNode>::empty();
        {
            let seam = Seam::new();
            seam.add("plugin", Arc::clone(&plugin));
        }

        let binding = plugin.plugins().unwrap();
        assert_eq!(
            binding.apply(&TestNode::element("div")).err(),
            Some(ApplyError::EngineDropped {
                plugin: "plugin".into()
            })
        );
    }

    #[test]
    fn test_plugin_may_mutate_registry_during_pass() {
        let log = CallLog::default();
        let seam = Seam::new();
        let handle = seam.clone();
        let late = recording_plugin(&["method"], &log);
        seam.add(
            "loader",
            Plugin::builder()
                .method("load", move |_this, _node: &TestNode, _params| {
                    handle.add("late", Arc::clone(&late));
                    handle.del("loader");
                    Ok(())
                })
                .build(),
        );

        let dom = TestNode::element("div")
            .attr("data-loader", "load")
            .child(TestNode::element("p").attr("data-late", "method"));
        seam.apply(&dom).unwrap();

        assert_eq!(log.lock().len(), 1);
        assert!(!seam.contains("loader"));
        assert!(seam.contains("late"));
    }
}
