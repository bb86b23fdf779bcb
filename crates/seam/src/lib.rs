//! # Seam
//!
//! Declarative plugin binding for element trees.
//!
//! ## Overview
//!
//! Markup declares which plugin methods apply to a node through prefixed
//! attributes. An explicit apply pass walks the tree in document order and
//! invokes each named method with the node and its literal parameters:
//!
//! ```text
//! ┌──────────────┐   apply(root)   ┌────────────┐   "show: a, b"   ┌──────────────────┐
//! │ element tree │────────────────▶│ dispatcher │─────────────────▶│ plugin "tooltip" │
//! │  data-*      │                 │  registry  │                  │  show(node, [..])│
//! └──────────────┘                 └────────────┘                  └──────────────────┘
//! ```
//!
//! - **Core** ([`core`]): grammar, plugins, registry and the [`Seam`](prelude::Seam) engine
//! - **DOM** ([`dom`]): an in-memory element tree implementing [`Node`](prelude::Node)
//! - **Runtime** ([`runtime`]): configuration and logging setup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use seam::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let runtime = SeamRuntime::new()?;
//!     runtime.init_logging();
//!
//!     let seam = runtime.engine::<Element>();
//!     seam.add("tooltip", define_plugin! {
//!         node: Element,
//!         methods: {
//!             show: |_this, node, params| {
//!                 node.set_attribute("title", params.join(", "));
//!                 Ok(())
//!             },
//!         },
//!     });
//!
//!     let root = Element::new("div")
//!         .with_child(Element::new("span").with_attr("data-tooltip", "show: Hello, world"));
//!     seam.apply(&root)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use seam_core as core;
pub use seam_dom as dom;
pub use seam_runtime as runtime;

pub use seam_core::define_plugin;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use seam::prelude::*;
/// ```
pub mod prelude {
    // Engine and plugin model
    pub use seam_core::prelude::*;
    pub use seam_core::{PassStats, PluginBuilder};

    // Concrete tree
    pub use seam_dom::{DomNode, Element, Text};

    // Configuration and logging
    pub use seam_runtime::{LoggingBuilder, SeamConfig, SeamRuntime, SpanEvents};
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::prelude::*;

    type Calls = Arc<Mutex<Vec<(String, Element, Vec<String>)>>>;

    fn recorder(methods: &[&str], calls: &Calls) -> Arc<Plugin<DomNode>> {
        let mut builder = Plugin::builder();
        for &method in methods {
            let calls = Arc::clone(calls);
            let name = method.to_string();
            builder = builder.method(method, move |_this, node: &DomNode, params: &[String]| {
                if let Some(element) = node.as_element() {
                    calls
                        .lock()
                        .push((name.clone(), element.clone(), params.to_vec()));
                }
                Ok(())
            });
        }
        builder.build()
    }

    #[test]
    fn test_mixed_tree_dispatch() {
        let calls = Calls::default();
        let seam = Seam::new();
        seam.add("plugin1", recorder(&["method"], &calls));
        seam.add("plugin2", recorder(&["method1", "method2"], &calls));

        let first = Element::new("p").with_attr("data-plugin1", "method");
        let second = Element::new("p").with_attr("data-plugin2", "method1; method2: param1");
        let root = DomNode::from(
            Element::new("div")
                .with_text("leading text")
                .with_child(first.clone())
                .with_child(Element::new("section").with_child(second.clone())),
        );

        let (returned, stats) = seam.apply_with_stats(&root).unwrap();
        assert!(std::ptr::eq(returned, &root));
        assert_eq!(stats.invoked, 3);
        assert_eq!(stats.nodes, 5);

        let calls = calls.lock();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], ("method".into(), first, vec![]));
        assert_eq!(calls[1], ("method1".into(), second.clone(), vec![]));
        assert_eq!(calls[2], ("method2".into(), second, vec!["param1".into()]));
    }

    #[test]
    fn test_text_root_is_rejected() {
        let seam = Seam::<DomNode>::new();
        let text = DomNode::from(Text::new("just text"));
        assert_eq!(seam.apply(&text).err(), Some(ApplyError::InvalidRoot));
    }

    #[test]
    fn test_plugin_binding_applies_subtree() {
        let seam = Seam::<Element>::new();
        let counter = define_plugin! {
            node: Element,
            methods: {
                count: |this, node, _params| {
                    let seen = this.value("label").and_then(|v| v.as_str()).unwrap_or("?");
                    node.set_attribute("data-seen", seen);
                    Ok(())
                },
            },
            values: {
                label: "counted",
            },
        };
        seam.add("counter", Arc::clone(&counter));

        let inside = Element::new("li").with_attr("data-counter", "count");
        let outside = Element::new("li").with_attr("data-counter", "count");
        let list = Element::new("ul").with_child(inside.clone());
        let _root = Element::new("div")
            .with_child(list.clone())
            .with_child(outside.clone());

        let binding = counter.plugins().unwrap();
        assert_eq!(binding.name(), "counter");
        binding.apply(&list).unwrap();

        assert_eq!(inside.attribute("data-seen").as_deref(), Some("counted"));
        assert_eq!(outside.attribute("data-seen"), None);
    }

    #[test]
    fn test_plugins_can_mutate_markup() {
        let seam = Seam::<Element>::new();
        seam.add(
            "tooltip",
            define_plugin! {
                node: Element,
                methods: {
                    show: |_this, node, params| {
                        node.set_attribute("title", params.join(", "));
                        Ok(())
                    },
                },
            },
        );

        let root = Element::new("div")
            .with_child(Element::new("span").with_attr("data-tooltip", "show: Hello, world"));
        seam.apply(&root).unwrap();

        assert_eq!(
            root.to_string(),
            r#"<div><span data-tooltip="show: Hello, world" title="Hello, world"></span></div>"#
        );
    }
}
