// ─── define_plugin! ───────────────────────────────────────────────────────────

/// Declares a plugin from a table of methods and data properties.
///
/// Expands to a [`PluginBuilder`](crate::plugin::PluginBuilder) chain and
/// evaluates to `Arc<Plugin<N>>`. Member names are taken verbatim from the
/// identifiers, so they match the method names used in markup.
///
/// The optional `node:` field pins the node type, which closures calling
/// node methods need for type inference.
///
/// ```rust,ignore
/// let toggle = define_plugin! {
///     node: Element,
///     methods: {
///         show: |_this, node, _params| { node.remove_attribute("hidden"); Ok(()) },
///         hide: |_this, node, _params| { node.set_attribute("hidden", ""); Ok(()) },
///     },
///     values: {
///         version: "1.0",
///     },
/// };
/// ```
#[macro_export]
macro_rules! define_plugin {
    (
        $( node: $node:ty , )?
        $( methods: { $( $method:ident : $handler:expr ),* $(,)? } $(,)? )?
        $( values: { $( $value:ident : $val:expr ),* $(,)? } $(,)? )?
    ) => {{
        let builder = $crate::__plugin_builder!($($node)?);
        $( $( let builder = builder.method(::std::stringify!($method), $handler); )* )?
        $( $( let builder = builder.value(::std::stringify!($value), $val); )* )?
        builder.build()
    }};
}

/// Internal helper: starts a builder, with or without an explicit node type.
#[macro_export]
#[doc(hidden)]
macro_rules! __plugin_builder {
    () => {
        $crate::plugin::Plugin::builder()
    };
    ($node:ty) => {
        $crate::plugin::Plugin::<$node>::builder()
    };
}

#[cfg(test)]
mod tests {
    use crate::error::PluginError;
    use serde_json::Value;

    #[test]
    fn test_define_plugin_methods_and_values() {
        let plugin = define_plugin! {
            node: u8,
            methods: {
                ok: |_this, _node, _params| Ok(()),
                fail: |_this, _node, _params| Err(PluginError::new("nope")),
            },
            values: {
                label: "x",
                count: 3,
            },
        };

        assert!(plugin.has_method("ok"));
        assert!(plugin.has_method("fail"));
        assert_eq!(plugin.value("label"), Some(&Value::from("x")));
        assert_eq!(plugin.value("count"), Some(&Value::from(3)));
        assert_eq!(plugin.call("fail", &0, &[]), Some(Err(PluginError::new("nope"))));
    }

    #[test]
    fn test_define_plugin_empty() {
        let plugin = define_plugin! { node: (), };
        assert!(plugin.member_names().is_empty());
    }

    #[test]
    fn test_define_plugin_values_only() {
        let plugin = define_plugin! {
            node: (),
            values: { enabled: true },
        };
        assert!(!plugin.has_method("enabled"));
        assert_eq!(plugin.value("enabled"), Some(&Value::Bool(true)));
    }
}
