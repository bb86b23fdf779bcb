//! # Seam Core
//!
//! Declarative plugin binding for node trees.
//!
//! Markup names a plugin, a method and literal parameters in an attribute;
//! the engine resolves and dispatches those calls during an explicit apply
//! pass:
//!
//! ```text
//! <div data-tooltip="show: Hello, world; track: hover">
//!            │        │     └──────────┘  │      │
//!            │        │       params      │      params
//!            │        method              method
//!            plugin
//! ```
//!
//! ## Layers
//!
//! - **Grammar** ([`grammar`]): pure parser for the attribute mini-language.
//! - **Plugins** ([`plugin`]): member tables with callable methods and data.
//! - **Registry** ([`registry`]): name-keyed plugin store.
//! - **Dispatcher** ([`dispatcher`]): tree walk and tolerant method dispatch.
//! - **Facade** ([`Seam`]): registration API and the `apply` entry point.
//!
//! The tree itself is external; hosts implement [`Node`] for their node
//! handle.
//!
//! ## Example
//!
//! ```rust,ignore
//! use seam_core::{Plugin, Seam};
//!
//! let seam = Seam::new();
//! seam.add(
//!     "tooltip",
//!     Plugin::builder()
//!         .method("show", |_this, node: &Element, params| {
//!             node.set_attribute("title", params.join(", "));
//!             Ok(())
//!         })
//!         .build(),
//! );
//!
//! seam.apply(&root)?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod grammar;
pub mod node;
pub mod plugin;
pub mod registry;
pub mod seam;

pub use dispatcher::{DEFAULT_PREFIX, PassStats, plugin_name};
pub use error::{
    ApplyError, ApplyResult, MethodResult, PluginError, RegistryError, RegistryResult,
};
pub use grammar::{Invocation, parse_invocations};
pub use node::{Node, document_order};
pub use plugin::{Member, MethodFn, Plugin, PluginBinding, PluginBuilder};
pub use registry::PluginRegistry;
pub use seam::Seam;

/// Prelude for common imports.
pub mod prelude {
    pub use super::define_plugin;
    pub use super::{
        ApplyError, MethodResult, Node, Plugin, PluginBinding, PluginError, Seam,
    };
}
