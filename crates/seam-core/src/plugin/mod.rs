//! Plugin model.
//!
//! # Architecture
//!
//! A [`Plugin`] is a table of named [`Member`]s. Markup names members by
//! string, so a member is either a callable [`Member::Method`] or a plain
//! [`Member::Value`]; only methods are ever dispatched to.
//!
//! Registering a plugin with an engine writes a [`PluginBinding`] into it,
//! exposing the registered name and an `apply` callback into that engine.
//! Methods reach it through their receiver:
//!
//! ```rust,ignore
//! let lazy = Plugin::<Element>::builder()
//!     .method("load", |this, node, params| {
//!         node.append_child(render(params));
//!         if let Some(binding) = this.plugins() {
//!             binding.apply(node).map_err(|e| PluginError::new(e.to_string()))?;
//!         }
//!         Ok(())
//!     })
//!     .build();
//! ```

pub mod binding;
pub mod core;
pub mod macros;

pub use binding::{ApplyFn, PluginBinding};
pub use self::core::{Member, MethodFn, Plugin, PluginBuilder};
