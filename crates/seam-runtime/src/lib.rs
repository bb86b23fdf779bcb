//! Seam Runtime - configuration and logging around the binding engine.
//!
//! This crate provides:
//! - Layered configuration ([`config`]): defaults, `seam.toml`, profile
//!   files, `SEAM_*` environment variables
//! - Logging setup ([`logging`]) driven by that configuration
//! - [`SeamRuntime`], which hands out engines using the configured prefix
//!
//! ```rust,ignore
//! use seam_runtime::SeamRuntime;
//! use seam_dom::Element;
//!
//! let runtime = SeamRuntime::new()?;
//! runtime.init_logging();
//!
//! let seam = runtime.engine::<Element>();
//! seam.add("tooltip", tooltip_plugin());
//! seam.apply(&root)?;
//! ```

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ConfigError, ConfigLoader, ConfigResult, SeamConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

use std::sync::Arc;

use seam_core::{Node, Plugin, Seam};
use tracing::info;

/// Validated configuration plus the entry points that consume it.
#[derive(Debug, Clone)]
pub struct SeamRuntime {
    config: SeamConfig,
}

impl SeamRuntime {
    /// Loads configuration from the default sources and validates it.
    pub fn new() -> RuntimeResult<Self> {
        Self::from_loader(ConfigLoader::new())
    }

    /// Loads configuration through a customised loader.
    pub fn from_loader(loader: ConfigLoader) -> RuntimeResult<Self> {
        Self::from_config(loader.load()?)
    }

    /// Wraps an already built configuration after validating it.
    pub fn from_config(config: SeamConfig) -> RuntimeResult<Self> {
        config::validate_config(&config)?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &SeamConfig {
        &self.config
    }

    /// Installs the global subscriber unless one is already set.
    pub fn init_logging(&self) {
        logging::init_from_config(&self.config.logging);
    }

    /// Installs the global subscriber, failing if one is already set.
    pub fn try_init_logging(&self) -> RuntimeResult<()> {
        LoggingBuilder::from_config(&self.config.logging).try_init()?;
        Ok(())
    }

    /// Creates an empty engine matching the configured attribute prefix.
    pub fn engine<N: Node + 'static>(&self) -> Seam<N> {
        let prefix = &self.config.binding.attribute_prefix;
        info!(prefix = %prefix, "Creating binding engine");
        Seam::with_prefix(prefix.as_str())
    }

    /// Creates an engine for the configured prefix holding `plugins`.
    pub fn engine_with<N, I, S>(&self, plugins: I) -> Seam<N>
    where
        N: Node + 'static,
        I: IntoIterator<Item = (S, Arc<Plugin<N>>)>,
        S: AsRef<str>,
    {
        let seam = self.engine();
        seam.add_all(plugins);
        seam
    }
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::SeamRuntime;
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
