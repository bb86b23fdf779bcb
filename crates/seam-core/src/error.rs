//! Error types for the Seam core.
//!
//! Only entry validation in [`Seam::apply`](crate::Seam::apply) is fatal.
//! Unresolved plugins and methods never surface as errors: the dispatcher
//! resolves them to `None` and skips the unit of work.

use thiserror::Error;

// =============================================================================
// Registry Errors
// =============================================================================

/// Errors reported by [`Seam::try_add`](crate::Seam::try_add).
///
/// [`Seam::add`](crate::Seam::add) collapses these into a `false` return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The plugin name was empty.
    #[error("plugin name must not be empty")]
    EmptyName,
}

// =============================================================================
// Apply Errors
// =============================================================================

/// Errors that abort an apply pass before it starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The root handed to `apply` is not an element-like node.
    #[error("cannot apply plugins: root is not an element node")]
    InvalidRoot,

    /// A plugin binding was invoked after its engine was dropped.
    #[error("plugin '{plugin}' outlived the engine it was registered into")]
    EngineDropped {
        /// Name the plugin was registered under.
        plugin: String,
    },
}

// =============================================================================
// Plugin Errors
// =============================================================================

/// Error returned by a plugin method.
///
/// The dispatcher logs it and moves on to the next invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PluginError(String);

impl PluginError {
    /// Creates a plugin error with the given message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<String> for PluginError {
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

impl From<&str> for PluginError {
    fn from(msg: &str) -> Self {
        Self(msg.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for apply passes.
pub type ApplyResult<T> = Result<T, ApplyError>;

/// Result type returned by plugin methods.
pub type MethodResult = Result<(), PluginError>;
