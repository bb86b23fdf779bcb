//! Runtime configuration.
//!
//! Layered loading of [`SeamConfig`] from files, `SEAM_*` environment
//! variables and code, plus validation.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BindingConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, SeamConfig,
    SpanEventConfig,
};
pub use validation::validate_config;
