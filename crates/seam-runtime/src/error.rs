//! Runtime error types.

use thiserror::Error;
use tracing_appender::rolling::InitError;
use tracing_subscriber::util::TryInitError;

use crate::config::ConfigError;

/// Errors raised while setting up a Seam application.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A global `tracing` subscriber is already installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] TryInitError),

    /// The log file or its directory could not be created.
    #[error("Failed to open log file: {0}")]
    LogFile(#[from] InitError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
