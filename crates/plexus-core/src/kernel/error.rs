//! # Plexus Kernel Errors
//!
//! Defines [`Error`], the top-level error type of the core. Subsystem errors
//! such as [`PluginSystemError`] convert into it via `#[from]`, so callers of
//! the bootstrap only ever handle one error type.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::plugin_system::error::PluginSystemError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Specific, typed plugin system error
    #[error("Plugin system error: {0}")]
    PluginSystem(#[from] PluginSystemError),

    /// Error raised while assembling the application itself
    #[error("Bootstrap error: {0}")]
    Bootstrap(String),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
