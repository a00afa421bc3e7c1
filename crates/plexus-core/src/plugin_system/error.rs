//! # Plexus Plugin System Errors
//!
//! Defines [`PluginSystemError`], the primary enum for everything that can go
//! wrong between discovery and shutdown. Fatal conditions (malformed
//! manifests, duplicate ids, dependency cycles, a failed `setup`) reject the
//! whole orchestration run; callers are expected to halt startup on them.
use std::path::PathBuf;

use crate::plugin_system::discovery::PluginDiscoveryError;
use crate::plugin_system::unit::PluginState;
use crate::plugin_system::version::VersionError;

#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    /// Fatal discovery errors, aggregated into the interop message format.
    #[error("Failed to initialize plugins:\n{}", format_discovery_errors(.errors))]
    DiscoveryFailed { errors: Vec<PluginDiscoveryError> },

    #[error("Plugin with id \"{id}\" is already registered!")]
    AlreadyRegistered { id: String },

    #[error("Circular dependency detected among plugins: {}", .0.join(", "))]
    CyclicDependency(Vec<String>),

    #[error("Plugin loading failed for '{plugin_id}': {message}")]
    LoadingError {
        plugin_id: String,
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Setup failed for plugin \"{plugin_id}\": {source}")]
    SetupError {
        plugin_id: String,
        #[source]
        source: Box<PluginSystemError>,
    },

    #[error("Start failed for plugin \"{plugin_id}\": {source}")]
    StartError {
        plugin_id: String,
        #[source]
        source: Box<PluginSystemError>,
    },

    #[error("Plugin shutdown error for '{plugin_id}': {message}")]
    ShutdownError {
        plugin_id: String,
        message: String,
    },

    /// Lifecycle called out of order; indicates an orchestration bug, not a
    /// recoverable runtime condition.
    #[error("Plugin \"{plugin_id}\" cannot {operation} while in state {state:?}")]
    InvalidTransition {
        plugin_id: String,
        operation: &'static str,
        state: PluginState,
    },

    #[error("Version parsing error: {0}")]
    VersionParsing(#[from] VersionError),

    #[error("Operation error in plugin '{plugin_id}': {message}", plugin_id = .plugin_id.as_deref().unwrap_or("<unknown>"))]
    OperationError {
        plugin_id: Option<String>,
        message: String,
    },

    #[error("Internal plugin system error: {0}")]
    InternalError(String),
}

/// One fatal error per line, tab-indented, in discovery order.
fn format_discovery_errors(errors: &[PluginDiscoveryError]) -> String {
    errors
        .iter()
        .map(|e| format!("\t{}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
