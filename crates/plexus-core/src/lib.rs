pub mod kernel;
pub mod plugin_system;

// Re-export key public types for easier use by the binary and plugins
pub use kernel::Application;
pub use kernel::error::Error as KernelError;
pub use plugin_system::{
    Plugin, PluginDefinition, PluginManifest, PluginsOrchestrator,
};
