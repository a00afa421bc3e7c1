use std::sync::Arc;

use plexus_core::plugin_system::error::PluginSystemError;
use plexus_core::plugin_system::unit::{Contract, Plugin, PluginContext};

/// Contract exposed by the built-in diagnostics plugin.
///
/// Dependents can downcast to this to ask basic questions about the host.
pub struct DiagnosticsApi {
    pub host_name: String,
    pub host_version: String,
}

/// Built-in plugin reporting host information.
///
/// Registered with the static loader under the id `diagnostics`; a plugin
/// directory carrying a matching manifest activates it.
pub struct DiagnosticsPlugin;

#[async_trait::async_trait]
impl Plugin for DiagnosticsPlugin {
    fn id(&self) -> &str {
        "diagnostics"
    }

    async fn setup(&self, _ctx: &PluginContext) -> Result<Contract, PluginSystemError> {
        log::debug!("diagnostics: setup");
        Ok(Arc::new(DiagnosticsApi {
            host_name: plexus_core::kernel::constants::APP_NAME.to_string(),
            host_version: plexus_core::kernel::constants::HOST_VERSION.to_string(),
        }))
    }

    async fn start(&self, _ctx: &PluginContext) -> Result<Contract, PluginSystemError> {
        log::info!(
            "diagnostics: host {} v{}",
            plexus_core::kernel::constants::APP_NAME,
            plexus_core::kernel::constants::HOST_VERSION
        );
        Ok(Arc::new(()))
    }

    async fn stop(&self) -> Result<(), PluginSystemError> {
        log::debug!("diagnostics: stop");
        Ok(())
    }
}
