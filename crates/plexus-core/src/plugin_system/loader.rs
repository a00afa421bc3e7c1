//! The module-loading capability.
//!
//! Turning a discovered definition into an executable plugin depends on the
//! target environment (dynamic loading, compiled registry, subprocess), so
//! the core only consumes the narrow [`PluginLoader`] interface and never
//! inspects implementations structurally. `try_load` returning `Ok(None)`
//! means the candidate is not a plugin this loader recognizes; the caller
//! drops it and lets enablement resolution disable its dependents.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::manifest::PluginDefinition;
use crate::plugin_system::unit::Plugin;

/// Capability that resolves a definition to an executable plugin, or to
/// nothing when the definition is not loadable in this environment.
#[async_trait]
pub trait PluginLoader: Send + Sync {
    async fn try_load(
        &self,
        definition: &PluginDefinition,
    ) -> Result<Option<Arc<dyn Plugin>>, PluginSystemError>;
}

/// Factory producing a fresh plugin instance per run.
pub type PluginFactory = Arc<dyn Fn() -> Arc<dyn Plugin> + Send + Sync>;

/// Loader backed by a compiled-in registry of plugin factories keyed by id.
#[derive(Default, Clone)]
pub struct StaticPluginLoader {
    factories: HashMap<String, PluginFactory>,
}

impl StaticPluginLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for the given plugin id, replacing any previous
    /// registration.
    pub fn register<F>(&mut self, id: &str, factory: F)
    where
        F: Fn() -> Arc<dyn Plugin> + Send + Sync + 'static,
    {
        self.factories.insert(id.to_string(), Arc::new(factory));
    }
}

#[async_trait]
impl PluginLoader for StaticPluginLoader {
    async fn try_load(
        &self,
        definition: &PluginDefinition,
    ) -> Result<Option<Arc<dyn Plugin>>, PluginSystemError> {
        Ok(self.factories.get(definition.id()).map(|factory| factory()))
    }
}
