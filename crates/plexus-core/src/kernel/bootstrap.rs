use std::path::PathBuf;
use std::sync::Arc;

use crate::kernel::constants;
use crate::kernel::error::{Error, Result};
use crate::plugin_system::discovery::{self, DiscoveredPlugins, Environment};
use crate::plugin_system::enablement::EnablementConfig;
use crate::plugin_system::loader::PluginLoader;
use crate::plugin_system::orchestrator::{PluginsOrchestrator, PluginsSetup};
use crate::plugin_system::unit::{ContractsMap, DepsBag};
use crate::plugin_system::version::HostVersion;

/// One application run: owns the environment, the enablement configuration,
/// the loader capability, and the orchestrator it produces. All per-run state
/// lives here and nowhere else.
pub struct Application {
    env: Environment,
    config: EnablementConfig,
    search_paths: Vec<PathBuf>,
    loader: Arc<dyn PluginLoader>,
    orchestrator: Option<PluginsOrchestrator>,
}

impl Application {
    /// Creates an application for the compiled-in host version.
    pub fn new(loader: Arc<dyn PluginLoader>) -> Result<Self> {
        let host_version = HostVersion::parse(constants::HOST_VERSION)
            .map_err(|e| Error::Bootstrap(format!("Failed to parse HOST_VERSION constant: {}", e)))?;
        log::info!("Initializing {} v{}", constants::APP_NAME, constants::APP_VERSION);

        Ok(Self {
            env: Environment::new(host_version),
            config: EnablementConfig::new(),
            search_paths: Vec::new(),
            loader,
            orchestrator: None,
        })
    }

    /// Adds a plugin search root.
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn config_mut(&mut self) -> &mut EnablementConfig {
        &mut self.config
    }

    /// Runs discovery over the configured search roots.
    pub async fn discover(&self) -> DiscoveredPlugins {
        discovery::discover(&self.search_paths, &self.env).await
    }

    /// Discovers plugins, resolves the orchestration, and runs the setup
    /// phase. Any fatal condition rejects the whole call.
    pub async fn initialize(&mut self, deps: DepsBag) -> Result<PluginsSetup> {
        let discovered = self.discover().await;
        let mut orchestrator =
            PluginsOrchestrator::resolve(discovered, &self.config, self.loader.as_ref()).await?;
        let setup = orchestrator.setup(deps).await?;
        self.orchestrator = Some(orchestrator);
        Ok(setup)
    }

    /// Runs the start phase; requires a successful `initialize`.
    pub async fn start(&mut self, deps: DepsBag) -> Result<ContractsMap> {
        let orchestrator = self
            .orchestrator
            .as_mut()
            .ok_or_else(|| Error::Bootstrap("Application is not initialized".to_string()))?;
        Ok(orchestrator.start(deps).await?)
    }

    /// Best-effort teardown of everything that was set up. Never fails.
    pub async fn shutdown(&mut self) {
        if let Some(orchestrator) = self.orchestrator.as_mut() {
            orchestrator.stop().await;
        }
    }

    /// The resolved orchestrator, once `initialize` has run.
    pub fn orchestrator(&self) -> Option<&PluginsOrchestrator> {
        self.orchestrator.as_ref()
    }
}
