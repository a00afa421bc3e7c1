//! Lifecycle orchestration.
//!
//! [`PluginsOrchestrator`] is constructed once per run via [`resolve`], which
//! turns the discovery output into an enabled, topologically ordered set of
//! plugin units. It then drives every unit through setup, start, and stop,
//! composing each plugin's dependency contracts along the way. One instance
//! exclusively owns all per-run state; there is no ambient singleton.
//!
//! [`resolve`]: PluginsOrchestrator::resolve
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::plugin_system::discovery::DiscoveredPlugins;
use crate::plugin_system::enablement::{self, EnablementConfig};
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::graph::DependencyGraph;
use crate::plugin_system::loader::PluginLoader;
use crate::plugin_system::unit::{
    Contract, ContractsMap, DepsBag, Plugin, PluginContext, PluginState, PluginUnit,
};

/// Result of a successful setup pass.
#[derive(Default)]
pub struct PluginsSetup {
    /// Setup contracts of every plugin that completed `setup`.
    pub contracts: ContractsMap,
    /// Ids of the enabled plugins, in discovery order.
    pub enabled_ids: Vec<String>,
}

impl std::fmt::Debug for PluginsSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginsSetup")
            .field("contracts", &self.contracts.keys().collect::<Vec<_>>())
            .field("enabled_ids", &self.enabled_ids)
            .finish()
    }
}

pub struct PluginsOrchestrator {
    units: HashMap<String, PluginUnit>,
    graph: DependencyGraph,
    enabled_ids: Vec<String>,
    topological: Vec<String>,
    setup_order: Vec<String>,
    disablement_reasons: Vec<String>,
}

impl std::fmt::Debug for PluginsOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginsOrchestrator")
            .field("units", &self.units.keys().collect::<Vec<_>>())
            .field("enabled_ids", &self.enabled_ids)
            .field("topological", &self.topological)
            .field("setup_order", &self.setup_order)
            .field("disablement_reasons", &self.disablement_reasons)
            .finish_non_exhaustive()
    }
}

impl PluginsOrchestrator {
    /// Resolves one discovery result into an orchestrator ready for setup.
    ///
    /// Fatal steps, in order: discovery errors of fatal kinds (aggregated
    /// into one rejection), duplicate ids, and dependency cycles among the
    /// enabled plugins. Candidates the loader does not recognize are dropped
    /// with a warning before the graph is built, so their dependents end up
    /// transitively disabled rather than failing at setup time.
    pub async fn resolve(
        discovered: DiscoveredPlugins,
        config: &EnablementConfig,
        loader: &dyn PluginLoader,
    ) -> Result<Self, PluginSystemError> {
        for error in &discovered.errors {
            if error.is_fatal() {
                log::error!("{}", error);
            } else {
                log::warn!("{}", error);
            }
        }
        let fatal = discovered.fatal_errors();
        if !fatal.is_empty() {
            return Err(PluginSystemError::DiscoveryFailed { errors: fatal });
        }

        let mut definitions = Vec::new();
        let mut plugins: HashMap<String, Arc<dyn Plugin>> = HashMap::new();
        for definition in discovered.definitions {
            match loader.try_load(&definition).await? {
                Some(plugin) => {
                    plugins.insert(definition.id().to_string(), plugin);
                    definitions.push(definition);
                }
                None => log::warn!(
                    "Discovered directory \"{}\" does not provide a loadable plugin; skipping.",
                    definition.path.display()
                ),
            }
        }

        let graph = DependencyGraph::build(&definitions)?;

        let resolution = enablement::resolve(&graph, config);
        for reason in resolution.reasons() {
            log::info!("{}", reason);
        }

        let enabled_set: HashSet<String> = graph
            .nodes()
            .iter()
            .filter(|id| resolution.is_enabled(id))
            .cloned()
            .collect();
        let enabled_ids: Vec<String> = graph
            .nodes()
            .iter()
            .filter(|id| enabled_set.contains(*id))
            .cloned()
            .collect();

        let topological = graph.topological_order(&enabled_set)?;

        let mut units = HashMap::new();
        for definition in definitions {
            if !enabled_set.contains(definition.id()) {
                continue;
            }
            let plugin = plugins.remove(definition.id()).ok_or_else(|| {
                PluginSystemError::InternalError(format!(
                    "loaded plugin missing for enabled id '{}'",
                    definition.id()
                ))
            })?;
            units.insert(
                definition.id().to_string(),
                PluginUnit::new(definition, plugin),
            );
        }

        Ok(Self {
            units,
            graph,
            enabled_ids,
            topological,
            setup_order: Vec::new(),
            disablement_reasons: resolution.reasons().to_vec(),
        })
    }

    /// Ids of the enabled plugins, in discovery order.
    pub fn enabled_ids(&self) -> &[String] {
        &self.enabled_ids
    }

    /// The execution order used by setup and start.
    pub fn topological_order(&self) -> &[String] {
        &self.topological
    }

    /// Reasons recorded while resolving enablement.
    pub fn disablement_reasons(&self) -> &[String] {
        &self.disablement_reasons
    }

    /// Lifecycle state of an enabled plugin.
    pub fn state_of(&self, id: &str) -> Option<PluginState> {
        self.units.get(id).map(PluginUnit::state)
    }

    /// Runs `setup` on every enabled plugin in topological order.
    ///
    /// Each plugin receives the shared dependency bag and the contracts of
    /// its required and enabled-optional dependencies, which are available
    /// because they already ran. The first failure is wrapped with the
    /// offending plugin id and aborts the remaining sequence; units that
    /// already completed setup are left as-is.
    pub async fn setup(&mut self, deps: DepsBag) -> Result<PluginsSetup, PluginSystemError> {
        let mut contracts = ContractsMap::new();
        for id in self.topological.clone() {
            let ctx = PluginContext::new(deps.clone(), self.contracts_for(&id, &contracts));
            let unit = self.unit_mut(&id)?;
            match unit.setup(&ctx).await {
                Ok(contract) => {
                    contracts.insert(id.clone(), contract);
                    self.setup_order.push(id);
                }
                Err(e) => {
                    return Err(PluginSystemError::SetupError {
                        plugin_id: id,
                        source: Box::new(e),
                    });
                }
            }
        }
        Ok(PluginsSetup {
            contracts,
            enabled_ids: self.enabled_ids.clone(),
        })
    }

    /// Runs `start` in the same order as setup, composing start-phase
    /// contracts instead. Fatal on the first failure, like setup.
    pub async fn start(&mut self, deps: DepsBag) -> Result<ContractsMap, PluginSystemError> {
        let mut contracts = ContractsMap::new();
        for id in self.setup_order.clone() {
            let ctx = PluginContext::new(deps.clone(), self.contracts_for(&id, &contracts));
            let unit = self.unit_mut(&id)?;
            match unit.start(&ctx).await {
                Ok(contract) => {
                    contracts.insert(id, contract);
                }
                Err(e) => {
                    return Err(PluginSystemError::StartError {
                        plugin_id: id,
                        source: Box::new(e),
                    });
                }
            }
        }
        Ok(contracts)
    }

    /// Stops every unit that completed setup, in reverse setup order.
    ///
    /// Best-effort teardown: each unit's stop is invoked independently, a
    /// failure is logged and never prevents the remaining stops. Once begun
    /// it runs to completion.
    pub async fn stop(&mut self) {
        let order = std::mem::take(&mut self.setup_order);
        for id in order.into_iter().rev() {
            let Some(unit) = self.units.get_mut(&id) else {
                continue;
            };
            if let Err(e) = unit.stop().await {
                log::error!("Failed to stop plugin \"{}\": {}", id, e);
            }
        }
    }

    /// The contracts visible to `id`: those of its required and (enabled)
    /// optional dependencies that produced one.
    fn contracts_for(&self, id: &str, contracts: &ContractsMap) -> ContractsMap {
        let mut scoped = ContractsMap::new();
        for edge in self.graph.edges_from(id) {
            if let Some(contract) = contracts.get(&edge.to) {
                scoped.insert(edge.to.clone(), Contract::clone(contract));
            }
        }
        scoped
    }

    fn unit_mut(&mut self, id: &str) -> Result<&mut PluginUnit, PluginSystemError> {
        self.units.get_mut(id).ok_or_else(|| {
            PluginSystemError::InternalError(format!("no unit for enabled plugin '{}'", id))
        })
    }
}
