//! Plugin units and the lifecycle contract.
//!
//! A [`PluginUnit`] wraps one executable plugin together with its definition
//! and a strict four-state machine. The orchestrator is its exclusive owner;
//! calling a lifecycle method out of order is an internal-consistency error,
//! never a recoverable runtime condition.
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::manifest::PluginDefinition;

/// Type-erased value a plugin's setup or start phase returns.
///
/// The core never interprets its contents; it only routes it to declared
/// dependents by id.
pub type Contract = Arc<dyn Any + Send + Sync>;

/// Contracts keyed by plugin id, populated only for plugins whose producing
/// phase completed successfully.
pub type ContractsMap = HashMap<String, Contract>;

/// Opaque dependency bag supplied by the surrounding process, forwarded to
/// every plugin verbatim.
pub type DepsBag = Arc<dyn Any + Send + Sync>;

/// What a plugin sees during one lifecycle phase: the shared process-level
/// dependencies and the contracts of its declared dependencies that already
/// ran.
pub struct PluginContext {
    pub deps: DepsBag,
    pub contracts: ContractsMap,
}

impl PluginContext {
    pub fn new(deps: DepsBag, contracts: ContractsMap) -> Self {
        Self { deps, contracts }
    }
}

/// Core trait that all plugins must implement
#[async_trait]
pub trait Plugin: Send + Sync {
    /// The unique id of the plugin, matching its manifest
    fn id(&self) -> &str;

    /// Set up the plugin and produce its contract for dependents
    async fn setup(&self, ctx: &PluginContext) -> Result<Contract, PluginSystemError>;

    /// Start the plugin and produce its start-phase contract
    async fn start(&self, ctx: &PluginContext) -> Result<Contract, PluginSystemError>;

    /// Tear the plugin down
    async fn stop(&self) -> Result<(), PluginSystemError>;
}

/// Lifecycle state of one plugin unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    Created,
    SetUp,
    Started,
    Stopped,
}

/// Per-plugin state holder driven by the orchestrator.
pub struct PluginUnit {
    definition: PluginDefinition,
    plugin: Arc<dyn Plugin>,
    state: PluginState,
    setup_contract: Option<Contract>,
}

impl PluginUnit {
    pub fn new(definition: PluginDefinition, plugin: Arc<dyn Plugin>) -> Self {
        Self {
            definition,
            plugin,
            state: PluginState::Created,
            setup_contract: None,
        }
    }

    pub fn id(&self) -> &str {
        self.definition.id()
    }

    pub fn definition(&self) -> &PluginDefinition {
        &self.definition
    }

    pub fn state(&self) -> PluginState {
        self.state
    }

    /// The contract produced by a successful `setup`, if any.
    pub fn setup_contract(&self) -> Option<&Contract> {
        self.setup_contract.as_ref()
    }

    /// Runs the plugin's setup phase. Legal only from `Created`.
    pub async fn setup(&mut self, ctx: &PluginContext) -> Result<Contract, PluginSystemError> {
        if self.state != PluginState::Created {
            return Err(PluginSystemError::InvalidTransition {
                plugin_id: self.id().to_string(),
                operation: "setup",
                state: self.state,
            });
        }
        let contract = self.plugin.setup(ctx).await?;
        self.state = PluginState::SetUp;
        self.setup_contract = Some(contract.clone());
        Ok(contract)
    }

    /// Runs the plugin's start phase. Legal only after a successful `setup`.
    pub async fn start(&mut self, ctx: &PluginContext) -> Result<Contract, PluginSystemError> {
        if self.state != PluginState::SetUp {
            return Err(PluginSystemError::InvalidTransition {
                plugin_id: self.id().to_string(),
                operation: "start",
                state: self.state,
            });
        }
        let contract = self.plugin.start(ctx).await?;
        self.state = PluginState::Started;
        Ok(contract)
    }

    /// Stops the unit. Legal from any state except `Stopped`, but only once.
    ///
    /// A unit that never reached `SetUp` has nothing to tear down, so the
    /// plugin itself is not called. The state moves to `Stopped` even when
    /// the plugin's own stop fails: teardown is attempted exactly once.
    pub async fn stop(&mut self) -> Result<(), PluginSystemError> {
        match self.state {
            PluginState::Stopped => Err(PluginSystemError::InvalidTransition {
                plugin_id: self.id().to_string(),
                operation: "stop",
                state: self.state,
            }),
            PluginState::Created => {
                self.state = PluginState::Stopped;
                Ok(())
            }
            PluginState::SetUp | PluginState::Started => {
                self.state = PluginState::Stopped;
                self.plugin.stop().await
            }
        }
    }
}
