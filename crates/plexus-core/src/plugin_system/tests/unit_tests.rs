#![cfg(test)]

use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::manifest::{PluginDefinition, PluginManifest};
use crate::plugin_system::unit::{
    Contract, ContractsMap, DepsBag, Plugin, PluginContext, PluginState, PluginUnit,
};

struct TrackingPlugin {
    id: String,
    calls: Arc<StdMutex<Vec<String>>>,
    fail_stop: bool,
}

impl TrackingPlugin {
    fn new(id: &str, calls: Arc<StdMutex<Vec<String>>>) -> Self {
        Self {
            id: id.to_string(),
            calls,
            fail_stop: false,
        }
    }
}

#[async_trait]
impl Plugin for TrackingPlugin {
    fn id(&self) -> &str {
        &self.id
    }

    async fn setup(&self, _ctx: &PluginContext) -> Result<Contract, PluginSystemError> {
        self.calls.lock().unwrap().push(format!("setup:{}", self.id));
        Ok(Arc::new(format!("{}-setup-contract", self.id)))
    }

    async fn start(&self, _ctx: &PluginContext) -> Result<Contract, PluginSystemError> {
        self.calls.lock().unwrap().push(format!("start:{}", self.id));
        Ok(Arc::new(format!("{}-start-contract", self.id)))
    }

    async fn stop(&self) -> Result<(), PluginSystemError> {
        self.calls.lock().unwrap().push(format!("stop:{}", self.id));
        if self.fail_stop {
            return Err(PluginSystemError::ShutdownError {
                plugin_id: self.id.clone(),
                message: "stop failed".to_string(),
            });
        }
        Ok(())
    }
}

fn unit(id: &str, calls: &Arc<StdMutex<Vec<String>>>) -> PluginUnit {
    let manifest = PluginManifest::new(id, "1.0.0");
    let definition = PluginDefinition::new(format!("plugins/{}", id), manifest);
    PluginUnit::new(definition, Arc::new(TrackingPlugin::new(id, calls.clone())))
}

fn ctx() -> PluginContext {
    let deps: DepsBag = Arc::new(());
    PluginContext::new(deps, ContractsMap::new())
}

#[tokio::test]
async fn test_unit_full_lifecycle() {
    let calls = Arc::new(StdMutex::new(Vec::new()));
    let mut unit = unit("p", &calls);
    assert_eq!(unit.state(), PluginState::Created);

    unit.setup(&ctx()).await.unwrap();
    assert_eq!(unit.state(), PluginState::SetUp);
    assert!(unit.setup_contract().is_some());

    unit.start(&ctx()).await.unwrap();
    assert_eq!(unit.state(), PluginState::Started);

    unit.stop().await.unwrap();
    assert_eq!(unit.state(), PluginState::Stopped);

    assert_eq!(
        *calls.lock().unwrap(),
        ["setup:p", "start:p", "stop:p"]
    );
}

#[tokio::test]
async fn test_unit_double_setup_is_internal_error() {
    let calls = Arc::new(StdMutex::new(Vec::new()));
    let mut unit = unit("p", &calls);
    unit.setup(&ctx()).await.unwrap();

    let err = unit.setup(&ctx()).await.unwrap_err();
    assert!(matches!(
        err,
        PluginSystemError::InvalidTransition {
            operation: "setup",
            state: PluginState::SetUp,
            ..
        }
    ));
    // Plugin itself was not invoked a second time.
    assert_eq!(*calls.lock().unwrap(), ["setup:p"]);
}

#[tokio::test]
async fn test_unit_start_before_setup_is_internal_error() {
    let calls = Arc::new(StdMutex::new(Vec::new()));
    let mut unit = unit("p", &calls);

    let err = unit.start(&ctx()).await.unwrap_err();
    assert!(matches!(
        err,
        PluginSystemError::InvalidTransition {
            operation: "start",
            state: PluginState::Created,
            ..
        }
    ));
}

#[tokio::test]
async fn test_unit_start_after_stop_is_internal_error() {
    let calls = Arc::new(StdMutex::new(Vec::new()));
    let mut unit = unit("p", &calls);
    unit.setup(&ctx()).await.unwrap();
    unit.stop().await.unwrap();

    let err = unit.start(&ctx()).await.unwrap_err();
    assert!(matches!(
        err,
        PluginSystemError::InvalidTransition {
            operation: "start",
            state: PluginState::Stopped,
            ..
        }
    ));
}

#[tokio::test]
async fn test_unit_stop_from_created_skips_plugin() {
    let calls = Arc::new(StdMutex::new(Vec::new()));
    let mut unit = unit("p", &calls);

    unit.stop().await.unwrap();
    assert_eq!(unit.state(), PluginState::Stopped);
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unit_second_stop_is_internal_error() {
    let calls = Arc::new(StdMutex::new(Vec::new()));
    let mut unit = unit("p", &calls);
    unit.setup(&ctx()).await.unwrap();
    unit.stop().await.unwrap();

    let err = unit.stop().await.unwrap_err();
    assert!(matches!(
        err,
        PluginSystemError::InvalidTransition {
            operation: "stop",
            state: PluginState::Stopped,
            ..
        }
    ));
}

#[tokio::test]
async fn test_unit_stop_failure_still_transitions() {
    let calls = Arc::new(StdMutex::new(Vec::new()));
    let mut failing = TrackingPlugin::new("p", calls.clone());
    failing.fail_stop = true;
    let manifest = PluginManifest::new("p", "1.0.0");
    let definition = PluginDefinition::new("plugins/p", manifest);
    let mut unit = PluginUnit::new(definition, Arc::new(failing));

    unit.setup(&ctx()).await.unwrap();
    assert!(unit.stop().await.is_err());
    // Teardown is attempted exactly once.
    assert_eq!(unit.state(), PluginState::Stopped);
}
