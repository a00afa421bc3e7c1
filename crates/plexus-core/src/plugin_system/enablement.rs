//! Enablement resolution.
//!
//! Takes the per-plugin configuration (enabled unless explicitly disabled)
//! and the dependency graph and computes the final enabled subset by
//! transitive disabling: an enabled plugin whose required dependency is
//! missing or disabled flips to disabled, and the rule is re-applied until
//! nothing changes. Flags only ever flip true to false, so the fixed point
//! terminates within one pass per node and the result is independent of edge
//! visitation order. Optional dependencies never affect enablement.
use std::collections::HashMap;

use crate::plugin_system::graph::{DependencyGraph, DependencyKind};

/// Externally-supplied per-plugin enabled/disabled configuration.
///
/// Every id is enabled by default; only explicit overrides are stored.
#[derive(Debug, Clone, Default)]
pub struct EnablementConfig {
    overrides: HashMap<String, bool>,
}

impl EnablementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) {
        self.overrides.insert(id.to_string(), enabled);
    }

    pub fn disable(&mut self, id: &str) {
        self.set_enabled(id, false);
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.overrides.get(id).copied().unwrap_or(true)
    }
}

/// Outcome of enablement resolution; immutable for the rest of the run.
#[derive(Debug)]
pub struct EnablementResolution {
    enabled: HashMap<String, bool>,
    reasons: Vec<String>,
}

impl EnablementResolution {
    /// Final enabled state of a discovered id. Unknown ids are disabled.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.get(id).copied().unwrap_or(false)
    }

    /// Human-readable disablement reasons, one per disabled plugin.
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    /// The `id -> bool` map for all discovered ids.
    pub fn enablement_map(&self) -> &HashMap<String, bool> {
        &self.enabled
    }
}

/// Computes the enabled subset of the graph under the given configuration.
pub fn resolve(graph: &DependencyGraph, config: &EnablementConfig) -> EnablementResolution {
    let mut enabled: HashMap<String, bool> = graph
        .nodes()
        .iter()
        .map(|id| (id.clone(), config.is_enabled(id)))
        .collect();

    let mut reasons = Vec::new();
    for id in graph.nodes() {
        if !enabled[id] {
            reasons.push(format!("Plugin \"{}\" is disabled.", id));
        }
    }

    loop {
        let mut changed = false;
        for edge in graph.edges() {
            if edge.kind != DependencyKind::Required {
                continue;
            }
            if !enabled[&edge.from] {
                continue;
            }
            let dependency_enabled = enabled.get(&edge.to).copied().unwrap_or(false);
            if !dependency_enabled {
                enabled.insert(edge.from.clone(), false);
                reasons.push(format!(
                    "Plugin \"{}\" has been disabled since some of its direct or transitive dependencies are missing or disabled.",
                    edge.from
                ));
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    EnablementResolution { enabled, reasons }
}
