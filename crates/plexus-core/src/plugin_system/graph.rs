//! Dependency graph over plugin ids.
//!
//! Built once per run from the discovered definitions and immutable after
//! construction. Edges pointing at ids that were never discovered are kept
//! (dangling); the enablement resolver treats them as missing dependencies,
//! the graph builder does not reject them.
use std::collections::{HashMap, HashSet, VecDeque};

use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::manifest::PluginDefinition;

/// Whether an edge blocks its source when the target is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Required,
    Optional,
}

/// A directed edge: `from` depends on `to`.
#[derive(Debug, Clone)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
    pub kind: DependencyKind,
}

/// Directed dependency graph of plugin ids, nodes in discovery order.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    /// Builds the graph from discovered definitions.
    ///
    /// A duplicate id is a fatal condition detected here, before any
    /// lifecycle call is issued.
    pub fn build(definitions: &[PluginDefinition]) -> Result<Self, PluginSystemError> {
        let mut graph = DependencyGraph::default();

        for definition in definitions {
            let id = definition.id();
            if graph.index.contains_key(id) {
                return Err(PluginSystemError::AlreadyRegistered { id: id.to_string() });
            }
            graph.index.insert(id.to_string(), graph.nodes.len());
            graph.nodes.push(id.to_string());
        }

        for definition in definitions {
            let from = definition.id();
            for to in &definition.manifest.required_plugins {
                graph.edges.push(DependencyEdge {
                    from: from.to_string(),
                    to: to.clone(),
                    kind: DependencyKind::Required,
                });
            }
            for to in &definition.manifest.optional_plugins {
                graph.edges.push(DependencyEdge {
                    from: from.to_string(),
                    to: to.clone(),
                    kind: DependencyKind::Optional,
                });
            }
        }

        Ok(graph)
    }

    /// Plugin ids in discovery order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Edges of a single plugin, in manifest order (required before optional).
    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a DependencyEdge> {
        self.edges.iter().filter(move |edge| edge.from == id)
    }

    /// Computes a topological order over the enabled subgraph (Kahn's
    /// algorithm).
    ///
    /// Required edges always participate. An optional edge participates only
    /// when its target is itself enabled; an absent or disabled optional
    /// dependency never blocks ordering. Node iteration follows discovery
    /// order, so the result is deterministic for identical input.
    pub fn topological_order(
        &self,
        enabled: &HashSet<String>,
    ) -> Result<Vec<String>, PluginSystemError> {
        let mut in_degree: HashMap<&str, usize> = HashMap::new();
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

        for id in &self.nodes {
            if enabled.contains(id) {
                in_degree.insert(id.as_str(), 0);
                dependents.insert(id.as_str(), Vec::new());
            }
        }

        for edge in &self.edges {
            if !enabled.contains(&edge.from) || !enabled.contains(&edge.to) {
                continue;
            }
            *in_degree
                .get_mut(edge.from.as_str())
                .expect("enabled node must have an in-degree entry") += 1;
            dependents
                .get_mut(edge.to.as_str())
                .expect("enabled node must have a dependents entry")
                .push(edge.from.as_str());
        }

        let mut queue: VecDeque<&str> = self
            .nodes
            .iter()
            .filter(|id| enabled.contains(*id) && in_degree[id.as_str()] == 0)
            .map(String::as_str)
            .collect();

        let mut sorted = Vec::with_capacity(in_degree.len());
        while let Some(id) = queue.pop_front() {
            sorted.push(id.to_string());
            for dependent in &dependents[id] {
                let degree = in_degree
                    .get_mut(dependent)
                    .expect("dependent must have an in-degree entry");
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if sorted.len() == in_degree.len() {
            Ok(sorted)
        } else {
            // Nodes never reaching in-degree zero are the ones on a cycle
            // (or downstream of one); report them for diagnostics.
            let remaining: Vec<String> = self
                .nodes
                .iter()
                .filter(|id| enabled.contains(*id) && !sorted.contains(id))
                .cloned()
                .collect();
            Err(PluginSystemError::CyclicDependency(remaining))
        }
    }
}
