#![cfg(test)]

use crate::plugin_system::enablement::{resolve, EnablementConfig};
use crate::plugin_system::graph::DependencyGraph;
use crate::plugin_system::manifest::{PluginDefinition, PluginManifest};

fn def(manifest: PluginManifest) -> PluginDefinition {
    let path = format!("plugins/{}", manifest.id);
    PluginDefinition::new(path, manifest)
}

#[test]
fn test_everything_enabled_by_default() {
    let graph = DependencyGraph::build(&[
        def(PluginManifest::new("a", "1.0.0").require("b")),
        def(PluginManifest::new("b", "1.0.0")),
    ])
    .unwrap();

    let resolution = resolve(&graph, &EnablementConfig::new());
    assert!(resolution.is_enabled("a"));
    assert!(resolution.is_enabled("b"));
    assert!(resolution.reasons().is_empty());
}

#[test]
fn test_explicitly_disabled_plugin() {
    let graph = DependencyGraph::build(&[def(PluginManifest::new("solo", "1.0.0"))]).unwrap();
    let mut config = EnablementConfig::new();
    config.disable("solo");

    let resolution = resolve(&graph, &config);
    assert!(!resolution.is_enabled("solo"));
    assert_eq!(resolution.reasons(), ["Plugin \"solo\" is disabled."]);
}

#[test]
fn test_missing_required_dependency_disables_transitively() {
    let graph = DependencyGraph::build(&[def(PluginManifest::new("a", "1.0.0").require("missing"))])
        .unwrap();

    let resolution = resolve(&graph, &EnablementConfig::new());
    assert!(!resolution.is_enabled("a"));
    assert_eq!(
        resolution.reasons(),
        ["Plugin \"a\" has been disabled since some of its direct or transitive dependencies are missing or disabled."]
    );
}

#[test]
fn test_disabled_dependency_disables_dependent() {
    let graph = DependencyGraph::build(&[
        def(PluginManifest::new("dependent", "1.0.0").require("dependency")),
        def(PluginManifest::new("dependency", "1.0.0")),
    ])
    .unwrap();
    let mut config = EnablementConfig::new();
    config.disable("dependency");

    let resolution = resolve(&graph, &config);
    assert!(!resolution.is_enabled("dependent"));
    assert!(!resolution.is_enabled("dependency"));
    assert_eq!(resolution.reasons().len(), 2);
    assert!(resolution.reasons()[0].contains("\"dependency\" is disabled."));
    assert!(resolution.reasons()[1].contains("\"dependent\" has been disabled"));
}

#[test]
fn test_deep_chain_disables_to_the_root() {
    // e -> d -> c -> b -> a, with a explicitly disabled.
    let graph = DependencyGraph::build(&[
        def(PluginManifest::new("a", "1.0.0")),
        def(PluginManifest::new("b", "1.0.0").require("a")),
        def(PluginManifest::new("c", "1.0.0").require("b")),
        def(PluginManifest::new("d", "1.0.0").require("c")),
        def(PluginManifest::new("e", "1.0.0").require("d")),
    ])
    .unwrap();
    let mut config = EnablementConfig::new();
    config.disable("a");

    let resolution = resolve(&graph, &config);
    for id in ["a", "b", "c", "d", "e"] {
        assert!(!resolution.is_enabled(id), "{} should be disabled", id);
    }
    // One reason per disabled plugin, no duplicates.
    assert_eq!(resolution.reasons().len(), 5);
}

#[test]
fn test_optional_dependencies_never_affect_enablement() {
    let graph = DependencyGraph::build(&[
        def(PluginManifest::new("a", "1.0.0")
            .optional("missing")
            .optional("disabled-dep")),
        def(PluginManifest::new("disabled-dep", "1.0.0")),
    ])
    .unwrap();
    let mut config = EnablementConfig::new();
    config.disable("disabled-dep");

    let resolution = resolve(&graph, &config);
    assert!(resolution.is_enabled("a"));
}

#[test]
fn test_unknown_id_is_reported_disabled() {
    let graph = DependencyGraph::build(&[def(PluginManifest::new("a", "1.0.0"))]).unwrap();
    let resolution = resolve(&graph, &EnablementConfig::new());
    assert!(!resolution.is_enabled("never-discovered"));
}

#[test]
fn test_resolution_is_idempotent_fixed_point() {
    let graph = DependencyGraph::build(&[
        def(PluginManifest::new("a", "1.0.0").require("b")),
        def(PluginManifest::new("b", "1.0.0").require("missing")),
        def(PluginManifest::new("c", "1.0.0")),
    ])
    .unwrap();
    let config = EnablementConfig::new();

    let first = resolve(&graph, &config);
    let second = resolve(&graph, &config);
    assert_eq!(first.enablement_map(), second.enablement_map());
    assert!(!first.is_enabled("a"));
    assert!(!first.is_enabled("b"));
    assert!(first.is_enabled("c"));
}

#[test]
fn test_config_default_and_overrides() {
    let mut config = EnablementConfig::new();
    assert!(config.is_enabled("anything"));
    config.set_enabled("x", false);
    assert!(!config.is_enabled("x"));
    config.set_enabled("x", true);
    assert!(config.is_enabled("x"));
}
