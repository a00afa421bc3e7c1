//! # Plexus Plugin System
//!
//! Infrastructure for extending the host through discovered plugins: manifest
//! parsing, filesystem discovery, dependency-graph construction, enablement
//! resolution, and a strict setup/start/stop lifecycle with failure
//! isolation.
//!
//! ## Key submodules and responsibilities:
//!
//! - **[`discovery`]**: turns search roots into plugin definitions plus
//!   non-fatal discovery errors.
//! - **[`manifest`]**: the declarative description of a plugin
//!   ([`PluginManifest`]) and its parsing from `manifest.json`.
//! - **[`graph`]**: the immutable directed graph of plugin ids with
//!   required/optional edges, duplicate-id detection, and topological
//!   ordering.
//! - **[`enablement`]**: the fixed-point computation of the final enabled
//!   subset under transitive disabling.
//! - **[`loader`]**: the capability interface that resolves a definition to
//!   an executable plugin.
//! - **[`unit`]**: the [`Plugin`] trait, type-erased contracts, and the
//!   per-plugin lifecycle state machine.
//! - **[`orchestrator`]**: drives every enabled unit through
//!   setup/start/stop in dependency order.
//! - **[`error`]**: [`PluginSystemError`](error::PluginSystemError) and the
//!   fatal/non-fatal split.
//! - **[`version`]**: host version and semver-range utilities for
//!   compatibility checks.
pub mod discovery;
pub mod enablement;
pub mod error;
pub mod graph;
pub mod loader;
pub mod manifest;
pub mod orchestrator;
pub mod unit;
pub mod version;

pub use discovery::{DiscoveredPlugins, Environment, PluginDiscoveryError};
pub use enablement::EnablementConfig;
pub use graph::DependencyGraph;
pub use loader::{PluginLoader, StaticPluginLoader};
pub use manifest::{PluginDefinition, PluginManifest};
pub use orchestrator::{PluginsOrchestrator, PluginsSetup};
pub use unit::{Contract, ContractsMap, DepsBag, Plugin, PluginContext, PluginState};
pub use version::{HostVersion, VersionRange};

// Test module declaration
#[cfg(test)]
mod tests;
