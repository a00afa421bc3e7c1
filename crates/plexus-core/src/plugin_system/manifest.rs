use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;

use crate::kernel::constants;
use crate::plugin_system::discovery::PluginDiscoveryError;
use crate::plugin_system::version::{HostVersion, VersionRange};

// --- Intermediate struct for deserialization ---

#[derive(Deserialize, Debug)]
struct RawPluginManifest {
    id: String,
    version: String,
    #[serde(default)]
    host_version_range: Option<String>,
    #[serde(default)]
    config_path: Option<String>,
    #[serde(default)]
    required_plugins: Vec<String>,
    #[serde(default)]
    optional_plugins: Vec<String>,
    #[serde(default)]
    server: bool,
    #[serde(default)]
    ui: bool,
}

// --- End Intermediate struct ---

/// Represents a plugin manifest that describes a plugin. Immutable once parsed.
#[derive(Debug, Clone)]
pub struct PluginManifest {
    /// Unique identifier for the plugin
    pub id: String,

    /// Plugin version
    pub version: String,

    /// Host versions this plugin is compatible with (absent means any)
    pub host_version_range: Option<VersionRange>,

    /// Root of the plugin's own configuration, if it has one
    pub config_path: Option<String>,

    /// Ids of plugins that must be enabled for this plugin to run
    pub required_plugins: Vec<String>,

    /// Ids of plugins this plugin can use when present, but does not need
    pub optional_plugins: Vec<String>,

    /// Whether the plugin has a server-side part
    pub server: bool,

    /// Whether the plugin has a UI part
    pub ui: bool,
}

impl PluginManifest {
    /// Create a new manifest with no dependencies (primarily for tests and
    /// statically registered plugins)
    pub fn new(id: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            version: version.to_string(),
            host_version_range: None,
            config_path: None,
            required_plugins: Vec::new(),
            optional_plugins: Vec::new(),
            server: true,
            ui: false,
        }
    }

    /// Add a required dependency
    pub fn require(mut self, id: &str) -> Self {
        self.required_plugins.push(id.to_string());
        self
    }

    /// Add an optional dependency
    pub fn optional(mut self, id: &str) -> Self {
        self.optional_plugins.push(id.to_string());
        self
    }
}

/// One discovered plugin candidate: where it lives plus its parsed manifest.
#[derive(Debug, Clone)]
pub struct PluginDefinition {
    pub path: PathBuf,
    pub manifest: PluginManifest,
}

impl PluginDefinition {
    pub fn new(path: impl Into<PathBuf>, manifest: PluginManifest) -> Self {
        Self {
            path: path.into(),
            manifest,
        }
    }

    pub fn id(&self) -> &str {
        &self.manifest.id
    }
}

/// Reads and validates `manifest.json` inside `plugin_path`.
///
/// Errors are reported as discovery errors so the caller can decide which
/// kinds abort the run: an unreadable file is `missing-manifest`, anything
/// structurally wrong is `invalid-manifest`, and a manifest whose declared
/// range excludes the host version is `incompatible-version`.
pub async fn parse_manifest(
    plugin_path: &Path,
    host_version: &HostVersion,
) -> Result<PluginManifest, PluginDiscoveryError> {
    let manifest_path = plugin_path.join(constants::MANIFEST_FILE_NAME);

    let content = fs::read_to_string(&manifest_path)
        .await
        .map_err(|e| PluginDiscoveryError::missing_manifest(&manifest_path, e))?;

    let raw: RawPluginManifest = serde_json::from_str(&content)
        .map_err(|e| PluginDiscoveryError::invalid_manifest(&manifest_path, e))?;

    if raw.id.is_empty() {
        return Err(PluginDiscoveryError::invalid_manifest(
            &manifest_path,
            "Plugin manifest must define an id",
        ));
    }
    if raw.version.is_empty() {
        return Err(PluginDiscoveryError::invalid_manifest(
            &manifest_path,
            format!("Plugin \"{}\" manifest must define a version", raw.id),
        ));
    }

    let host_version_range = match raw.host_version_range {
        Some(constraint) => Some(
            VersionRange::from_constraint(&constraint)
                .map_err(|e| PluginDiscoveryError::invalid_manifest(&manifest_path, e))?,
        ),
        None => None,
    };

    if let Some(range) = &host_version_range {
        if !range.includes(&host_version.as_semver()) {
            return Err(PluginDiscoveryError::incompatible_version(
                &manifest_path,
                format!(
                    "Plugin \"{}\" is only compatible with hosts \"{}\", but the host is at version {}",
                    raw.id, range, host_version
                ),
            ));
        }
    }

    Ok(PluginManifest {
        id: raw.id,
        version: raw.version,
        host_version_range,
        config_path: raw.config_path,
        required_plugins: raw.required_plugins,
        optional_plugins: raw.optional_plugins,
        server: raw.server,
        ui: raw.ui,
    })
}
