//! Plugin discovery.
//!
//! Walks the configured search roots, recognizes plugin directories by the
//! presence of a manifest file, and returns the parsed definitions together
//! with every non-aborting problem found along the way. Discovery itself
//! never fails: an unreadable root or a broken candidate is recorded as a
//! [`PluginDiscoveryError`] and its siblings are still processed. Which error
//! kinds ultimately abort the run is decided by the orchestrator.
use std::fmt;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::plugin_system::manifest::{self, PluginDefinition};
use crate::plugin_system::version::HostVersion;

/// Classification of a discovery failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryErrorKind {
    /// A search root could not be read; the root is skipped.
    InvalidSearchPath,
    /// A candidate directory has no manifest file; the plugin is skipped.
    MissingManifest,
    /// A manifest exists but cannot be parsed or validated. Fatal.
    InvalidManifest,
    /// The manifest's declared host range excludes this host. Fatal.
    IncompatibleVersion,
    /// A search-root entry is not a plugin directory; the entry is skipped.
    InvalidPluginPath,
}

impl fmt::Display for DiscoveryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            DiscoveryErrorKind::InvalidSearchPath => "invalid-search-path",
            DiscoveryErrorKind::MissingManifest => "missing-manifest",
            DiscoveryErrorKind::InvalidManifest => "invalid-manifest",
            DiscoveryErrorKind::IncompatibleVersion => "incompatible-version",
            DiscoveryErrorKind::InvalidPluginPath => "invalid-plugin-path",
        };
        write!(f, "{}", kind)
    }
}

/// One discovery failure: kind, affected path, and the underlying cause.
///
/// The `Display` format `<cause> (<kind>, <path>)` is relied upon by existing
/// tooling and must not change.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{cause} ({kind}, {})", .path.display())]
pub struct PluginDiscoveryError {
    pub kind: DiscoveryErrorKind,
    pub path: PathBuf,
    pub cause: String,
}

impl PluginDiscoveryError {
    fn new(kind: DiscoveryErrorKind, path: &Path, cause: impl fmt::Display) -> Self {
        Self {
            kind,
            path: path.to_path_buf(),
            cause: cause.to_string(),
        }
    }

    pub fn invalid_search_path(path: &Path, cause: impl fmt::Display) -> Self {
        Self::new(DiscoveryErrorKind::InvalidSearchPath, path, cause)
    }

    pub fn missing_manifest(path: &Path, cause: impl fmt::Display) -> Self {
        Self::new(DiscoveryErrorKind::MissingManifest, path, cause)
    }

    pub fn invalid_manifest(path: &Path, cause: impl fmt::Display) -> Self {
        Self::new(DiscoveryErrorKind::InvalidManifest, path, cause)
    }

    pub fn incompatible_version(path: &Path, cause: impl fmt::Display) -> Self {
        Self::new(DiscoveryErrorKind::IncompatibleVersion, path, cause)
    }

    pub fn invalid_plugin_path(path: &Path, cause: impl fmt::Display) -> Self {
        Self::new(DiscoveryErrorKind::InvalidPluginPath, path, cause)
    }

    /// Whether this error must abort orchestration before any lifecycle call.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            DiscoveryErrorKind::InvalidManifest | DiscoveryErrorKind::IncompatibleVersion
        )
    }
}

/// Descriptor of the host environment discovery runs in.
#[derive(Debug, Clone)]
pub struct Environment {
    pub host_version: HostVersion,
}

impl Environment {
    pub fn new(host_version: HostVersion) -> Self {
        Self { host_version }
    }
}

/// Result of one discovery pass over all search roots.
#[derive(Debug, Default)]
pub struct DiscoveredPlugins {
    pub definitions: Vec<PluginDefinition>,
    pub errors: Vec<PluginDiscoveryError>,
}

impl DiscoveredPlugins {
    /// The subset of errors that must abort orchestration.
    pub fn fatal_errors(&self) -> Vec<PluginDiscoveryError> {
        self.errors.iter().filter(|e| e.is_fatal()).cloned().collect()
    }
}

/// Iterates over every search root and gathers plugin definitions.
///
/// Candidate paths are sorted before parsing so the output ordering, and with
/// it every downstream tie-break in enablement and topological ordering, is
/// reproducible across runs.
pub async fn discover(search_paths: &[PathBuf], env: &Environment) -> DiscoveredPlugins {
    let mut definitions = Vec::new();
    let mut errors = Vec::new();

    for root in search_paths {
        let mut candidates = match list_entries(root).await {
            Ok(entries) => entries,
            Err(e) => {
                errors.push(PluginDiscoveryError::invalid_search_path(root, e));
                continue;
            }
        };
        candidates.sort();

        for candidate in candidates {
            match fs::metadata(&candidate).await {
                Ok(meta) if meta.is_dir() => {}
                Ok(_) => {
                    errors.push(PluginDiscoveryError::invalid_plugin_path(
                        &candidate,
                        "Not a plugin directory",
                    ));
                    continue;
                }
                Err(e) => {
                    errors.push(PluginDiscoveryError::invalid_plugin_path(&candidate, e));
                    continue;
                }
            }

            match manifest::parse_manifest(&candidate, &env.host_version).await {
                Ok(parsed) => definitions.push(PluginDefinition::new(candidate, parsed)),
                Err(e) => errors.push(e),
            }
        }
    }

    DiscoveredPlugins {
        definitions,
        errors,
    }
}

async fn list_entries(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(root).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        entries.push(entry.path());
    }
    Ok(entries)
}
