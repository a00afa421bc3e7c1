/// Application name
pub const APP_NAME: &str = "Plexus";

/// Application version
pub const APP_VERSION: &str = "0.1.0";

/// Host version plugins declare compatibility against
pub const HOST_VERSION: &str = "0.1.0";

/// Default plugins directory
pub const DEFAULT_PLUGINS_DIR: &str = "plugins";

/// File name of the plugin manifest inside a plugin directory
pub const MANIFEST_FILE_NAME: &str = "manifest.json";
