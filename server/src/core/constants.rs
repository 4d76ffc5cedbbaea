// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "JVB Exporter";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "jvb_exporter";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".jvb-exporter";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "jvb-exporter.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "JVB_EXPORTER_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "JVB_EXPORTER_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "JVB_EXPORTER_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "JVB_EXPORTER_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "JVB_EXPORTER_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: u16 = 2112;

/// Request body limit for presence ingestion (1MB)
pub const PRESENCE_BODY_LIMIT: usize = 1024 * 1024;

/// Content type of the metrics endpoint
pub const METRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

// =============================================================================
// Exporter
// =============================================================================

/// Environment variable for the metric namespace
pub const ENV_NAMESPACE: &str = "JVB_EXPORTER_NAMESPACE";

/// Default metric namespace (prefix of every exported metric name)
pub const DEFAULT_NAMESPACE: &str = "jitsi_jvb";
