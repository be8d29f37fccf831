// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure, immutable after startup.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Listener configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Address for the optional plain-HTTP listener that upgrades to HTTPS.
    pub redirect_host: String,
    pub redirect_port: u16,
    pub enable_redirect_server: bool,
    /// Whether the primary listener sits behind a TLS terminator. Controls
    /// the scheme the redirect normalizer considers the request to have.
    pub behind_tls: bool,
    pub workers: Option<usize>,
}

/// Site content and redirect policy configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Canonical public hostname. Empty disables hostname enforcement.
    pub hostname: String,
    /// Public-facing ports, as strings because they are never used for
    /// binding. `https_port` appears in redirect targets; both are
    /// reported at startup.
    pub https_port: String,
    pub http_port: String,
    pub cv_path: String,
    pub template_dir: String,
    pub static_dir: String,
    pub favicon_paths: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
    pub show_headers: bool,
}

/// Performance configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP response configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    /// Emit Strict-Transport-Security on every response.
    pub enable_hsts: bool,
}
