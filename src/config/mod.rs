// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::StartupError;
use crate::redirect::RedirectPolicy;

// Re-export public types
pub use state::AppState;
pub use types::Config;

impl Config {
    /// Load configuration from the given file path (without extension),
    /// falling back to built-in defaults. `CVSITE_`-prefixed environment
    /// variables override file values.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("CVSITE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.redirect_host", "127.0.0.1")?
            .set_default("server.redirect_port", 8081)?
            .set_default("server.enable_redirect_server", false)?
            .set_default("server.behind_tls", false)?
            .set_default("site.hostname", "")?
            .set_default("site.https_port", "443")?
            .set_default("site.http_port", "80")?
            .set_default("site.cv_path", "resume.yaml")?
            .set_default("site.template_dir", "ui/html")?
            .set_default("site.static_dir", "static")?
            .set_default(
                "site.favicon_paths",
                vec!["/favicon.ico".to_string(), "/favicon.svg".to_string()],
            )?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 5)?
            .set_default("performance.write_timeout", 10)?
            .set_default("http.server_name", "cvsite/0.1")?
            .set_default("http.enable_hsts", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| StartupError::ListenAddr { addr, source })
    }

    pub fn get_redirect_socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.redirect_host, self.server.redirect_port);
        addr.parse()
            .map_err(|source| StartupError::ListenAddr { addr, source })
    }

    /// Redirect policy for the primary application listener: canonical
    /// hostname enforcement only, no scheme change.
    pub fn app_policy(&self) -> RedirectPolicy {
        RedirectPolicy {
            hostname: self.site.hostname.clone(),
            https_port: self.site.https_port.clone(),
            upgrade_scheme: false,
        }
    }

    /// Redirect policy for the plain-HTTP listener: everything is sent to
    /// the HTTPS side, at the canonical hostname when one is configured.
    pub fn upgrade_policy(&self) -> RedirectPolicy {
        RedirectPolicy {
            hostname: self.site.hostname.clone(),
            https_port: self.site.https_port.clone(),
            upgrade_scheme: true,
        }
    }
}
