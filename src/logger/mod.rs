//! Logger module
//!
//! Provides logging utilities for the site server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, redirect_addr: Option<&SocketAddr>, config: &Config) {
    for line in startup_banner(addr, redirect_addr, config) {
        write_info(&line);
    }
}

/// Build the startup banner lines from the effective configuration.
fn startup_banner(
    addr: &SocketAddr,
    redirect_addr: Option<&SocketAddr>,
    config: &Config,
) -> Vec<String> {
    let mut lines = vec![
        "======================================".to_string(),
        "cvsite started".to_string(),
        format!("Listening on: http://{addr}"),
    ];
    if let Some(redirect_addr) = redirect_addr {
        lines.push(format!("HTTPS upgrade listener on: http://{redirect_addr}"));
    }
    if config.site.hostname.is_empty() {
        lines.push("Canonical hostname: (not enforced)".to_string());
    } else {
        lines.push(format!("Canonical hostname: {}", config.site.hostname));
    }
    lines.push(format!(
        "Public ports: http {}, https {}",
        config.site.http_port, config.site.https_port
    ));
    lines.push(format!("Log level: {}", config.logging.level));
    lines.push(format!("Resume file: {}", config.site.cv_path));
    lines.push(format!("Template directory: {}", config.site.template_dir));
    lines.push(format!("Static directory: {}", config.site.static_dir));
    if let Some(workers) = config.server.workers {
        lines.push(format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        lines.push(format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        lines.push(format!("Error log: {path}"));
    }
    lines.push("======================================\n".to_string());
    lines
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        write_info(&format!("[Headers] Count: {count}"));
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_shutdown(reason: &str) {
    write_info(&format!("\n[Shutdown] {reason}"));
}

pub fn log_listener_stopped(prefix: &str) {
    if prefix.is_empty() {
        write_info("[Shutdown] Listener stopped; in-flight connections will finish");
    } else {
        write_info(&format!(
            "{prefix} Listener stopped; in-flight connections will finish"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_banner_reports_settings() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();

        let banner = startup_banner(&addr, None, &cfg).join("\n");
        assert!(banner.contains("Listening on: http://127.0.0.1:8080"));
        assert!(banner.contains("Canonical hostname: (not enforced)"));
        assert!(banner.contains("Public ports: http 80, https 443"));
        assert!(banner.contains("Log level: info"));
        assert!(!banner.contains("HTTPS upgrade listener"));
    }

    #[test]
    fn test_startup_banner_includes_upgrade_listener() {
        let mut cfg = Config::load_from("no-such-config-file").unwrap();
        cfg.site.hostname = "www.test.com".to_string();
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let redirect_addr: SocketAddr = "127.0.0.1:8081".parse().unwrap();

        let banner = startup_banner(&addr, Some(&redirect_addr), &cfg).join("\n");
        assert!(banner.contains("HTTPS upgrade listener on: http://127.0.0.1:8081"));
        assert!(banner.contains("Canonical hostname: www.test.com"));
    }
}
