//! Startup error type.
//!
//! Everything that can go wrong before the listeners are up. Request-time
//! failures never use this type; they are answered with an HTTP status and
//! logged instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to read resume file '{path}': {source}")]
    CvRead {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse resume file '{path}': {source}")]
    CvParse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("failed to load templates from '{dir}': {source}")]
    Templates { dir: String, source: tera::Error },

    #[error("invalid listen address '{addr}': {source}")]
    ListenAddr {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
