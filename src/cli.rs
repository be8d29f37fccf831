//! Command line interface module

use clap::Parser;

/// Personal website server: home page, resume, canonical-host redirects.
#[derive(Debug, Parser)]
#[command(name = "cvsite", version)]
pub struct Cli {
    /// Configuration file path, without extension (toml)
    #[arg(long, default_value = "cvsite")]
    pub config: String,

    /// Path to the resume YAML file, overrides the configured one
    #[arg(long)]
    pub cv: Option<String>,
}
