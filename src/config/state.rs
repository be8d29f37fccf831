// Application state module
// Read-only process-wide state, built once at startup

use std::path::Path;

use super::types::Config;
use crate::cv::{self, Cv};
use crate::error::StartupError;
use crate::render::TemplateSet;

/// Shared application state.
///
/// Built once in `main` before the listeners start and shared read-only
/// across all connections; nothing here changes at runtime, so request
/// handlers need no locks.
pub struct AppState {
    pub config: Config,
    pub cv: Cv,
    pub templates: TemplateSet,
}

impl AppState {
    /// Load the resume and compile the templates named in `config`.
    pub fn init(config: Config) -> Result<Self, StartupError> {
        let cv = cv::load_cv(Path::new(&config.site.cv_path))?;
        let templates = TemplateSet::load(&config.site.template_dir)?;

        Ok(Self {
            config,
            cv,
            templates,
        })
    }
}
