//! Page template set.
//!
//! All templates are compiled once at startup and kept in memory for the
//! process lifetime; a broken or missing template aborts startup.

use tera::{Context, Tera};

use crate::cv::Cv;
use crate::error::StartupError;

pub const HOME_TEMPLATE: &str = "home.html";
pub const RESUME_TEMPLATE: &str = "resume.html";

/// Compiled template set, immutable after startup.
pub struct TemplateSet {
    tera: Tera,
}

impl TemplateSet {
    /// Compile all `.html` templates under `dir`.
    ///
    /// Fails when the directory cannot be globbed or either page template
    /// is absent, so a misconfigured deployment dies early.
    pub fn load(dir: &str) -> Result<Self, StartupError> {
        let pattern = format!("{}/**/*.html", dir.trim_end_matches('/'));
        let tera = Tera::new(&pattern).map_err(|source| StartupError::Templates {
            dir: dir.to_string(),
            source,
        })?;

        for required in [HOME_TEMPLATE, RESUME_TEMPLATE] {
            if !tera.get_template_names().any(|name| name == required) {
                return Err(StartupError::Templates {
                    dir: dir.to_string(),
                    source: tera::Error::msg(format!("missing template '{required}'")),
                });
            }
        }

        Ok(Self { tera })
    }

    pub fn render_home(&self) -> Result<String, tera::Error> {
        self.tera.render(HOME_TEMPLATE, &Context::new())
    }

    pub fn render_resume(&self, cv: &Cv) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("cv", cv);
        self.tera.render(RESUME_TEMPLATE, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv;

    fn template_dir() -> String {
        format!("{}/ui/html", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn test_load_shipped_templates() {
        TemplateSet::load(&template_dir()).unwrap();
    }

    #[test]
    fn test_load_missing_dir_fails() {
        assert!(TemplateSet::load("/nonexistent/templates").is_err());
    }

    #[test]
    fn test_render_home() {
        let templates = TemplateSet::load(&template_dir()).unwrap();
        let html = templates.render_home().unwrap();
        assert!(html.contains("<html"));
    }

    #[test]
    fn test_render_resume_includes_cv_fields() {
        let templates = TemplateSet::load(&template_dir()).unwrap();
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("resume.yaml");
        let cv = cv::load_cv(&path).unwrap();

        let html = templates.render_resume(&cv).unwrap();
        assert!(html.contains(&cv.name));
        assert!(html.contains(&cv.title));
    }
}
