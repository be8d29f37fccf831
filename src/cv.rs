//! Resume data model.
//!
//! The resume lives in a YAML file loaded once at startup; a load failure
//! aborts startup rather than surfacing at request time. The structs double
//! as the template context for the resume page.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StartupError;

/// Complete resume document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Cv {
    pub name: String,
    pub title: String,
    pub address: Address,
    pub phone: String,
    pub email: String,
    pub homepage: String,
    pub birthday: String,
    pub summary: Vec<String>,
    pub experience: Vec<Experience>,
    pub languages: Vec<LanguageSkill>,
    pub trainings: Vec<Training>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub place: String,
}

/// One work engagement, most recent first in the source file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    /// Empty means "to present".
    #[serde(rename = "endDate")]
    pub end_date: String,
    pub description: String,
    pub technology: Vec<String>,
    pub employer: Employer,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Employer {
    pub name: String,
    pub location: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LanguageSkill {
    pub language: String,
    pub level: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Training {
    pub title: String,
    pub year: i32,
    pub issuer: Issuer,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Issuer {
    pub name: String,
    pub url: String,
    pub location: String,
}

/// Load and parse the resume file.
pub fn load_cv(path: &Path) -> Result<Cv, StartupError> {
    let raw = std::fs::read_to_string(path).map_err(|source| StartupError::CvRead {
        path: path.display().to_string(),
        source,
    })?;

    serde_yaml::from_str(&raw).map_err(|source| StartupError::CvParse {
        path: path.display().to_string(),
        source,
    })
}
