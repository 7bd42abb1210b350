// Request configuration with the defaults used by the site endpoints
use serde::{Deserialize, Serialize};

use crate::models::BuildSite;

/// Decimal places areas are rounded to before comparing against zero.
pub const DEFAULT_TOLERANCE: u32 = 6;
pub const DEFAULT_PROJECT_NAME: &str = "tmp";

/// How many violations validation reports before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Stop at the first violation, in area → coverage → overlap order.
    #[default]
    FailFast,
    /// Run every check and report all violations together.
    Accumulate,
}

/// Input accepted by the JSON entry points: a site plus processing options.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteRequest {
    #[serde(flatten)]
    pub site: BuildSite,
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default = "default_tolerance")]
    pub tolerance: u32,
    #[serde(default)]
    pub validation_mode: ValidationMode,
}

fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

fn default_tolerance() -> u32 {
    DEFAULT_TOLERANCE
}

impl SiteRequest {
    pub fn new(site: BuildSite) -> Self {
        SiteRequest {
            site,
            project_name: default_project_name(),
            tolerance: DEFAULT_TOLERANCE,
            validation_mode: ValidationMode::default(),
        }
    }

    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = project_name.into();
        self
    }

    pub fn with_tolerance(mut self, tolerance: u32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE_JSON: &str = r#"
        "buildings": [{"id": 0, "boundary": [[0,0],[1,0],[1,1],[0,1]]}],
        "plateaus": [{"id": 0, "boundary": [[0,0],[1,0],[1,1],[0,1]], "elevation": 2.5}]
    "#;

    #[test]
    fn missing_options_fall_back_to_defaults() {
        let request: SiteRequest = serde_json::from_str(&format!("{{{}}}", SITE_JSON)).unwrap();
        assert_eq!(request.project_name, "tmp");
        assert_eq!(request.tolerance, 6);
        assert_eq!(request.validation_mode, ValidationMode::FailFast);
        assert_eq!(request.site.plateaus.len(), 1);
    }

    #[test]
    fn explicit_options_are_read() {
        let json = format!(
            r#"{{{}, "project_name": "harbour", "tolerance": 3, "validation_mode": "accumulate"}}"#,
            SITE_JSON
        );
        let request: SiteRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.project_name, "harbour");
        assert_eq!(request.tolerance, 3);
        assert_eq!(request.validation_mode, ValidationMode::Accumulate);
    }

    #[test]
    fn negative_tolerance_does_not_parse() {
        let json = format!(r#"{{{}, "tolerance": -1}}"#, SITE_JSON);
        assert!(serde_json::from_str::<SiteRequest>(&json).is_err());
    }
}
