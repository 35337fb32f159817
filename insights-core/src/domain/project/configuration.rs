// insights-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::alerts::AlertsConfig;
use crate::domain::quality::QualityThresholds;
use crate::domain::templates::EngineTemplate;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_profile")]
    pub profile: String,

    #[serde(rename = "config-paths", default = "default_config_paths")]
    pub config_paths: Vec<String>,

    #[serde(rename = "data-path", default = "default_data_path")]
    pub data_path: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    #[serde(default)]
    pub analysis: AnalysisSettings,

    #[serde(default)]
    pub quality: QualityThresholds,

    /// Filled from `alerts.yml`, not from the project file.
    #[serde(skip)]
    pub alerts: AlertsConfig,

    /// Filled from `templates.yml`.
    #[serde(skip)]
    pub templates: Vec<EngineTemplate>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "insights".to_string(),
            version: default_version(),
            profile: default_profile(),
            config_paths: default_config_paths(),
            data_path: default_data_path(),
            target_path: default_target_path(),
            clean_targets: default_clean_targets(),
            analysis: AnalysisSettings::default(),
            quality: QualityThresholds::default(),
            alerts: AlertsConfig::default(),
            templates: Vec::new(),
        }
    }
}

/// Knobs for a single analysis pass.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
#[serde(default)]
pub struct AnalysisSettings {
    #[validate(range(min = 1))]
    pub max_rows: usize,
    #[validate(range(min = 1, max = 100))]
    pub top_n: usize,
    #[validate(range(max = 50))]
    pub sample_values: usize,
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_template_confidence: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_rows: 100_000,
            top_n: 10,
            sample_values: 5,
            min_template_confidence: 0.5,
        }
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}
fn default_profile() -> String {
    "dev".to_string()
}
fn default_config_paths() -> Vec<String> {
    vec!["config".to_string()]
}
fn default_data_path() -> String {
    "data".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string()]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_minimal_project_file_gets_defaults() -> Result<()> {
        let config: ProjectConfig = serde_yaml::from_str("name: mobile_game\n")?;
        assert_eq!(config.profile, "dev");
        assert_eq!(config.data_path, "data");
        assert_eq!(config.target_path, "target");
        assert_eq!(config.config_paths, vec!["config"]);
        assert_eq!(config.analysis, AnalysisSettings::default());
        assert!(config.alerts.rules.is_empty());
        Ok(())
    }

    #[test]
    fn test_partial_analysis_block() -> Result<()> {
        let yaml = r#"
name: mobile_game
target-path: build
analysis:
  max_rows: 500
  top_n: 3
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml)?;
        assert_eq!(config.target_path, "build");
        assert_eq!(config.analysis.max_rows, 500);
        assert_eq!(config.analysis.top_n, 3);
        assert_eq!(config.analysis.sample_values, 5);
        assert!(config.analysis.validate().is_ok());
        Ok(())
    }

    #[test]
    fn test_invalid_analysis_settings() {
        let settings = AnalysisSettings {
            top_n: 0,
            min_template_confidence: 1.5,
            ..Default::default()
        };
        let errors = settings.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("top_n"));
        assert!(fields.contains_key("min_template_confidence"));
    }
}
