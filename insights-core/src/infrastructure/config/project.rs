// insights-core/src/infrastructure/config/project.rs

use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::alerts::AlertsConfig;
use crate::domain::project::configuration::ProjectConfig;
use crate::domain::templates::EngineTemplate;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::jinja::JinjaRenderer;

const CANDIDATES: [&str; 2] = ["insights.yaml", "insights_project.yaml"];

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project manifest");

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read project config at {:?}", config_path))?;
    let config: ProjectConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse project config YAML at {:?}", config_path))?;

    finish(config, project_dir)
}

/// Same as `load_project_config`, but a directory without a project file
/// gets the defaults (still layered with satellites and ENV).
pub fn load_or_default(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    match load_project_config(project_dir) {
        Err(InfrastructureError::ConfigNotFound(_)) => {
            info!(dir = ?project_dir, "No project file, using default settings");
            finish(ProjectConfig::default(), project_dir)
        }
        other => other,
    }
}

fn finish(
    mut config: ProjectConfig,
    project_dir: &Path,
) -> Result<ProjectConfig, InfrastructureError> {
    if let Some(config_folder) = config.config_paths.first() {
        let config_dir = project_dir.join(config_folder);
        if config_dir.exists() {
            load_satellite_configs(&mut config, &config_dir)?;
        }
    }

    // INSIGHTS_TARGET_PATH=/tmp/out insights analyze ...
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config)?;
    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CANDIDATES
    )))
}

/// Charge un fragment de configuration typé depuis un fichier.
fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config fragment at {:?}", path))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML fragment at {:?}", path))
        .map_err(Into::into)
}

fn load_satellite_configs(
    config: &mut ProjectConfig,
    config_dir: &Path,
) -> Result<(), InfrastructureError> {
    let alerts_path = config_dir.join("alerts.yml");
    if alerts_path.exists() {
        let alerts: AlertsConfig = load_fragment(&alerts_path)?;
        info!(
            rules = alerts.rules.len(),
            watches = alerts.anomalies.len(),
            "  🔔 Alert rules loaded"
        );
        config.alerts = alerts;
    }

    let templates_path = config_dir.join("templates.yml");
    if templates_path.exists() {
        #[derive(Deserialize)]
        struct TemplatesWrapper {
            #[serde(default)]
            templates: Vec<EngineTemplate>,
        }

        let wrapper: TemplatesWrapper = load_fragment(&templates_path)?;
        info!(count = wrapper.templates.len(), "  🧩 Custom templates loaded");
        config.templates = wrapper.templates;
    }

    Ok(())
}

fn apply_env_overrides(config: &mut ProjectConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("INSIGHTS_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Some(val) = lookup("INSIGHTS_PROFILE") {
        info!(old = ?config.profile, new = ?val, "Overriding profile via ENV");
        config.profile = val;
    }
    if let Some(val) = lookup("INSIGHTS_MAX_ROWS") {
        match val.trim().parse::<usize>() {
            Ok(rows) => {
                info!(old = config.analysis.max_rows, new = rows, "Overriding max rows via ENV");
                config.analysis.max_rows = rows;
            }
            Err(_) => warn!(value = %val, "Ignoring INSIGHTS_MAX_ROWS, not a number"),
        }
    }
}

fn validate_config(config: &ProjectConfig) -> Result<(), InfrastructureError> {
    let invalid = |section: &str, e: validator::ValidationErrors| {
        InfrastructureError::ConfigError(format!("Invalid `{}` settings: {}", section, e))
    };

    config.analysis.validate().map_err(|e| invalid("analysis", e))?;
    config.quality.validate().map_err(|e| invalid("quality", e))?;
    config.alerts.validate().map_err(|e| invalid("alerts", e))?;
    config
        .alerts
        .check_unique_ids()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;
    for rule in &config.alerts.rules {
        if let Some(message) = &rule.message {
            JinjaRenderer::check(message).map_err(|e| {
                InfrastructureError::ConfigError(format!("Rule '{}' message: {}", rule.id, e))
            })?;
        }
    }
    for template in &config.templates {
        template
            .validate()
            .map_err(|e| invalid(&format!("templates.{}", template.id), e))?;
    }
    Ok(())
}
