// insights/src/commands/mod.rs

pub mod alerts;
pub mod analyze;
pub mod clean;
pub mod quality;
pub mod scan;
pub mod templates;

use anyhow::Context;
use std::path::{Path, PathBuf};

use insights_core::domain::project::ProjectConfig;
use insights_core::infrastructure::config::load_or_default;

/// Project settings (defaults when the directory has no `insights.yaml`).
pub(crate) fn load_config(project_dir: &Path) -> anyhow::Result<ProjectConfig> {
    load_or_default(project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })
}

pub(crate) fn target_dir(project_dir: &Path, config: &ProjectConfig) -> PathBuf {
    project_dir.join(&config.target_path)
}
