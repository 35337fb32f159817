// insights-core/src/application/clean.rs

use std::fs;
use std::path::{Component, Path};

use crate::domain::project::ProjectConfig;
use crate::error::InsightsError;

/// Removes the configured clean targets and returns the ones that existed.
pub fn clean_project(
    project_dir: &Path,
    config: &ProjectConfig,
) -> Result<Vec<String>, InsightsError> {
    tracing::info!("🧹 Cleaning generated artifacts...");

    let targets = if config.clean_targets.is_empty() {
        vec![config.target_path.clone()]
    } else {
        config.clean_targets.clone()
    };

    // Tout valider avant de supprimer quoi que ce soit
    for target_rel_path in &targets {
        guard_target(target_rel_path)?;
    }

    let mut removed = Vec::new();
    for target_rel_path in targets {
        let full_path = project_dir.join(&target_rel_path);
        if full_path.exists() {
            if full_path.is_dir() {
                fs::remove_dir_all(&full_path)?;
            } else {
                fs::remove_file(&full_path)?;
            }
            removed.push(target_rel_path);
        }
    }

    Ok(removed)
}

/// Zero-Trust Path Traversal Guard: a target must name something strictly
/// inside the project, never the project root itself.
fn guard_target(target_rel_path: &str) -> Result<(), InsightsError> {
    let rel = Path::new(target_rel_path);
    let escapes = rel.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    let names_something = rel.components().any(|c| matches!(c, Component::Normal(_)));
    if escapes || !names_something || target_rel_path.trim().is_empty() {
        return Err(InsightsError::UnsafePath(target_rel_path.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_removes_existing_targets_only() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("target/reports"))?;
        fs::write(dir.path().join("target/alert_state.json"), "{}")?;
        fs::write(dir.path().join("scratch.log"), "x")?;

        let config = ProjectConfig {
            clean_targets: vec!["target".into(), "scratch.log".into(), "missing".into()],
            ..Default::default()
        };
        let removed = clean_project(dir.path(), &config)?;

        assert_eq!(removed, vec!["target", "scratch.log"]);
        assert!(!dir.path().join("target").exists());
        assert!(!dir.path().join("scratch.log").exists());
        Ok(())
    }

    #[test]
    fn test_path_traversal_is_refused() -> Result<()> {
        let dir = tempdir()?;
        for bad in ["../outside", "/etc", "target/../../x", "  ", "", ".", "./", "././"] {
            let config = ProjectConfig {
                clean_targets: vec![bad.to_string()],
                ..Default::default()
            };
            let err = clean_project(dir.path(), &config).unwrap_err();
            assert!(matches!(err, InsightsError::UnsafePath(_)), "{bad}");
        }
        Ok(())
    }

    #[test]
    fn test_project_root_survives_dot_target() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("data"))?;
        fs::write(dir.path().join("data/events.csv"), "a\n1\n")?;
        fs::write(dir.path().join("insights.yaml"), "name: p\n")?;
        fs::create_dir_all(dir.path().join("target"))?;

        let config = ProjectConfig {
            clean_targets: vec!["target".into(), ".".into()],
            ..Default::default()
        };
        let err = clean_project(dir.path(), &config).unwrap_err();
        assert!(matches!(err, InsightsError::UnsafePath(_)));

        // Nothing is touched when one target is refused.
        assert!(dir.path().join("target").exists());
        assert!(dir.path().join("data/events.csv").exists());
        assert!(dir.path().join("insights.yaml").exists());
        Ok(())
    }

    #[test]
    fn test_dot_prefixed_target_is_allowed() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("target"))?;
        let config = ProjectConfig {
            clean_targets: vec!["./target".into()],
            ..Default::default()
        };
        assert_eq!(clean_project(dir.path(), &config)?, vec!["./target"]);
        assert!(!dir.path().join("target").exists());
        Ok(())
    }
}
