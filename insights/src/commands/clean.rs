// insights/src/commands/clean.rs
//
// USE CASE: Clean generated artifacts.

use std::path::PathBuf;

use insights_core::application::clean_project;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let config = super::load_config(&project_dir)?;

    let removed = clean_project(&project_dir, &config)?;
    if removed.is_empty() {
        println!("✨ Nothing to clean.");
    } else {
        for target in &removed {
            println!("🧹 Removed {}", target);
        }
    }
    Ok(())
}
