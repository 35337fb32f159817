// insights/src/commands/analyze.rs
//
// USE CASE: Full analysis of one file.

use anyhow::Context;
use std::path::PathBuf;

use insights_core::application::{analyze_file, save_report};
use insights_core::infrastructure::adapters::DuckDbReader;

use crate::cli::OutputFormat;
use crate::output;

pub async fn execute(
    file: PathBuf,
    project_dir: PathBuf,
    format: OutputFormat,
    save: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(&project_dir)?;
    let reader = DuckDbReader::new(config.analysis.max_rows);

    let report = analyze_file(&reader, &file, &config)
        .await
        .with_context(|| format!("Failed to analyse {}", file.display()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print!("{}", output::analysis_text(&report)),
    }

    if save {
        let path = save_report(&super::target_dir(&project_dir, &config), &report)?;
        // stdout stays valid JSON in json mode
        eprintln!("💾 Report saved to {}", path.display());
    }
    Ok(())
}
