// insights/src/commands/quality.rs
//
// USE CASE: Quality gate for one file.

use anyhow::Context;
use std::path::PathBuf;

use insights_core::application::analyze_file;
use insights_core::infrastructure::adapters::DuckDbReader;

use crate::cli::OutputFormat;
use crate::output;

pub async fn execute(
    file: PathBuf,
    project_dir: PathBuf,
    min_score: Option<u8>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = super::load_config(&project_dir)?;
    let reader = DuckDbReader::new(config.analysis.max_rows);

    let report = analyze_file(&reader, &file, &config)
        .await
        .with_context(|| format!("Failed to analyse {}", file.display()))?;
    let quality = &report.quality;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(quality)?),
        OutputFormat::Table => {
            println!("✅ {}", output::quality_summary(quality));
            if quality.issues.is_empty() {
                println!("   No issues found.");
            } else {
                println!("{}", output::issues_table(quality));
            }
        }
    }

    if let Some(min) = min_score.filter(|min| quality.score < *min) {
        eprintln!(
            "❌ Quality score {} is below the required {}.",
            quality.score, min
        );
        // Exit with error code for CI/CD
        std::process::exit(1);
    }
    Ok(())
}
