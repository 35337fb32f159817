// insights/src/commands/scan.rs
//
// USE CASE: Analyse a whole data directory.

use anyhow::Context;
use std::path::PathBuf;

use insights_core::application::scan_directory;
use insights_core::infrastructure::adapters::DuckDbReader;

use crate::cli::OutputFormat;
use crate::output;

pub async fn execute(
    project_dir: PathBuf,
    data_dir: Option<String>,
    min_score: Option<u8>,
    concurrency: usize,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    let config = super::load_config(&project_dir)?;
    let data_dir = project_dir.join(data_dir.as_deref().unwrap_or(&config.data_path));
    let reader = DuckDbReader::new(config.analysis.max_rows);

    let result = scan_directory(&data_dir, &reader, &config, concurrency)
        .await
        .with_context(|| format!("Failed to scan {}", data_dir.display()))?;

    result.save_reports(&super::target_dir(&project_dir, &config))?;

    match format {
        OutputFormat::Json => {
            let reports: Vec<_> = result.reports.iter().map(|(_, r)| r).collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Table => {
            println!(
                "🔎 {} file(s) in {} ({:.2?})",
                result.file_count(),
                data_dir.display(),
                start.elapsed()
            );
            println!("{}", output::scan_table(&result));
        }
    }

    if !result.failures.is_empty() {
        eprintln!("❌ {} file(s) could not be analysed.", result.failures.len());
        std::process::exit(1);
    }

    if let Some(min) = min_score {
        let below: Vec<_> = result
            .reports
            .iter()
            .filter(|(_, r)| r.quality.score < min)
            .collect();
        if !below.is_empty() {
            for (path, report) in &below {
                eprintln!(
                    "❌ {} scores {} (< {})",
                    path.display(),
                    report.quality.score,
                    min
                );
            }
            std::process::exit(1);
        }
    }
    Ok(())
}
