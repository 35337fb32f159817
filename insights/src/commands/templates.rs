// insights/src/commands/templates.rs
//
// USE CASE: Show the engine templates, or how well a file matches them.

use anyhow::Context;
use std::path::PathBuf;

use insights_core::application::analyze_file;
use insights_core::domain::templates::TemplateMatcher;
use insights_core::infrastructure::adapters::DuckDbReader;

use crate::output;

pub async fn execute(project_dir: PathBuf, file: Option<PathBuf>) -> anyhow::Result<()> {
    let config = super::load_config(&project_dir)?;

    let matcher = TemplateMatcher::new(&config.templates);
    let Some(file) = file else {
        println!("🧩 {} template(s) available", matcher.templates().len());
        println!("{}", output::catalogue_table(matcher.templates()));
        return Ok(());
    };

    let reader = DuckDbReader::new(config.analysis.max_rows);
    let report = analyze_file(&reader, &file, &config)
        .await
        .with_context(|| format!("Failed to analyse {}", file.display()))?;

    println!("{}", output::matches_table(&report.templates));
    match &report.best_template {
        Some(best) => {
            println!(
                "🎯 Best match: {} ({:.0}%)",
                best.name,
                best.confidence * 100.0
            );
            if let Some(template) = matcher.get(&best.template_id) {
                println!("   {}", template.description);
            }
            for (semantic, column) in &best.mapping {
                println!("   {:<16} <- {}", semantic.as_str(), column);
            }
        }
        None => println!(
            "🤷 No template reaches {:.0}% confidence.",
            config.analysis.min_template_confidence * 100.0
        ),
    }
    Ok(())
}
