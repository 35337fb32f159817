// insights/src/commands/alerts.rs
//
// USE CASE: Evaluate alert rules, then manage the raised alerts.

use anyhow::Context;
use chrono::Utc;
use std::path::PathBuf;

use insights_core::application::{AlertEngine, analyze_file, check_alerts};
use insights_core::domain::alerts::AlertStatus;
use insights_core::infrastructure::adapters::DuckDbReader;
use insights_core::infrastructure::jinja::JinjaRenderer;
use insights_core::infrastructure::state::AlertStateStore;

use crate::cli::AlertAction;
use crate::output;

pub async fn execute(project_dir: PathBuf, action: AlertAction) -> anyhow::Result<()> {
    let config = super::load_config(&project_dir)?;
    let store = AlertStateStore::new(&super::target_dir(&project_dir, &config));
    let now = Utc::now();

    match action {
        AlertAction::Check { file } => {
            if config.alerts.rules.is_empty() && config.alerts.anomalies.is_empty() {
                println!("🤷 No alert rules configured (add config/alerts.yml).");
                return Ok(());
            }

            let reader = DuckDbReader::new(config.analysis.max_rows);
            let report = analyze_file(&reader, &file, &config)
                .await
                .with_context(|| format!("Failed to analyse {}", file.display()))?;

            let renderer = JinjaRenderer::new();
            let raised = check_alerts(&store, &config.alerts, &report.metrics, &renderer, now)?;

            if raised.is_empty() {
                println!(
                    "✨ {} rule(s) checked, no alert raised.",
                    config.alerts.rules.len() + config.alerts.anomalies.len()
                );
            } else {
                println!("🔔 {} alert(s) raised", raised.len());
                println!("{}", output::alerts_table(&raised));
            }
        }

        AlertAction::List { status } => {
            let status: Option<AlertStatus> = status.map(|s| s.parse()).transpose()?;
            let state = store.load()?;
            let alerts: Vec<_> = state.with_status(status).collect();
            if alerts.is_empty() {
                println!("✨ No alerts.");
            } else {
                println!("{}", output::alerts_table(alerts));
            }
            println!("{}", output::alert_summary(&AlertEngine::summary(&state)));
        }

        AlertAction::Ack { id } => {
            let mut state = store.load()?;
            let alert = AlertEngine::acknowledge(&mut state, &id, now)?;
            store.save(&state)?;
            println!("👀 Acknowledged {} ({})", output::short_id(&alert.id), alert.title);
        }

        AlertAction::Resolve { id } => {
            let mut state = store.load()?;
            let alert = AlertEngine::resolve(&mut state, &id, now)?;
            store.save(&state)?;
            println!("✅ Resolved {} ({})", output::short_id(&alert.id), alert.title);
        }

        AlertAction::Dismiss { id } => {
            let mut state = store.load()?;
            let alert = AlertEngine::dismiss(&mut state, &id, now)?;
            store.save(&state)?;
            println!("🔕 Dismissed {} ({})", output::short_id(&alert.id), alert.title);
        }

        AlertAction::Prune => {
            let mut state = store.load()?;
            let removed = AlertEngine::prune(&mut state, config.alerts.retention_days, now);
            store.save(&state)?;
            println!(
                "🧹 Pruned {} alert(s) older than {} days.",
                removed, config.alerts.retention_days
            );
        }
    }
    Ok(())
}
