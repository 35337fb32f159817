// insights-core/src/application/analysis.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::dataset::Dataset;
use crate::domain::metrics::MetricSnapshot;
use crate::domain::profile::ColumnAnalyzer;
use crate::domain::project::ProjectConfig;
use crate::domain::quality::{DataQualityReport, assess_quality};
use crate::domain::roles::{RoleAssignment, RoleInference};
use crate::domain::templates::{TemplateMatch, TemplateMatcher};
use crate::error::InsightsError;
use crate::infrastructure::fs::save_json;
use crate::ports::reader::DatasetReader;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetSummary {
    pub name: String,
    pub rows: usize,
    pub total_rows: usize,
    pub columns: usize,
}

impl DatasetSummary {
    pub fn is_sampled(&self) -> bool {
        self.total_rows > self.rows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Template,
    Quality,
    Column,
    Kpi,
    Sampling,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Everything one analysis pass produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub dataset: DatasetSummary,
    pub generated_at: DateTime<Utc>,
    pub quality: DataQualityReport,
    pub roles: Vec<RoleAssignment>,
    pub templates: Vec<TemplateMatch>,
    pub best_template: Option<TemplateMatch>,
    pub metrics: MetricSnapshot,
    pub insights: Vec<Insight>,
}

impl AnalysisReport {
    pub fn role_of(&self, column: &str) -> Option<&RoleAssignment> {
        self.roles.iter().find(|r| r.column == column)
    }
}

#[instrument(skip_all, fields(dataset = %dataset.name))]
pub fn analyze_dataset(
    dataset: &Dataset,
    config: &ProjectConfig,
) -> Result<AnalysisReport, InsightsError> {
    let columns = ColumnAnalyzer::new(&config.analysis)?.analyze(dataset);
    let roles = RoleInference::new()?.infer(&columns);

    let matcher = TemplateMatcher::new(&config.templates);
    let templates = matcher.rank(&roles, &columns);
    let best_template =
        TemplateMatcher::best_match(&templates, config.analysis.min_template_confidence).cloned();

    let quality = assess_quality(dataset, columns, &config.quality);
    let metrics = MetricSnapshot::from_analysis(dataset, &quality, &roles);

    let summary = DatasetSummary {
        name: dataset.name.clone(),
        rows: dataset.row_count(),
        total_rows: dataset.total_rows,
        columns: dataset.column_count(),
    };
    let insights = build_insights(&summary, &quality, best_template.as_ref(), &metrics);

    info!(
        score = quality.score,
        issues = quality.issues.len(),
        template = best_template.as_ref().map(|t| t.template_id.as_str()).unwrap_or("none"),
        "Analysis complete"
    );

    Ok(AnalysisReport {
        dataset: summary,
        generated_at: Utc::now(),
        quality,
        roles,
        templates,
        best_template,
        metrics,
        insights,
    })
}

/// Reads `path` with `reader`, then analyses it.
pub async fn analyze_file(
    reader: &dyn DatasetReader,
    path: &Path,
    config: &ProjectConfig,
) -> Result<AnalysisReport, InsightsError> {
    let dataset = reader.read(path).await?;
    analyze_dataset(&dataset, config)
}

/// `<target>/reports/<dataset>.json`
pub fn save_report(target_dir: &Path, report: &AnalysisReport) -> Result<PathBuf, InsightsError> {
    let path = target_dir
        .join("reports")
        .join(format!("{}.json", report.dataset.name));
    save_json(&path, report)?;
    Ok(path)
}

fn build_insights(
    summary: &DatasetSummary,
    quality: &DataQualityReport,
    template: Option<&TemplateMatch>,
    metrics: &MetricSnapshot,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    let mut push = |kind, message: String| insights.push(Insight { kind, message });

    match template {
        Some(t) => push(
            InsightKind::Template,
            format!(
                "Looks like a {} export ({:.0}% match)",
                t.name,
                t.confidence * 100.0
            ),
        ),
        None => push(
            InsightKind::Template,
            "No engine template matched, columns were classified generically".to_string(),
        ),
    }

    push(
        InsightKind::Quality,
        format!(
            "Data quality is {} ({}/100) with {} issue(s)",
            quality.grade,
            quality.score,
            quality.issues.len()
        ),
    );

    let mut sparse: Vec<_> = quality
        .columns
        .iter()
        .filter(|c| c.null_percentage > 0.0)
        .collect();
    sparse.sort_by(|a, b| {
        b.null_percentage
            .total_cmp(&a.null_percentage)
            .then_with(|| a.name.cmp(&b.name))
    });
    for column in sparse.into_iter().take(3) {
        push(
            InsightKind::Column,
            format!("Column '{}' is {:.1}% empty", column.name, column.null_percentage),
        );
    }

    if let (Some(events), Some(users)) = (metrics.get("kpi.events"), metrics.get("kpi.unique_users"))
    {
        push(
            InsightKind::Kpi,
            format!("{} events from {} players", events, users),
        );
    }
    if let Some(revenue) = metrics.get("kpi.total_revenue") {
        let paying = metrics.get("kpi.paying_users").unwrap_or(0.0);
        let mut message = format!("Revenue {:.2} from {} paying players", revenue, paying);
        if let Some(arpu) = metrics.get("kpi.arpu") {
            message.push_str(&format!(" (ARPU {:.2})", arpu));
        }
        push(InsightKind::Kpi, message);
    }

    if summary.is_sampled() {
        push(
            InsightKind::Sampling,
            format!(
                "Analysed the first {} of {} rows",
                summary.rows, summary.total_rows
            ),
        );
    }

    insights
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::fixtures;
    use crate::domain::roles::ColumnRole;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_full_pass_on_game_events() -> Result<()> {
        let report = analyze_dataset(&fixtures::game_events(), &ProjectConfig::default())?;

        assert_eq!(report.quality.score, 95);
        assert_eq!(
            report.best_template.as_ref().map(|t| t.template_id.as_str()),
            Some("unity_analytics")
        );
        assert_eq!(report.role_of("userId").unwrap().role, ColumnRole::Identifier);
        assert_eq!(report.metrics.get("kpi.paying_users"), Some(2.0));
        assert!(!report.dataset.is_sampled());

        let text: Vec<String> = report.insights.iter().map(|i| i.to_string()).collect();
        insta::assert_snapshot!(text.join("\n"), @r"
        Looks like a Unity Analytics export (98% match)
        Data quality is excellent (95/100) with 1 issue(s)
        Column 'revenue' is 16.7% empty
        6 events from 3 players
        Revenue 14.98 from 2 paying players (ARPU 4.99)
        ");
        Ok(())
    }

    #[test]
    fn test_empty_dataset_still_reports() -> Result<()> {
        let ds = Dataset::default();
        let report = analyze_dataset(&ds, &ProjectConfig::default())?;
        assert_eq!(report.quality.score, 0);
        assert!(report.best_template.is_none());
        assert_eq!(report.insights[0].kind, InsightKind::Template);
        Ok(())
    }

    #[test]
    fn test_sampling_insight() -> Result<()> {
        let mut ds = fixtures::game_events();
        ds.total_rows = 600;
        let report = analyze_dataset(&ds, &ProjectConfig::default())?;
        let last = report.insights.last().unwrap();
        assert_eq!(last.kind, InsightKind::Sampling);
        assert_eq!(last.message, "Analysed the first 6 of 600 rows");
        Ok(())
    }

    #[test]
    fn test_save_report_location() -> Result<()> {
        let dir = tempdir()?;
        let report = analyze_dataset(&fixtures::game_events(), &ProjectConfig::default())?;
        let path = save_report(dir.path(), &report)?;
        assert_eq!(path, dir.path().join("reports/events.json"));

        let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        assert_eq!(saved["quality"]["score"], 95);
        assert_eq!(saved["metrics"]["kpi.unique_users"], 3.0);
        Ok(())
    }
}
