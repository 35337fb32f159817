// insights/src/output.rs
//
// Terminal rendering (comfy-table). Commands print, this module only builds strings.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use insights_core::application::{AnalysisReport, ScanResult};
use insights_core::domain::alerts::{Alert, AlertSeverity, AlertStatus, AlertSummary};
use insights_core::domain::metrics::MetricSnapshot;
use insights_core::domain::quality::{DataQualityReport, IssueSeverity};
use insights_core::domain::roles::RoleAssignment;
use insights_core::domain::templates::{EngineTemplate, TemplateMatch};

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn pct(value: f64) -> String {
    format!("{:.1}%", value)
}

fn severity_cell(severity: IssueSeverity) -> Cell {
    let color = match severity {
        IssueSeverity::High => Color::Red,
        IssueSeverity::Medium => Color::Yellow,
        IssueSeverity::Low => Color::Grey,
    };
    Cell::new(severity.as_str()).fg(color)
}

pub fn columns_table(quality: &DataQualityReport, roles: &[RoleAssignment]) -> Table {
    let mut t = table();
    t.set_header(vec![
        "Column", "Type", "Role", "Meaning", "Nulls", "Unique", "Issues", "Samples",
    ]);
    for col in &quality.columns {
        let role = roles.iter().find(|r| r.column == col.name);
        t.add_row(vec![
            Cell::new(&col.name),
            Cell::new(col.data_type.as_str()),
            Cell::new(role.map(|r| r.role.as_str()).unwrap_or("-")),
            Cell::new(
                role.and_then(|r| r.semantic)
                    .map(|s| s.as_str())
                    .unwrap_or("-"),
            ),
            Cell::new(pct(col.null_percentage)),
            Cell::new(col.unique_count),
            Cell::new(quality.issues_for(&col.name).count()),
            Cell::new(col.sample_values.join(", ")),
        ]);
    }
    t
}

pub fn issues_table(quality: &DataQualityReport) -> Table {
    let mut t = table();
    t.set_header(vec!["Severity", "Issue", "Column", "Rows", "Details"]);
    for issue in &quality.issues {
        t.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(issue.kind.as_str()),
            Cell::new(issue.column.as_deref().unwrap_or("*")),
            Cell::new(issue.affected_rows),
            Cell::new(&issue.message),
        ]);
    }
    t
}

pub fn quality_summary(quality: &DataQualityReport) -> String {
    format!(
        "Score {}/100 ({}) | {} rows x {} columns | completeness {} | {} duplicate row(s) | issues: {} high, {} medium, {} low",
        quality.score,
        quality.grade,
        quality.row_count,
        quality.column_count,
        pct(quality.completeness),
        quality.duplicate_rows,
        quality.count_by_severity(IssueSeverity::High),
        quality.count_by_severity(IssueSeverity::Medium),
        quality.count_by_severity(IssueSeverity::Low),
    )
}

pub fn matches_table(matches: &[TemplateMatch]) -> Table {
    let mut t = table();
    t.set_header(vec!["Template", "Engine", "Confidence", "Mapped", "Missing required"]);
    for m in matches {
        let missing: Vec<&str> = m.missing_required.iter().map(|s| s.as_str()).collect();
        t.add_row(vec![
            Cell::new(&m.template_id),
            Cell::new(&m.engine),
            Cell::new(format!("{:.0}%", m.confidence * 100.0)),
            Cell::new(m.mapping.len()),
            Cell::new(if missing.is_empty() {
                "-".to_string()
            } else {
                missing.join(", ")
            }),
        ]);
    }
    t
}

pub fn catalogue_table(templates: &[EngineTemplate]) -> Table {
    let mut t = table();
    t.set_header(vec!["Id", "Name", "Engine", "Fields", "Description"]);
    for tpl in templates {
        let required = tpl.fields.iter().filter(|f| f.required).count();
        t.add_row(vec![
            Cell::new(&tpl.id),
            Cell::new(&tpl.name),
            Cell::new(&tpl.engine),
            Cell::new(format!("{} ({} required)", tpl.fields.len(), required)),
            Cell::new(&tpl.description),
        ]);
    }
    t
}

pub fn analysis_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "📊 {} ({} rows{}, {} columns)\n",
        report.dataset.name,
        report.dataset.rows,
        if report.dataset.is_sampled() {
            format!(" sampled from {}", report.dataset.total_rows)
        } else {
            String::new()
        },
        report.dataset.columns,
    ));
    out.push_str(&format!("{}\n\n", quality_summary(&report.quality)));
    out.push_str(&format!(
        "{}\n",
        columns_table(&report.quality, &report.roles)
    ));

    if !report.quality.issues.is_empty() {
        out.push_str(&format!("\n{}\n", issues_table(&report.quality)));
    }

    out.push_str(&kpi_text(&report.metrics));

    if !report.insights.is_empty() {
        out.push_str("\n💡 Insights\n");
        for insight in &report.insights {
            out.push_str(&format!("   - {}\n", insight));
        }
    }
    out
}

/// Game KPIs of the snapshot; the other metrics are only counted.
pub fn kpi_text(metrics: &MetricSnapshot) -> String {
    if metrics.is_empty() {
        return String::new();
    }
    let mut out = format!("\n📈 {} metric(s) available for alert rules\n", metrics.len());
    for (name, value) in metrics.iter().filter(|(n, _)| n.starts_with("kpi.")) {
        out.push_str(&format!("   {:<22} {}\n", name, format_value(value)));
    }
    out
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn alert_severity_cell(severity: AlertSeverity) -> Cell {
    let color = match severity {
        AlertSeverity::Critical => Color::Red,
        AlertSeverity::Warning => Color::Yellow,
        AlertSeverity::Info => Color::Cyan,
    };
    Cell::new(severity.as_str()).fg(color)
}

pub fn alerts_table<'a>(alerts: impl IntoIterator<Item = &'a Alert>) -> Table {
    let mut t = table();
    t.set_header(vec!["Id", "Severity", "Status", "Metric", "Value", "Raised", "Message"]);
    for alert in alerts {
        let status = match alert.status {
            AlertStatus::Active => Cell::new(alert.status.as_str()).fg(Color::Red),
            _ => Cell::new(alert.status.as_str()),
        };
        t.add_row(vec![
            Cell::new(short_id(&alert.id)),
            alert_severity_cell(alert.severity),
            status,
            Cell::new(&alert.metric),
            Cell::new(format!("{:.2}", alert.observed_value)),
            Cell::new(alert.created_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(&alert.message),
        ]);
    }
    t
}

pub fn alert_summary(summary: &AlertSummary) -> String {
    format!(
        "{} alert(s): {} active, {} acknowledged, {} resolved, {} dismissed ({} critical open)",
        summary.total,
        summary.active,
        summary.acknowledged,
        summary.resolved,
        summary.dismissed,
        summary.critical_open,
    )
}

pub fn scan_table(result: &ScanResult) -> Table {
    let mut t = table();
    t.set_header(vec!["File", "Rows", "Score", "Issues", "Template"]);
    for (path, report) in &result.reports {
        t.add_row(vec![
            Cell::new(path.display()),
            Cell::new(report.dataset.total_rows),
            Cell::new(format!("{} ({})", report.quality.score, report.quality.grade)),
            Cell::new(report.quality.issues.len()),
            Cell::new(
                report
                    .best_template
                    .as_ref()
                    .map(|m| m.template_id.as_str())
                    .unwrap_or("-"),
            ),
        ]);
    }
    for failure in &result.failures {
        t.add_row(vec![
            Cell::new(failure.path.display()),
            Cell::new("-"),
            Cell::new("failed").fg(Color::Red),
            Cell::new("-"),
            Cell::new(&failure.error),
        ]);
    }
    t
}

/// Ids are uuids; the first block is enough to address an alert.
pub fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}
