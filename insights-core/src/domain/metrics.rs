// insights-core/src/domain/metrics.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::domain::dataset::{Dataset, is_null_like};
use crate::domain::profile::TypeDetector;
use crate::domain::quality::DataQualityReport;
use crate::domain::roles::{RoleAssignment, SemanticType};

/// Flat view of everything an alert rule can look at, keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSnapshot {
    values: BTreeMap<String, f64>,
}

impl MetricSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        if value.is_finite() {
            self.values.insert(name.into(), value);
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn from_analysis(
        dataset: &Dataset,
        report: &DataQualityReport,
        roles: &[RoleAssignment],
    ) -> Self {
        let mut snapshot = Self::new();
        snapshot.insert("row_count", report.row_count as f64);
        snapshot.insert("total_rows", dataset.total_rows as f64);
        snapshot.insert("column_count", report.column_count as f64);
        snapshot.insert("quality_score", f64::from(report.score));
        snapshot.insert("completeness", report.completeness);
        snapshot.insert("duplicate_rows", report.duplicate_rows as f64);
        snapshot.insert("issue_count", report.issues.len() as f64);

        for stats in &report.columns {
            snapshot.insert(format!("{}.null_pct", stats.name), stats.null_percentage);
            snapshot.insert(format!("{}.unique_count", stats.name), stats.unique_count as f64);
            if let Some(numeric) = &stats.numeric {
                snapshot.insert(format!("{}.sum", stats.name), numeric.sum);
                snapshot.insert(format!("{}.mean", stats.name), numeric.mean);
                snapshot.insert(format!("{}.min", stats.name), numeric.min);
                snapshot.insert(format!("{}.max", stats.name), numeric.max);
                snapshot.insert(format!("{}.median", stats.name), numeric.median);
            }
        }

        snapshot.add_kpis(dataset, report, roles);
        snapshot
    }

    fn add_kpis(&mut self, dataset: &Dataset, report: &DataQualityReport, roles: &[RoleAssignment]) {
        let user_col = column_for(roles, SemanticType::UserId);
        let session_col = column_for(roles, SemanticType::SessionId);
        let event_col = column_for(roles, SemanticType::EventName);
        let revenue_col = column_for(roles, SemanticType::Revenue);

        let users = user_col.and_then(|c| report.column(c)).map(|s| s.unique_count);
        if let Some(users) = users {
            self.insert("kpi.unique_users", users as f64);
        }
        if let Some(sessions) = session_col.and_then(|c| report.column(c)) {
            self.insert("kpi.unique_sessions", sessions.unique_count as f64);
        }
        if let Some(events) = event_col.and_then(|c| report.column(c)) {
            self.insert("kpi.events", events.non_null_count() as f64);
        }

        let Some(revenue) = revenue_col.and_then(|c| report.column(c)) else {
            return;
        };
        let Some(total) = revenue.numeric.as_ref().map(|n| n.sum) else {
            return;
        };
        self.insert("kpi.total_revenue", total);

        if let Some(users) = users.filter(|u| *u > 0) {
            self.insert("kpi.arpu", total / users as f64);
        }

        if let (Some(user), Some(rev)) = (
            user_col.and_then(|c| dataset.column(c)),
            revenue_col.and_then(|c| dataset.column(c)),
        ) {
            let payers: HashSet<&str> = user
                .values
                .iter()
                .zip(&rev.values)
                .filter(|(u, _)| !is_null_like(u.as_deref()))
                .filter(|(_, r)| {
                    r.as_deref()
                        .and_then(TypeDetector::parse_number)
                        .is_some_and(|v| v > 0.0)
                })
                .filter_map(|(u, _)| u.as_deref().map(str::trim))
                .collect();
            self.insert("kpi.paying_users", payers.len() as f64);
        }
    }
}

/// Most confident column carrying `semantic`.
fn column_for(roles: &[RoleAssignment], semantic: SemanticType) -> Option<&str> {
    roles
        .iter()
        .filter(|r| r.semantic == Some(semantic))
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        .map(|r| r.column.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::fixtures;
    use crate::domain::profile::ColumnAnalyzer;
    use crate::domain::project::AnalysisSettings;
    use crate::domain::quality::{QualityThresholds, assess_quality};
    use crate::domain::roles::RoleInference;
    use anyhow::Result;

    fn snapshot_of(ds: &Dataset) -> Result<MetricSnapshot> {
        let columns = ColumnAnalyzer::new(&AnalysisSettings::default())?.analyze(ds);
        let roles = RoleInference::new()?.infer(&columns);
        let report = assess_quality(ds, columns, &QualityThresholds::default());
        Ok(MetricSnapshot::from_analysis(ds, &report, &roles))
    }

    #[test]
    fn test_game_kpis() -> Result<()> {
        let snapshot = snapshot_of(&fixtures::game_events())?;

        assert_eq!(snapshot.get("row_count"), Some(6.0));
        assert_eq!(snapshot.get("quality_score"), Some(95.0));
        assert_eq!(snapshot.get("kpi.unique_users"), Some(3.0));
        assert_eq!(snapshot.get("kpi.unique_sessions"), Some(3.0));
        assert_eq!(snapshot.get("kpi.events"), Some(6.0));
        assert_eq!(snapshot.get("kpi.paying_users"), Some(2.0));

        let revenue = snapshot.get("kpi.total_revenue").unwrap_or_default();
        assert!((revenue - 14.98).abs() < 1e-9);
        let arpu = snapshot.get("kpi.arpu").unwrap_or_default();
        assert!((arpu - 14.98 / 3.0).abs() < 1e-9);

        assert_eq!(snapshot.get("revenue.null_pct"), Some(16.67));
        assert_eq!(snapshot.get("revenue.max"), Some(9.99));
        assert!(snapshot.get("platform.sum").is_none());
        Ok(())
    }

    #[test]
    fn test_no_kpis_without_roles() -> Result<()> {
        let ds = fixtures::from_columns("t", &[("a", &["x", "y"]), ("b", &["1", "2"])]);
        let snapshot = snapshot_of(&ds)?;
        assert!(snapshot.iter().all(|(name, _)| !name.starts_with("kpi.")));
        assert_eq!(snapshot.get("b.sum"), Some(3.0));
        Ok(())
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let mut snapshot = MetricSnapshot::new();
        snapshot.insert("bad", f64::NAN);
        snapshot.insert("good", 1.0);
        assert_eq!(snapshot.len(), 1);
    }
}
