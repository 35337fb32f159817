// insights-core/src/domain/quality/report.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::domain::dataset::Dataset;
use crate::domain::profile::types::{ColumnStatistics, percentage};
use crate::domain::quality::issue::{IssueKind, IssueSeverity, QualityIssue};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QualityThresholds {
    #[validate(range(min = 0.0, max = 100.0))]
    pub missing_low_pct: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub missing_medium_pct: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub missing_high_pct: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_type_consistency: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub duplicate_medium_pct: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub outlier_pct: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            missing_low_pct: 5.0,
            missing_medium_pct: 20.0,
            missing_high_pct: 50.0,
            min_type_consistency: 0.9,
            duplicate_medium_pct: 5.0,
            outlier_pct: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityGrade {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityGrade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::Excellent,
            75..=89 => Self::Good,
            50..=74 => Self::Fair,
            _ => Self::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub row_count: usize,
    pub column_count: usize,
    pub duplicate_rows: usize,
    /// Mean of per-column completeness, 0 - 100.
    pub completeness: f64,
    pub score: u8,
    pub grade: QualityGrade,
    pub columns: Vec<ColumnStatistics>,
    pub issues: Vec<QualityIssue>,
}

impl DataQualityReport {
    pub fn column(&self, name: &str) -> Option<&ColumnStatistics> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn issues_for(&self, column: &str) -> impl Iterator<Item = &QualityIssue> {
        self.issues
            .iter()
            .filter(move |i| i.column.as_deref() == Some(column))
    }

    pub fn count_by_severity(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// Scores a profiled dataset:
/// `clamp(round(avg completeness - Σ severity weights), 0, 100)`.
pub fn assess_quality(
    dataset: &Dataset,
    columns: Vec<ColumnStatistics>,
    thresholds: &QualityThresholds,
) -> DataQualityReport {
    if dataset.is_empty() {
        return DataQualityReport {
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            duplicate_rows: 0,
            completeness: 0.0,
            score: 0,
            grade: QualityGrade::Poor,
            columns: Vec::new(),
            issues: vec![QualityIssue::dataset(
                IssueKind::EmptyDataset,
                IssueSeverity::High,
                format!("Dataset '{}' has no rows or no columns", dataset.name),
                0,
            )],
        };
    }

    let row_count = dataset.row_count();
    let mut issues = Vec::new();

    for stats in &columns {
        column_issues(stats, thresholds, &mut issues);
    }

    let duplicate_rows = dataset.duplicate_row_count();
    if duplicate_rows > 0 {
        let pct = percentage(duplicate_rows, row_count);
        let severity = if pct > thresholds.duplicate_medium_pct {
            IssueSeverity::Medium
        } else {
            IssueSeverity::Low
        };
        issues.push(QualityIssue::dataset(
            IssueKind::DuplicateRows,
            severity,
            format!("{} duplicate rows ({:.1}% of rows)", duplicate_rows, pct),
            duplicate_rows,
        ));
    }

    // Tri stable : l'ordre des colonnes est conservé à sévérité égale
    issues.sort_by(|a, b| b.severity.cmp(&a.severity));

    let completeness = columns.iter().map(|c| c.completeness()).sum::<f64>() / columns.len() as f64;
    let completeness = (completeness * 100.0).round() / 100.0;
    let penalty: f64 = issues.iter().map(|i| i.severity.weight()).sum();
    let score = (completeness - penalty).round().clamp(0.0, 100.0) as u8;

    DataQualityReport {
        row_count,
        column_count: columns.len(),
        duplicate_rows,
        completeness,
        score,
        grade: QualityGrade::from_score(score),
        columns,
        issues,
    }
}

fn column_issues(stats: &ColumnStatistics, t: &QualityThresholds, issues: &mut Vec<QualityIssue>) {
    let name = stats.name.as_str();

    if stats.is_empty() {
        issues.push(QualityIssue::column(
            IssueKind::EmptyColumn,
            IssueSeverity::High,
            name,
            format!("Column '{}' has no values", name),
            stats.total_count,
        ));
        // Rien d'autre à dire sur une colonne vide
        return;
    }

    let missing = stats.null_percentage;
    let missing_severity = if missing > t.missing_high_pct {
        Some(IssueSeverity::High)
    } else if missing > t.missing_medium_pct {
        Some(IssueSeverity::Medium)
    } else if missing > t.missing_low_pct {
        Some(IssueSeverity::Low)
    } else {
        None
    };
    if let Some(severity) = missing_severity {
        issues.push(QualityIssue::column(
            IssueKind::MissingValues,
            severity,
            name,
            format!("{:.1}% of values are missing in '{}'", missing, name),
            stats.null_count,
        ));
    }

    let non_null = stats.non_null_count();
    if non_null >= 2 && stats.type_consistency < t.min_type_consistency {
        let off_type = non_null - (stats.type_consistency * non_null as f64).round() as usize;
        issues.push(QualityIssue::column(
            IssueKind::MixedTypes,
            IssueSeverity::Medium,
            name,
            format!(
                "Only {:.0}% of values in '{}' look like {}",
                stats.type_consistency * 100.0,
                name,
                stats.data_type
            ),
            off_type,
        ));
    }

    if non_null >= 2 && stats.unique_count == 1 {
        let value = stats
            .distribution
            .first()
            .map(|f| f.value.as_str())
            .unwrap_or_default();
        issues.push(QualityIssue::column(
            IssueKind::ConstantColumn,
            IssueSeverity::Low,
            name,
            format!("Column '{}' always contains '{}'", name, value),
            0,
        ));
    }

    if let Some(numeric) = &stats.numeric {
        let pct = percentage(numeric.outlier_count, non_null);
        if numeric.outlier_count > 0 && pct > t.outlier_pct {
            issues.push(QualityIssue::column(
                IssueKind::Outliers,
                IssueSeverity::Low,
                name,
                format!(
                    "{} outliers in '{}' ({:.1}% of values)",
                    numeric.outlier_count, name, pct
                ),
                numeric.outlier_count,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::fixtures;
    use crate::domain::profile::ColumnAnalyzer;
    use crate::domain::project::AnalysisSettings;
    use anyhow::Result;

    fn report_for(ds: &Dataset) -> Result<DataQualityReport> {
        let columns = ColumnAnalyzer::new(&AnalysisSettings::default())?.analyze(ds);
        Ok(assess_quality(ds, columns, &QualityThresholds::default()))
    }

    #[test]
    fn test_clean_game_export_scores_high() -> Result<()> {
        let report = report_for(&fixtures::game_events())?;

        // revenue: 1 blank out of 6 -> 16.67% missing -> one low issue
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::MissingValues);
        assert_eq!(report.issues[0].severity, IssueSeverity::Low);
        assert_eq!(report.completeness, 97.22);
        assert_eq!(report.score, 95);
        assert_eq!(report.grade, QualityGrade::Excellent);
        Ok(())
    }

    #[test]
    fn test_empty_dataset_scores_zero() -> Result<()> {
        let ds = Dataset::from_rows("empty", vec!["a".into()], vec![])?;
        let report = report_for(&ds)?;
        assert_eq!(report.score, 0);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::EmptyDataset);
        assert!(report.columns.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_value_bands() -> Result<()> {
        let ds = fixtures::from_columns(
            "t",
            &[
                ("id", &["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]),
                ("medium", &["a", "b", "c", "", "", "", "d", "e", "f", "g"]),
                ("high", &["a", "", "", "", "", "", "", "b", "c", "d"]),
            ],
        );
        let report = report_for(&ds)?;

        let severities: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::MissingValues)
            .map(|i| (i.column.clone().unwrap_or_default(), i.severity))
            .collect();
        assert_eq!(
            severities,
            vec![
                ("high".to_string(), IssueSeverity::High),
                ("medium".to_string(), IssueSeverity::Medium),
            ]
        );
        // completeness = (100 + 70 + 40) / 3 = 70 ; penalty = 10 + 5
        assert_eq!(report.completeness, 70.0);
        assert_eq!(report.score, 55);
        assert_eq!(report.grade, QualityGrade::Fair);
        Ok(())
    }

    #[test]
    fn test_empty_column_is_not_double_counted() -> Result<()> {
        let ds = fixtures::from_columns("t", &[("id", &["1", "2"]), ("ghost", &["", "null"])]);
        let report = report_for(&ds)?;
        let ghost: Vec<_> = report.issues_for("ghost").collect();
        assert_eq!(ghost.len(), 1);
        assert_eq!(ghost[0].kind, IssueKind::EmptyColumn);
        Ok(())
    }

    #[test]
    fn test_duplicates_constant_and_mixed_types() -> Result<()> {
        let ds = fixtures::from_columns(
            "t",
            &[
                ("version", &["1.0", "1.0", "1.0", "1.0"]),
                ("value", &["1", "1", "x", "2"]),
            ],
        );
        let report = report_for(&ds)?;
        let kinds: Vec<IssueKind> = report.issues.iter().map(|i| i.kind).collect();

        assert!(kinds.contains(&IssueKind::ConstantColumn));
        assert!(kinds.contains(&IssueKind::MixedTypes));
        assert!(kinds.contains(&IssueKind::DuplicateRows));
        assert_eq!(report.duplicate_rows, 1);
        // Medium issues come first
        assert_eq!(report.issues[0].severity, IssueSeverity::Medium);
        Ok(())
    }

    #[test]
    fn test_score_is_clamped_at_zero() -> Result<()> {
        let ds = fixtures::from_columns(
            "t",
            &[
                ("a", &["", "", "", "x"]),
                ("b", &["", "", "", "y"]),
                ("c", &["", "", "", "z"]),
                ("d", &["", "", "", ""]),
            ],
        );
        let report = report_for(&ds)?;
        assert_eq!(report.score, 0);
        assert_eq!(report.grade, QualityGrade::Poor);
        Ok(())
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(QualityGrade::from_score(100), QualityGrade::Excellent);
        assert_eq!(QualityGrade::from_score(90), QualityGrade::Excellent);
        assert_eq!(QualityGrade::from_score(89), QualityGrade::Good);
        assert_eq!(QualityGrade::from_score(74), QualityGrade::Fair);
        assert_eq!(QualityGrade::from_score(49), QualityGrade::Poor);
    }
}
