// insights-core/src/domain/quality/issue.rs

use serde::{Deserialize, Serialize};
use std::fmt;

// Same trick as the alert severities: declaration order gives Low < Medium < High for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Low,
    Medium,
    High,
}

impl IssueSeverity {
    /// Points deducted from the completeness average.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Low => 2.0,
            Self::Medium => 5.0,
            Self::High => 10.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    EmptyDataset,
    EmptyColumn,
    MissingValues,
    MixedTypes,
    ConstantColumn,
    DuplicateRows,
    Outliers,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyDataset => "empty_dataset",
            Self::EmptyColumn => "empty_column",
            Self::MissingValues => "missing_values",
            Self::MixedTypes => "mixed_types",
            Self::ConstantColumn => "constant_column",
            Self::DuplicateRows => "duplicate_rows",
            Self::Outliers => "outliers",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityIssue {
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    /// `None` for dataset-wide issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
    pub affected_rows: usize,
}

impl QualityIssue {
    pub fn dataset(kind: IssueKind, severity: IssueSeverity, message: String, rows: usize) -> Self {
        Self {
            kind,
            severity,
            column: None,
            message,
            affected_rows: rows,
        }
    }

    pub fn column(
        kind: IssueKind,
        severity: IssueSeverity,
        column: &str,
        message: String,
        rows: usize,
    ) -> Self {
        Self {
            kind,
            severity,
            column: Some(column.to_string()),
            message,
            affected_rows: rows,
        }
    }
}
