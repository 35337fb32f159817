// insights-core/src/domain/quality/mod.rs

pub mod issue;
pub mod report;

pub use issue::{IssueKind, IssueSeverity, QualityIssue};
pub use report::{DataQualityReport, QualityGrade, QualityThresholds, assess_quality};
