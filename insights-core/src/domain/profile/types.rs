// insights-core/src/domain/profile/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type inferred for a column from its values.
///
/// Variants are declared from the most specific to the most general; ties in
/// the majority vote go to the most general candidate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    Unknown,
    Boolean,
    Number,
    Date,
    Email,
    Url,
    String,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Date => "date",
            Self::Email => "email",
            Self::Url => "url",
            Self::String => "string",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub sum: f64,
    pub std_dev: f64,
    /// Values outside 1.5 × IQR.
    pub outlier_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValueFrequency {
    pub value: String,
    pub count: usize,
    /// Share of non-null values.
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub name: String,
    pub data_type: DataType,
    pub total_count: usize,
    pub null_count: usize,
    pub null_percentage: f64,
    pub unique_count: usize,
    /// Distinct values over non-null values.
    pub unique_percentage: f64,
    pub sample_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
    pub distribution: Vec<ValueFrequency>,
    /// Share of non-null values that have the dominant type (0.0 - 1.0).
    pub type_consistency: f64,
}

impl ColumnStatistics {
    pub fn non_null_count(&self) -> usize {
        self.total_count - self.null_count
    }

    pub fn completeness(&self) -> f64 {
        100.0 - self.null_percentage
    }

    pub fn is_empty(&self) -> bool {
        self.non_null_count() == 0
    }
}

/// Percentage rounded to two decimals; 0 when the whole is empty.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn test_generality_ordering() {
        assert!(DataType::String > DataType::Number);
        assert!(DataType::Number > DataType::Boolean);
        assert_eq!(DataType::default(), DataType::Unknown);
    }
}
