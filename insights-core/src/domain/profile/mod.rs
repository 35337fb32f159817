// insights-core/src/domain/profile/mod.rs

pub mod analyzer;
pub mod detector;
pub mod types;

pub use analyzer::ColumnAnalyzer;
pub use detector::TypeDetector;
pub use types::{ColumnStatistics, DataType, NumericSummary, ValueFrequency};
