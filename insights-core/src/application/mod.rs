// insights-core/src/application/mod.rs

pub mod alerting;
pub mod analysis;
pub mod batch;
pub mod clean;
pub mod ports;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI fait `use insights_core::application::{analyze_dataset, AlertEngine};`

pub use alerting::{AlertEngine, check_alerts};
pub use analysis::{AnalysisReport, Insight, InsightKind, analyze_dataset, analyze_file, save_report};
pub use batch::{ScanFailure, ScanResult, scan_directory};
pub use clean::clean_project;
